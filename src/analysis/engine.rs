//! Summary orchestration.
//!
//! Builds the location tree once, then evaluates every entity of every
//! collection: peer aggregation first, then the six dimensions in a fixed
//! order. Results are returned keyed by [`EntityKey`]; inputs are never
//! mutated.

use super::peers::{self, PeerInputs};
use super::{automatization, homogeneity, rating, relevance, scope};
use super::{Collections, EvalContext, Evaluation};
use crate::error::EngineError;
use crate::locations::LocationTree;
use crate::models::{DimensionId, EntityKey, EntitySummary, EntityType, Location, ProcessEntity};
use crate::text::TextResolver;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, trace, warn};

/// Per-entity results of one computation pass.
pub type SummaryResults = BTreeMap<EntityKey, EntitySummary>;

const EVALUATION_ORDER: [EntityType; 3] = [EntityType::Process, EntityType::Step, EntityType::Group];

/// Result key of every entity, in evaluation order.
///
/// Entities whose [`ProcessEntity::key`] is already taken get a `#2`, `#3`,
/// ... suffix in input order, so every input entity keeps its own result.
pub fn result_keys<'c>(collections: &Collections<'c>) -> Vec<(&'c ProcessEntity, EntityKey)> {
    let mut used = BTreeSet::new();
    let mut keyed = Vec::with_capacity(
        collections.processes.len() + collections.steps.len() + collections.groups.len(),
    );

    for entity_type in EVALUATION_ORDER {
        for entity in collections.of_type(entity_type) {
            let base = entity.key();
            let mut key = base.clone();
            let mut n = 1;
            while used.contains(&key) {
                n += 1;
                key = EntityKey(format!("{}#{}", base, n));
            }
            if n > 1 {
                warn!("Entity {} appears more than once; keyed as {}", base, key);
            }
            used.insert(key.clone());
            keyed.push((entity, key));
        }
    }

    keyed
}

/// Evaluates summary dimensions over a fixed location hierarchy.
pub struct SummaryEngine<'a> {
    tree: LocationTree<'a>,
    resolver: &'a dyn TextResolver,
}

impl<'a> SummaryEngine<'a> {
    pub fn new(locations: &'a [Location], resolver: &'a dyn TextResolver) -> Self {
        Self {
            tree: LocationTree::build(locations),
            resolver,
        }
    }

    /// Use an already built tree.
    pub fn with_tree(tree: LocationTree<'a>, resolver: &'a dyn TextResolver) -> Self {
        Self { tree, resolver }
    }

    pub fn tree(&self) -> &LocationTree<'a> {
        &self.tree
    }

    /// Summarize every process, step and group.
    ///
    /// Fails when an entity sits in the wrong typed collection.
    pub fn compute(&self, collections: Collections<'_>) -> Result<SummaryResults, EngineError> {
        self.compute_with_progress(collections, |_| {})
    }

    /// Like [`compute`](Self::compute), calling `on_entity` after each entity.
    pub fn compute_with_progress<F>(
        &self,
        collections: Collections<'_>,
        mut on_entity: F,
    ) -> Result<SummaryResults, EngineError>
    where
        F: FnMut(&EntityKey),
    {
        validate(&collections)?;

        let ctx = EvalContext {
            tree: &self.tree,
            collections,
            resolver: self.resolver,
        };

        let mut results = SummaryResults::new();

        for entity_type in EVALUATION_ORDER {
            debug!(
                "Summarizing {} {} entities",
                collections.of_type(entity_type).len(),
                entity_type
            );
        }

        for (entity, key) in result_keys(&collections) {
            let summary = evaluate_entity(entity, &ctx);
            on_entity(&key);
            results.insert(key, summary);
        }

        let produced: usize = results.values().map(|r| r.summary.len()).sum();
        let attempted: usize = results.values().map(|r| r.max_summary_items).sum();
        info!(
            "Summarized {} entities: {} items produced of {} attempted",
            results.len(),
            produced,
            attempted
        );

        Ok(results)
    }
}

/// Summarize all entities against `locations`.
pub fn compute_summaries(
    steps: &[ProcessEntity],
    processes: &[ProcessEntity],
    groups: &[ProcessEntity],
    locations: &[Location],
    resolver: &dyn TextResolver,
) -> Result<SummaryResults, EngineError> {
    SummaryEngine::new(locations, resolver).compute(Collections {
        processes,
        steps,
        groups,
    })
}

/// Run every dimension for one entity.
pub fn evaluate_entity(entity: &ProcessEntity, ctx: &EvalContext<'_>) -> EntitySummary {
    let inputs = peers::aggregate(entity, &ctx.collections, ctx.tree);
    let mut summary = EntitySummary::default();

    for dimension in DimensionId::ALL {
        let evaluation = evaluate_dimension(dimension, entity, &inputs, ctx);
        match &evaluation {
            Evaluation::Uncounted => {
                trace!("{} {}: not applicable", entity.key(), dimension);
            }
            Evaluation::Declined(reason) => {
                trace!("{} {}: declined ({})", entity.key(), dimension, reason);
            }
            Evaluation::Produced(item) => {
                trace!(
                    "{} {}: {:.3} {}",
                    entity.key(),
                    dimension,
                    item.score,
                    item.score_key.as_key()
                );
            }
        }

        if evaluation.is_attempted() {
            summary.max_summary_items += 1;
        }
        summary.push(evaluation.into_item());
    }

    summary
}

fn evaluate_dimension(
    dimension: DimensionId,
    entity: &ProcessEntity,
    inputs: &PeerInputs,
    ctx: &EvalContext<'_>,
) -> Evaluation {
    match dimension {
        DimensionId::Scope => scope::evaluate(entity, inputs, ctx),
        DimensionId::Relevance => relevance::evaluate(entity, inputs, ctx),
        DimensionId::Homogeneity => homogeneity::evaluate(entity, ctx),
        DimensionId::Automatization => automatization::evaluate(entity, ctx),
        DimensionId::CodeQuality => rating::evaluate_code_quality(entity, ctx),
        DimensionId::Security => rating::evaluate_security(entity, ctx),
    }
}

fn validate(collections: &Collections<'_>) -> Result<(), EngineError> {
    for expected in EVALUATION_ORDER {
        if let Some(misplaced) = collections
            .of_type(expected)
            .iter()
            .find(|e| e.entity_type != expected)
        {
            return Err(EngineError::MisplacedEntity {
                key: misplaced.key(),
                expected,
                actual: misplaced.entity_type,
            });
        }
    }
    Ok(())
}
