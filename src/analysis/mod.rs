//! Summary analysis.
//!
//! The engine runs six independent dimension evaluators over every
//! entity. Each evaluator reads the shared collections and reports an
//! [`Evaluation`]; the engine turns those into per-entity summaries.

pub mod aggregator;
pub mod automatization;
pub mod bands;
pub mod engine;
pub mod homogeneity;
pub mod peers;
pub mod rating;
pub mod relevance;
pub mod scope;

pub use aggregator::*;
pub use engine::{compute_summaries, result_keys, SummaryEngine, SummaryResults};

use crate::locations::LocationTree;
use crate::models::{EntityType, ProcessEntity, SummaryItem};
use crate::text::TextResolver;

/// The three typed entity collections of one computation pass.
#[derive(Debug, Clone, Copy)]
pub struct Collections<'a> {
    pub processes: &'a [ProcessEntity],
    pub steps: &'a [ProcessEntity],
    pub groups: &'a [ProcessEntity],
}

impl<'a> Collections<'a> {
    /// The collection holding entities of `entity_type`.
    pub fn of_type(&self, entity_type: EntityType) -> &'a [ProcessEntity] {
        match entity_type {
            EntityType::Process => self.processes,
            EntityType::Step => self.steps,
            EntityType::Group => self.groups,
        }
    }
}

/// Read-only inputs shared by every evaluator.
pub struct EvalContext<'a> {
    pub tree: &'a LocationTree<'a>,
    pub collections: Collections<'a>,
    pub resolver: &'a dyn TextResolver,
}

impl EvalContext<'_> {
    /// Resolved singular and plural display names of an entity type.
    pub fn entity_names(&self, entity_type: EntityType) -> (String, String) {
        let (singular, plural) = entity_type.name_keys();
        (
            self.resolver.resolve_plain(singular),
            self.resolver.resolve_plain(plural),
        )
    }
}

/// Outcome of one dimension evaluator for one entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// The dimension can never apply to this entity; not counted as attempted.
    Uncounted,
    /// Attempted but no data to summarize.
    Declined(&'static str),
    /// Attempted and produced an item.
    Produced(SummaryItem),
}

impl Evaluation {
    pub fn is_attempted(&self) -> bool {
        !matches!(self, Evaluation::Uncounted)
    }

    pub fn item(&self) -> Option<&SummaryItem> {
        match self {
            Evaluation::Produced(item) => Some(item),
            _ => None,
        }
    }

    pub fn into_item(self) -> Option<SummaryItem> {
        match self {
            Evaluation::Produced(item) => Some(item),
            _ => None,
        }
    }
}

/// Whether `step` implements `entity`: same process for processes, same
/// step template for steps, same class path for groups.
pub fn step_matches_entity(entity: &ProcessEntity, step: &ProcessEntity) -> bool {
    match entity.entity_type {
        EntityType::Process => step.business_process_id == entity.business_process_id,
        EntityType::Step => step.business_step_id == entity.business_step_id,
        EntityType::Group => step.business_process_class == entity.business_process_class,
    }
}
