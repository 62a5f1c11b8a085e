//! Homogeneity: whether each step of a process runs on the same software
//! across the selected implementation locations.

use super::bands::{description_key, PctBand};
use super::{EvalContext, Evaluation};
use crate::models::{round_pct, DimensionId, ProcessEntity, SummaryItem};
use std::collections::BTreeSet;

/// Application variation summed over the distinct steps of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Variation {
    /// Σ max(0, distinct applications − 1) per step.
    pub total_variation: usize,
    /// Σ automated implementations per step.
    pub total_implementations: usize,
}

impl Variation {
    /// `None` when no automated implementation exists.
    pub fn heterogeneity_pct(&self) -> Option<f64> {
        if self.total_implementations == 0 {
            None
        } else {
            Some(self.total_variation as f64 / self.total_implementations as f64)
        }
    }
}

pub fn evaluate(entity: &ProcessEntity, ctx: &EvalContext<'_>) -> Evaluation {
    if ctx.tree.is_implementation_location(entity.location_id) {
        return Evaluation::Declined("anchored to a concrete location");
    }

    let Some(location_ids) = entity.selected_location_ids() else {
        return Evaluation::Declined("no implementation locations");
    };

    let implementations: Vec<&ProcessEntity> = ctx
        .collections
        .steps
        .iter()
        .filter(|s| {
            s.business_process_id == entity.business_process_id
                && location_ids.contains(&s.location_id)
        })
        .collect();

    if implementations.is_empty() {
        return Evaluation::Declined("no step implementations");
    }

    let Some(heterogeneity_pct) = measure_variation(&implementations).heterogeneity_pct() else {
        return Evaluation::Declined("every implementation is manual");
    };

    let band = PctBand::classify(heterogeneity_pct);
    let (entity_name, entity_name_plural) = ctx.entity_names(entity.entity_type);

    let item = SummaryItem::new(
        DimensionId::Homogeneity,
        (1.0 - heterogeneity_pct).max(0.0),
        band.descending_key(),
        description_key("heterogeneity", band.suffix()),
    )
    .with_param("heterogeneityPct", round_pct(heterogeneity_pct))
    .with_param("entityName", entity_name)
    .with_param("entityNamePlural", entity_name_plural);

    Evaluation::Produced(item)
}

/// Count application variation per step template, automated steps only.
pub fn measure_variation(implementations: &[&ProcessEntity]) -> Variation {
    let mut step_ids = Vec::new();
    for s in implementations {
        if !step_ids.contains(&s.business_step_id) {
            step_ids.push(s.business_step_id);
        }
    }

    step_ids
        .into_iter()
        .fold(Variation::default(), |mut acc, step_id| {
            let automated: Vec<&&ProcessEntity> = implementations
                .iter()
                .filter(|s| s.business_step_id == step_id && !s.is_manual_step)
                .collect();

            let applications: BTreeSet<Option<u64>> =
                automated.iter().map(|s| s.application_source_id).collect();

            acc.total_variation += applications.len().saturating_sub(1);
            acc.total_implementations += automated.len();
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::Collections;
    use super::*;
    use crate::locations::LocationTree;
    use crate::models::ScoreKey;
    use crate::text::MessageCatalog;

    fn run(entity: &ProcessEntity, steps: &[ProcessEntity]) -> Evaluation {
        let locations = world();
        let tree = LocationTree::build(&locations);
        let catalog = MessageCatalog::default();
        let ctx = EvalContext {
            tree: &tree,
            collections: Collections {
                processes: &[],
                steps,
                groups: &[],
            },
            resolver: &catalog,
        };
        evaluate(entity, &ctx)
    }

    fn app_step(step_id: u64, location_id: u64, app: u64) -> ProcessEntity {
        let mut s = step(1, step_id, location_id);
        s.application_source_id = Some(app);
        s
    }

    fn bp_at_world() -> ProcessEntity {
        let mut p = process(1, "/a/", 1);
        p.map_locations = impl_locations(&[10, 11, 12, 13], true);
        p
    }

    #[test]
    fn test_single_application_per_step_is_fully_homogeneous() {
        let steps = vec![
            app_step(1, 10, 100),
            app_step(1, 11, 100),
            app_step(2, 10, 200),
            app_step(2, 12, 200),
        ];

        let item = run(&bp_at_world(), &steps).into_item().unwrap();
        assert_eq!(item.score, 1.0);
        assert_eq!(item.score_key, ScoreKey::VeryHigh);
        assert_eq!(item.description_key, "business_process_summary__heterogeneity_0");
        assert_eq!(item.description_params["heterogeneityPct"], 0.0);
    }

    #[test]
    fn test_variation_lowers_score() {
        // Step 1: 2 apps over 2 impls, step 2: 1 app over 2 impls → 1/4.
        let steps = vec![
            app_step(1, 10, 100),
            app_step(1, 11, 101),
            app_step(2, 10, 200),
            app_step(2, 12, 200),
        ];

        let item = run(&bp_at_world(), &steps).into_item().unwrap();
        assert_eq!(item.score, 0.75);
        assert_eq!(item.score_key, ScoreKey::High);
        assert_eq!(item.description_key, "business_process_summary__heterogeneity_gt_15");
        assert_eq!(item.description_params["heterogeneityPct"], 25.0);
    }

    #[test]
    fn test_manual_steps_are_ignored() {
        let mut manual = app_step(1, 11, 999);
        manual.is_manual_step = true;
        let steps = vec![app_step(1, 10, 100), manual];

        let item = run(&bp_at_world(), &steps).into_item().unwrap();
        assert_eq!(item.score, 1.0);
    }

    #[test]
    fn test_only_selected_locations_count() {
        let mut p = bp_at_world();
        p.map_locations = impl_locations(&[10], true);
        if let Some(locs) = p.map_locations.as_mut() {
            locs.extend(impl_locations(&[11], false).unwrap_or_default());
        }

        let steps = vec![app_step(1, 10, 100), app_step(1, 11, 101)];
        let item = run(&p, &steps).into_item().unwrap();
        assert_eq!(item.score, 1.0);
    }

    #[test]
    fn test_all_manual_declines() {
        let mut manual = app_step(1, 10, 100);
        manual.is_manual_step = true;
        let eval = run(&bp_at_world(), &[manual]);
        assert_eq!(eval, Evaluation::Declined("every implementation is manual"));
    }

    #[test]
    fn test_concrete_location_declines() {
        let mut p = bp_at_world();
        p.location_id = 10;
        let eval = run(&p, &[app_step(1, 10, 100)]);
        assert!(eval.is_attempted());
        assert!(eval.item().is_none());
    }

    #[test]
    fn test_missing_location_list_declines() {
        let mut p = bp_at_world();
        p.map_locations = None;
        let eval = run(&p, &[app_step(1, 10, 100)]);
        assert_eq!(eval, Evaluation::Declined("no implementation locations"));
    }

    #[test]
    fn test_measure_variation() {
        let steps = vec![app_step(1, 10, 100), app_step(1, 11, 101)];
        let variation = measure_variation(&steps.iter().collect::<Vec<_>>());
        assert_eq!(
            variation,
            Variation {
                total_variation: 1,
                total_implementations: 2
            }
        );
        assert_eq!(variation.heterogeneity_pct(), Some(0.5));
    }
}
