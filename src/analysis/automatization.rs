//! Automatization: share of an entity's step implementations that are
//! not manual.

use super::bands::{description_key, PctBand};
use super::{EvalContext, Evaluation};
use crate::models::{round_pct, DimensionId, EntityType, ProcessEntity, SummaryItem};

pub fn evaluate(entity: &ProcessEntity, ctx: &EvalContext<'_>) -> Evaluation {
    let Some(location_ids) = entity.selected_location_ids() else {
        return Evaluation::Declined("no implementation locations");
    };

    let implementations = qualifying_steps(entity, ctx, &location_ids);
    if implementations.is_empty() {
        return Evaluation::Declined("no step implementations");
    }

    let automated = implementations.iter().filter(|s| !s.is_manual_step).count();
    let automatization_pct = automated as f64 / implementations.len() as f64;
    let band = PctBand::classify(automatization_pct);
    let (entity_name, entity_name_plural) = ctx.entity_names(entity.entity_type);

    let item = SummaryItem::new(
        DimensionId::Automatization,
        automatization_pct,
        band.ascending_key(),
        description_key("automatization", band.suffix()),
    )
    .with_param("automatizationPct", round_pct(automatization_pct))
    .with_param("entityName", entity_name)
    .with_param("entityNamePlural", entity_name_plural);

    Evaluation::Produced(item)
}

/// Step implementations at `location_ids` that belong to `entity`.
///
/// A group only qualifies steps of its own process id, and only when that
/// id is among the processes sharing the group's class prefix.
fn qualifying_steps<'a>(
    entity: &ProcessEntity,
    ctx: &EvalContext<'a>,
    location_ids: &[u64],
) -> Vec<&'a ProcessEntity> {
    let at_location = |s: &&ProcessEntity| location_ids.contains(&s.location_id);
    let steps = ctx.collections.steps.iter();

    match entity.entity_type {
        EntityType::Group => {
            let group_process_ids: Vec<Option<u64>> = ctx
                .collections
                .processes
                .iter()
                .filter(|p| {
                    p.business_process_class
                        .starts_with(&entity.business_process_class)
                })
                .map(|p| p.business_process_id)
                .collect();

            steps
                .filter(at_location)
                .filter(|s| {
                    group_process_ids.contains(&s.business_process_id)
                        && s.business_process_id == entity.business_process_id
                })
                .collect()
        }
        EntityType::Process => steps
            .filter(at_location)
            .filter(|s| s.business_process_id == entity.business_process_id)
            .collect(),
        EntityType::Step => steps
            .filter(at_location)
            .filter(|s| s.business_step_id == entity.business_step_id)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::Collections;
    use super::*;
    use crate::locations::LocationTree;
    use crate::models::ScoreKey;
    use crate::text::MessageCatalog;

    fn run(entity: &ProcessEntity, processes: &[ProcessEntity], steps: &[ProcessEntity]) -> Evaluation {
        let locations = world();
        let tree = LocationTree::build(&locations);
        let catalog = MessageCatalog::default();
        let ctx = EvalContext {
            tree: &tree,
            collections: Collections {
                processes,
                steps,
                groups: &[],
            },
            resolver: &catalog,
        };
        evaluate(entity, &ctx)
    }

    fn manual(mut s: ProcessEntity) -> ProcessEntity {
        s.is_manual_step = true;
        s
    }

    #[test]
    fn test_process_ratio() {
        let mut p = process(1, "/a/", 2);
        p.map_locations = impl_locations(&[10, 11], true);
        let steps = vec![
            step(1, 1, 10),
            step(1, 2, 10),
            manual(step(1, 3, 11)),
            step(1, 4, 11),
            step(2, 5, 10),
        ];

        let item = run(&p, &[], &steps).into_item().unwrap();
        assert_eq!(item.score, 0.75);
        assert_eq!(item.score_key, ScoreKey::High);
        assert_eq!(item.description_key, "business_process_summary__automatization_gt_60");
        assert_eq!(item.description_params["automatizationPct"], 75.0);
    }

    #[test]
    fn test_all_manual_is_very_low() {
        let mut p = process(1, "/a/", 2);
        p.map_locations = impl_locations(&[10], true);
        let steps = vec![manual(step(1, 1, 10)), manual(step(1, 2, 10))];

        let item = run(&p, &[], &steps).into_item().unwrap();
        assert_eq!(item.score, 0.0);
        assert_eq!(item.score_key, ScoreKey::VeryLow);
        assert_eq!(item.description_key, "business_process_summary__automatization_0");
    }

    #[test]
    fn test_fully_automated_is_very_high() {
        let mut p = process(1, "/a/", 2);
        p.map_locations = impl_locations(&[10], true);
        let item = run(&p, &[], &[step(1, 1, 10)]).into_item().unwrap();
        assert_eq!(item.score_key, ScoreKey::VeryHigh);
        assert_eq!(item.description_key, "business_process_summary__automatization_100");
    }

    #[test]
    fn test_step_matches_template_across_processes() {
        let mut s = step(1, 7, 2);
        s.map_locations = impl_locations(&[10, 11], true);
        let steps = vec![step(1, 7, 10), manual(step(3, 7, 11)), step(1, 8, 10)];

        let item = run(&s, &[], &steps).into_item().unwrap();
        assert_eq!(item.score, 0.5);
        assert_eq!(item.score_key, ScoreKey::Medium);
    }

    #[test]
    fn test_unselected_locations_are_ignored() {
        let mut p = process(1, "/a/", 2);
        p.map_locations = impl_locations(&[10], false);
        let eval = run(&p, &[], &[step(1, 1, 10)]);
        assert_eq!(eval, Evaluation::Declined("no step implementations"));
    }

    #[test]
    fn test_missing_location_list_declines() {
        let p = process(1, "/a/", 2);
        let eval = run(&p, &[], &[step(1, 1, 10)]);
        assert_eq!(eval, Evaluation::Declined("no implementation locations"));
    }

    #[test]
    fn test_group_only_matches_its_own_process_id() {
        let mut g = group("/sales/", 1);
        g.business_process_id = Some(1);
        g.map_locations = impl_locations(&[10, 11], true);

        let processes = vec![process(1, "/sales/emea/", 1), process(2, "/sales/amer/", 1)];
        let steps = vec![step(1, 1, 10), manual(step(2, 2, 11))];

        let item = run(&g, &processes, &steps).into_item().unwrap();
        assert_eq!(item.score, 1.0);
    }

    #[test]
    fn test_group_without_matching_process_id_declines() {
        let mut g = group("/sales/", 1);
        g.map_locations = impl_locations(&[10, 11], true);

        let processes = vec![process(1, "/sales/emea/", 1)];
        let steps = vec![step(1, 1, 10)];

        let eval = run(&g, &processes, &steps);
        assert_eq!(eval, Evaluation::Declined("no step implementations"));
    }
}
