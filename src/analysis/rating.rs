//! Code quality and security: user-weighted averages of the technology
//! and security ratings of classified step implementations.

use super::bands::{description_key, RatingBand};
use super::{step_matches_entity, EvalContext, Evaluation};
use crate::models::{round_pct, DimensionId, ProcessEntity, SummaryItem};

/// Which rating of a step is averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingKind {
    Technology,
    Security,
}

impl RatingKind {
    /// The step's rating; unrated steps count as 0.
    pub fn of(&self, step: &ProcessEntity) -> f64 {
        match self {
            RatingKind::Technology => step.technology_rate,
            RatingKind::Security => step.security_rate,
        }
        .unwrap_or(0.0)
    }

    fn dimension(&self) -> DimensionId {
        match self {
            RatingKind::Technology => DimensionId::CodeQuality,
            RatingKind::Security => DimensionId::Security,
        }
    }

    fn family(&self) -> &'static str {
        match self {
            RatingKind::Technology => "codequality",
            RatingKind::Security => "security",
        }
    }
}

/// User-weighted rating with the best and worst rated implementations.
#[derive(Debug, Clone, Copy)]
pub struct WeightedRating<'a> {
    pub avg_rating: f64,
    pub best: &'a ProcessEntity,
    pub worst: &'a ProcessEntity,
}

/// Weighted average over `steps`. `None` when there are no steps or no
/// users to weight by. Ties keep the earliest step.
pub fn weighted_rating<'a>(steps: &[&'a ProcessEntity], kind: RatingKind) -> Option<WeightedRating<'a>> {
    let (&first, rest) = steps.split_first()?;

    let mut weighted = 0.0;
    let mut total_users = 0.0;
    let mut best = first;
    let mut worst = first;

    for &step in steps {
        let rate = kind.of(step);
        let users = f64::from(step.number_of_users);
        weighted += users * rate;
        total_users += users;
    }
    for &step in rest {
        if kind.of(step) > kind.of(best) {
            best = step;
        }
        if kind.of(step) < kind.of(worst) {
            worst = step;
        }
    }

    if total_users == 0.0 {
        return None;
    }

    Some(WeightedRating {
        avg_rating: weighted / total_users,
        best,
        worst,
    })
}

/// Code quality over the entity's selected implementation locations.
///
/// Not counted as attempted when the entity has implementations but the
/// whole step collection is manual or unclassified: no enrichment could
/// ever produce an item then.
pub fn evaluate_code_quality(entity: &ProcessEntity, ctx: &EvalContext<'_>) -> Evaluation {
    let steps = ctx.collections.steps;
    let location_ids = entity.selected_location_ids().unwrap_or_default();

    let implementations: Vec<&ProcessEntity> = steps
        .iter()
        .filter(|s| step_matches_entity(entity, s) && location_ids.contains(&s.location_id))
        .collect();

    if !implementations.is_empty()
        && (steps.iter().all(|s| s.is_manual_step)
            || steps.iter().all(|s| s.functional_area_id.is_none()))
    {
        return Evaluation::Uncounted;
    }

    let classified: Vec<&ProcessEntity> = implementations
        .into_iter()
        .filter(|s| s.functional_area_id.is_some())
        .collect();

    build_item(entity, ctx, &classified, RatingKind::Technology)
}

/// Security over every implementation location of the entity.
pub fn evaluate_security(entity: &ProcessEntity, ctx: &EvalContext<'_>) -> Evaluation {
    let steps = ctx.collections.steps;
    if steps.is_empty() {
        return Evaluation::Declined("no steps");
    }
    let Some(location_ids) = entity.implementation_location_ids() else {
        return Evaluation::Declined("no implementation locations");
    };

    let classified: Vec<&ProcessEntity> = steps
        .iter()
        .filter(|s| {
            step_matches_entity(entity, s)
                && location_ids.contains(&s.location_id)
                && s.functional_area_id.is_some()
        })
        .collect();

    build_item(entity, ctx, &classified, RatingKind::Security)
}

fn build_item(
    entity: &ProcessEntity,
    ctx: &EvalContext<'_>,
    classified: &[&ProcessEntity],
    kind: RatingKind,
) -> Evaluation {
    if classified.is_empty() {
        return Evaluation::Declined("no classified implementations");
    }
    let Some(rating) = weighted_rating(classified, kind) else {
        return Evaluation::Declined("no users to weight by");
    };

    let band = RatingBand::classify(rating.avg_rating);
    let (entity_name, entity_name_plural) = ctx.entity_names(entity.entity_type);

    let item = SummaryItem::new(
        kind.dimension(),
        rating.avg_rating.clamp(0.0, 1.0),
        band.score_key(),
        description_key(kind.family(), band.suffix()),
    )
    .with_param("entityName", entity_name)
    .with_param("entityNamePlural", entity_name_plural)
    .with_param("avgRating", round_pct(rating.avg_rating))
    .with_param("bestSoftwareName", rating.best.application_name.clone())
    .with_param("bestRating", round_pct(kind.of(rating.best)))
    .with_param("worstSoftwareName", rating.worst.application_name.clone())
    .with_param("worstRating", round_pct(kind.of(rating.worst)));

    Evaluation::Produced(item)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::Collections;
    use super::*;
    use crate::locations::LocationTree;
    use crate::models::ScoreKey;
    use crate::text::MessageCatalog;

    fn run<F>(evaluator: F, entity: &ProcessEntity, steps: &[ProcessEntity]) -> Evaluation
    where
        F: Fn(&ProcessEntity, &EvalContext<'_>) -> Evaluation,
    {
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
        evaluator(entity, &ctx)
    }

    fn bp(selected: bool) -> ProcessEntity {
        let mut p = process(1, "/a/", 2);
        p.map_locations = impl_locations(&[10, 11], selected);
        p
    }

    #[test]
    fn test_code_quality_weighted_average() {
        let steps = vec![
            rated_step(1, 1, 10, 10, 0.9, "Ledger"),
            rated_step(1, 2, 11, 10, 0.3, "Spreadsheet"),
        ];

        let item = run(evaluate_code_quality, &bp(true), &steps).into_item().unwrap();
        assert!((item.score - 0.6).abs() < 1e-9);
        assert_eq!(item.id, DimensionId::CodeQuality);
        assert_eq!(item.score_key, ScoreKey::High);
        assert_eq!(item.description_key, "business_process_summary__codequality_gt_58");
        assert_eq!(item.title_key, "business_process_summary__codequality_title");
        assert_eq!(item.description_params["avgRating"], 60.0);
        assert_eq!(item.description_params["bestSoftwareName"], "Ledger");
        assert_eq!(item.description_params["bestRating"], 90.0);
        assert_eq!(item.description_params["worstSoftwareName"], "Spreadsheet");
        assert_eq!(item.description_params["worstRating"], 30.0);
    }

    #[test]
    fn test_users_weight_the_average() {
        let steps = vec![
            rated_step(1, 1, 10, 30, 1.0, "A"),
            rated_step(1, 2, 11, 10, 0.2, "B"),
        ];
        let item = run(evaluate_security, &bp(false), &steps).into_item().unwrap();
        assert!((item.score - 0.8).abs() < 1e-9);
        assert_eq!(item.score_key, ScoreKey::High);
        assert_eq!(item.description_key, "business_process_summary__security_gt_75");
    }

    #[test]
    fn test_code_quality_uses_selected_locations_only() {
        let steps = vec![rated_step(1, 1, 10, 10, 0.9, "Ledger")];
        let eval = run(evaluate_code_quality, &bp(false), &steps);
        assert_eq!(eval, Evaluation::Declined("no classified implementations"));
    }

    #[test]
    fn test_security_uses_every_implementation_location() {
        let steps = vec![rated_step(1, 1, 10, 10, 0.9, "Ledger")];
        let item = run(evaluate_security, &bp(false), &steps).into_item().unwrap();
        assert_eq!(item.score_key, ScoreKey::VeryHigh);
    }

    #[test]
    fn test_code_quality_uncounted_when_every_step_is_manual() {
        let mut s = rated_step(1, 1, 10, 10, 0.9, "Ledger");
        s.is_manual_step = true;
        let eval = run(evaluate_code_quality, &bp(true), &[s]);
        assert_eq!(eval, Evaluation::Uncounted);
        assert!(!eval.is_attempted());
    }

    #[test]
    fn test_code_quality_uncounted_when_nothing_is_classified() {
        let mut s = rated_step(1, 1, 10, 10, 0.9, "Ledger");
        s.functional_area_id = None;
        let eval = run(evaluate_code_quality, &bp(true), &[s]);
        assert_eq!(eval, Evaluation::Uncounted);
    }

    #[test]
    fn test_code_quality_counted_without_implementations() {
        let mut s = rated_step(9, 1, 10, 10, 0.9, "Ledger");
        s.is_manual_step = true;
        let eval = run(evaluate_code_quality, &bp(true), &[s]);
        assert!(eval.is_attempted());
        assert!(eval.item().is_none());
    }

    #[test]
    fn test_unclassified_implementations_are_skipped() {
        let mut unclassified = rated_step(1, 2, 11, 100, 0.0, "Legacy");
        unclassified.functional_area_id = None;
        let steps = vec![rated_step(1, 1, 10, 10, 0.5, "Ledger"), unclassified];

        let item = run(evaluate_security, &bp(true), &steps).into_item().unwrap();
        assert_eq!(item.score, 0.5);
        assert_eq!(item.score_key, ScoreKey::Medium);
    }

    #[test]
    fn test_security_declines_without_steps_or_locations() {
        assert_eq!(
            run(evaluate_security, &bp(true), &[]),
            Evaluation::Declined("no steps")
        );

        let mut p = bp(true);
        p.map_locations = None;
        let steps = vec![rated_step(1, 1, 10, 10, 0.9, "Ledger")];
        assert_eq!(
            run(evaluate_security, &p, &steps),
            Evaluation::Declined("no implementation locations")
        );
    }

    #[test]
    fn test_zero_users_declines() {
        let steps = vec![rated_step(1, 1, 10, 0, 0.9, "Ledger")];
        let eval = run(evaluate_security, &bp(true), &steps);
        assert_eq!(eval, Evaluation::Declined("no users to weight by"));
    }

    #[test]
    fn test_group_matches_exact_class() {
        let mut g = group("/sales/", 1);
        g.map_locations = impl_locations(&[10, 11], true);

        let mut same = rated_step(1, 1, 10, 10, 0.2, "A");
        same.business_process_class = "/sales/".to_string();
        let mut nested = rated_step(2, 2, 11, 10, 1.0, "B");
        nested.business_process_class = "/sales/emea/".to_string();

        let item = run(evaluate_security, &g, &[same, nested]).into_item().unwrap();
        assert_eq!(item.score, 0.2);
        assert_eq!(item.score_key, ScoreKey::Low);
    }

    #[test]
    fn test_extremes_keep_first_on_ties() {
        let a = rated_step(1, 1, 10, 1, 0.5, "First");
        let b = rated_step(1, 2, 10, 1, 0.5, "Second");
        let c = rated_step(1, 3, 10, 1, 0.1, "Low");
        let steps = [&a, &b, &c];

        let rating = weighted_rating(&steps, RatingKind::Technology).unwrap();
        assert_eq!(rating.best.application_name.as_deref(), Some("First"));
        assert_eq!(rating.worst.application_name.as_deref(), Some("Low"));
    }

    #[test]
    fn test_unrated_steps_count_as_zero() {
        let mut unrated = rated_step(1, 1, 10, 10, 0.0, "Unrated");
        unrated.security_rate = None;
        let rated = rated_step(1, 2, 10, 10, 0.8, "Rated");
        let steps = [&unrated, &rated];

        let rating = weighted_rating(&steps, RatingKind::Security).unwrap();
        assert!((rating.avg_rating - 0.4).abs() < 1e-9);
        assert_eq!(rating.worst.application_name.as_deref(), Some("Unrated"));
    }
}
