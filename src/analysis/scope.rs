//! Scope: how widely an entity is implemented across the locations of
//! its region.

use super::bands::{description_key, PctBand};
use super::peers::PeerInputs;
use super::{EvalContext, Evaluation};
use crate::models::{round_pct, DimensionId, EntityType, ProcessEntity, SummaryItem};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};

const LOCATIONS_TEXT_KEY: &str = "business_process_summary__scope_numberOfLocationsText";

pub fn evaluate(entity: &ProcessEntity, inputs: &PeerInputs, ctx: &EvalContext<'_>) -> Evaluation {
    if ctx.tree.is_implementation_location(entity.location_id) {
        return Evaluation::Declined("anchored to a concrete location");
    }

    let linked = inputs.locations_linked;
    let total = inputs.total_locations;
    if linked == 0 && total == 0 {
        return Evaluation::Declined("no linked or reachable locations");
    }
    if total == 0 {
        return Evaluation::Declined("no reachable locations");
    }

    let spread_pct = f64::from(linked) / total as f64;
    let band = PctBand::classify(spread_pct);

    let family = match entity.entity_type {
        EntityType::Group => "scope_group",
        EntityType::Process | EntityType::Step => "scope",
    };

    let text_params = BTreeMap::from([
        ("locationsLinked".to_string(), json!(linked)),
        ("totalLocations".to_string(), json!(total)),
    ]);
    let number_of_locations_text = ctx.resolver.resolve(LOCATIONS_TEXT_KEY, &text_params);

    let top_region_linked = ctx
        .tree
        .top_regions_for(entity.location_id)
        .iter()
        .map(|l| l.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut item = SummaryItem::new(
        DimensionId::Scope,
        spread_pct.min(1.0),
        band.ascending_key(),
        description_key(family, band.suffix()),
    )
    .with_param("topRegionLinked", top_region_linked)
    .with_param("numberOfLocationsText", number_of_locations_text);

    if entity.entity_type == EntityType::Group {
        let full = full_spread_pct(entity, ctx.collections.processes, total);
        item = item.with_param("fullSpreadPct", Value::from(round_pct(full)));
    }

    Evaluation::Produced(item)
}

/// Share of locations where every process of the group is implemented.
///
/// Group members are the processes at the group's location whose class
/// path starts with the group's class.
pub fn full_spread_pct(
    group: &ProcessEntity,
    processes: &[ProcessEntity],
    total_locations: usize,
) -> f64 {
    if total_locations == 0 {
        return 0.0;
    }

    let mut members = processes.iter().filter(|p| {
        p.location_id == group.location_id
            && p.business_process_class
                .starts_with(&group.business_process_class)
    });

    let Some(first) = members.next() else {
        return 0.0;
    };

    let mut common: BTreeSet<u64> = location_set(first);
    for member in members {
        let ids = location_set(member);
        common.retain(|id| ids.contains(id));
    }

    common.len() as f64 / total_locations as f64
}

fn location_set(entity: &ProcessEntity) -> BTreeSet<u64> {
    entity
        .implementation_location_ids()
        .unwrap_or_default()
        .into_iter()
        .collect()
}
