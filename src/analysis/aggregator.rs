//! Summary aggregation and statistics.
//!
//! This module provides utilities for aggregating summary items across
//! entities for the report and the CLI overview.

use super::engine::SummaryResults;
use crate::models::{DimensionId, EntityKey, ScoreKey, SummaryItem};
use std::collections::BTreeMap;

/// Total items produced and dimensions attempted.
pub fn totals(results: &SummaryResults) -> (usize, usize) {
    results.values().fold((0, 0), |(produced, attempted), r| {
        (produced + r.summary.len(), attempted + r.max_summary_items)
    })
}

/// Share of attempted dimensions that produced an item.
pub fn coverage(results: &SummaryResults) -> Option<f64> {
    let (produced, attempted) = totals(results);
    if attempted == 0 {
        None
    } else {
        Some(produced as f64 / attempted as f64)
    }
}

/// Iterate every produced item with its entity.
pub fn all_items(results: &SummaryResults) -> impl Iterator<Item = (&EntityKey, &SummaryItem)> {
    results
        .iter()
        .flat_map(|(key, r)| r.summary.iter().map(move |item| (key, item)))
}

/// Count produced items by dimension.
pub fn count_by_dimension(results: &SummaryResults) -> BTreeMap<DimensionId, usize> {
    let mut counts = BTreeMap::new();

    for (_, item) in all_items(results) {
        *counts.entry(item.id).or_default() += 1;
    }

    counts
}

/// Count produced items by score key.
pub fn count_by_score_key(results: &SummaryResults) -> BTreeMap<ScoreKey, usize> {
    let mut counts = BTreeMap::new();

    for (_, item) in all_items(results) {
        *counts.entry(item.score_key).or_default() += 1;
    }

    counts
}

/// Dimension × score key counts.
pub fn dimension_matrix(results: &SummaryResults) -> BTreeMap<DimensionId, BTreeMap<ScoreKey, usize>> {
    let mut matrix: BTreeMap<DimensionId, BTreeMap<ScoreKey, usize>> = BTreeMap::new();

    for (_, item) in all_items(results) {
        *matrix
            .entry(item.id)
            .or_default()
            .entry(item.score_key)
            .or_default() += 1;
    }

    matrix
}

/// Mean score per dimension.
pub fn average_score_by_dimension(results: &SummaryResults) -> BTreeMap<DimensionId, f64> {
    let mut sums: BTreeMap<DimensionId, (f64, usize)> = BTreeMap::new();

    for (_, item) in all_items(results) {
        let entry = sums.entry(item.id).or_default();
        entry.0 += item.score;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(id, (sum, count))| (id, sum / count as f64))
        .collect()
}

/// The `n` lowest-scoring items, lowest first.
pub fn lowest_items(results: &SummaryResults, n: usize) -> Vec<(&EntityKey, &SummaryItem)> {
    let mut items: Vec<_> = all_items(results).collect();
    items.sort_by(|a, b| a.1.score.total_cmp(&b.1.score));
    items.truncate(n);
    items
}

/// Items whose score key is at or below `threshold`.
pub fn items_at_or_below(results: &SummaryResults, threshold: ScoreKey) -> usize {
    all_items(results)
        .filter(|(_, item)| item.score_key <= threshold)
        .count()
}

/// Generate a text overview of score-key counts.
pub fn generate_overview_text(results: &SummaryResults) -> String {
    let mut lines = Vec::new();
    let (produced, attempted) = totals(results);

    lines.push(format!("Entities: {}", results.len()));
    lines.push(format!("Items: {} of {} attempted", produced, attempted));

    let counts = count_by_score_key(results);
    for key in ScoreKey::ALL.iter().rev() {
        lines.push(format!(
            "- {} {}: {}",
            key.emoji(),
            key,
            counts.get(key).copied().unwrap_or(0)
        ));
    }

    let by_dimension = count_by_dimension(results);
    let dimensions: Vec<String> = DimensionId::ALL
        .iter()
        .map(|id| format!("{} {}", id, by_dimension.get(id).copied().unwrap_or(0)))
        .collect();
    lines.push(format!("By dimension: {}", dimensions.join(", ")));

    lines.join("\n")
}
