//! Markdown report generation.
//!
//! This module generates Markdown and JSON summary reports from the
//! computed entity summaries.

use crate::analysis::{
    average_score_by_dimension, coverage, dimension_matrix, lowest_items, SummaryResults,
};
use crate::config::ReportConfig;
use crate::models::{
    DimensionId, EntityKey, EntityReport, EntitySummary, Report, ReportMetadata, ScoreKey,
    SummaryItem,
};
use crate::text::{MessageCatalog, TextResolver};
use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(
    report: &Report,
    catalog: &MessageCatalog,
    options: &ReportConfig,
) -> String {
    let mut output = String::new();
    let results = summary_results(&report.entities);

    // Title
    output.push_str("# Business Process Summary\n\n");

    // Metadata section
    output.push_str(&generate_metadata_section(&report.metadata));

    // Overview
    output.push_str(&generate_overview_section(&results, catalog));

    // Lowest scores
    output.push_str(&generate_lowest_section(
        report,
        &results,
        catalog,
        options.lowest_count,
    ));

    // Per-entity results
    output.push_str(&generate_entities_section(&report.entities, catalog, options));

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.input));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Entities:** {} processes, {} steps, {} groups\n",
        metadata.processes, metadata.steps, metadata.groups
    ));
    section.push_str(&format!("- **Locations:** {}\n", metadata.locations));
    section.push_str(&format!(
        "- **Summary Items:** {} of {} attempted\n",
        metadata.items_produced, metadata.items_attempted
    ));
    section.push_str(&format!(
        "- **Duration:** {:.3}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the dimension × score-key overview.
fn generate_overview_section(results: &SummaryResults, catalog: &MessageCatalog) -> String {
    let mut section = String::new();

    section.push_str("## Overview\n\n");

    if let Some(ratio) = coverage(results) {
        section.push_str(&format!(
            "*{:.1}% of attempted dimensions produced an item.*\n\n",
            ratio * 100.0
        ));
    }

    section.push_str("| Dimension |");
    for key in ScoreKey::ALL {
        section.push_str(&format!(" {} {} |", key.emoji(), key));
    }
    section.push_str(" Avg. score |\n");
    section.push_str("|:---|");
    for _ in ScoreKey::ALL {
        section.push_str(":---:|");
    }
    section.push_str(":---:|\n");

    let matrix = dimension_matrix(results);
    let averages = average_score_by_dimension(results);

    for id in DimensionId::ALL {
        section.push_str(&format!("| {} |", title_text(id, catalog)));
        for key in ScoreKey::ALL {
            let count = matrix
                .get(&id)
                .and_then(|row| row.get(&key))
                .copied()
                .unwrap_or(0);
            section.push_str(&format!(" {} |", count));
        }
        match averages.get(&id) {
            Some(avg) => section.push_str(&format!(" {:.2} |\n", avg)),
            None => section.push_str(" - |\n"),
        }
    }
    section.push('\n');

    section
}

/// Generate the lowest-scoring items section.
fn generate_lowest_section(
    report: &Report,
    results: &SummaryResults,
    catalog: &MessageCatalog,
    count: usize,
) -> String {
    let lowest = lowest_items(results, count);
    if lowest.is_empty() {
        return String::new();
    }

    let names: BTreeMap<&EntityKey, &str> = report
        .entities
        .iter()
        .map(|e| (&e.key, e.name.as_str()))
        .collect();

    let mut section = String::new();

    section.push_str("## Lowest Scores\n\n");
    section.push_str("| Entity | Dimension | Score | Level |\n");
    section.push_str("|:---|:---|:---:|:---|\n");

    for (key, item) in lowest {
        let name = names.get(key).copied().unwrap_or(key.0.as_str());
        section.push_str(&format!(
            "| {} | {} | {:.2} | {} {} |\n",
            name,
            title_text(item.id, catalog),
            item.score,
            item.score_key.emoji(),
            item.score_key
        ));
    }
    section.push('\n');

    section
}

/// Generate the per-entity section.
fn generate_entities_section(
    entities: &[EntityReport],
    catalog: &MessageCatalog,
    options: &ReportConfig,
) -> String {
    let mut section = String::new();

    section.push_str("## Entities\n\n");

    let shown: Vec<_> = entities
        .iter()
        .filter(|e| options.include_empty || !e.result.summary.is_empty())
        .collect();

    if shown.is_empty() {
        section.push_str("No entity produced a summary item.\n\n");
        return section;
    }

    for entity in shown {
        section.push_str(&generate_entity_block(entity, catalog, options));
    }

    section
}

/// Generate the block for a single entity.
fn generate_entity_block(
    entity: &EntityReport,
    catalog: &MessageCatalog,
    options: &ReportConfig,
) -> String {
    let mut block = String::new();

    block.push_str(&format!("### {}\n\n", entity.name));
    block.push_str(&format!(
        "*{} | Key: `{}` | Location: {} | Items: {}/{}*\n\n",
        entity.entity_type,
        entity.key,
        entity.location_id,
        entity.result.summary.len(),
        entity.result.max_summary_items
    ));

    if entity.result.summary.is_empty() {
        block.push_str("No summary items.\n\n");
        return block;
    }

    for item in &entity.result.summary {
        block.push_str(&generate_item_line(item, catalog, options.include_params));
    }
    block.push('\n');

    block
}

/// Generate one bullet for a summary item.
fn generate_item_line(item: &SummaryItem, catalog: &MessageCatalog, include_params: bool) -> String {
    let mut line = format!(
        "- {} **{}** ({:.2}, {}): {}\n",
        item.score_key.emoji(),
        title_text(item.id, catalog),
        item.score,
        item.score_key,
        description_text(item, catalog)
    );

    if include_params && !item.description_params.is_empty() {
        let params: Vec<String> = item
            .description_params
            .iter()
            .map(|(name, value)| format!("{}={}", name, param_text(value)))
            .collect();
        line.push_str(&format!("  - `{}`\n", params.join(", ")));
    }

    line
}

/// Resolved title, or the raw key when no template exists.
fn title_text(id: DimensionId, catalog: &MessageCatalog) -> String {
    catalog.resolve_plain(id.title_key())
}

/// Resolved description, or the raw key when no template exists.
fn description_text(item: &SummaryItem, catalog: &MessageCatalog) -> String {
    if catalog.contains(&item.description_key) {
        catalog.resolve(&item.description_key, &item.description_params)
    } else {
        format!("`{}`", item.description_key)
    }
}

fn param_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn summary_results(entities: &[EntityReport]) -> SummaryResults {
    entities
        .iter()
        .map(|e| (e.key.clone(), e.result.clone()))
        .collect::<BTreeMap<EntityKey, EntitySummary>>()
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by bpsummary v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
