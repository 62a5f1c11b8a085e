//! Data models for the summary engine.
//!
//! This module contains the core data structures shared by the engine,
//! the dataset loader and the report generator: locations, business
//! process entities, and the summary items produced for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Kind of business-process entity being summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityType {
    /// A complete business process.
    #[serde(rename = "business_process")]
    Process,
    /// A single step of a business process.
    #[serde(rename = "step")]
    Step,
    /// A group of business processes sharing a class path prefix.
    #[serde(rename = "group")]
    Group,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Process => write!(f, "Process"),
            EntityType::Step => write!(f, "Step"),
            EntityType::Group => write!(f, "Group"),
        }
    }
}

impl EntityType {
    /// Message keys for the singular and plural display name.
    pub fn name_keys(&self) -> (&'static str, &'static str) {
        match self {
            EntityType::Process => ("general__business_process", "general__business_processes"),
            EntityType::Group => (
                "general__business_process_group",
                "general__business_process_groups",
            ),
            EntityType::Step => (
                "general__business_process_step",
                "general__business_process_steps",
            ),
        }
    }
}

/// A node of the location hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: u64,
    pub name: String,
    /// Materialized ancestor path. Empty or absent for the global root.
    #[serde(default)]
    pub path: Option<String>,
    /// Aggregation node (true) or concrete implementation-capable location.
    #[serde(default)]
    pub is_region: bool,
}

impl Location {
    /// Whether this location is a root/global node.
    pub fn is_root(&self) -> bool {
        self.path.as_deref().map_or(true, str::is_empty)
    }
}

/// A location where an entity is implemented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationLocation {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub is_selected: bool,
}

/// One business-process entity anchored to a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessEntity {
    pub entity_type: EntityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub business_process_id: Option<u64>,
    #[serde(default)]
    pub business_step_id: Option<u64>,
    /// Hierarchical class path; groups match processes by prefix.
    #[serde(default)]
    pub business_process_class: String,
    pub location_id: u64,
    #[serde(default)]
    pub number_of_locations: u32,
    #[serde(default)]
    pub number_of_users: u32,
    /// Implementation locations. `None` means the entity has no list at all.
    #[serde(default)]
    pub map_locations: Option<Vec<ImplementationLocation>>,
    #[serde(default)]
    pub is_manual_step: bool,
    /// Present only once the step's software has been classified.
    #[serde(default)]
    pub functional_area_id: Option<u64>,
    #[serde(default)]
    pub security_rate: Option<f64>,
    #[serde(default)]
    pub technology_rate: Option<f64>,
    #[serde(default)]
    pub application_source_id: Option<u64>,
    #[serde(default)]
    pub application_name: Option<String>,
}

impl ProcessEntity {
    /// Creates an entity of the given type anchored to a location.
    pub fn new(entity_type: EntityType, location_id: u64) -> Self {
        Self {
            entity_type,
            name: None,
            business_process_id: None,
            business_step_id: None,
            business_process_class: String::new(),
            location_id,
            number_of_locations: 0,
            number_of_users: 0,
            map_locations: None,
            is_manual_step: false,
            functional_area_id: None,
            security_rate: None,
            technology_rate: None,
            application_source_id: None,
            application_name: None,
        }
    }

    /// Identity of this entity within one computation pass.
    pub fn key(&self) -> EntityKey {
        let key = match self.entity_type {
            EntityType::Process => format!(
                "process:{}@{}",
                opt_id(self.business_process_id),
                self.location_id
            ),
            EntityType::Step => format!(
                "step:{}/{}@{}",
                opt_id(self.business_process_id),
                opt_id(self.business_step_id),
                self.location_id
            ),
            EntityType::Group => {
                format!("group:{}@{}", self.business_process_class, self.location_id)
            }
        };
        EntityKey(key)
    }

    /// Human-readable label for reports.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.key().to_string(),
        }
    }

    /// Ids of every implementation location, selected or not.
    pub fn implementation_location_ids(&self) -> Option<Vec<u64>> {
        self.map_locations
            .as_ref()
            .map(|locs| locs.iter().map(|l| l.id).collect())
    }

    /// Ids of the implementation locations flagged as selected.
    pub fn selected_location_ids(&self) -> Option<Vec<u64>> {
        self.map_locations.as_ref().map(|locs| {
            locs.iter()
                .filter(|l| l.is_selected)
                .map(|l| l.id)
                .collect()
        })
    }
}

fn opt_id(id: Option<u64>) -> String {
    id.map(|i| i.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Key identifying an entity in the result map.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(pub String);

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Analytic axis a summary item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionId {
    Scope,
    Relevance,
    Homogeneity,
    Automatization,
    CodeQuality,
    Security,
}

impl DimensionId {
    /// All dimensions in evaluation order.
    pub const ALL: [DimensionId; 6] = [
        DimensionId::Scope,
        DimensionId::Relevance,
        DimensionId::Homogeneity,
        DimensionId::Automatization,
        DimensionId::CodeQuality,
        DimensionId::Security,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionId::Scope => "scope",
            DimensionId::Relevance => "relevance",
            DimensionId::Homogeneity => "homogeneity",
            DimensionId::Automatization => "automatization",
            DimensionId::CodeQuality => "code_quality",
            DimensionId::Security => "security",
        }
    }

    /// Message key of the item title.
    pub fn title_key(&self) -> &'static str {
        match self {
            DimensionId::Scope => "business_process_summary__scope_title",
            DimensionId::Relevance => "business_process_summary__relevance_title",
            DimensionId::Homogeneity => "business_process_summary__homogeneity_title",
            DimensionId::Automatization => "business_process_summary__automatization_title",
            DimensionId::CodeQuality => "business_process_summary__codequality_title",
            DimensionId::Security => "business_process_summary__security_title",
        }
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative severity bucket of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScoreKey {
    #[serde(rename = "general__very-low")]
    VeryLow,
    #[serde(rename = "general__low")]
    Low,
    #[serde(rename = "general__medium")]
    Medium,
    #[serde(rename = "general__high")]
    High,
    #[serde(rename = "general__very-high")]
    VeryHigh,
}

impl ScoreKey {
    pub const ALL: [ScoreKey; 5] = [
        ScoreKey::VeryLow,
        ScoreKey::Low,
        ScoreKey::Medium,
        ScoreKey::High,
        ScoreKey::VeryHigh,
    ];

    /// Message key of the bucket label.
    pub fn as_key(&self) -> &'static str {
        match self {
            ScoreKey::VeryLow => "general__very-low",
            ScoreKey::Low => "general__low",
            ScoreKey::Medium => "general__medium",
            ScoreKey::High => "general__high",
            ScoreKey::VeryHigh => "general__very-high",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ScoreKey::VeryLow => "🔴",
            ScoreKey::Low => "🟠",
            ScoreKey::Medium => "🟡",
            ScoreKey::High => "🟢",
            ScoreKey::VeryHigh => "💚",
        }
    }
}

impl fmt::Display for ScoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreKey::VeryLow => write!(f, "Very low"),
            ScoreKey::Low => write!(f, "Low"),
            ScoreKey::Medium => write!(f, "Medium"),
            ScoreKey::High => write!(f, "High"),
            ScoreKey::VeryHigh => write!(f, "Very high"),
        }
    }
}

/// Named values substituted into a description template.
pub type DescriptionParams = BTreeMap<String, Value>;

/// One produced dimension result for an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryItem {
    pub id: DimensionId,
    /// Normalized score in [0, 1].
    pub score: f64,
    pub score_key: ScoreKey,
    pub title_key: String,
    pub description_key: String,
    pub description_params: DescriptionParams,
}

impl SummaryItem {
    /// Creates an item with the dimension's title key and no parameters.
    pub fn new(id: DimensionId, score: f64, score_key: ScoreKey, description_key: String) -> Self {
        Self {
            id,
            score,
            score_key,
            title_key: id.title_key().to_string(),
            description_key,
            description_params: DescriptionParams::new(),
        }
    }

    /// Adds a description parameter.
    pub fn with_param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.description_params.insert(name.to_string(), value.into());
        self
    }
}

/// Everything computed for one entity in a pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySummary {
    /// Produced items, in evaluation order.
    pub summary: Vec<SummaryItem>,
    /// Number of dimensions attempted for the entity.
    pub max_summary_items: usize,
}

impl EntitySummary {
    /// Appends an item if one was produced.
    pub fn push(&mut self, item: Option<SummaryItem>) {
        if let Some(item) = item {
            self.summary.push(item);
        }
    }

    pub fn item(&self, id: DimensionId) -> Option<&SummaryItem> {
        self.summary.iter().find(|i| i.id == id)
    }
}

/// Scales a ratio to a percentage rounded to two decimals.
pub fn round_pct(ratio: f64) -> f64 {
    (ratio * 100.0 * 100.0).round() / 100.0
}

/// Metadata about the summary report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the dataset that was summarized.
    pub input: String,
    /// Date and time of the computation.
    pub generated_at: DateTime<Utc>,
    pub processes: usize,
    pub steps: usize,
    pub groups: usize,
    pub locations: usize,
    /// Summary items produced across all entities.
    pub items_produced: usize,
    /// Dimensions attempted across all entities.
    pub items_attempted: usize,
    /// Duration of the computation in seconds.
    pub duration_seconds: f64,
}

/// Report section for one entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityReport {
    pub key: EntityKey,
    pub name: String,
    pub entity_type: EntityType,
    pub location_id: u64,
    #[serde(flatten)]
    pub result: EntitySummary,
}

/// The complete summary report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub entities: Vec<EntityReport>,
}
