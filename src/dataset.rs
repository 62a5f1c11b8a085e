//! Input dataset loading.
//!
//! A dataset is one JSON document holding the flat location list and
//! the three entity collections. Loading checks that every rating lies
//! in [0, 1] so no out-of-range value can leak into a score.

use crate::analysis::Collections;
use crate::error::DatasetError;
use crate::models::{Location, ProcessEntity};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Locations plus the process, step and group collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub processes: Vec<ProcessEntity>,
    #[serde(default)]
    pub steps: Vec<ProcessEntity>,
    #[serde(default)]
    pub groups: Vec<ProcessEntity>,
}

impl Dataset {
    /// Load and validate a dataset file.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::from_json(&content, path)?;

        info!(
            "Loaded dataset {}: {} processes, {} steps, {} groups, {} locations",
            path.display(),
            dataset.processes.len(),
            dataset.steps.len(),
            dataset.groups.len(),
            dataset.locations.len()
        );

        Ok(dataset)
    }

    /// Parse a dataset from a JSON string.
    pub fn from_json(content: &str, origin: &Path) -> Result<Self, DatasetError> {
        let dataset: Dataset =
            serde_json::from_str(content).map_err(|source| DatasetError::Parse {
                path: origin.to_path_buf(),
                source,
            })?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Check that every rating is within [0, 1].
    pub fn validate(&self) -> Result<(), DatasetError> {
        for entity in self.entities() {
            check_rate(entity, "securityRate", entity.security_rate)?;
            check_rate(entity, "technologyRate", entity.technology_rate)?;
        }
        debug!("Dataset ratings validated");
        Ok(())
    }

    pub fn entities(&self) -> impl Iterator<Item = &ProcessEntity> {
        self.processes
            .iter()
            .chain(&self.steps)
            .chain(&self.groups)
    }

    pub fn entity_count(&self) -> usize {
        self.processes.len() + self.steps.len() + self.groups.len()
    }

    pub fn collections(&self) -> Collections<'_> {
        Collections {
            processes: &self.processes,
            steps: &self.steps,
            groups: &self.groups,
        }
    }
}

fn check_rate(
    entity: &ProcessEntity,
    field: &'static str,
    value: Option<f64>,
) -> Result<(), DatasetError> {
    match value {
        Some(v) if !(0.0..=1.0).contains(&v) => Err(DatasetError::RateOutOfRange {
            key: entity.key(),
            field,
            value: v,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "locations": [
            { "id": 1, "name": "World", "path": "", "isRegion": true },
            { "id": 10, "name": "Madrid", "path": "/", "isRegion": false }
        ],
        "processes": [
            {
                "entityType": "business_process",
                "businessProcessId": 5,
                "businessProcessClass": "/finance/",
                "locationId": 1,
                "numberOfLocations": 1,
                "numberOfUsers": 12,
                "mapLocations": [{ "id": 10, "isSelected": true }]
            }
        ],
        "steps": [
            {
                "entityType": "step",
                "businessProcessId": 5,
                "businessStepId": 50,
                "locationId": 10,
                "isManualStep": false,
                "functionalAreaId": 3,
                "securityRate": 0.75,
                "technologyRate": 0.5,
                "applicationSourceId": 900,
                "applicationName": "Ledger"
            }
        ]
    }"#;

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.locations.len(), 2);
        assert_eq!(dataset.processes[0].entity_type, EntityType::Process);
        assert_eq!(dataset.steps[0].application_name.as_deref(), Some("Ledger"));
        assert!(dataset.groups.is_empty());
        assert_eq!(dataset.entity_count(), 2);
        assert_eq!(
            dataset.processes[0].selected_location_ids(),
            Some(vec![10])
        );
    }

    #[test]
    fn test_missing_file() {
        let err = Dataset::load(Path::new("/nonexistent/dataset.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[test]
    fn test_unknown_entity_type_is_rejected() {
        let json = r#"{ "processes": [{ "entityType": "workflow", "locationId": 1 }] }"#;
        let err = Dataset::from_json(json, Path::new("inline.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }));
    }

    #[test]
    fn test_rate_out_of_range_is_rejected() {
        let json = r#"{ "steps": [{
            "entityType": "step", "businessProcessId": 1, "businessStepId": 2,
            "locationId": 1, "securityRate": 1.5
        }] }"#;
        let err = Dataset::from_json(json, Path::new("inline.json")).unwrap_err();
        match err {
            DatasetError::RateOutOfRange { field, value, .. } => {
                assert_eq!(field, "securityRate");
                assert_eq!(value, 1.5);
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
