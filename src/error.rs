//! Error types.

use crate::models::{EntityKey, EntityType};
use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading an input dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse dataset {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{field} of {key} is {value}, expected a rating between 0 and 1")]
    RateOutOfRange {
        key: EntityKey,
        field: &'static str,
        value: f64,
    },
}

/// Caller precondition violations detected by the engine.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("Entity {key} of type {actual} was passed in the {expected} collection")]
    MisplacedEntity {
        key: EntityKey,
        expected: EntityType,
        actual: EntityType,
    },
}
