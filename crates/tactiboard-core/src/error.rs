//! Error types for contract violations.
//!
//! Interaction misses (placing outside the surface, releasing a stroke that is
//! too short, erasing empty space) are not errors and never reach this type.

use crate::model::{ElementId, PathId, PathType};
use thiserror::Error;

/// Errors raised when a caller bypasses the gesture state machine or asks for
/// something the engine does not know about.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    #[error("Unknown element: {0}")]
    UnknownElement(ElementId),
    #[error("Unknown path: {0}")]
    UnknownPath(PathId),
    #[error("Invalid geometry: {path_type:?} needs at least {required} points, got {points}")]
    InvalidGeometry {
        path_type: PathType,
        points: usize,
        required: usize,
    },
    #[error("No scene template for category '{category}' in mode '{mode}'")]
    UnknownTemplate { category: String, mode: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        BoardError::Serialization(err.to_string())
    }
}

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;
