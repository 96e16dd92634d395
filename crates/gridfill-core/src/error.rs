//! Error types for Gridfill core.

use thiserror::Error;

use gridfill_engine::EngineError;

/// Errors that can occur while loading or planning a template
#[derive(Error, Debug)]
pub enum GridfillError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Data error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Invalid {what}: {message}")]
    Parse { what: String, message: String },
}

impl From<gridfill_engine::OverlapError> for GridfillError {
    fn from(err: gridfill_engine::OverlapError) -> Self {
        GridfillError::Engine(err.into())
    }
}

impl From<gridfill_engine::FormulaExpansionError> for GridfillError {
    fn from(err: gridfill_engine::FormulaExpansionError) -> Self {
        GridfillError::Engine(err.into())
    }
}

pub type Result<T> = std::result::Result<T, GridfillError>;
