use thiserror::Error;
use wtkx_core::{PropertyError, ResourceError, SerializationError};

/// Everything the `wtkx` binary can fail with.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read document: {0}")]
    Serialization(#[from] SerializationError),

    #[error("Failed to load resources: {0}")]
    Resource(#[from] ResourceError),

    #[error("Invalid locale: {0}")]
    Locale(#[from] PropertyError),

    #[error("No object named '{0}' in the document")]
    UnknownId(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
