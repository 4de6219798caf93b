//! Error types for the resources crate

use mana_core::ManaError;

/// Resource loading error types
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// File I/O error
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),

    /// Invalid map file format
    #[error("Invalid map format: {0}")]
    InvalidFormat(String),

    /// Ability definitions could not be parsed
    #[error("Ability definition error: {0}")]
    AbilityFormat(#[from] serde_json::Error),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl From<ResourceError> for ManaError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound(name) => ManaError::NotFound(name),
            other => ManaError::InvalidData(other.to_string()),
        }
    }
}

/// Result type for resource operations
pub type Result<T> = std::result::Result<T, ResourceError>;
