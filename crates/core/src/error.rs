//! Core error types for the Mana client

#[derive(thiserror::Error, Debug)]
pub enum ManaError {
    #[error("Truncated message: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("Value {value} out of range for field {field}")]
    FieldOutOfRange { field: &'static str, value: i64 },

    #[error("Malformed message: {0}")]
    Malformed(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Interaction error: {0}")]
    Interaction(String),
}

impl ManaError {
    /// Whether this error means the inbound byte stream can no longer be trusted.
    ///
    /// Fatal errors terminate the session; everything else is reported and the
    /// client keeps running.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ManaError::Truncated { .. } | ManaError::Malformed(_) | ManaError::Protocol(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ManaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(ManaError::Truncated { needed: 2, remaining: 1 }.is_fatal());
        assert!(ManaError::Malformed("bad utf-8".into()).is_fatal());
        assert!(!ManaError::NotFound("ability 7".into()).is_fatal());
        assert!(!ManaError::FieldOutOfRange { field: "x", value: 70_000 }.is_fatal());
    }
}
