//! Error types for the digital twin

use crate::types::{ConfigError, ConfigValidationError};
use thiserror::Error;

/// Top-level error type for twin operations.
#[derive(Debug, Error)]
pub enum TwinError {
    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigValidationError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// ERP synchronization failed
    #[error("ERP synchronization failed: {0}")]
    Sync(String),

    /// JSON serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for twin results.
pub type TwinResult<T> = Result<T, TwinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TwinError::Sync("ERP unreachable".to_string());
        assert_eq!(err.to_string(), "ERP synchronization failed: ERP unreachable");
    }

    #[test]
    fn test_validation_error_converts() {
        let err: TwinError = ConfigValidationError::InvalidArrivalRate(-1.0).into();
        assert!(matches!(err, TwinError::Configuration(_)));
    }
}
