//! Unified error hierarchy for LiftRS
//!
//! The computation components are total and never fail. Errors only arise at
//! the library boundary: decoding profiles, loading configuration and
//! initializing logging.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all fallible LiftRS operations
#[derive(Debug, Error)]
pub enum LiftRsError {
    /// Profile JSON could not be decoded
    #[error("Profile decode error: {0}")]
    ProfileDecode(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the engine schema
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be serialized
    #[error("Failed to serialize configuration to TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Config file could not be written
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configured value is outside its allowed range
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Result type alias for LiftRS operations
pub type Result<T> = std::result::Result<T, LiftRsError>;

impl LiftRsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LiftRsError::ProfileDecode(_) => ErrorSeverity::Warning,
            LiftRsError::Config(ConfigError::Read { .. }) => ErrorSeverity::Warning,
            LiftRsError::Config(_) => ErrorSeverity::Error,
            LiftRsError::Io(_) => ErrorSeverity::Error,
            LiftRsError::Internal(_) => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            LiftRsError::ProfileDecode(e) => {
                format!("The submitted profile could not be read: {}", e)
            }
            LiftRsError::Config(ConfigError::Read { path, .. }) => {
                format!("Could not read engine configuration: {}", path.display())
            }
            LiftRsError::Config(ConfigError::Invalid { field, reason }) => {
                format!("Engine configuration value '{}' is invalid: {}", field, reason)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical error requiring immediate attention
    Critical,
    /// Error that prevents the operation
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = LiftRsError::Config(ConfigError::Read {
            path: PathBuf::from("/missing/liftrs.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        });
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::WARN);

        let err = LiftRsError::Internal("test".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_user_messages() {
        let err = LiftRsError::Config(ConfigError::Invalid {
            field: "recovery.fatigue_threshold".to_string(),
            reason: "must be positive".to_string(),
        });
        assert!(err.user_message().contains("recovery.fatigue_threshold"));

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = LiftRsError::from(decode);
        assert!(err.user_message().starts_with("The submitted profile"));
    }
}
