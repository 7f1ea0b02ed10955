//! Configuration errors.

use thiserror::Error;

use super::category::ErrorCategory;

/// Errors raised while loading client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No completion endpoint was configured.
    #[error("Missing completion endpoint: set {var}")]
    MissingEndpoint { var: &'static str },

    /// A setting was present but could not be interpreted.
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}
