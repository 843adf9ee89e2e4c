//! Error types for queuelab.
//!
//! Every fallible operation returns `Result<T, QueueError>` instead of
//! panicking. The only domain failure is [`QueueError::Unstable`]; the other
//! variants belong to configuration loading, I/O and export.

use thiserror::Error;

/// Result type alias for queuelab operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Unified error type for all queuelab operations.
#[derive(Debug, Error)]
pub enum QueueError {
    // ===== Domain =====
    /// No steady state exists: service rate does not exceed arrival rate
    /// (equivalently, utilization is at or above 1).
    #[error("unstable queue: utilization {utilization:.4} must be below 1 (service rate must exceed arrival rate)")]
    Unstable {
        /// The offending utilization ρ = λ/μ.
        utilization: f64,
    },

    /// A rate or utilization is non-positive, negative or non-finite.
    #[error("invalid parameter '{name}': {value} ({reason})")]
    InvalidParameter {
        /// Parameter name (e.g. `arrival_rate`).
        name: &'static str,
        /// Offending value.
        value: f64,
        /// What the parameter must satisfy.
        reason: &'static str,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File or terminal I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl QueueError {
    /// Create an unstable-queue error for the given utilization.
    #[must_use]
    pub const fn unstable(utilization: f64) -> Self {
        Self::Unstable { utilization }
    }

    /// Create an invalid-parameter error.
    #[must_use]
    pub const fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create an I/O error with a message (wraps in `std::io::Error`).
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(std::io::Error::other(message.into()))
    }

    /// Check if this error is the stability violation.
    ///
    /// Callers short-circuit on this: there is nothing to retry and no
    /// dependent metric can be produced.
    #[must_use]
    pub const fn is_unstable(&self) -> bool {
        matches!(self, Self::Unstable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unstable_detection() {
        let err = QueueError::unstable(1.0);
        assert!(err.is_unstable());

        let invalid = QueueError::invalid("arrival_rate", -1.0, "must be positive");
        assert!(!invalid.is_unstable());

        let config = QueueError::config("bad");
        assert!(!config.is_unstable());
    }

    #[test]
    fn test_unstable_display() {
        let err = QueueError::unstable(1.25);
        let msg = err.to_string();
        assert!(msg.contains("unstable queue"));
        assert!(msg.contains("1.2500"));
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = QueueError::invalid("service_rate", 0.0, "must be positive");
        let msg = err.to_string();
        assert!(msg.contains("service_rate"));
        assert!(msg.contains("must be positive"));
    }

    #[test]
    fn test_error_config() {
        let err = QueueError::config("invalid parameter");
        let msg = err.to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("invalid parameter"));
    }

    #[test]
    fn test_error_serialization() {
        let err = QueueError::serialization("failed to serialize");
        let msg = err.to_string();
        assert!(msg.contains("Serialization error"));
        assert!(msg.contains("failed to serialize"));
    }

    #[test]
    fn test_error_io() {
        let err = QueueError::io("terminal gone");
        assert!(!err.is_unstable());
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("terminal gone"));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_err = serde_yaml::from_str::<u32>("not: [a number").err();
        assert!(yaml_err.is_some());
        if let Some(e) = yaml_err {
            let err: QueueError = e.into();
            assert!(err.to_string().contains("YAML parsing error"));
        }
    }

    #[test]
    fn test_error_debug() {
        let err = QueueError::unstable(1.0);
        let debug = format!("{err:?}");
        assert!(debug.contains("Unstable"));
    }
}
