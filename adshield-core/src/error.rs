//! Error types for sanitizer and diagnostics operations

use thiserror::Error;

/// Main error type for the ad-shield core
#[derive(Debug, Error)]
pub enum AdShieldError {
    /// Response body is not valid JSON
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Sanitized value could not be written back to text
    #[error("Encode error: {0}")]
    Encode(String),

    /// Persistent key-value store read or write failed
    #[error("Store error for key '{key}': {reason}")]
    Store { key: String, reason: String },

    /// Invalid configuration provided
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AdShieldError {
    pub fn store(key: impl Into<String>, reason: impl ToString) -> Self {
        AdShieldError::Store {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_from_serde() {
        let err: AdShieldError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, AdShieldError::Decode(_)));
        assert!(err.to_string().starts_with("Decode error"));
    }

    #[test]
    fn test_store_error_display() {
        let err = AdShieldError::store("xianyu_capture_log", "disk full");
        assert_eq!(
            err.to_string(),
            "Store error for key 'xianyu_capture_log': disk full"
        );
        assert_eq!(
            AdShieldError::Config("max_logs must be at least 1".into()).to_string(),
            "Configuration error: max_logs must be at least 1"
        );
    }
}
