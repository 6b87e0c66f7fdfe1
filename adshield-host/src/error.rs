//! Error types for host operations

use thiserror::Error;

/// Main error type for host wiring
#[derive(Debug, Error)]
pub enum HostError {
    /// Configuration file or override could not be used
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Logging could not be initialized
    #[error("Logging error: {0}")]
    Logging(String),
}

impl From<toml::de::Error> for HostError {
    fn from(err: toml::de::Error) -> Self {
        HostError::Configuration(format!("Invalid config file: {}", err))
    }
}
