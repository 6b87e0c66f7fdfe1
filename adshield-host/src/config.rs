//! Host configuration loading
//!
//! Sources, lowest to highest precedence: built-in defaults, an optional TOML
//! file, then `ADSHIELD_*` environment variables. The merged result is
//! validated before use.

use crate::error::HostError;
use crate::logging::LoggingConfig;
use crate::scope::ScopeConfig;
use adshield_core::{CaptureConfig, KeywordSet, SanitizerConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_FILE: &str = "ADSHIELD_CONFIG";
pub const ENV_SANITIZE_ENABLED: &str = "ADSHIELD_SANITIZE_ENABLED";
pub const ENV_DISABLED_RULES: &str = "ADSHIELD_DISABLED_RULES";
pub const ENV_KEYWORDS: &str = "ADSHIELD_KEYWORDS";
pub const ENV_STORAGE_KEY: &str = "ADSHIELD_STORAGE_KEY";
pub const ENV_MAX_LOGS: &str = "ADSHIELD_MAX_LOGS";
pub const ENV_STORE_PATH: &str = "ADSHIELD_STORE_PATH";
pub const ENV_LOG_LEVEL: &str = "ADSHIELD_LOG_LEVEL";

/// Everything the host needs to build an interceptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub sanitizer: SanitizerConfig,
    pub capture: CaptureConfig,
    pub scope: ScopeConfig,
    pub logging: LoggingConfig,
    /// File backing the capture log store
    pub store_path: PathBuf,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            sanitizer: SanitizerConfig::default(),
            capture: CaptureConfig::default(),
            scope: ScopeConfig::default(),
            logging: LoggingConfig::default(),
            store_path: PathBuf::from("./adshield-store.json"),
        }
    }
}

impl HostConfig {
    /// Parse a TOML document; missing sections keep their defaults
    pub fn from_toml_str(raw: &str) -> Result<Self, HostError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, HostError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            HostError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Apply `ADSHIELD_*` overrides obtained through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), HostError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_SANITIZE_ENABLED) {
            self.sanitizer.enabled = parse_bool(ENV_SANITIZE_ENABLED, &value)?;
        }
        if let Some(value) = lookup(ENV_DISABLED_RULES) {
            self.sanitizer.disabled_rules = split_list(&value);
        }
        if let Some(value) = lookup(ENV_KEYWORDS) {
            self.capture.keywords = KeywordSet::new(split_list(&value));
        }
        if let Some(value) = lookup(ENV_STORAGE_KEY) {
            self.capture.storage_key = value;
        }
        if let Some(value) = lookup(ENV_MAX_LOGS) {
            self.capture.max_logs = value.trim().parse().map_err(|_| {
                HostError::Configuration(format!("Invalid {}: '{}'", ENV_MAX_LOGS, value))
            })?;
        }
        if let Some(value) = lookup(ENV_STORE_PATH) {
            self.store_path = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = value;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), HostError> {
        let invalid = |e: adshield_core::AdShieldError| {
            HostError::Configuration(format!("validation failed: {}", e))
        };
        self.sanitizer.validate().map_err(invalid)?;
        self.capture.validate().map_err(invalid)?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Load configuration from `path` (or `ADSHIELD_CONFIG`), apply environment
/// overrides and validate.
pub fn load_config(path: Option<&Path>) -> Result<HostConfig, HostError> {
    load_config_with(path, |name| std::env::var(name).ok())
}

/// [`load_config`] with an explicit variable lookup
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<HostConfig, HostError>
where
    F: Fn(&str) -> Option<String>,
{
    let file = path
        .map(Path::to_path_buf)
        .or_else(|| lookup(ENV_CONFIG_FILE).map(PathBuf::from));

    let mut config = match file {
        Some(file) => {
            tracing::info!("Loading configuration from {}", file.display());
            HostConfig::from_file(&file)?
        }
        None => HostConfig::default(),
    };

    config.apply_overrides(&lookup)?;
    config.validate()?;
    Ok(config)
}

fn parse_bool(name: &str, value: &str) -> Result<bool, HostError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(HostError::Configuration(format!(
            "Invalid {}: '{}' (expected true/false)",
            name, value
        ))),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
