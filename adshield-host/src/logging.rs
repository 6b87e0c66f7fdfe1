use crate::error::HostError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Logging configuration for the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Whether to enable JSON formatted logs
    pub json_format: bool,

    /// Whether to include file and line number information
    pub include_file_info: bool,

    /// Whether to enable colored output (only for non-JSON format)
    pub enable_colors: bool,

    /// Log file path (optional, if None logs only to stdout)
    pub log_file: Option<String>,

    /// Module-specific log levels
    pub module_levels: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let mut module_levels = HashMap::new();
        module_levels.insert("adshield_core".to_string(), "info".to_string());
        module_levels.insert("adshield_host".to_string(), "info".to_string());

        Self {
            level: "info".to_string(),
            json_format: false,
            include_file_info: false,
            enable_colors: true,
            log_file: None,
            module_levels,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), HostError> {
        if !levels::is_valid_level(&self.level) {
            return Err(HostError::Configuration(format!(
                "Invalid log level '{}' (expected one of: {})",
                self.level,
                levels::valid_levels().join(", ")
            )));
        }
        for (module, level) in &self.module_levels {
            if !levels::is_valid_level(level) {
                return Err(HostError::Configuration(format!(
                    "Invalid log level '{}' for module '{}'",
                    level, module
                )));
            }
        }
        Ok(())
    }

    fn env_filter(&self) -> Result<EnvFilter, HostError> {
        let mut filter = EnvFilter::new(&self.level);
        for (module, level) in &self.module_levels {
            let directive = format!("{}={}", module, level);
            filter = filter.add_directive(
                directive
                    .parse()
                    .map_err(|e| HostError::Logging(format!("Invalid log directive: {}", e)))?,
            );
        }
        Ok(filter)
    }
}

/// Initialize logging based on the provided configuration.
///
/// Calling this more than once keeps the first subscriber.
pub fn init_logging(config: &LoggingConfig) -> Result<(), HostError> {
    let filter = config.env_filter()?;

    let stdout_layer = if config.json_format {
        fmt::layer()
            .json()
            .with_file(config.include_file_info)
            .with_line_number(config.include_file_info)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(config.include_file_info)
            .with_line_number(config.include_file_info)
            .with_ansi(config.enable_colors)
            .boxed()
    };

    let file_layer = match &config.log_file {
        Some(path) => Some(
            fmt::layer()
                .json()
                .with_writer(create_file_appender(path)?)
                .boxed(),
        ),
        None => None,
    };

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init();

    match result {
        Ok(_) => tracing::info!("Logging initialized with config level: {}", config.level),
        Err(_) => tracing::debug!("Logging already initialized, skipping"),
    }

    Ok(())
}

/// Daily-rotated appender writing next to `log_file`
fn create_file_appender(log_file: &str) -> Result<RollingFileAppender, HostError> {
    let log_path = Path::new(log_file);
    let directory = log_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let filename = log_path
        .file_name()
        .ok_or_else(|| HostError::Logging("Invalid log file name".to_string()))?
        .to_string_lossy();

    std::fs::create_dir_all(directory)
        .map_err(|e| HostError::Logging(format!("Failed to create log directory: {}", e)))?;

    Ok(RollingFileAppender::new(
        Rotation::DAILY,
        directory,
        filename.as_ref(),
    ))
}

/// Log level utilities
pub mod levels {
    /// Check if a log level string is valid
    pub fn is_valid_level(level: &str) -> bool {
        matches!(
            level.to_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        )
    }

    /// Get all valid log levels
    pub fn valid_levels() -> Vec<&'static str> {
        vec!["trace", "debug", "info", "warn", "error"]
    }
}
