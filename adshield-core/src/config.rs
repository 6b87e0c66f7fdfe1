//! Configuration types for the sanitizer and the diagnostics recorder

use crate::error::AdShieldError;
use crate::keywords::KeywordSet;
use crate::rules::RuleTable;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Diagnostics capture configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Keywords matched against response field names
    pub keywords: KeywordSet,
    /// Keywords matched against the request URL; falls back to `keywords`
    pub url_keywords: Option<KeywordSet>,
    /// Store key holding the log ring
    pub storage_key: String,
    /// Maximum number of log entries kept
    pub max_logs: usize,
    /// Body preview length in characters
    pub preview_chars: usize,
    /// Length of the field list shown in a notification
    pub notify_fields_chars: usize,
    /// Length of the URL path shown as notification subtitle
    pub subtitle_chars: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            keywords: KeywordSet::default(),
            url_keywords: None,
            storage_key: "xianyu_capture_log".to_string(),
            max_logs: 50,
            preview_chars: 1000,
            notify_fields_chars: 100,
            subtitle_chars: 50,
        }
    }
}

impl CaptureConfig {
    pub fn url_keywords(&self) -> &KeywordSet {
        self.url_keywords.as_ref().unwrap_or(&self.keywords)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_logs == 0 {
            return Err(AdShieldError::Config("max_logs must be at least 1".to_string()));
        }
        if self.storage_key.trim().is_empty() {
            return Err(AdShieldError::Config("storage_key must not be empty".to_string()));
        }
        if self.keywords.is_empty() {
            return Err(AdShieldError::Config("keywords must not be empty".to_string()));
        }
        if matches!(&self.url_keywords, Some(set) if set.is_empty()) {
            return Err(AdShieldError::Config(
                "url_keywords must not be empty when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Response sanitizer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Whether responses are rewritten at all
    pub enabled: bool,
    /// Names of standard rules to skip
    pub disabled_rules: Vec<String>,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            disabled_rules: Vec::new(),
        }
    }
}

impl SanitizerConfig {
    /// Standard rule table minus the disabled rules
    pub fn rule_table(&self) -> RuleTable {
        RuleTable::standard().without(self.disabled_rules.as_slice())
    }

    pub fn validate(&self) -> Result<()> {
        let known = RuleTable::standard().names();
        match self
            .disabled_rules
            .iter()
            .find(|name| !known.contains(&name.as_str()))
        {
            Some(unknown) => Err(AdShieldError::Config(format!(
                "unknown rule '{}' in disabled_rules (known: {})",
                unknown,
                known.join(", ")
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_defaults() {
        let config = CaptureConfig::default();
        assert_eq!(config.storage_key, "xianyu_capture_log");
        assert_eq!(config.max_logs, 50);
        assert_eq!(config.preview_chars, 1000);
        assert!(config.validate().is_ok());
        assert_eq!(config.url_keywords(), &config.keywords);
    }

    #[test]
    fn test_capture_partial_deserialize_keeps_defaults() {
        let config: CaptureConfig =
            serde_json::from_str(r#"{"max_logs": 10, "url_keywords": ["splash"]}"#).unwrap();
        assert_eq!(config.max_logs, 10);
        assert_eq!(config.storage_key, "xianyu_capture_log");
        assert!(config.url_keywords().matches("idlecommerce.splash"));
        assert!(!config.url_keywords().matches("banner"));
    }

    #[test]
    fn test_capture_validation() {
        let zero = CaptureConfig {
            max_logs: 0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(AdShieldError::Config(_))));

        let no_keywords = CaptureConfig {
            keywords: KeywordSet::new([""]),
            ..Default::default()
        };
        assert!(no_keywords.validate().is_err());
    }

    #[test]
    fn test_sanitizer_rule_table() {
        let config = SanitizerConfig {
            enabled: true,
            disabled_rules: vec!["home_config".to_string()],
        };
        assert!(config.validate().is_ok());
        assert!(!config.rule_table().names().contains(&"home_config"));

        let bad = SanitizerConfig {
            enabled: true,
            disabled_rules: vec!["nope".to_string()],
        };
        let err = bad.validate().unwrap_err().to_string();
        assert!(err.contains("unknown rule 'nope'"));
    }
}
