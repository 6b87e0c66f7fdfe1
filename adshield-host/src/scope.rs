use serde::{Deserialize, Serialize};
use wildmatch::WildMatch;

/// Which hosts the interceptor handles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Wildcard host patterns to process, e.g. `*.taobao.com`. Empty means all hosts.
    pub include: Vec<String>,
    /// Wildcard host patterns to skip; checked before `include`
    pub exclude: Vec<String>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            include: vec![
                "acs.m.taobao.com".to_string(),
                "*.m.taobao.com".to_string(),
                "*.goofish.com".to_string(),
            ],
            exclude: Vec::new(),
        }
    }
}

/// Compiled host scope
#[derive(Debug, Clone)]
pub struct ScopeMatcher {
    include: Vec<WildMatch>,
    exclude: Vec<WildMatch>,
}

impl ScopeMatcher {
    pub fn new(config: &ScopeConfig) -> Self {
        fn compile(patterns: &[String]) -> Vec<WildMatch> {
            patterns
                .iter()
                .map(|pattern| WildMatch::new(&pattern.to_lowercase()))
                .collect()
        }

        Self {
            include: compile(&config.include),
            exclude: compile(&config.exclude),
        }
    }

    /// Matcher that accepts every host
    pub fn allow_all() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// Check if a host is in scope
    ///
    /// Logic:
    /// 1. If exclude matches, return false (explicit deny).
    /// 2. If include is empty, return true (allow all by default).
    /// 3. Otherwise return true only if include matches.
    pub fn is_allowed(&self, host: &str) -> bool {
        let host = host.to_lowercase();

        if self.exclude.iter().any(|pattern| pattern.matches(&host)) {
            return false;
        }

        self.include.is_empty() || self.include.iter().any(|pattern| pattern.matches(&host))
    }
}
