//! URL-to-rule dispatch for response sanitization
//!
//! Rules are tried in table order and are independent of one another: every
//! rule whose URL fragment occurs in the request URL is applied, each seeing
//! the body as left by the previous one.

use crate::error::AdShieldError;
use crate::transforms;
use serde_json::Value;
use std::fmt;
use tracing::{debug, info, warn};

/// A single endpoint rule
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    /// Case-sensitive substring of the request URL
    pub url_fragment: &'static str,
    pub transform: fn(&mut Value),
}

impl Rule {
    pub const fn new(name: &'static str, url_fragment: &'static str, transform: fn(&mut Value)) -> Self {
        Self {
            name,
            url_fragment,
            transform,
        }
    }

    /// Check if this rule applies to the given URL
    pub fn matches(&self, url: &str) -> bool {
        url.contains(self.url_fragment)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("url_fragment", &self.url_fragment)
            .finish()
    }
}

/// The endpoint rules, in the order they are applied
pub const STANDARD_RULES: [Rule; 8] = [
    Rule::new("splash", "idlecommerce.splash", transforms::clear_splash),
    Rule::new(
        "launch_report",
        "idleadv.app.launch.report",
        transforms::acknowledge_launch_report,
    ),
    Rule::new(
        "scene_restore",
        "idleadv.scene.restore",
        transforms::clear_scene_restore,
    ),
    Rule::new(
        "user_strategy",
        "user.strategy.list",
        transforms::clear_user_strategy,
    ),
    Rule::new("circle_list", "home.circle.list", transforms::filter_circle_list),
    Rule::new("feed_refresh", "home.nextfresh", transforms::clean_feed),
    Rule::new("activity_query", "activity.query", transforms::filter_activities),
    Rule::new("home_config", "home.config", transforms::clear_home_config),
];

/// Ordered rule table
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Table holding every standard endpoint rule
    pub fn standard() -> Self {
        Self::new(STANDARD_RULES.to_vec())
    }

    /// Same table without the named rules. Unknown names are ignored.
    pub fn without<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.rules
            .retain(|rule| !names.iter().any(|name| name.as_ref() == rule.name));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules that apply to `url`, in table order
    pub fn matching<'a>(&'a self, url: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |rule| rule.matches(url))
    }

    /// Apply every matching rule to an already decoded body.
    ///
    /// Returns the names of the rules that fired.
    pub fn apply(&self, url: &str, body: &mut Value) -> Vec<&'static str> {
        let mut fired = Vec::new();
        for rule in self.matching(url) {
            (rule.transform)(body);
            debug!(rule = rule.name, url = %url, "Applied sanitizing rule");
            fired.push(rule.name);
        }
        fired
    }

    /// Sanitize a raw body, reporting decode failures to the caller
    pub fn try_dispatch(&self, url: &str, body: &str) -> Result<(String, Vec<&'static str>), AdShieldError> {
        let mut value: Value = serde_json::from_str(body)?;
        let fired = self.apply(url, &mut value);
        let encoded =
            serde_json::to_string(&value).map_err(|e| AdShieldError::Encode(e.to_string()))?;
        Ok((encoded, fired))
    }

    /// Sanitize a raw body. A body that cannot be processed comes back unchanged.
    pub fn dispatch(&self, url: &str, body: &str) -> String {
        match self.try_dispatch(url, body) {
            Ok((encoded, fired)) => {
                if !fired.is_empty() {
                    info!(rules = ?fired, url = %url, "Sanitized response body");
                }
                encoded
            }
            Err(e) => {
                warn!(error = %e, url = %url, "Failed to sanitize response, passing through");
                body.to_string()
            }
        }
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}
