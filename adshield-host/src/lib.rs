//! AdShield Host
//!
//! Wires the core sanitizer and diagnostics recorder into something a proxy
//! or scripting host can call once per intercepted response: configuration
//! loading, logging, a file-backed store and a log notifier.

use adshield_core::{
    Exchange, KeyValueStore, Notification, Notifier, Recorder, RuleTable,
};
use std::sync::Arc;
use tracing::{debug, warn};

pub mod config;
pub mod error;
pub mod file_store;
pub mod logging;
pub mod notifier;
pub mod scope;


pub use config::{load_config, load_config_with, HostConfig};
pub use error::HostError;
pub use file_store::FileStore;
pub use logging::{init_logging, LoggingConfig};
pub use notifier::LogNotifier;
pub use scope::{ScopeConfig, ScopeMatcher};

/// What the host should do with one response
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Body to hand back to the client
    pub body: String,
    /// Whether the exchange was inside the configured scope
    pub in_scope: bool,
    /// Sanitizing rules that rewrote the body, in order
    pub fired_rules: Vec<&'static str>,
    /// Notification raised by the diagnostics recorder
    pub notification: Option<Notification>,
}

impl Outcome {
    fn passthrough(exchange: &Exchange) -> Self {
        Self {
            body: exchange.body.clone(),
            in_scope: false,
            fired_rules: Vec::new(),
            notification: None,
        }
    }

    pub fn is_modified(&self) -> bool {
        !self.fired_rules.is_empty()
    }
}

/// Per-response entry point combining scope check, diagnostics and sanitization
#[derive(Clone)]
pub struct Interceptor {
    scope: ScopeMatcher,
    rules: Option<RuleTable>,
    recorder: Recorder,
}

impl Interceptor {
    /// `rules` of `None` records diagnostics only and never rewrites bodies
    pub fn new(scope: ScopeMatcher, rules: Option<RuleTable>, recorder: Recorder) -> Self {
        Self {
            scope,
            rules,
            recorder,
        }
    }

    /// Build from configuration with explicit store and notifier
    pub fn with_backends(
        config: &HostConfig,
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let rules = config
            .sanitizer
            .enabled
            .then(|| config.sanitizer.rule_table());
        Self::new(
            ScopeMatcher::new(&config.scope),
            rules,
            Recorder::new(config.capture.clone(), store, notifier),
        )
    }

    /// Build from configuration using the file store at `store_path` and the log notifier
    pub fn from_config(config: &HostConfig) -> Self {
        Self::with_backends(
            config,
            Arc::new(FileStore::new(&config.store_path)),
            Arc::new(LogNotifier),
        )
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// Process one intercepted response.
    ///
    /// Diagnostics always see the body as the server sent it. Any failure
    /// degrades to returning that body unchanged.
    pub fn on_response(&self, exchange: &Exchange) -> Outcome {
        let host = exchange.host().unwrap_or_default();
        if !self.scope.is_allowed(&host) {
            debug!(host = %host, "Out of scope, passing through");
            return Outcome::passthrough(exchange);
        }

        let notification = self.recorder.record(exchange);

        let (body, fired_rules) = match &self.rules {
            Some(rules) => match rules.try_dispatch(&exchange.url, &exchange.body) {
                Ok((_, fired)) if fired.is_empty() => (exchange.body.clone(), fired),
                Ok((encoded, fired)) => (encoded, fired),
                Err(e) => {
                    warn!(error = %e, url = %exchange.url, "Failed to sanitize response, passing through");
                    (exchange.body.clone(), Vec::new())
                }
            },
            None => (exchange.body.clone(), Vec::new()),
        };

        Outcome {
            body,
            in_scope: true,
            fired_rules,
            notification,
        }
    }
}
