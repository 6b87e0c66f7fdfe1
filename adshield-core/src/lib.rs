//! AdShield Core Library
//!
//! Rewrites intercepted gateway responses to strip advertising content, and
//! scans the same traffic for ad-related fields to build a diagnostic log.
//! Interception, persistence and notification delivery belong to the host and
//! are reached through the [`KeyValueStore`] and [`Notifier`] traits.

/// Dotted-path traversal over decoded JSON
pub mod walker;

pub mod keywords;
pub mod scanner;

/// Per-endpoint body rewrites
pub mod transforms;

/// URL-to-rule dispatch
pub mod rules;

pub mod exchange;
pub mod notifier;
pub mod recorder;
pub mod store;

/// Configuration types and utilities
pub mod config;

/// Error types for sanitizer and diagnostics operations
pub mod error;

pub use config::{CaptureConfig, SanitizerConfig};
pub use error::AdShieldError;
pub use exchange::Exchange;
pub use keywords::{KeywordSet, DEFAULT_AD_KEYWORDS};
pub use notifier::{Notification, Notifier, RecordingNotifier};
pub use recorder::{LogEntry, LogRing, Recorder, StoredEntry};
pub use rules::{Rule, RuleTable, STANDARD_RULES};
pub use scanner::{scan, scan_value, FieldDescriptor, ValueKind};
pub use store::{KeyValueStore, MemoryStore};
pub use transforms::SUCCESS_MARKER;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, AdShieldError>;
