//! Capture and diagnostics recording
//!
//! Each exchange becomes one [`LogEntry`] in a bounded, newest-first ring kept
//! under a single store key. Recording never affects the response: a store
//! failure only loses that exchange's entry.

use crate::config::CaptureConfig;
use crate::exchange::Exchange;
use crate::notifier::{Notification, Notifier};
use crate::scanner::{scan, FieldDescriptor};
use crate::store::KeyValueStore;
use crate::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

const TRUNCATION_MARKER: &str = "...[truncated]";

/// Diagnostic record of one intercepted exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Local wall-clock time, `HH:MM:SS`
    pub time: String,
    pub url: String,
    pub path: String,
    pub status: u16,
    /// Body size in UTF-8 bytes.
    ///
    /// JavaScript producers sharing the same store key count UTF-16 code
    /// units instead, so CJK-heavy bodies read up to three times larger here.
    pub body_length: usize,
    pub is_possible_ad: bool,
    pub ad_fields: Vec<FieldDescriptor>,
    pub body_preview: String,
}

/// One element of the persisted log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredEntry {
    Entry(LogEntry),
    /// Element in some other layout, kept verbatim until it ages out
    Foreign(Value),
}

impl StoredEntry {
    pub fn as_entry(&self) -> Option<&LogEntry> {
        match self {
            StoredEntry::Entry(entry) => Some(entry),
            StoredEntry::Foreign(_) => None,
        }
    }
}

/// Newest-first log buffer holding at most `capacity` elements
#[derive(Debug, Clone, PartialEq)]
pub struct LogRing {
    stored: Vec<StoredEntry>,
    capacity: usize,
}

impl LogRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            stored: Vec::new(),
            capacity,
        }
    }

    /// Decode a persisted ring.
    ///
    /// Elements that do not fit [`LogEntry`] are kept as they are. Anything
    /// that is not a JSON array starts a fresh ring.
    pub fn decode(raw: Option<&str>, capacity: usize) -> Self {
        let mut stored = match raw.filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => match serde_json::from_str::<Vec<StoredEntry>>(raw) {
                Ok(stored) => stored,
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable capture log");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        stored.truncate(capacity);

        let foreign = stored.iter().filter(|item| item.as_entry().is_none()).count();
        if foreign > 0 {
            debug!(foreign, "Keeping capture log elements in an unrecognized layout");
        }
        Self { stored, capacity }
    }

    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.stored)?)
    }

    /// Insert at the head, evicting from the tail past capacity
    pub fn push(&mut self, entry: LogEntry) {
        self.stored.insert(0, StoredEntry::Entry(entry));
        self.stored.truncate(self.capacity);
    }

    /// Every persisted element, newest first
    pub fn stored(&self) -> &[StoredEntry] {
        &self.stored
    }

    /// Elements in the current [`LogEntry`] layout, newest first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        self.stored.iter().filter_map(StoredEntry::as_entry)
    }

    pub fn len(&self) -> usize {
        self.stored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stored.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// First `max` characters of `text`
fn prefix_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// `text` cut to `max` characters, marked when something was dropped
pub fn truncate_preview(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}{}", prefix_chars(text, max), TRUNCATION_MARKER)
    } else {
        text.to_string()
    }
}

/// Builds log entries, persists them and raises notifications
#[derive(Clone)]
pub struct Recorder {
    config: CaptureConfig,
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    clock: fn() -> DateTime<Local>,
}

impl Recorder {
    pub fn new(
        config: CaptureConfig,
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            store,
            notifier,
            clock: Local::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Build the log entry for an exchange without persisting it
    pub fn entry_for(&self, exchange: &Exchange) -> LogEntry {
        LogEntry {
            time: (self.clock)().format("%H:%M:%S").to_string(),
            url: exchange.url.clone(),
            path: exchange.url_path(),
            status: exchange.status,
            body_length: exchange.body.len(),
            is_possible_ad: self.config.url_keywords().matches(&exchange.url),
            ad_fields: scan(&exchange.body, &self.config.keywords),
            body_preview: truncate_preview(&exchange.body, self.config.preview_chars),
        }
    }

    /// Record one exchange and notify when it looks ad-related.
    ///
    /// Returns the notification that was posted, if any.
    pub fn record(&self, exchange: &Exchange) -> Option<Notification> {
        let entry = self.entry_for(exchange);
        self.trace_entry(&entry);

        let notification = self.notification_for(&entry);

        if let Err(e) = self.append(entry) {
            warn!(error = %e, url = %exchange.url, "Failed to save capture log");
        }

        if let Some(notification) = &notification {
            self.notifier.post(notification);
        }
        notification
    }

    /// Read-modify-write of the persisted ring
    pub fn append(&self, entry: LogEntry) -> Result<()> {
        let key = &self.config.storage_key;
        let raw = self.store.read(key)?;
        let mut ring = LogRing::decode(raw.as_deref(), self.config.max_logs);
        ring.push(entry);
        self.store.write(key, &ring.encode()?)?;
        debug!(entries = ring.len(), key = %key, "Capture log saved");
        Ok(())
    }

    /// Persisted entries in the current layout, newest first
    pub fn history(&self) -> Result<Vec<LogEntry>> {
        let raw = self.store.read(&self.config.storage_key)?;
        Ok(LogRing::decode(raw.as_deref(), self.config.max_logs)
            .entries()
            .cloned()
            .collect())
    }

    /// Notification for an entry, `None` when nothing looked ad-related
    pub fn notification_for(&self, entry: &LogEntry) -> Option<Notification> {
        if !entry.is_possible_ad && entry.ad_fields.is_empty() {
            return None;
        }

        let title = if entry.is_possible_ad {
            "Possible ad endpoint"
        } else {
            "Ad fields found"
        };

        let mut message = format!("Size: {} bytes", entry.body_length);
        if !entry.ad_fields.is_empty() {
            let joined = entry
                .ad_fields
                .iter()
                .map(|field| field.path.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            message.push_str("\nFields: ");
            message.push_str(&prefix_chars(&joined, self.config.notify_fields_chars));
        }

        Some(Notification {
            title: title.to_string(),
            subtitle: prefix_chars(&entry.path, self.config.subtitle_chars),
            message,
        })
    }

    fn trace_entry(&self, entry: &LogEntry) {
        info!(
            time = %entry.time,
            url = %entry.url,
            status = entry.status,
            body_length = entry.body_length,
            possible_ad = entry.is_possible_ad,
            ad_fields = entry.ad_fields.len(),
            "Captured response"
        );
        if let Some(keyword) = self.config.url_keywords().first_match(&entry.url) {
            info!(url = %entry.url, keyword, "URL contains ad keywords");
        }
        for field in &entry.ad_fields {
            let keyword = self
                .config
                .keywords
                .first_match(field.path.rsplit('.').next().unwrap_or_default());
            info!(field = %field, keyword, "Ad-related field");
        }
        debug!(preview = %entry.body_preview, "Response preview");
    }
}
