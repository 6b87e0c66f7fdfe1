//! User-visible notification interface

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// A notification as handed to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub subtitle: String,
    pub message: String,
}

/// Fire-and-forget notification sink provided by the host
pub trait Notifier: Send + Sync {
    fn post(&self, notification: &Notification);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn post(&self, notification: &Notification) {
        (**self).post(notification)
    }
}

/// Keeps posted notifications in memory, shared by clones
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    posted: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything posted so far, oldest first
    pub fn posted(&self) -> Vec<Notification> {
        match self.posted.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn post(&self, notification: &Notification) {
        let mut guard = match self.posted.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(notification.clone());
    }
}
