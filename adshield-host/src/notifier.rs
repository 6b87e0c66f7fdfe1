use adshield_core::{Notification, Notifier};
use tracing::info;

/// Posts notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn post(&self, notification: &Notification) {
        info!(
            title = %notification.title,
            subtitle = %notification.subtitle,
            message = %notification.message,
            "Notification"
        );
    }
}
