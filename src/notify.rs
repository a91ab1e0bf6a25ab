//! Notification delivery through the log
//!
//! Stands in for the tray balloon of a desktop shell: every notification is
//! emitted as a structured info event. A real presentation layer would
//! implement [`NotificationSink`] against the OS notification service.

use tracing::info;

use crate::provider::NotificationSink;

pub struct LogNotifier {
    enabled: bool,
}

impl LogNotifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl NotificationSink for LogNotifier {
    fn notify(&self, title: &str, body: &str) {
        if !self.enabled {
            return;
        }
        info!(target: "vmwatch::balloon", "{}: {}", title, body);
    }
}
