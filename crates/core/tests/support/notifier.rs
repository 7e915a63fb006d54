//! Notifier that keeps every notification for later assertions

use std::sync::{Arc, Mutex};

use dealflow_core::Notifier;
use dealflow_domain::{Notification, NotificationLevel};

#[derive(Default, Clone)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen.lock().unwrap().last().cloned()
    }

    pub fn count(&self, level: NotificationLevel) -> usize {
        self.seen.lock().unwrap().iter().filter(|n| n.level == level).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}
