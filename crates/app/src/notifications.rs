//! User-facing notifications
//!
//! Services report outcomes through the [`Notifier`] port. The centre keeps a
//! short history for late subscribers, fans notifications out to live
//! listeners and mirrors each one into the log.

use std::collections::VecDeque;

use dealflow_core::Notifier;
use dealflow_domain::{Notification, NotificationLevel};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{info, warn};

const HISTORY_LIMIT: usize = 50;
const CHANNEL_CAPACITY: usize = 32;

pub struct NotificationCenter {
    history: Mutex<VecDeque<Notification>>,
    sender: broadcast::Sender<Notification>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { history: Mutex::new(VecDeque::with_capacity(HISTORY_LIMIT)), sender }
    }

    /// Live feed of notifications published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Most recent notifications, oldest first.
    pub fn recent(&self) -> Vec<Notification> {
        self.history.lock().iter().cloned().collect()
    }

    /// Take and clear the history.
    pub fn drain(&self) -> Vec<Notification> {
        self.history.lock().drain(..).collect()
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!(text = %notification.message, "notification"),
            NotificationLevel::Warning | NotificationLevel::Error => {
                warn!(level = ?notification.level, text = %notification.message, "notification");
            }
        }

        {
            let mut history = self.history.lock();
            if history.len() == HISTORY_LIMIT {
                history.pop_front();
            }
            history.push_back(notification.clone());
        }

        // No live listeners is fine; the history still has it.
        let _ = self.sender.send(notification);
    }
}
