//! Port for surfacing transient notifications to the user.

use dealflow_domain::Notification;

/// Sink for user-facing notifications.
///
/// Implementations must not block; a UI shell typically forwards into its
/// toast queue.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
