//! Transient user-facing notifications.
//!
//! # Responsibility
//! - Define the fire-and-forget channel the store reports outcomes through.
//!
//! # Invariants
//! - Sinks never influence store state; `notify` has no return value.

use log::{info, warn};

/// One transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

impl Notification {
    /// Returns the message text regardless of kind.
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Error(message) => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Receiver for store notifications.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

/// Sink that forwards notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn notify(&mut self, notification: Notification) {
        match notification {
            Notification::Success(message) => {
                info!("event=notify module=notify kind=success message={message:?}")
            }
            Notification::Error(message) => {
                warn!("event=notify module=notify kind=error message={message:?}")
            }
        }
    }
}

/// Fans each notification out to both sinks, first then second.
impl<A, B> NotificationSink for (A, B)
where
    A: NotificationSink,
    B: NotificationSink,
{
    fn notify(&mut self, notification: Notification) {
        self.0.notify(notification.clone());
        self.1.notify(notification);
    }
}

/// Sink that keeps every notification in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingNotificationSink {
    received: Vec<Notification>,
}

impl RecordingNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications received so far.
    pub fn received(&self) -> &[Notification] {
        &self.received
    }

    pub fn last(&self) -> Option<&Notification> {
        self.received.last()
    }

    /// Removes and returns everything received so far.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.received)
    }
}

impl NotificationSink for RecordingNotificationSink {
    fn notify(&mut self, notification: Notification) {
        self.received.push(notification);
    }
}
