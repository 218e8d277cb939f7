//! Notification channel
//!
//! The reminder scheduler talks to the outside world through a sink
//! trait so platform adapters (desktop toasts, a UI event bus, a test
//! recorder) can be swapped in. Delivery is fire-and-forget: reminder
//! state always advances whether or not the sink accepted the request.

use serde::Serialize;

/// A single due-notification request
#[derive(Debug, Clone, Serialize)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    /// Platform icon reference, if the sink supports one
    pub icon: Option<String>,
    /// Ask the platform to keep the notification on screen until dismissed
    pub require_interaction: bool,
    /// Dedupe tag: one armed timer and one poll may both fire for the same
    /// occurrence, the sink coalesces requests sharing a tag
    pub tag: String,
}

/// Platform-specific notification adapters implement this trait
pub trait NotificationSink: Send + Sync {
    /// Whether the channel can currently deliver (permission granted,
    /// platform supported). Callers still advance reminder state when
    /// this is false.
    fn is_available(&self) -> bool {
        true
    }

    fn notify(&self, request: NotificationRequest);
}

/// Default sink: delivers notifications to the log
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, request: NotificationRequest) {
        tracing::info!("Notification: {} - {}", request.title, request.body);
    }
}
