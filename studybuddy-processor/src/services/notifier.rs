//! Notification sinks
//!
//! The orchestrator and presenter report user-facing outcomes through a
//! one-way [`NotificationSink`]. Delivery is fire-and-forget: a sink that
//! fails to display something never affects processing state.

use chrono::Utc;
use std::io::Write;
use studybuddy_common::events::{EventBus, Notification, NotificationVariant, StudyEvent};
use tracing::{info, warn};

/// One-way notification dispatch
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Re-broadcast notifications on the event bus
impl NotificationSink for EventBus {
    fn notify(&self, notification: Notification) {
        self.emit_lossy(StudyEvent::NotificationRaised {
            notification,
            timestamp: Utc::now(),
        });
    }
}

/// Write notifications to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            NotificationVariant::Default => {
                info!(title = %notification.title, "{}", notification.description)
            }
            NotificationVariant::Destructive => {
                warn!(title = %notification.title, "{}", notification.description)
            }
        }
    }
}

/// Print notifications to stderr for the terminal front-end
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let marker = match notification.variant {
            NotificationVariant::Default => "*",
            NotificationVariant::Destructive => "!",
        };
        // Display-only; a closed stderr is ignored
        let _ = writeln!(
            std::io::stderr(),
            "[{}] {}: {}",
            marker,
            notification.title,
            notification.description
        );
    }
}

/// Forward each notification to several sinks
pub struct FanOutNotifier {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl FanOutNotifier {
    pub fn new(sinks: Vec<Box<dyn NotificationSink>>) -> Self {
        Self { sinks }
    }
}

impl NotificationSink for FanOutNotifier {
    fn notify(&self, notification: Notification) {
        for sink in &self.sinks {
            sink.notify(notification.clone());
        }
    }
}

// ============================================================================
// Fixed messages
// ============================================================================

pub fn no_files_selected() -> Notification {
    Notification::destructive(
        "No files selected",
        "Please select at least one file to process.",
    )
}

pub fn processing_failed(description: impl Into<String>) -> Notification {
    Notification::destructive("Processing Error", description)
}

pub fn processing_complete() -> Notification {
    Notification::info("Processing Complete", "Your study materials are ready!")
}

pub fn quiz_completed(score: usize, total_questions: usize) -> Notification {
    Notification::info(
        "Quiz Completed",
        format!("You scored {} out of {}!", score, total_questions),
    )
}
