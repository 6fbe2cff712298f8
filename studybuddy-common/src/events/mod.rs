//! Event types for the StudyBuddy event system
//!
//! Provides shared event definitions and EventBus for all StudyBuddy crates.

// Sub-modules (supporting types)
mod notification_types;
mod processing_types;

pub use notification_types::{Notification, NotificationVariant};
pub use processing_types::ProcessingStage;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// StudyBuddy event types
///
/// Events are broadcast via EventBus and can be serialized as JSON for any
/// front-end that wants to mirror processing progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StudyEvent {
    /// The user replaced the file selection
    ///
    /// Triggers:
    /// - Progress display: clear any previous run
    /// - Presenter: drop stale artifacts
    SelectionReplaced {
        /// Number of files in the new selection
        file_count: usize,
        /// When the selection changed
        timestamp: DateTime<Utc>,
    },

    /// A processing run moved to a later stage
    ///
    /// Triggers:
    /// - Progress display: render "step N of 4"
    StageAdvanced {
        /// Run identifier
        run_id: Uuid,
        /// Stage before the transition
        old_stage: ProcessingStage,
        /// Stage after the transition
        new_stage: ProcessingStage,
        /// When the transition happened
        timestamp: DateTime<Utc>,
    },

    /// A processing run stored its artifact bundle
    RunCompleted {
        /// Run identifier
        run_id: Uuid,
        /// Name of the file that was processed
        file_name: String,
        /// When the run finished
        timestamp: DateTime<Utc>,
    },

    /// A processing run failed
    RunFailed {
        /// Run identifier
        run_id: Uuid,
        /// Last stage reached before the failure
        stage: ProcessingStage,
        /// Human-readable failure message
        message: String,
        /// When the run failed
        timestamp: DateTime<Utc>,
    },

    /// A user-facing notification was raised
    NotificationRaised {
        /// The notification payload
        notification: Notification,
        /// When the notification was raised
        timestamp: DateTime<Utc>,
    },
}

impl StudyEvent {
    /// Event type name (matches the serde tag)
    pub fn event_type(&self) -> &'static str {
        match self {
            StudyEvent::SelectionReplaced { .. } => "SelectionReplaced",
            StudyEvent::StageAdvanced { .. } => "StageAdvanced",
            StudyEvent::RunCompleted { .. } => "RunCompleted",
            StudyEvent::RunFailed { .. } => "RunFailed",
            StudyEvent::NotificationRaised { .. } => "NotificationRaised",
        }
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Central event distribution bus
///
/// The EventBus uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use studybuddy_common::events::{EventBus, StudyEvent};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(StudyEvent::SelectionReplaced {
///     file_count: 1,
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert!(matches!(rx.try_recv(), Ok(StudyEvent::SelectionReplaced { file_count: 1, .. })));
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StudyEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer before dropping old events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<StudyEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: StudyEvent,
    ) -> Result<usize, broadcast::error::SendError<StudyEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// Processing never depends on anyone observing its progress.
    pub fn emit_lossy(&self, event: StudyEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
