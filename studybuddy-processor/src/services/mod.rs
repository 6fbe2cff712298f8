//! Service modules for the processing workflow
//!
//! - Remote processing service client
//! - Processing orchestrator (run state machine driver)
//! - Notification sinks

pub mod notifier;
pub mod orchestrator;
pub mod processing_client;

pub use notifier::{ConsoleNotifier, FanOutNotifier, LogNotifier, NotificationSink};
pub use orchestrator::ProcessingOrchestrator;
pub use processing_client::{HttpProcessingService, ProcessingService, ServiceError};
