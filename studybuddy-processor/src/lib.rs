//! studybuddy-processor library interface
//!
//! Turns a document selection into one remote processing run and fans the
//! returned artifact bundle out into four study views (study guide,
//! flashcards, quiz, audio narration).

pub mod error;
pub mod models;
pub mod presenter;
pub mod services;

pub use crate::error::ProcessingError;
pub use crate::models::{ArtifactBundle, ProcessingRun, RunState, SelectedFile};
pub use crate::presenter::{ArtifactPresenter, ArtifactView, ViewContent};
pub use crate::services::{
    HttpProcessingService, NotificationSink, ProcessingOrchestrator, ProcessingService,
    ServiceError,
};
