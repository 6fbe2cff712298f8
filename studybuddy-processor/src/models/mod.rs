//! Data models for studybuddy-processor
//!
//! - Artifact bundle wire types and validation
//! - Processing run state machine
//! - Selected document handles

pub mod artifact_bundle;
pub mod processing_run;
pub mod selected_file;

pub use artifact_bundle::{
    ArtifactBundle, AudioData, BundleError, Flashcard, FlashcardData, QuizData, QuizQuestion,
    StudyGuideData, StudyGuideSection,
};
pub use processing_run::{ProcessingRun, RunState, StageTransition};
pub use selected_file::SelectedFile;
