//! Processing run state machine
//!
//! A run progresses through:
//! IDLE → SUBMITTING → DISPATCHED → RECEIVED → COMPLETE
//!
//! Any of SUBMITTING, DISPATCHED or RECEIVED may end in FAILED instead.
//! COMPLETE and FAILED are terminal for the run; the next run starts from
//! IDLE again.

use crate::models::ArtifactBundle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use studybuddy_common::events::ProcessingStage;
use uuid::Uuid;

/// Lifecycle state of a processing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunState {
    /// Nothing in flight
    Idle,
    /// Request payload being constructed
    Submitting,
    /// Waiting on the remote service
    Dispatched,
    /// Response received and validated
    Received,
    /// Bundle stored
    Complete,
    /// Run ended with an error
    Failed,
}

/// Stage transition record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTransition {
    pub run_id: Uuid,
    pub old_stage: ProcessingStage,
    pub new_stage: ProcessingStage,
    pub transitioned_at: DateTime<Utc>,
}

/// The single processing run owned by the orchestrator
///
/// Collaborators only get `&ProcessingRun`; every mutation goes through the
/// orchestrator.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingRun {
    run_id: Uuid,
    state: RunState,
    stage: ProcessingStage,
    active: bool,
    result: Option<ArtifactBundle>,
    file_name: Option<String>,
    last_error: Option<String>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl Default for ProcessingRun {
    fn default() -> Self {
        Self::idle()
    }
}

impl ProcessingRun {
    /// Fresh run with no result
    pub fn idle() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            state: RunState::Idle,
            stage: ProcessingStage::Idle,
            active: false,
            result: None,
            file_name: None,
            last_error: None,
            started_at: None,
            ended_at: None,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn stage(&self) -> ProcessingStage {
        self.stage
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn result(&self) -> Option<&ArtifactBundle> {
        self.result.as_ref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Check if the run has finished (successfully or not)
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, RunState::Complete | RunState::Failed)
    }

    /// Start a new run for `file_name`
    ///
    /// Any previous result is dropped so nothing stale is visible while the
    /// new run is in flight.
    pub(crate) fn begin(&mut self, file_name: &str) {
        *self = Self {
            active: true,
            file_name: Some(file_name.to_string()),
            started_at: Some(Utc::now()),
            ..Self::idle()
        };
    }

    /// Advance to a later stage
    ///
    /// Stages never regress within a run.
    pub(crate) fn advance(&mut self, new_stage: ProcessingStage) -> StageTransition {
        debug_assert!(self.active, "advance() on an inactive run");
        debug_assert!(
            self.stage.can_advance_to(new_stage),
            "stage regression: {} -> {}",
            self.stage,
            new_stage
        );

        let transition = StageTransition {
            run_id: self.run_id,
            old_stage: self.stage,
            new_stage,
            transitioned_at: Utc::now(),
        };
        self.stage = new_stage;
        self.state = match new_stage {
            ProcessingStage::Idle => RunState::Idle,
            ProcessingStage::Submitting => RunState::Submitting,
            ProcessingStage::Dispatched => RunState::Dispatched,
            ProcessingStage::Received => RunState::Received,
        };
        transition
    }

    /// Store the bundle and end the run
    pub(crate) fn complete(&mut self, bundle: ArtifactBundle) -> &ArtifactBundle {
        debug_assert_eq!(self.stage, ProcessingStage::Received);
        self.state = RunState::Complete;
        self.active = false;
        self.last_error = None;
        self.ended_at = Some(Utc::now());
        self.result.insert(bundle)
    }

    /// End the run with an error; the stage stays where the failure happened
    pub(crate) fn fail(&mut self, message: String) {
        self.state = RunState::Failed;
        self.active = false;
        self.result = None;
        self.last_error = Some(message);
        self.ended_at = Some(Utc::now());
    }
}
