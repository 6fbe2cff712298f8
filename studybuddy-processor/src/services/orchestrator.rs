//! Processing orchestrator
//!
//! Owns the file selection and the single [`ProcessingRun`], issues exactly
//! one remote call per `submit`, and reports every outcome through the
//! notification sink.
//!
//! # Stage progression
//! IDLE → SUBMITTING → DISPATCHED → (remote call) → RECEIVED → COMPLETE
//!
//! Any error after the run starts ends it in FAILED with `active` cleared
//! and no result, so `submit` can be called again straight away. That
//! includes a `submit` future dropped mid-flight (e.g. by a timeout).

use crate::error::ProcessingError;
use crate::models::{ArtifactBundle, ProcessingRun, SelectedFile};
use crate::presenter::ArtifactPresenter;
use crate::services::notifier::{self, NotificationSink};
use crate::services::ProcessingService;
use chrono::Utc;
use std::sync::Arc;
use studybuddy_common::events::{EventBus, ProcessingStage, StudyEvent};
use tracing::{debug, error, info, warn};

/// Processing orchestrator service
pub struct ProcessingOrchestrator {
    service: Arc<dyn ProcessingService>,
    notifier: Arc<dyn NotificationSink>,
    event_bus: EventBus,
    selection: Vec<SelectedFile>,
    run: ProcessingRun,
}

impl ProcessingOrchestrator {
    /// Create a new orchestrator in the idle state with an empty selection
    ///
    /// # Arguments
    /// * `service` - Remote processing service
    /// * `notifier` - Sink for user-facing notifications
    /// * `event_bus` - Event bus for progress updates
    pub fn new(
        service: Arc<dyn ProcessingService>,
        notifier: Arc<dyn NotificationSink>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            service,
            notifier,
            event_bus,
            selection: Vec::new(),
            run: ProcessingRun::idle(),
        }
    }

    pub fn selection(&self) -> &[SelectedFile] {
        &self.selection
    }

    /// Read-only view of the current run
    pub fn run(&self) -> &ProcessingRun {
        &self.run
    }

    pub fn result(&self) -> Option<&ArtifactBundle> {
        self.run.result()
    }

    pub fn notifier(&self) -> &dyn NotificationSink {
        self.notifier.as_ref()
    }

    /// Whether a "generate" action should be offered right now
    pub fn can_submit(&self) -> bool {
        !self.selection.is_empty() && !self.run.is_active() && self.run.result().is_none()
    }

    /// Presenter over the stored bundle, if the last run completed
    pub fn presenter(&self) -> Option<ArtifactPresenter<'_>> {
        self.run.result().map(ArtifactPresenter::new)
    }

    /// Replace the file selection and return to idle
    ///
    /// Any stored result is dropped so stale artifacts are never shown
    /// against a new selection.
    pub fn reset(&mut self, files: Vec<SelectedFile>) {
        info!(file_count = files.len(), "File selection replaced");
        self.selection = files;
        self.run = ProcessingRun::idle();
        self.event_bus.emit_lossy(StudyEvent::SelectionReplaced {
            file_count: self.selection.len(),
            timestamp: Utc::now(),
        });
    }

    /// Process the first selected file
    ///
    /// Only the first file of the selection is submitted. Dropping the
    /// returned future before it resolves fails the run with `Cancelled`.
    ///
    /// # Returns
    /// * `Ok(&ArtifactBundle)` - Stored bundle; the run is COMPLETE
    /// * `Err(NoFilesSelected)` - Rejected, nothing changed
    /// * `Err(_)` - Run FAILED; failure notification already emitted
    pub async fn submit(&mut self) -> Result<&ArtifactBundle, ProcessingError> {
        let Some(file) = self.selection.first() else {
            warn!("Submit rejected: no files selected");
            self.notifier.notify(notifier::no_files_selected());
            return Err(ProcessingError::NoFilesSelected);
        };

        if self.selection.len() > 1 {
            debug!(
                skipped = self.selection.len() - 1,
                "Only the first selected file is processed"
            );
        }

        self.run.begin(file.name());
        info!(
            run_id = %self.run.run_id(),
            file = %file.name(),
            bytes = file.len(),
            "Processing run started"
        );

        let outcome = {
            let mut in_flight =
                InFlightRun::new(&mut self.run, &self.event_bus, self.notifier.as_ref());
            in_flight.advance(ProcessingStage::Submitting);
            in_flight.advance(ProcessingStage::Dispatched);

            let outcome = match self.service.process(file).await {
                Ok(bundle) => bundle.validate().map(|()| bundle).map_err(ProcessingError::from),
                Err(e) => Err(ProcessingError::from(e)),
            };
            in_flight.disarm();
            outcome
        };

        match outcome {
            Ok(bundle) => {
                advance(&mut self.run, &self.event_bus, ProcessingStage::Received);
                Ok(self.finish_success(bundle))
            }
            Err(err) => {
                fail_run(&mut self.run, &self.event_bus, self.notifier.as_ref(), &err);
                Err(err)
            }
        }
    }

    fn finish_success(&mut self, bundle: ArtifactBundle) -> &ArtifactBundle {
        let run_id = self.run.run_id();
        let file_name = self.run.file_name().unwrap_or_default().to_string();

        info!(
            run_id = %run_id,
            file = %file_name,
            sections = bundle.study_guide.content.len(),
            flashcards = bundle.flashcards.cards.len(),
            questions = bundle.quiz.questions.len(),
            "Processing run complete"
        );

        self.event_bus.emit_lossy(StudyEvent::RunCompleted {
            run_id,
            file_name,
            timestamp: Utc::now(),
        });
        self.notifier.notify(notifier::processing_complete());

        self.run.complete(bundle)
    }
}

/// Run state held across the remote call
///
/// Fails the run with `Cancelled` if dropped while still armed, so an
/// abandoned `submit` never leaves the run active.
struct InFlightRun<'a> {
    run: &'a mut ProcessingRun,
    event_bus: &'a EventBus,
    notifier: &'a dyn NotificationSink,
    armed: bool,
}

impl<'a> InFlightRun<'a> {
    fn new(
        run: &'a mut ProcessingRun,
        event_bus: &'a EventBus,
        notifier: &'a dyn NotificationSink,
    ) -> Self {
        Self {
            run,
            event_bus,
            notifier,
            armed: true,
        }
    }

    fn advance(&mut self, stage: ProcessingStage) {
        advance(self.run, self.event_bus, stage);
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightRun<'_> {
    fn drop(&mut self) {
        if self.armed {
            fail_run(self.run, self.event_bus, self.notifier, &ProcessingError::Cancelled);
        }
    }
}

/// End the run as FAILED, broadcast it and raise the failure notification
fn fail_run(
    run: &mut ProcessingRun,
    event_bus: &EventBus,
    sink: &dyn NotificationSink,
    err: &ProcessingError,
) {
    let message = err.user_message();
    let stage = run.stage();

    error!(
        run_id = %run.run_id(),
        stage = %stage,
        code = err.code(),
        "Processing run failed: {}",
        message
    );

    run.fail(message.clone());
    event_bus.emit_lossy(StudyEvent::RunFailed {
        run_id: run.run_id(),
        stage,
        message: message.clone(),
        timestamp: Utc::now(),
    });
    sink.notify(notifier::processing_failed(message));
}

/// Move the run forward one stage and broadcast it
fn advance(run: &mut ProcessingRun, event_bus: &EventBus, stage: ProcessingStage) {
    let transition = run.advance(stage);
    debug!(
        run_id = %transition.run_id,
        from = %transition.old_stage,
        to = %transition.new_stage,
        "Stage advanced ({}/{})",
        transition.new_stage.step(),
        ProcessingStage::COUNT
    );
    event_bus.emit_lossy(StudyEvent::StageAdvanced {
        run_id: transition.run_id,
        old_stage: transition.old_stage,
        new_stage: transition.new_stage,
        timestamp: transition.transitioned_at,
    });
}
