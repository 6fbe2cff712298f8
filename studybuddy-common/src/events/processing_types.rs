//! Processing run type definitions
//!
//! Supporting types for processing progress tracking.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress milestone of a processing run
///
/// Ordinals 0-3 map to "step 1 of 4" through "step 4 of 4" on a progress
/// indicator. Stages only ever move forward within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStage {
    /// Run started, nothing sent yet
    Idle = 0,
    /// Request payload being constructed
    Submitting = 1,
    /// Request handed to the remote service
    Dispatched = 2,
    /// Response received and validated
    Received = 3,
}

impl ProcessingStage {
    /// Number of stages shown on a progress indicator
    pub const COUNT: u8 = 4;

    /// Zero-based ordinal
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// One-based progress step ("step N of 4")
    pub fn step(&self) -> u8 {
        self.ordinal() + 1
    }

    /// Stage that follows this one, if any
    pub fn next(&self) -> Option<ProcessingStage> {
        match self {
            ProcessingStage::Idle => Some(ProcessingStage::Submitting),
            ProcessingStage::Submitting => Some(ProcessingStage::Dispatched),
            ProcessingStage::Dispatched => Some(ProcessingStage::Received),
            ProcessingStage::Received => None,
        }
    }

    /// Whether moving from `self` to `to` keeps the stage monotonic
    pub fn can_advance_to(&self, to: ProcessingStage) -> bool {
        to > *self
    }

    /// Progress label for display
    pub fn label(&self) -> &'static str {
        match self {
            ProcessingStage::Idle => "Preparing your files",
            ProcessingStage::Submitting => "Uploading document",
            ProcessingStage::Dispatched => "Generating study materials",
            ProcessingStage::Received => "Finalizing results",
        }
    }
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessingStage::Idle => "idle",
            ProcessingStage::Submitting => "submitting",
            ProcessingStage::Dispatched => "dispatched",
            ProcessingStage::Received => "received",
        };
        f.write_str(name)
    }
}
