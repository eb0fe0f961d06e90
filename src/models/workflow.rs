// src/models/workflow.rs
//! Workflow state for a single verification session.
//!
//! A session walks through four steps:
//!
//! ```text
//! Upload(1) -> Scanning(2) -> Checking(3) -> Result(4)
//! ```
//!
//! `Result` is terminal; only an explicit reset returns the session to
//! `Upload`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four steps of the verification workflow.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowStep {
    Upload,
    Scanning,
    Checking,
    Result,
}

impl WorkflowStep {
    /// 1-based step number shown in the step indicator.
    pub fn number(&self) -> u8 {
        match self {
            WorkflowStep::Upload => 1,
            WorkflowStep::Scanning => 2,
            WorkflowStep::Checking => 3,
            WorkflowStep::Result => 4,
        }
    }

    /// The following step, or `None` from the terminal step.
    pub fn next(&self) -> Option<WorkflowStep> {
        match self {
            WorkflowStep::Upload => Some(WorkflowStep::Scanning),
            WorkflowStep::Scanning => Some(WorkflowStep::Checking),
            WorkflowStep::Checking => Some(WorkflowStep::Result),
            WorkflowStep::Result => None,
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowStep::Upload => "Upload",
            WorkflowStep::Scanning => "Scanning",
            WorkflowStep::Checking => "Checking",
            WorkflowStep::Result => "Result",
        };
        write!(f, "{}({})", name, self.number())
    }
}

/// Coarse activity indicator paired with the step.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStatus {
    /// Waiting for a file.
    Idle,
    /// A file is staged; waiting for the user to proceed.
    Uploading,
    Scanning,
    Checking,
    Done,
}

/// Current position of the session in the workflow.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowState {
    pub step: WorkflowStep,
    pub status: WorkflowStatus,
}

impl WorkflowState {
    pub fn initial() -> Self {
        Self {
            step: WorkflowStep::Upload,
            status: WorkflowStatus::Idle,
        }
    }

    /// Status a freshly entered step starts with.
    pub fn entering(step: WorkflowStep) -> Self {
        let status = match step {
            WorkflowStep::Upload => WorkflowStatus::Idle,
            WorkflowStep::Scanning => WorkflowStatus::Scanning,
            WorkflowStep::Checking => WorkflowStatus::Checking,
            WorkflowStep::Result => WorkflowStatus::Done,
        };
        Self { step, status }
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::initial()
    }
}

/// The staged checks shown during the Checking step.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    InstitutionalDatabase,
    BlockchainSignature,
    FraudIndicators,
}

impl CheckKind {
    pub const ALL: [CheckKind; 3] = [
        CheckKind::InstitutionalDatabase,
        CheckKind::BlockchainSignature,
        CheckKind::FraudIndicators,
    ];

    /// Text shown once the check completes.
    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::InstitutionalDatabase => "Institutional database verified",
            CheckKind::BlockchainSignature => "Blockchain signature valid",
            CheckKind::FraudIndicators => "No fraud indicators detected",
        }
    }

    fn index(&self) -> usize {
        match self {
            CheckKind::InstitutionalDatabase => 0,
            CheckKind::BlockchainSignature => 1,
            CheckKind::FraudIndicators => 2,
        }
    }
}

/// Completion flags for the three checks.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Checklist {
    completed: [bool; 3],
}

impl Checklist {
    /// Marks a check complete. Returns `false` if it already was.
    pub fn complete(&mut self, check: CheckKind) -> bool {
        let slot = &mut self.completed[check.index()];
        let changed = !*slot;
        *slot = true;
        changed
    }

    pub fn is_complete(&self, check: CheckKind) -> bool {
        self.completed[check.index()]
    }

    pub fn all_complete(&self) -> bool {
        self.completed.iter().all(|done| *done)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.iter().filter(|done| **done).count()
    }
}
