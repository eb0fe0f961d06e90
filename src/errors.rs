// src/errors.rs
//! Error types for the verification workflow.
//!
//! Every variant is locally recoverable: the caller reports it to the user,
//! who re-uploads or resets and tries again. Nothing here is retried
//! automatically.

use crate::models::workflow::WorkflowStep;
use thiserror::Error;

/// Why the upload gate refused a file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// Declared MIME type is not one of PDF, JPEG, JPG or PNG.
    #[error("unsupported file type '{declared}': upload a PDF, JPG, or PNG file")]
    UnsupportedType {
        /// The MIME type the client declared.
        declared: String,
    },

    /// File exceeds the configured size limit.
    #[error("file is {size_bytes} bytes; the limit is {limit_bytes} bytes")]
    TooLarge {
        /// Size reported by the client.
        size_bytes: u64,
        /// Limit enforced by the gate.
        limit_bytes: u64,
    },
}

/// Errors surfaced by [`WorkflowController`](crate::services::workflow_controller::WorkflowController).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// The submitted file was refused by the upload gate.
    #[error(transparent)]
    Rejected(#[from] RejectionReason),

    /// The requested transition is not allowed from the current step.
    #[error("invalid transition from {from}: {reason}")]
    InvalidTransition {
        /// Step the session was in when the call was made.
        from: WorkflowStep,
        /// What was missing.
        reason: &'static str,
    },
}

impl WorkflowError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::Rejected(RejectionReason::UnsupportedType { .. }) => "UnsupportedType",
            WorkflowError::Rejected(RejectionReason::TooLarge { .. }) => "TooLarge",
            WorkflowError::InvalidTransition { .. } => "InvalidTransition",
        }
    }
}
