//! Unified error surface for the interview operations.

use thiserror::Error;

use crate::domain::foundation::{SessionId, StaleRequestError, ValidationError};
use crate::domain::workflow::EngineError;
use crate::ports::{ExtractionError, StoreError};

/// Everything an interview operation can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterviewError {
    #[error("session {0} was not found")]
    SessionNotFound(SessionId),

    #[error(transparent)]
    Stale(#[from] StaleRequestError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("document extraction failed after {attempts} attempt(s): {error}")]
    Extraction {
        error: ExtractionError,
        /// How many calls were made before giving up.
        attempts: u32,
    },

    #[error("session store failure: {0}")]
    Store(StoreError),
}

impl InterviewError {
    /// True for failures the caller recovers from by resubmitting the same
    /// step (bad answer, stale sequence number, failed upload).
    pub fn is_resubmittable(&self) -> bool {
        matches!(
            self,
            InterviewError::Stale(_)
                | InterviewError::Extraction { .. }
                | InterviewError::Engine(EngineError::Validation(_))
        )
    }

    /// Short message suitable for showing to the interviewee.
    ///
    /// Configuration-class failures never reach this: an inconsistent
    /// definition aborts startup before any session exists.
    pub fn user_message(&self) -> String {
        match self {
            InterviewError::Engine(EngineError::Validation(err)) => {
                format!("That answer was not accepted ({err}). Please answer again.")
            }
            InterviewError::Stale(_) => {
                "The interview has moved on. Please answer the current question.".to_string()
            }
            InterviewError::Extraction { attempts, .. } => format!(
                "The document could not be processed after {attempts} attempt(s). Please try uploading it again."
            ),
            InterviewError::SessionNotFound(_) => {
                "This interview no longer exists. Please start a new one.".to_string()
            }
            _ => "Something went wrong on our side. Please try again.".to_string(),
        }
    }
}

impl From<StoreError> for InterviewError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => InterviewError::SessionNotFound(id),
            other => InterviewError::Store(other),
        }
    }
}

impl From<ValidationError> for InterviewError {
    fn from(err: ValidationError) -> Self {
        InterviewError::Engine(EngineError::Validation(err))
    }
}
