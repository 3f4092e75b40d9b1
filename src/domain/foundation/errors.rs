//! Error types shared across the domain layer.

use thiserror::Error;

/// A response that does not satisfy the current step's accepted shape.
///
/// Validation failures never mutate the session; the caller is expected to
/// resubmit the same step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("response must be one of the offered options, got '{got}'")]
    NotAnOption { offered: Vec<String>, got: String },

    #[error("a {expected} response is required for this step")]
    WrongResponseKind { expected: &'static str },

    #[error("text response cannot be empty")]
    EmptyText,

    #[error("'{got}' is not a valid monetary amount")]
    NotMonetary { got: String },

    #[error("'{got}' is not a recognizable date")]
    NotADate { got: String },

    #[error("'{got}' is not numeric")]
    NotNumeric { got: String },

    #[error("uploaded file is empty")]
    EmptyFile,

    #[error("uploaded file needs a filename")]
    MissingFilename,
}

/// A resubmission carrying a step-sequence number the session has already
/// advanced past. Rejected without mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("stale request: session is at step sequence {current}, request carried {requested}")]
pub struct StaleRequestError {
    /// The session's current step-sequence counter.
    pub current: u64,
    /// The sequence number the request carried.
    pub requested: u64,
}
