//! Append-only record of applied steps.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StepName, Timestamp};

/// What the user answered, reduced to something safe to persist.
///
/// File uploads keep only the filename; raw bytes never enter the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSummary {
    Choice(String),
    Text(String),
    File { filename: String },
}

/// One applied step: which step, what was answered, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub step: StepName,
    pub response: ResponseSummary,
    pub at: Timestamp,
}

impl HistoryEntry {
    pub fn new(step: StepName, response: ResponseSummary) -> Self {
        Self {
            step,
            response,
            at: Timestamp::now(),
        }
    }
}
