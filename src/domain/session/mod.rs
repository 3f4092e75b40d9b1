//! Interview session aggregate.

mod aggregate;
mod errors;
mod history;

pub use aggregate::{PropertyKind, Session};
pub use errors::EntityError;
pub use history::{HistoryEntry, ResponseSummary};
