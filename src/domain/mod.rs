//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `party` - Buyers and sellers, individual or company
//! - `certificate` - Supporting certificates and clearances
//! - `sanitize` - Normalization of raw extracted fields
//! - `session` - Interview session aggregate
//! - `workflow` - Step handlers, transition graph, and the interview engine

pub mod certificate;
pub mod foundation;
pub mod party;
pub mod sanitize;
pub mod session;
pub mod workflow;
