//! Adapters implementing the ports.
//!
//! Persistence technology and concrete extraction providers are external
//! concerns; the adapters here are the small set the engine and its tests
//! need: an in-memory store, a JSON-file store, and a canned gateway.

pub mod extraction;
pub mod fs;
pub mod memory;

pub use extraction::FixedExtractionGateway;
pub use fs::JsonFileSessionStore;
pub use memory::InMemorySessionStore;
