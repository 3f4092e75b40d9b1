//! Application layer: the operations exposed to whatever hosts the engine.

pub mod handlers;
pub mod session_locks;

pub use session_locks::SessionLockRegistry;
