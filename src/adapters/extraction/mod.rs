//! Extraction gateway adapters.

mod fixed;

pub use fixed::FixedExtractionGateway;
