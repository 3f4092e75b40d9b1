//! Shared domain primitives.

mod errors;
mod fields;
mod ids;
mod step_name;
mod timestamp;

pub use errors::{StaleRequestError, ValidationError};
pub use fields::{FieldMap, FieldValue, RawFieldMap};
pub use ids::SessionId;
pub use step_name::StepName;
pub use timestamp::Timestamp;
