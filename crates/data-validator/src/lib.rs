//! Payload Validation
//!
//! Validates loosely typed JSON payloads once, at the boundary, producing the
//! strongly typed requests the feature pipeline works on.

mod coerce;
mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{CycleRequest, ValidationConfig, Validator};
