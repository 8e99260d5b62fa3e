//! Validation Error Types

use thiserror::Error;

/// Errors during payload validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Payload is not shaped as expected
    #[error("invalid payload: {0}")]
    InvalidFormat(String),

    /// Missing required field
    #[error("missing field: {0}")]
    MissingField(String),

    /// Value could not be converted to the expected type
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Value below the allowed minimum
    #[error("{field} value {value} is below the minimum {min}")]
    BelowMinimum { field: String, value: f64, min: f64 },

    /// Not enough raw samples for a cycle
    #[error("too few samples: need at least {required}, got {actual}")]
    TooFewSamples { required: usize, actual: usize },

    /// Named model feature absent from the mapping
    #[error("missing feature: {0}")]
    MissingFeature(&'static str),

    /// Named model feature present but not numeric
    #[error("invalid feature value for {name}: {value}")]
    InvalidFeature { name: &'static str, value: String },
}
