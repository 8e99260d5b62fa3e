//! Payload Validator

use crate::coerce::{describe, to_f64, to_id, to_integer};
use crate::error::ValidationError;
use feature_engine::{FeatureVector, Sample, FEATURE_DIMENSION, FEATURE_NAMES, MIN_CYCLE_SAMPLES};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Minimum raw samples per cycle
    pub min_samples: usize,
    /// Smallest accepted cycle index
    pub min_cycle_index: i64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_samples: MIN_CYCLE_SAMPLES,
            min_cycle_index: 1,
        }
    }
}

/// One validated charge/discharge cycle reported by a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRequest {
    pub device_id: String,
    pub cycle_index: u64,
    /// Commanded current `i_set_a` (A)
    pub commanded_current: f64,
    pub samples: Vec<Sample>,
}

/// Validator for incoming payloads
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a raw cycle ingestion payload
    ///
    /// Expected shape:
    /// `{"device_id": .., "cycle_index": .., "i_set_a": .., "samples": [{"t_ms": .., "v": .., "i": ..}]}`
    pub fn validate_cycle(&self, payload: &Value) -> Result<CycleRequest, ValidationError> {
        let body = as_object(payload, "payload")?;

        let raw_id = required(body, "device_id")?;
        let device_id = to_id(raw_id).ok_or_else(|| invalid("device_id", raw_id))?;
        if device_id.trim().is_empty() {
            return Err(ValidationError::InvalidFormat(
                "device_id must not be empty".to_string(),
            ));
        }

        let raw_index = required(body, "cycle_index")?;
        let cycle_index = to_integer(raw_index).ok_or_else(|| invalid("cycle_index", raw_index))?;
        if cycle_index < self.config.min_cycle_index {
            return Err(ValidationError::BelowMinimum {
                field: "cycle_index".to_string(),
                value: cycle_index as f64,
                min: self.config.min_cycle_index as f64,
            });
        }

        let raw_current = required(body, "i_set_a")?;
        let commanded_current = to_f64(raw_current).ok_or_else(|| invalid("i_set_a", raw_current))?;

        let raw_samples = match required(body, "samples")? {
            Value::Array(items) => items,
            other => return Err(invalid("samples", other)),
        };
        if raw_samples.len() < self.config.min_samples {
            return Err(ValidationError::TooFewSamples {
                required: self.config.min_samples,
                actual: raw_samples.len(),
            });
        }

        let samples = raw_samples
            .iter()
            .enumerate()
            .map(|(idx, item)| self.validate_sample(idx, item))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Validated cycle {} for device {} ({} samples)",
            cycle_index,
            device_id,
            samples.len()
        );

        Ok(CycleRequest {
            device_id,
            cycle_index: cycle_index as u64,
            commanded_current,
            samples,
        })
    }

    fn validate_sample(&self, idx: usize, item: &Value) -> Result<Sample, ValidationError> {
        let field = |name: &str| format!("samples[{idx}].{name}");
        let obj = item
            .as_object()
            .ok_or_else(|| invalid(&format!("samples[{idx}]"), item))?;

        let raw_t = obj
            .get("t_ms")
            .ok_or_else(|| ValidationError::MissingField(field("t_ms")))?;
        let time_ms = to_f64(raw_t).ok_or_else(|| invalid(&field("t_ms"), raw_t))?;
        if time_ms < 0.0 {
            return Err(ValidationError::BelowMinimum {
                field: field("t_ms"),
                value: time_ms,
                min: 0.0,
            });
        }

        let raw_v = obj
            .get("v")
            .ok_or_else(|| ValidationError::MissingField(field("v")))?;
        let voltage = to_f64(raw_v).ok_or_else(|| invalid(&field("v"), raw_v))?;

        let current = match obj.get("i") {
            None | Some(Value::Null) => None,
            Some(raw_i) => Some(to_f64(raw_i).ok_or_else(|| invalid(&field("i"), raw_i))?),
        };

        Ok(Sample {
            time_ms,
            voltage,
            current,
        })
    }

    /// Validate a named feature mapping and order it as the model expects
    pub fn validate_features(&self, payload: &Value) -> Result<FeatureVector, ValidationError> {
        let body = as_object(payload, "payload")?;
        let features = as_object(required(body, "features")?, "features")?;

        let mut values = [0.0; FEATURE_DIMENSION];
        for (slot, &name) in values.iter_mut().zip(FEATURE_NAMES.iter()) {
            let raw = features
                .get(name)
                .ok_or(ValidationError::MissingFeature(name))?;
            *slot = to_f64(raw).ok_or_else(|| ValidationError::InvalidFeature {
                name,
                value: describe(raw),
            })?;
        }

        Ok(FeatureVector::new(values))
    }
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::InvalidFormat(format!("{what} must be a JSON object")))
}

fn required<'a>(body: &'a Map<String, Value>, name: &str) -> Result<&'a Value, ValidationError> {
    body.get(name)
        .ok_or_else(|| ValidationError::MissingField(name.to_string()))
}

fn invalid(field: &str, value: &Value) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: describe(value),
    }
}
