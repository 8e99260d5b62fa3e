//! Per-Device Accumulator
//!
//! Keeps running sufficient statistics per device so that the power-law fit
//! `f3 ≈ a · cycle_index^b` can be refined online without storing history.
//! State is process-local and volatile.

mod stats;
mod store;

pub use stats::{PowerLawFit, PowerLawStats};
pub use store::AccumulatorStore;
