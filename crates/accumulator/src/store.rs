//! Keyed Accumulator Store

use crate::stats::{PowerLawFit, PowerLawStats};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info};

type DeviceCell = Arc<Mutex<PowerLawStats>>;

/// Process-wide accumulator keyed by device id.
///
/// Each device owns its own mutex, so updates for one device are serialized
/// while different devices only share the brief map lookup.
#[derive(Debug, Default)]
pub struct AccumulatorStore {
    devices: RwLock<HashMap<String, DeviceCell>>,
}

impl AccumulatorStore {
    /// Create an empty store
    pub fn new() -> Self {
        info!("Creating in-memory accumulator store");
        Self::default()
    }

    fn cell(&self, device_id: &str) -> DeviceCell {
        if let Some(cell) = self
            .devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(device_id)
        {
            return Arc::clone(cell);
        }

        let mut devices = self.devices.write().unwrap_or_else(PoisonError::into_inner);
        let cell = devices.entry(device_id.to_string()).or_insert_with(|| {
            info!("Tracking new device {}", device_id);
            Arc::default()
        });
        Arc::clone(cell)
    }

    /// Accumulate one cycle for `device_id` and return the refreshed fit,
    /// which includes this cycle.
    pub fn update(&self, device_id: &str, cycle_index: u64, f3: f64) -> PowerLawFit {
        let cell = self.cell(device_id);
        // a poisoned cell still holds a whole record, push never panics half-way
        let mut stats = cell.lock().unwrap_or_else(PoisonError::into_inner);
        stats.push(cycle_index, f3);
        let fit = stats.solve();

        debug!(
            "Device {} cycle {}: n={}, a={:.6}, b={:.6}",
            device_id, cycle_index, fit.cycles, fit.a, fit.b
        );
        fit
    }

    /// Current fit of a device without mutating it
    pub fn snapshot(&self, device_id: &str) -> Option<PowerLawFit> {
        let cell = self
            .devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(device_id)
            .cloned()?;
        let stats = cell.lock().unwrap_or_else(PoisonError::into_inner);
        stats.fit()
    }

    /// Number of devices seen since startup
    pub fn device_count(&self) -> usize {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
