//! Charge gauge
//!
//! Charge is measured against caller-supplied wall-clock milliseconds, never
//! the simulation timestep, so the gauge fills at the same rate at any frame rate.

use serde::{Deserialize, Serialize};

use crate::tuning::ChargeTuning;

/// An in-progress charge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerCharge {
    /// Wall-clock time (ms) the charge input went down
    pub start_ms: f64,
    /// Last level sampled by `sample`, in [0, 1]
    pub level: f32,
}

/// Accumulates charge while the input is held
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerGauge {
    charge: Option<PowerCharge>,
}

impl PowerGauge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start charging. Ignored if a charge is already running.
    pub fn begin(&mut self, now_ms: f64) {
        if self.charge.is_some() {
            log::trace!("charge already in progress, ignoring begin");
            return;
        }
        self.charge = Some(PowerCharge {
            start_ms: now_ms,
            level: 0.0,
        });
    }

    pub fn is_charging(&self) -> bool {
        self.charge.is_some()
    }

    /// Current charge level in [0, 1] (0 when idle)
    pub fn level(&self, now_ms: f64, tuning: &ChargeTuning) -> f32 {
        self.charge
            .map(|c| charge_level(c.start_ms, now_ms, tuning.max_charge_ms))
            .unwrap_or(0.0)
    }

    /// Refresh the cached level (for gauge display) and return it
    pub fn sample(&mut self, now_ms: f64, tuning: &ChargeTuning) -> f32 {
        let level = self.level(now_ms, tuning);
        if let Some(charge) = &mut self.charge {
            charge.level = level;
        }
        level
    }

    /// Last sampled level, without consulting the clock
    pub fn cached_level(&self) -> f32 {
        self.charge.map(|c| c.level).unwrap_or(0.0)
    }

    /// Finish the charge and return the jump power in [min_power, 1].
    /// Returns `None` when no charge was running.
    pub fn release(&mut self, now_ms: f64, tuning: &ChargeTuning) -> Option<f32> {
        let charge = self.charge.take()?;
        let level = charge_level(charge.start_ms, now_ms, tuning.max_charge_ms);
        Some(level.clamp(tuning.min_power, 1.0))
    }

    /// Drop any running charge without producing a jump
    pub fn cancel(&mut self) {
        self.charge = None;
    }
}

fn charge_level(start_ms: f64, now_ms: f64, max_charge_ms: f64) -> f32 {
    // Clock going backwards reads as no charge
    let elapsed = (now_ms - start_ms).max(0.0);
    (elapsed / max_charge_ms).min(1.0) as f32
}
