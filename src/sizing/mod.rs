//! Load aggregation, inverter sizing and battery backup estimates.

pub mod battery;
pub mod calculator;

use serde::{Deserialize, Serialize};

pub use battery::{BackupEstimate, BatteryBank};
pub use calculator::{ActiveItem, LoadLine, LoadSource, SizingResult, Warning, calculate};

/// Fixed factors of the sizing heuristic.
///
/// Loaded from the `[sizing]` section of a scenario file; any omitted key
/// keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizingConstants {
    /// Real to apparent power ratio (0, 1].
    pub power_factor: f64,
    /// Multiplier applied to load plus adjusted surge (>= 1).
    pub safety_margin: f64,
    /// Share of the peak surge assumed to coincide with the running load [0, 1].
    pub surge_diversity: f64,
    /// Adjusted surge above this share of total load raises a motor-startup warning.
    pub motor_startup_ratio: f64,
    /// Surge multiplier from which an item earns a startup recommendation.
    pub high_surge_multiplier: f64,
    /// Required kVA above which a ventilation note is added.
    pub ventilation_kva: f64,
    /// Available inverter sizes in kVA, strictly ascending.
    pub inverter_sizes_kva: Vec<f64>,
}

impl Default for SizingConstants {
    fn default() -> Self {
        Self {
            power_factor: 0.8,
            safety_margin: 1.2,
            surge_diversity: 0.5,
            motor_startup_ratio: 0.8,
            high_surge_multiplier: 3.0,
            ventilation_kva: 5.0,
            inverter_sizes_kva: vec![1.5, 2.5, 3.5, 5.0, 7.5, 10.0, 15.0, 20.0],
        }
    }
}

impl SizingConstants {
    /// Smallest bracket >= `required_kva`, saturating at the largest one.
    ///
    /// Returns `None` only when no brackets are configured.
    pub fn bracket_for(&self, required_kva: f64) -> Option<f64> {
        self.inverter_sizes_kva
            .iter()
            .copied()
            .find(|size| *size >= required_kva)
            .or_else(|| self.inverter_sizes_kva.last().copied())
    }

    pub fn largest_bracket(&self) -> Option<f64> {
        self.inverter_sizes_kva.last().copied()
    }
}
