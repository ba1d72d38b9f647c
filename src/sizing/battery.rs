use std::fmt;

use serde::{Deserialize, Serialize};

use super::SizingResult;

/// Nominal bank voltages a bank can be built at.
pub const VOLTAGES: [u32; 3] = [12, 24, 48];

/// Largest number of batteries in one bank.
pub const MAX_COUNT: u32 = 8;

/// A battery bank feeding the inverter.
///
/// The estimate is linear: usable energy divided by the steady load, with
/// no temperature, ageing or Peukert effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryBank {
    /// Nominal bank voltage (one of [`VOLTAGES`]).
    pub voltage_v: u32,

    /// Capacity of one battery in amp-hours.
    pub capacity_ah: f64,

    /// Number of batteries (1 to [`MAX_COUNT`]).
    pub count: u32,

    /// Usable share of capacity (0.5 to 1.0).
    pub depth_of_discharge: f64,
}

impl Default for BatteryBank {
    fn default() -> Self {
        Self {
            voltage_v: 24,
            capacity_ah: 200.0,
            count: 2,
            depth_of_discharge: 0.8,
        }
    }
}

impl BatteryBank {
    /// Creates a bank.
    ///
    /// # Arguments
    ///
    /// * `voltage_v` - Nominal voltage, one of 12, 24 or 48
    /// * `capacity_ah` - Capacity per battery in Ah (must be > 0)
    /// * `count` - Number of batteries (1..=8)
    /// * `depth_of_discharge` - Usable fraction (0.5..=1.0)
    ///
    /// # Panics
    ///
    /// Panics if any argument is out of range. Scenario files go through
    /// [`crate::config::ScenarioConfig::validate`] instead.
    pub fn new(voltage_v: u32, capacity_ah: f64, count: u32, depth_of_discharge: f64) -> Self {
        assert!(VOLTAGES.contains(&voltage_v));
        assert!(capacity_ah > 0.0);
        assert!((1..=MAX_COUNT).contains(&count));
        assert!((0.5..=1.0).contains(&depth_of_discharge));

        Self {
            voltage_v,
            capacity_ah,
            count,
            depth_of_discharge,
        }
    }

    /// Usable energy in kWh: `V * Ah * count * dod / 1000`.
    pub fn usable_energy_kwh(&self) -> f64 {
        f64::from(self.voltage_v) * self.capacity_ah * f64::from(self.count) * self.depth_of_discharge
            / 1000.0
    }

    /// Hours of backup at a steady `load_w`, one decimal. `None` without load.
    pub fn backup_hours(&self, load_w: f64) -> Option<f64> {
        if load_w <= 0.0 {
            return None;
        }
        let hours = self.usable_energy_kwh() / (load_w / 1000.0);
        Some((hours * 10.0).round() / 10.0)
    }

    /// Backup estimate for the steady load of a sizing run.
    pub fn estimate(&self, result: &SizingResult) -> BackupEstimate {
        BackupEstimate {
            usable_energy_kwh: (self.usable_energy_kwh() * 100.0).round() / 100.0,
            backup_hours: self.backup_hours(result.total_load_w as f64),
        }
    }
}

/// Battery figures reported next to the sizing result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackupEstimate {
    pub usable_energy_kwh: f64,
    pub backup_hours: Option<f64>,
}

impl fmt::Display for BackupEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Battery Backup ---")?;
        write!(f, "Usable energy:         {:.2} kWh", self.usable_energy_kwh)?;
        match self.backup_hours {
            Some(hours) => write!(f, "\nEstimated backup:      {hours:.1} h"),
            None => write!(f, "\nEstimated backup:      n/a (no load)"),
        }
    }
}
