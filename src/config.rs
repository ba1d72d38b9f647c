//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::selection::{Intent, IntentOutcome, MAX_CUSTOM_WATTAGE_W, SelectionManager};
use crate::sizing::SizingConstants;
use crate::sizing::battery::{BatteryBank, MAX_COUNT, VOLTAGES};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario except the
/// selection, which starts empty. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Sizing heuristic factors and inverter brackets.
    #[serde(default)]
    pub sizing: SizingConstants,
    /// Battery bank used for the backup estimate.
    #[serde(default)]
    pub battery: BatteryBank,
    /// Intents replayed in order on an empty selection.
    #[serde(default)]
    pub selection: Vec<Intent>,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.voltage_v"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn set(appliance: &str, quantity: i64) -> Intent {
    Intent::SetQuantity {
        appliance: appliance.to_string(),
        quantity,
    }
}

fn variant(appliance: &str, variant: &str, quantity: i64) -> Intent {
    Intent::SetVariantQuantity {
        appliance: appliance.to_string(),
        variant: variant.to_string(),
        quantity,
    }
}

impl ScenarioConfig {
    /// Returns the baseline household: lighting, fans, TV, a fridge and
    /// small electronics on the default battery bank.
    pub fn baseline() -> Self {
        Self {
            selection: vec![
                variant("led_bulb", "led_10w", 6),
                set("ceiling_fan", 2),
                variant("led_tv", "tv_43", 1),
                set("router", 1),
                set("phone_charger", 2),
                variant("refrigerator", "top_bottom_freezer", 1),
            ],
            ..Self::default()
        }
    }

    /// Returns the cooling preset: inverter AC with a mini fridge on a 48 V bank.
    pub fn cooling() -> Self {
        Self {
            battery: BatteryBank {
                voltage_v: 48,
                count: 4,
                ..BatteryBank::default()
            },
            selection: vec![
                variant("led_bulb", "led_10w", 4),
                set("laptop", 1),
                set("router", 1),
                variant("air_conditioner", "ac_15hp_inv", 1),
                variant("refrigerator", "mini_fridge", 1),
            ],
            ..Self::default()
        }
    }

    /// Returns the kitchen preset: a solo microwave with light-duty kitchen loads.
    pub fn kitchen() -> Self {
        Self {
            battery: BatteryBank {
                voltage_v: 12,
                capacity_ah: 220.0,
                count: 4,
                ..BatteryBank::default()
            },
            selection: vec![
                variant("led_bulb", "led_15w", 3),
                set("blender", 1),
                set("microwave", 1),
                Intent::AddCustom {
                    name: "Rice cooker".to_string(),
                    wattage_w: 500.0,
                    quantity: 1,
                },
            ],
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "cooling", "kitchen"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "cooling" => Ok(Self::cooling()),
            "kitchen" => Ok(Self::kitchen()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields against `catalog` and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. Unknown ids in the
    /// selection are reported here even though the manager would ignore them.
    pub fn validate(&self, catalog: &Catalog) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.sizing;

        if !(s.power_factor > 0.0 && s.power_factor <= 1.0) {
            errors.push(ConfigError::new("sizing.power_factor", "must be in (0.0, 1.0]"));
        }
        if s.safety_margin < 1.0 {
            errors.push(ConfigError::new("sizing.safety_margin", "must be >= 1.0"));
        }
        if !(0.0..=1.0).contains(&s.surge_diversity) {
            errors.push(ConfigError::new("sizing.surge_diversity", "must be in [0.0, 1.0]"));
        }
        if s.motor_startup_ratio < 0.0 {
            errors.push(ConfigError::new("sizing.motor_startup_ratio", "must be >= 0"));
        }
        if s.high_surge_multiplier < 1.0 {
            errors.push(ConfigError::new("sizing.high_surge_multiplier", "must be >= 1.0"));
        }
        if s.inverter_sizes_kva.is_empty() {
            errors.push(ConfigError::new("sizing.inverter_sizes_kva", "must not be empty"));
        } else if s.inverter_sizes_kva.iter().any(|kva| *kva <= 0.0)
            || s.inverter_sizes_kva.windows(2).any(|w| w[0] >= w[1])
        {
            errors.push(ConfigError::new(
                "sizing.inverter_sizes_kva",
                "must be positive and strictly ascending",
            ));
        }

        let bat = &self.battery;
        if !VOLTAGES.contains(&bat.voltage_v) {
            errors.push(ConfigError::new(
                "battery.voltage_v",
                format!("must be one of {VOLTAGES:?}, got {}", bat.voltage_v),
            ));
        }
        if bat.capacity_ah <= 0.0 {
            errors.push(ConfigError::new("battery.capacity_ah", "must be > 0"));
        }
        if !(1..=MAX_COUNT).contains(&bat.count) {
            errors.push(ConfigError::new(
                "battery.count",
                format!("must be in [1, {MAX_COUNT}]"),
            ));
        }
        if !(0.5..=1.0).contains(&bat.depth_of_discharge) {
            errors.push(ConfigError::new(
                "battery.depth_of_discharge",
                "must be in [0.5, 1.0]",
            ));
        }

        for (i, intent) in self.selection.iter().enumerate() {
            let field = format!("selection[{i}]");
            match intent {
                Intent::SetQuantity { appliance, .. } if catalog.item(appliance).is_none() => {
                    errors.push(ConfigError::new(
                        format!("{field}.appliance"),
                        format!("unknown appliance \"{appliance}\""),
                    ));
                }
                Intent::SetVariantQuantity {
                    appliance, variant, ..
                } => match catalog.variant(variant) {
                    None => errors.push(ConfigError::new(
                        format!("{field}.variant"),
                        format!("unknown variant \"{variant}\""),
                    )),
                    Some(v) if v.parent_id != *appliance => errors.push(ConfigError::new(
                        format!("{field}.appliance"),
                        format!("variant \"{variant}\" belongs to \"{}\"", v.parent_id),
                    )),
                    Some(_) => {}
                },
                Intent::ForceActivate { id } if catalog.item(id).is_none() => {
                    errors.push(ConfigError::new(
                        format!("{field}.id"),
                        format!("unknown appliance or variant \"{id}\""),
                    ));
                }
                Intent::AddCustom {
                    name,
                    wattage_w,
                    quantity,
                } => {
                    if name.trim().is_empty() {
                        errors.push(ConfigError::new(format!("{field}.name"), "must not be empty"));
                    }
                    if !(*wattage_w > 0.0 && *wattage_w <= MAX_CUSTOM_WATTAGE_W) {
                        errors.push(ConfigError::new(
                            format!("{field}.wattage_w"),
                            format!("must be in (0, {MAX_CUSTOM_WATTAGE_W}]"),
                        ));
                    }
                    if *quantity <= 0 {
                        errors.push(ConfigError::new(format!("{field}.quantity"), "must be > 0"));
                    }
                }
                _ => {}
            }
        }

        errors
    }

    /// Replays the selection on a fresh manager.
    pub fn replay(&self, catalog: Arc<Catalog>) -> (SelectionManager, Vec<IntentOutcome>) {
        let mut manager = SelectionManager::new(catalog);
        let outcomes = manager.apply_all(&self.selection);
        (manager, outcomes)
    }
}
