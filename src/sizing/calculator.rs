//! Load and inverter sizing over a selection snapshot.

use std::fmt;

use serde::{Serialize, Serializer};

use super::SizingConstants;
use crate::catalog::{Catalog, CatalogItem};
use crate::selection::SelectionState;

/// Where a load line comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSource {
    Appliance,
    Variant,
    Custom,
}

impl LoadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appliance => "appliance",
            Self::Variant => "variant",
            Self::Custom => "custom",
        }
    }
}

/// One active entry of the load table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadLine {
    pub kind: LoadSource,
    pub id: String,
    pub name: String,
    pub wattage_w: f64,
    /// Custom equipment carries no surge and reports 1.
    pub surge: f64,
    pub quantity: u32,
    pub total_w: f64,
}

impl LoadLine {
    /// Startup watts above the running draw; `None` when the item has no surge.
    fn surge_candidate_w(&self) -> Option<f64> {
        (self.kind != LoadSource::Custom && self.surge > 1.0)
            .then(|| self.wattage_w * (self.surge - 1.0) * f64::from(self.quantity))
    }
}

/// An active heavy-duty item, labelled for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveItem {
    pub id: String,
    pub name: String,
}

/// Advisory conditions raised by a sizing run, in evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    AcWithRefrigeration,
    HeatingReducesBackup,
    HighMotorStartup,
    /// Message of a matched avoid-combination entry.
    AvoidCombination(String),
    /// Name of an active solo-only item.
    SoloReminder(String),
    CustomEstimate,
    Undersized { required_kva: f64, largest_kva: f64 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AcWithRefrigeration => {
                f.write_str("Running AC and refrigerator together increases load significantly.")
            }
            Self::HeatingReducesBackup => {
                f.write_str("Heating appliances significantly reduce battery backup time.")
            }
            Self::HighMotorStartup => f.write_str(
                "High motor startup load detected. Consider a higher inverter capacity.",
            ),
            Self::AvoidCombination(message) => f.write_str(message),
            Self::SoloReminder(name) => {
                write!(f, "{name} should be used alone for optimal performance.")
            }
            Self::CustomEstimate => f.write_str(
                "Custom equipment wattage values are estimates. Verify with manufacturer specs.",
            ),
            Self::Undersized {
                required_kva,
                largest_kva,
            } => write!(
                f,
                "Required {required_kva:.2} kVA exceeds the largest inverter size ({largest_kva} kVA). \
                 Consider splitting the load."
            ),
        }
    }
}

impl Serialize for Warning {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of [`calculate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizingResult {
    /// Steady running load (W).
    pub total_load_w: u64,
    /// Largest single surge candidate (W).
    pub peak_surge_w: u64,
    /// Peak surge after the diversity factor (W).
    pub adjusted_surge_w: u64,
    /// Load plus adjusted surge, with safety margin (W).
    pub required_power_w: u64,
    /// Required apparent power, two decimals.
    pub required_kva: f64,
    /// Smallest bracket covering `required_kva`, saturated at the largest.
    pub recommended_inverter_kva: f64,
    /// `required_kva` exceeds every bracket.
    pub undersized: bool,
    pub warnings: Vec<Warning>,
    pub recommendations: Vec<String>,
    pub active_heavy_duty: Vec<ActiveItem>,
    pub load_lines: Vec<LoadLine>,
}

impl SizingResult {
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round_w(x: f64) -> u64 {
    x.max(0.0).round() as u64
}

/// Active load table: plain appliances in catalog order, then selected
/// variants per parent, then custom equipment.
pub fn load_lines(catalog: &Catalog, state: &SelectionState) -> Vec<LoadLine> {
    let mut lines = Vec::new();
    for appliance in catalog.appliances() {
        if !appliance.has_variants {
            let quantity = state.quantity(&appliance.id);
            if quantity > 0 {
                lines.push(LoadLine {
                    kind: LoadSource::Appliance,
                    id: appliance.id.clone(),
                    name: appliance.name.clone(),
                    wattage_w: appliance.wattage_w,
                    surge: appliance.surge,
                    quantity,
                    total_w: appliance.wattage_w * f64::from(quantity),
                });
            }
            continue;
        }
        for selection in state.variant_selections(&appliance.id) {
            let Some(CatalogItem::Variant { variant, parent }) = catalog.item(&selection.variant_id)
            else {
                continue;
            };
            if selection.quantity == 0 {
                continue;
            }
            lines.push(LoadLine {
                kind: LoadSource::Variant,
                id: variant.id.clone(),
                name: format!("{} {}", parent.name, variant.label),
                wattage_w: variant.wattage_w,
                surge: variant.surge,
                quantity: selection.quantity,
                total_w: variant.wattage_w * f64::from(selection.quantity),
            });
        }
    }
    for custom in state.custom_equipment() {
        lines.push(LoadLine {
            kind: LoadSource::Custom,
            id: custom.id.clone(),
            name: custom.name.clone(),
            wattage_w: custom.wattage_w,
            surge: 1.0,
            quantity: custom.quantity,
            total_w: custom.wattage_w * f64::from(custom.quantity),
        });
    }
    lines
}

/// Name used in solo reminders: variants read "<label> <parent>".
fn solo_name(catalog: &Catalog, id: &str) -> Option<String> {
    match catalog.item(id)? {
        CatalogItem::Appliance(a) => Some(a.name.clone()),
        CatalogItem::Variant { variant, parent } => {
            Some(format!("{} {}", variant.label, parent.name))
        }
    }
}

/// Sizes the inverter for `state`. Pure: equal inputs give equal results.
pub fn calculate(
    catalog: &Catalog,
    state: &SelectionState,
    constants: &SizingConstants,
) -> SizingResult {
    let lines = load_lines(catalog, state);

    let total_load: f64 = lines.iter().map(|l| l.total_w).sum();
    let peak_surge = lines
        .iter()
        .filter_map(LoadLine::surge_candidate_w)
        .fold(0.0_f64, f64::max);
    let adjusted_surge = peak_surge * constants.surge_diversity;
    let required_power = (total_load + adjusted_surge) * constants.safety_margin;
    let required_kva = required_power / (1000.0 * constants.power_factor);

    let largest = constants.largest_bracket().unwrap_or(0.0);
    let recommended = constants.bracket_for(required_kva).unwrap_or(0.0);
    let undersized = required_kva > largest;

    let heavy_ids = state.active_heavy_duty_ids(catalog);

    let mut warnings = Vec::new();
    let has_ac = heavy_ids.iter().any(|id| catalog.is_air_conditioning(id));
    let has_fridge = heavy_ids.iter().any(|id| catalog.is_refrigeration(id));
    if has_ac && has_fridge {
        warnings.push(Warning::AcWithRefrigeration);
    }
    if lines.iter().any(|l| catalog.is_heating(&l.id)) {
        warnings.push(Warning::HeatingReducesBackup);
    }
    if adjusted_surge > total_load * constants.motor_startup_ratio {
        warnings.push(Warning::HighMotorStartup);
    }
    for combo in catalog.avoid_combinations() {
        let matched = match combo.ids.as_slice() {
            [single] => heavy_ids.len() > 1 && heavy_ids.contains(single),
            ids => ids.len() > 1 && ids.iter().all(|id| heavy_ids.contains(id)),
        };
        if matched {
            warnings.push(Warning::AvoidCombination(combo.warning.clone()));
        }
    }
    warnings.extend(
        heavy_ids
            .iter()
            .filter(|id| catalog.is_solo_only(id))
            .filter_map(|id| solo_name(catalog, id))
            .map(Warning::SoloReminder),
    );
    if !state.custom_equipment().is_empty() {
        warnings.push(Warning::CustomEstimate);
    }
    if undersized {
        warnings.push(Warning::Undersized {
            required_kva: round2(required_kva),
            largest_kva: largest,
        });
    }

    let mut recommendations = Vec::new();
    if total_load > 0.0 {
        recommendations.push(format!(
            "Recommended inverter: {recommended} kVA for optimal performance"
        ));
        if let Some(line) = lines
            .iter()
            .find(|l| l.kind != LoadSource::Custom && l.surge >= constants.high_surge_multiplier)
        {
            recommendations.push(format!(
                "{} has high startup surge. Ensure inverter can handle {:.1} kW peak.",
                line.name,
                line.wattage_w * line.surge / 1000.0
            ));
        }
        if required_kva > constants.ventilation_kva {
            recommendations
                .push("Large load detected - ensure proper ventilation for inverter".to_string());
        }
    }

    let active_heavy_duty = heavy_ids
        .iter()
        .filter_map(|id| {
            catalog.display_name(id).map(|name| ActiveItem {
                id: id.clone(),
                name,
            })
        })
        .collect();

    SizingResult {
        total_load_w: round_w(total_load),
        peak_surge_w: round_w(peak_surge),
        adjusted_surge_w: round_w(adjusted_surge),
        required_power_w: round_w(required_power),
        required_kva: round2(required_kva),
        recommended_inverter_kva: recommended,
        undersized,
        warnings,
        recommendations,
        active_heavy_duty,
        load_lines: lines,
    }
}

impl fmt::Display for SizingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Sizing Report ---")?;
        for line in &self.load_lines {
            writeln!(
                f,
                "  {:<32} {:>3} x {:>7.0} W = {:>7.0} W",
                line.name, line.quantity, line.wattage_w, line.total_w
            )?;
        }
        writeln!(f, "Total load:            {} W", self.total_load_w)?;
        writeln!(
            f,
            "Peak surge:            {} W (adjusted {} W)",
            self.peak_surge_w, self.adjusted_surge_w
        )?;
        writeln!(f, "Required power:        {} W", self.required_power_w)?;
        writeln!(f, "Required capacity:     {:.2} kVA", self.required_kva)?;
        write!(
            f,
            "Recommended inverter:  {} kVA",
            self.recommended_inverter_kva
        )?;
        if self.undersized {
            write!(f, " (undersized)")?;
        }
        if !self.active_heavy_duty.is_empty() {
            let names: Vec<&str> = self.active_heavy_duty.iter().map(|i| i.name.as_str()).collect();
            write!(f, "\nHeavy-duty active:     {}", names.join(", "))?;
        }
        for warning in &self.warnings {
            write!(f, "\nWarning: {warning}")?;
        }
        for recommendation in &self.recommendations {
            write!(f, "\nTip: {recommendation}")?;
        }
        Ok(())
    }
}
