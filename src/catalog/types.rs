//! Reference data types for the appliance catalog.

use serde::Serialize;

/// A catalog appliance.
///
/// Variant-bearing appliances (`has_variants`) carry no load of their own;
/// their wattage and surge come from the selected [`Variant`]s.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appliance {
    /// Unique identifier (e.g. `"ceiling_fan"`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Steady running draw (W, > 0).
    pub wattage_w: f64,
    /// Startup multiplier (>= 1). `wattage_w * surge` is the worst-case startup draw.
    pub surge: f64,
    /// Category identifier, see [`Category`].
    pub category: String,
    /// Subject to the heavy-duty concurrency rules.
    pub heavy_duty: bool,
    /// Must never run alongside another heavy-duty item. Only meaningful if `heavy_duty`.
    pub solo_only: bool,
    /// Selected through a per-appliance variant list.
    pub has_variants: bool,
    /// When `false`, at most one variant may have nonzero quantity.
    pub allow_multiple: bool,
}

impl Appliance {
    /// Builds a light-duty appliance without variants.
    pub fn light(id: &str, name: &str, wattage_w: f64, surge: f64, category: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            wattage_w,
            surge,
            category: category.to_string(),
            heavy_duty: false,
            solo_only: false,
            has_variants: false,
            allow_multiple: true,
        }
    }

    /// Builds a heavy-duty appliance without variants.
    pub fn heavy(id: &str, name: &str, wattage_w: f64, surge: f64, solo_only: bool) -> Self {
        Self {
            heavy_duty: true,
            solo_only,
            ..Self::light(id, name, wattage_w, surge, HEAVY_DUTY_CATEGORY)
        }
    }

    /// Marks the appliance as variant-bearing.
    pub fn with_variants(mut self, allow_multiple: bool) -> Self {
        self.has_variants = true;
        self.allow_multiple = allow_multiple;
        self
    }
}

/// Category id shared by every heavy-duty appliance in the built-in catalog.
pub const HEAVY_DUTY_CATEGORY: &str = "heavy-duty";

/// A sub-model of a variant-bearing appliance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    /// Unique identifier, distinct from every appliance id.
    pub id: String,
    /// Id of the owning appliance.
    pub parent_id: String,
    /// Short label (e.g. `"1.5HP"`).
    pub label: String,
    /// Steady running draw (W).
    pub wattage_w: f64,
    /// Startup multiplier (>= 1).
    pub surge: f64,
}

impl Variant {
    pub fn new(id: &str, parent_id: &str, label: &str, wattage_w: f64, surge: f64) -> Self {
        Self {
            id: id.to_string(),
            parent_id: parent_id.to_string(),
            label: label.to_string(),
            wattage_w,
            surge,
        }
    }
}

/// A display grouping of appliances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// A set of identifiers that should not be active together.
///
/// A single-id entry fires when that id is active alongside any other
/// heavy-duty item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvoidCombination {
    pub ids: Vec<String>,
    pub warning: String,
}

/// Resolved catalog entry for an identifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatalogItem<'a> {
    /// The id names an appliance.
    Appliance(&'a Appliance),
    /// The id names a variant; its parent appliance is carried along.
    Variant {
        variant: &'a Variant,
        parent: &'a Appliance,
    },
}

impl<'a> CatalogItem<'a> {
    /// Identifier of this entry.
    pub fn id(&self) -> &'a str {
        match self {
            Self::Appliance(a) => &a.id,
            Self::Variant { variant, .. } => &variant.id,
        }
    }

    /// The appliance itself, or the parent of a variant.
    pub fn appliance(&self) -> &'a Appliance {
        match self {
            Self::Appliance(a) => a,
            Self::Variant { parent, .. } => parent,
        }
    }

    /// A variant is heavy-duty iff its parent is.
    pub fn is_heavy_duty(&self) -> bool {
        self.appliance().heavy_duty
    }

    /// Human-readable name; variants render as `"<parent> <label>"`.
    pub fn display_name(&self) -> String {
        match self {
            Self::Appliance(a) => a.name.clone(),
            Self::Variant { variant, parent } => format!("{} {}", parent.name, variant.label),
        }
    }
}
