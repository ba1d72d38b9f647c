//! Immutable appliance catalog and variant registry.
//!
//! The catalog only answers lookups. Unknown ids resolve to `None` or an
//! empty slice, never an error.

mod builtin;
pub mod types;

use std::collections::BTreeSet;

use serde::Serialize;

pub use types::{Appliance, AvoidCombination, Category, CatalogItem, Variant};

/// Raw catalog contents, assembled by a catalog provider.
#[derive(Debug, Clone, Default)]
pub struct CatalogData {
    pub categories: Vec<Category>,
    pub appliances: Vec<Appliance>,
    pub variants: Vec<Variant>,
    /// Unordered pairs of heavy-duty ids allowed to run together.
    pub allowed_pairs: Vec<(String, String)>,
    pub avoid_combinations: Vec<AvoidCombination>,
    /// Variant ids that are solo-only even though their parent is not.
    pub solo_variants: Vec<String>,
    /// Appliance ids kept on by the "turn off non-essentials" intent.
    pub essential_ids: Vec<String>,
    /// Appliance ids treated as fans for the AC/fan conflict prompt.
    pub fan_ids: Vec<String>,
    /// Appliance ids whose use shortens battery runtime.
    pub heating_ids: Vec<String>,
    /// Appliance ids (or parents) forming the air-conditioning family.
    pub ac_family: Vec<String>,
    /// Appliance ids (or parents) forming the refrigeration family.
    pub refrigeration_family: Vec<String>,
}

/// Lookup facade over [`CatalogData`].
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    categories: Vec<Category>,
    appliances: Vec<Appliance>,
    variants: Vec<Variant>,
    allowed_pairs: Vec<(String, String)>,
    avoid_combinations: Vec<AvoidCombination>,
    solo_variants: BTreeSet<String>,
    essential_ids: BTreeSet<String>,
    fan_ids: BTreeSet<String>,
    heating_ids: BTreeSet<String>,
    ac_family: BTreeSet<String>,
    refrigeration_family: BTreeSet<String>,
}

impl Catalog {
    pub fn new(data: CatalogData) -> Self {
        Self {
            categories: data.categories,
            appliances: data.appliances,
            variants: data.variants,
            allowed_pairs: data.allowed_pairs,
            avoid_combinations: data.avoid_combinations,
            solo_variants: data.solo_variants.into_iter().collect(),
            essential_ids: data.essential_ids.into_iter().collect(),
            fan_ids: data.fan_ids.into_iter().collect(),
            heating_ids: data.heating_ids.into_iter().collect(),
            ac_family: data.ac_family.into_iter().collect(),
            refrigeration_family: data.refrigeration_family.into_iter().collect(),
        }
    }

    /// The reference household catalog.
    pub fn builtin() -> Self {
        Self::new(builtin::data())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All appliances in catalog order.
    pub fn appliances(&self) -> &[Appliance] {
        &self.appliances
    }

    /// Appliances belonging to `category_id`, in catalog order.
    pub fn appliances_in(&self, category_id: &str) -> impl Iterator<Item = &Appliance> {
        self.appliances
            .iter()
            .filter(move |a| a.category == category_id)
    }

    pub fn appliance(&self, id: &str) -> Option<&Appliance> {
        self.appliances.iter().find(|a| a.id == id)
    }

    pub fn variant(&self, id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == id)
    }

    /// Variants of `parent_id` in catalog order; empty for unknown ids.
    pub fn variants_of<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a Variant> {
        self.variants.iter().filter(move |v| v.parent_id == parent_id)
    }

    /// First listed variant of `parent_id`, used when a parent is switched on directly.
    pub fn default_variant(&self, parent_id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.parent_id == parent_id)
    }

    /// Resolves an appliance or variant id.
    pub fn item(&self, id: &str) -> Option<CatalogItem<'_>> {
        if let Some(appliance) = self.appliance(id) {
            return Some(CatalogItem::Appliance(appliance));
        }
        let variant = self.variant(id)?;
        let parent = self.appliance(&variant.parent_id)?;
        Some(CatalogItem::Variant { variant, parent })
    }

    pub fn is_heavy_duty(&self, id: &str) -> bool {
        self.item(id).is_some_and(|item| item.is_heavy_duty())
    }

    /// Solo-only: a heavy-duty appliance flagged `solo_only`, a variant of
    /// one, or a variant listed in the solo variant set.
    pub fn is_solo_only(&self, id: &str) -> bool {
        match self.item(id) {
            Some(CatalogItem::Appliance(a)) => a.heavy_duty && a.solo_only,
            Some(CatalogItem::Variant { variant, parent }) => {
                parent.heavy_duty && (parent.solo_only || self.solo_variants.contains(&variant.id))
            }
            None => false,
        }
    }

    /// Order-insensitive pair lookup.
    ///
    /// A variant matches table entries naming either itself or its parent.
    pub fn is_allowed_pair(&self, a: &str, b: &str) -> bool {
        let aliases_a = self.aliases(a);
        let aliases_b = self.aliases(b);
        self.allowed_pairs.iter().any(|(x, y)| {
            (aliases_a.contains(&x.as_str()) && aliases_b.contains(&y.as_str()))
                || (aliases_a.contains(&y.as_str()) && aliases_b.contains(&x.as_str()))
        })
    }

    pub fn allowed_pairs(&self) -> &[(String, String)] {
        &self.allowed_pairs
    }

    pub fn avoid_combinations(&self) -> &[AvoidCombination] {
        &self.avoid_combinations
    }

    pub fn is_essential(&self, appliance_id: &str) -> bool {
        self.essential_ids.contains(appliance_id)
    }

    pub fn fan_ids(&self) -> impl Iterator<Item = &str> {
        self.fan_ids.iter().map(String::as_str)
    }

    pub fn is_fan(&self, id: &str) -> bool {
        self.in_family(&self.fan_ids, id)
    }

    pub fn is_heating(&self, id: &str) -> bool {
        self.in_family(&self.heating_ids, id)
    }

    pub fn is_air_conditioning(&self, id: &str) -> bool {
        self.in_family(&self.ac_family, id)
    }

    pub fn is_refrigeration(&self, id: &str) -> bool {
        self.in_family(&self.refrigeration_family, id)
    }

    /// Display name for any id; variants render as `"<parent> <label>"`.
    pub fn display_name(&self, id: &str) -> Option<String> {
        self.item(id).map(|item| item.display_name())
    }

    fn in_family(&self, set: &BTreeSet<String>, id: &str) -> bool {
        self.aliases(id).iter().any(|alias| set.contains(*alias))
    }

    fn aliases<'a>(&'a self, id: &'a str) -> Vec<&'a str> {
        match self.variant(id) {
            Some(v) => vec![id, v.parent_id.as_str()],
            None => vec![id],
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
