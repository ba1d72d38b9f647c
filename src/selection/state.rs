//! Selection state: what the user has switched on.
//!
//! Only [`super::SelectionManager`] mutates this value. The "active" flag of
//! a variant-bearing appliance is never stored; it is computed from the
//! variant list on every read.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{Catalog, CatalogItem};

/// Quantity of one selected variant. Entries at zero are pruned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantSelection {
    pub variant_id: String,
    pub quantity: u32,
}

/// A user-declared load outside the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomEquipment {
    pub id: String,
    pub name: String,
    pub wattage_w: f64,
    pub quantity: u32,
}

/// Per-appliance quantities, per-variant quantities and custom equipment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionState {
    quantities: BTreeMap<String, u32>,
    variant_selections: BTreeMap<String, Vec<VariantSelection>>,
    custom_equipment: Vec<CustomEquipment>,
    #[serde(skip)]
    next_custom_id: u64,
}

impl SelectionState {
    /// The initial, all-zero state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Nothing selected and no custom equipment.
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
            && self.variant_selections.is_empty()
            && self.custom_equipment.is_empty()
    }

    /// Stored quantity of a non-variant appliance.
    pub fn quantity(&self, appliance_id: &str) -> u32 {
        self.quantities.get(appliance_id).copied().unwrap_or(0)
    }

    /// Non-variant quantities with nonzero values.
    pub fn quantities(&self) -> impl Iterator<Item = (&str, u32)> {
        self.quantities.iter().map(|(id, q)| (id.as_str(), *q))
    }

    /// Selected variants of `parent_id`, in selection order.
    pub fn variant_selections(&self, parent_id: &str) -> &[VariantSelection] {
        self.variant_selections
            .get(parent_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn variant_quantity(&self, parent_id: &str, variant_id: &str) -> u32 {
        self.variant_selections(parent_id)
            .iter()
            .find(|s| s.variant_id == variant_id)
            .map_or(0, |s| s.quantity)
    }

    /// Derived flag: any variant of `parent_id` has quantity > 0.
    pub fn is_parent_active(&self, parent_id: &str) -> bool {
        self.variant_selections(parent_id)
            .iter()
            .any(|s| s.quantity > 0)
    }

    pub fn custom_equipment(&self) -> &[CustomEquipment] {
        &self.custom_equipment
    }

    /// Quantity as the presentation layer sees it: the stored value for plain
    /// appliances, the derived 0/1 flag for variant-bearing ones.
    pub fn appliance_quantity(&self, catalog: &Catalog, appliance_id: &str) -> u32 {
        match catalog.appliance(appliance_id) {
            Some(a) if a.has_variants => u32::from(self.is_parent_active(appliance_id)),
            Some(_) => self.quantity(appliance_id),
            None => 0,
        }
    }

    /// Whether an appliance or variant id is currently on.
    pub fn is_active(&self, catalog: &Catalog, id: &str) -> bool {
        match catalog.item(id) {
            Some(CatalogItem::Appliance(a)) => self.appliance_quantity(catalog, &a.id) > 0,
            Some(CatalogItem::Variant { variant, parent }) => {
                self.variant_quantity(&parent.id, &variant.id) > 0
            }
            None => false,
        }
    }

    /// Active heavy-duty ids: plain appliances first (catalog order), then
    /// selected variants of heavy-duty parents.
    pub fn active_heavy_duty_ids(&self, catalog: &Catalog) -> Vec<String> {
        let heavy = || catalog.appliances().iter().filter(|a| a.heavy_duty);
        let mut ids: Vec<String> = heavy()
            .filter(|a| !a.has_variants && self.quantity(&a.id) > 0)
            .map(|a| a.id.clone())
            .collect();
        for parent in heavy().filter(|a| a.has_variants) {
            ids.extend(
                self.variant_selections(&parent.id)
                    .iter()
                    .filter(|s| s.quantity > 0)
                    .map(|s| s.variant_id.clone()),
            );
        }
        ids
    }

    /// Display names matching [`Self::active_heavy_duty_ids`].
    pub fn active_heavy_duty_names(&self, catalog: &Catalog) -> Vec<String> {
        self.active_heavy_duty_ids(catalog)
            .iter()
            .filter_map(|id| catalog.display_name(id))
            .collect()
    }

    pub fn has_heavy_duty(&self, catalog: &Catalog) -> bool {
        !self.active_heavy_duty_ids(catalog).is_empty()
    }

    /// A solo-only appliance or variant is on.
    pub fn solo_active(&self, catalog: &Catalog) -> bool {
        self.active_heavy_duty_ids(catalog)
            .iter()
            .any(|id| catalog.is_solo_only(id))
    }

    pub fn fans_active(&self, catalog: &Catalog) -> bool {
        catalog.fan_ids().any(|id| self.is_active(catalog, id))
    }

    /// Active plain appliances + active variant entries + custom items.
    pub fn active_count(&self) -> usize {
        let variants: usize = self
            .variant_selections
            .values()
            .map(|list| list.iter().filter(|s| s.quantity > 0).count())
            .sum();
        self.quantities.values().filter(|q| **q > 0).count()
            + variants
            + self.custom_equipment.len()
    }

    pub(crate) fn set_quantity(&mut self, appliance_id: &str, quantity: u32) {
        if quantity == 0 {
            self.quantities.remove(appliance_id);
        } else {
            self.quantities.insert(appliance_id.to_string(), quantity);
        }
    }

    pub(crate) fn set_variant_quantity(&mut self, parent_id: &str, variant_id: &str, quantity: u32) {
        let list = self
            .variant_selections
            .entry(parent_id.to_string())
            .or_default();
        match list.iter_mut().find(|s| s.variant_id == variant_id) {
            Some(existing) => existing.quantity = quantity,
            None if quantity > 0 => list.push(VariantSelection {
                variant_id: variant_id.to_string(),
                quantity,
            }),
            None => {}
        }
        list.retain(|s| s.quantity > 0);
        if list.is_empty() {
            self.variant_selections.remove(parent_id);
        }
    }

    pub(crate) fn clear_variants(&mut self, parent_id: &str) {
        self.variant_selections.remove(parent_id);
    }

    /// Zeroes an appliance or variant id.
    pub(crate) fn deactivate(&mut self, catalog: &Catalog, id: &str) {
        match catalog.item(id) {
            Some(CatalogItem::Appliance(a)) if a.has_variants => self.clear_variants(&a.id),
            Some(CatalogItem::Appliance(a)) => self.set_quantity(&a.id, 0),
            Some(CatalogItem::Variant { variant, parent }) => {
                self.set_variant_quantity(&parent.id, &variant.id, 0);
            }
            None => {}
        }
    }

    pub(crate) fn push_custom(&mut self, name: &str, wattage_w: f64, quantity: u32) -> String {
        self.next_custom_id += 1;
        let id = format!("custom-{}", self.next_custom_id);
        self.custom_equipment.push(CustomEquipment {
            id: id.clone(),
            name: name.to_string(),
            wattage_w,
            quantity,
        });
        id
    }

    /// Returns `false` if no item has this id.
    pub(crate) fn remove_custom(&mut self, id: &str) -> bool {
        let before = self.custom_equipment.len();
        self.custom_equipment.retain(|c| c.id != id);
        self.custom_equipment.len() != before
    }

    /// Returns `false` if no item has this id.
    pub(crate) fn set_custom_quantity(&mut self, id: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove_custom(id);
        }
        match self.custom_equipment.iter_mut().find(|c| c.id == id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities_skip_zeroed_entries() {
        let mut state = SelectionState::new();
        state.set_quantity("ceiling_fan", 2);
        state.set_quantity("laptop", 1);
        state.set_quantity("laptop", 0);
        let listed: Vec<(&str, u32)> = state.quantities().collect();
        assert_eq!(listed, vec![("ceiling_fan", 2)]);
    }

    #[test]
    fn has_heavy_duty_counts_appliances_and_variants() {
        let catalog = Catalog::builtin();
        let mut state = SelectionState::new();
        state.set_quantity("ceiling_fan", 3);
        assert!(!state.has_heavy_duty(&catalog));

        state.set_variant_quantity("refrigerator", "mini_fridge", 1);
        assert!(state.has_heavy_duty(&catalog));
        state.set_variant_quantity("refrigerator", "mini_fridge", 0);
        assert!(!state.has_heavy_duty(&catalog));

        state.set_quantity("toaster", 1);
        assert!(state.has_heavy_duty(&catalog));
    }

    #[test]
    fn new_state_is_empty() {
        let state = SelectionState::new();
        assert!(state.is_empty());
        assert_eq!(state.active_count(), 0);
    }

    #[test]
    fn variant_list_prunes_zero_entries() {
        let mut state = SelectionState::new();
        state.set_variant_quantity("led_bulb", "led_10w", 3);
        state.set_variant_quantity("led_bulb", "led_20w", 1);
        state.set_variant_quantity("led_bulb", "led_10w", 0);
        assert_eq!(
            state.variant_selections("led_bulb"),
            &[VariantSelection {
                variant_id: "led_20w".to_string(),
                quantity: 1
            }]
        );
        state.set_variant_quantity("led_bulb", "led_20w", 0);
        assert!(state.is_empty());
    }

    #[test]
    fn parent_flag_is_derived_from_variants() {
        let catalog = Catalog::builtin();
        let mut state = SelectionState::new();
        assert_eq!(state.appliance_quantity(&catalog, "led_tv"), 0);
        state.set_variant_quantity("led_tv", "tv_32", 2);
        state.set_variant_quantity("led_tv", "tv_55", 1);
        assert_eq!(state.appliance_quantity(&catalog, "led_tv"), 1);
        assert!(state.is_active(&catalog, "led_tv"));
        assert!(state.is_active(&catalog, "tv_55"));
        assert!(!state.is_active(&catalog, "tv_75"));
    }

    #[test]
    fn heavy_duty_ids_list_plain_appliances_before_variants() {
        let catalog = Catalog::builtin();
        let mut state = SelectionState::new();
        state.set_variant_quantity("refrigerator", "mini_fridge", 1);
        state.set_quantity("washing_machine", 1);
        state.set_quantity("ceiling_fan", 2);
        assert_eq!(
            state.active_heavy_duty_ids(&catalog),
            vec!["washing_machine".to_string(), "mini_fridge".to_string()]
        );
        assert_eq!(
            state.active_heavy_duty_names(&catalog),
            vec![
                "Washing Machine".to_string(),
                "Refrigerator Mini Fridge".to_string()
            ]
        );
    }

    #[test]
    fn active_count_includes_variants_and_custom() {
        let mut state = SelectionState::new();
        state.set_quantity("laptop", 2);
        state.set_variant_quantity("led_bulb", "led_10w", 4);
        state.set_variant_quantity("led_bulb", "led_15w", 1);
        state.push_custom("Aquarium pump", 25.0, 1);
        assert_eq!(state.active_count(), 4);
    }

    #[test]
    fn custom_ids_are_sequential() {
        let mut state = SelectionState::new();
        assert_eq!(state.push_custom("A", 10.0, 1), "custom-1");
        assert_eq!(state.push_custom("B", 10.0, 1), "custom-2");
        assert!(state.remove_custom("custom-1"));
        assert!(!state.remove_custom("custom-1"));
        assert!(state.set_custom_quantity("custom-2", 0));
        assert!(state.custom_equipment().is_empty());
    }
}
