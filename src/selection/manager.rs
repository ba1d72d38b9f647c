//! Single writer of the selection state.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::intent::Intent;
use super::resolver::{Admission, RejectReason, can_activate};
use super::state::SelectionState;
use crate::catalog::{Catalog, CatalogItem};
use crate::sizing::{SizingConstants, SizingResult, calculate};

/// Why an intent left the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum IgnoredReason {
    /// No appliance, variant or custom item has this id.
    UnknownId(String),
    /// The variant does not belong to the named appliance.
    ParentMismatch(String),
    /// Custom equipment needs a name, positive wattage and positive quantity.
    InvalidCustomEquipment,
}

/// What an intent did, so callers can tell "proceed" from "inform".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IntentOutcome {
    /// Applied as requested.
    Applied,
    /// The candidate was rejected by the compatibility rules and replaced
    /// the listed heavy-duty items instead.
    Replaced {
        reason: RejectReason,
        deactivated: Vec<String>,
    },
    /// Activated without consulting the rules. `bypassed` holds the
    /// rejection that was overridden, if there was one.
    Forced { bypassed: Option<RejectReason> },
    /// A custom item was added under this id.
    CustomAdded { id: String },
    /// Nothing changed.
    Ignored { reason: IgnoredReason },
}

impl IntentOutcome {
    fn ignored(reason: IgnoredReason) -> Self {
        Self::Ignored { reason }
    }
}

/// Upper bound on the running wattage of one custom item. Keeps every sizing
/// figure finite whatever the quantity.
pub const MAX_CUSTOM_WATTAGE_W: f64 = 100_000.0;

fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(0)).unwrap_or(u32::MAX)
}

/// Owns the [`SelectionState`] and applies intents to it.
///
/// Heavy-duty selections follow a "last choice wins" policy: a candidate the
/// resolver rejects replaces every other active heavy-duty item. The only
/// way around the rules is [`SelectionManager::force_activate`].
#[derive(Debug, Clone)]
pub struct SelectionManager {
    catalog: Arc<Catalog>,
    state: SelectionState,
}

impl SelectionManager {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            state: SelectionState::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Compatibility check for `id` against the current state.
    pub fn can_activate(&self, id: &str) -> Admission {
        can_activate(&self.catalog, &self.state, id)
    }

    pub fn active_heavy_duty_ids(&self) -> Vec<String> {
        self.state.active_heavy_duty_ids(&self.catalog)
    }

    pub fn solo_active(&self) -> bool {
        self.state.solo_active(&self.catalog)
    }

    /// Sizes the current selection.
    pub fn calculate(&self, constants: &SizingConstants) -> SizingResult {
        calculate(&self.catalog, &self.state, constants)
    }

    /// Dispatches an intent to the matching operation.
    pub fn apply(&mut self, intent: &Intent) -> IntentOutcome {
        debug!(?intent, "applying intent");
        match intent {
            Intent::SetQuantity {
                appliance,
                quantity,
            } => self.set_quantity(appliance, *quantity),
            Intent::SetVariantQuantity {
                appliance,
                variant,
                quantity,
            } => self.set_variant_quantity(appliance, variant, *quantity),
            Intent::ForceActivate { id } => self.force_activate(id),
            Intent::TurnOffNonEssentials => self.bulk_deactivate_non_essentials(),
            Intent::TurnOff { ids } => self.bulk_deactivate(ids.as_slice()),
            Intent::TurnOffFans => self.turn_off_fans(),
            Intent::AddCustom {
                name,
                wattage_w,
                quantity,
            } => self.add_custom_equipment(name, *wattage_w, *quantity),
            Intent::RemoveCustom { id } => self.remove_custom_equipment(id),
            Intent::SetCustomQuantity { id, quantity } => {
                self.set_custom_equipment_quantity(id, *quantity)
            }
            Intent::Reset => self.reset(),
        }
    }

    /// Applies intents in order and collects their outcomes.
    pub fn apply_all<'a>(&mut self, intents: impl IntoIterator<Item = &'a Intent>) -> Vec<IntentOutcome> {
        intents.into_iter().map(|i| self.apply(i)).collect()
    }

    /// Sets an appliance quantity.
    ///
    /// Heavy-duty appliances clamp to 1 and go through admission. For a
    /// variant-bearing appliance, zero clears its variants and a positive
    /// quantity selects the default variant if none is selected yet. A
    /// variant id is forwarded to [`Self::set_variant_quantity`].
    pub fn set_quantity(&mut self, appliance_id: &str, quantity: i64) -> IntentOutcome {
        let catalog = Arc::clone(&self.catalog);
        let Some(appliance) = catalog.appliance(appliance_id) else {
            if let Some(variant) = catalog.variant(appliance_id) {
                return self.set_variant_quantity(&variant.parent_id, appliance_id, quantity);
            }
            warn!(appliance_id, "ignoring quantity change for unknown appliance");
            return IntentOutcome::ignored(IgnoredReason::UnknownId(appliance_id.to_string()));
        };
        let quantity = clamp_quantity(quantity);

        if appliance.has_variants {
            if quantity == 0 {
                self.state.clear_variants(appliance_id);
                return IntentOutcome::Applied;
            }
            if self.state.is_parent_active(appliance_id) {
                return IntentOutcome::Applied;
            }
            return match catalog.default_variant(appliance_id) {
                Some(default) => self.set_variant_quantity(appliance_id, &default.id, 1),
                None => IntentOutcome::ignored(IgnoredReason::UnknownId(appliance_id.to_string())),
            };
        }

        if quantity == 0 || !appliance.heavy_duty {
            self.state.set_quantity(appliance_id, quantity);
            return IntentOutcome::Applied;
        }
        self.admit_heavy_duty(appliance_id)
    }

    /// Sets one variant's quantity and prunes zero entries.
    ///
    /// For a single-select appliance the siblings are zeroed first. Variants
    /// of heavy-duty appliances clamp to 1 and go through admission.
    pub fn set_variant_quantity(
        &mut self,
        appliance_id: &str,
        variant_id: &str,
        quantity: i64,
    ) -> IntentOutcome {
        let catalog = Arc::clone(&self.catalog);
        let Some(CatalogItem::Variant { variant, parent }) = catalog.item(variant_id) else {
            warn!(variant_id, "ignoring quantity change for unknown variant");
            return IntentOutcome::ignored(IgnoredReason::UnknownId(variant_id.to_string()));
        };
        if parent.id != appliance_id {
            warn!(appliance_id, variant_id, "variant belongs to another appliance");
            return IntentOutcome::ignored(IgnoredReason::ParentMismatch(variant_id.to_string()));
        }
        let quantity = clamp_quantity(quantity);

        if quantity == 0 {
            self.state.set_variant_quantity(&parent.id, &variant.id, 0);
            return IntentOutcome::Applied;
        }
        let cleared = if parent.allow_multiple {
            Vec::new()
        } else {
            self.clear_siblings(&parent.id, &variant.id)
        };
        if !parent.heavy_duty {
            self.state
                .set_variant_quantity(&parent.id, &variant.id, quantity);
            return IntentOutcome::Applied;
        }
        if self.state.variant_quantity(&parent.id, &variant.id) > 0 {
            return IntentOutcome::Applied;
        }
        match self.admit_heavy_duty(variant_id) {
            IntentOutcome::Replaced {
                reason,
                deactivated,
            } => IntentOutcome::Replaced {
                reason,
                deactivated: cleared.into_iter().chain(deactivated).collect(),
            },
            outcome => outcome,
        }
    }

    /// Switches `id` on without consulting the compatibility rules and
    /// without switching anything else off.
    ///
    /// A variant-bearing appliance gets its default variant. Single-select
    /// siblings are still replaced, since that is a property of the
    /// appliance and not a compatibility rule.
    pub fn force_activate(&mut self, id: &str) -> IntentOutcome {
        let catalog = Arc::clone(&self.catalog);
        let Some(item) = catalog.item(id) else {
            warn!(id, "ignoring forced activation of unknown id");
            return IntentOutcome::ignored(IgnoredReason::UnknownId(id.to_string()));
        };
        let bypassed = self.can_activate(id).reason();

        match item {
            CatalogItem::Appliance(appliance) if appliance.has_variants => {
                if !self.state.is_parent_active(&appliance.id) {
                    let Some(default) = catalog.default_variant(&appliance.id) else {
                        return IntentOutcome::ignored(IgnoredReason::UnknownId(id.to_string()));
                    };
                    return self.force_activate(&default.id);
                }
            }
            CatalogItem::Appliance(appliance) => {
                if self.state.quantity(&appliance.id) == 0 {
                    self.state.set_quantity(&appliance.id, 1);
                }
            }
            CatalogItem::Variant { variant, parent } => {
                if self.state.variant_quantity(&parent.id, &variant.id) == 0 {
                    if !parent.allow_multiple {
                        self.clear_siblings(&parent.id, &variant.id);
                    }
                    self.state.set_variant_quantity(&parent.id, &variant.id, 1);
                }
            }
        }

        if let Some(reason) = bypassed {
            info!(id, %reason, "compatibility rule overridden by user");
        }
        IntentOutcome::Forced { bypassed }
    }

    /// Switches off every light-duty appliance outside the essential set.
    /// Heavy-duty selections and custom equipment are left alone.
    pub fn bulk_deactivate_non_essentials(&mut self) -> IntentOutcome {
        let catalog = Arc::clone(&self.catalog);
        for appliance in catalog.appliances() {
            if !appliance.heavy_duty && !catalog.is_essential(&appliance.id) {
                self.state.deactivate(&catalog, &appliance.id);
            }
        }
        IntentOutcome::Applied
    }

    /// Switches off every listed appliance or variant; unknown ids are skipped.
    pub fn bulk_deactivate<S: AsRef<str>>(&mut self, ids: &[S]) -> IntentOutcome {
        let catalog = Arc::clone(&self.catalog);
        for id in ids {
            self.state.deactivate(&catalog, id.as_ref());
        }
        IntentOutcome::Applied
    }

    pub fn turn_off_fans(&mut self) -> IntentOutcome {
        let fans: Vec<String> = self.catalog.fan_ids().map(str::to_string).collect();
        self.bulk_deactivate(fans.as_slice())
    }

    pub fn add_custom_equipment(&mut self, name: &str, wattage_w: f64, quantity: i64) -> IntentOutcome {
        let name = name.trim();
        let wattage_ok = wattage_w > 0.0 && wattage_w <= MAX_CUSTOM_WATTAGE_W;
        if name.is_empty() || !wattage_ok || quantity <= 0 {
            warn!(name, wattage_w, quantity, "rejecting invalid custom equipment");
            return IntentOutcome::ignored(IgnoredReason::InvalidCustomEquipment);
        }
        let id = self
            .state
            .push_custom(name, wattage_w, clamp_quantity(quantity));
        IntentOutcome::CustomAdded { id }
    }

    pub fn remove_custom_equipment(&mut self, id: &str) -> IntentOutcome {
        if self.state.remove_custom(id) {
            IntentOutcome::Applied
        } else {
            IntentOutcome::ignored(IgnoredReason::UnknownId(id.to_string()))
        }
    }

    /// A quantity of zero or less removes the entry.
    pub fn set_custom_equipment_quantity(&mut self, id: &str, quantity: i64) -> IntentOutcome {
        if self.state.set_custom_quantity(id, clamp_quantity(quantity)) {
            IntentOutcome::Applied
        } else {
            IntentOutcome::ignored(IgnoredReason::UnknownId(id.to_string()))
        }
    }

    /// Returns to the initial empty selection.
    pub fn reset(&mut self) -> IntentOutcome {
        self.state = SelectionState::new();
        IntentOutcome::Applied
    }

    /// Zeroes every selected variant of `parent_id` except `keep_variant_id`
    /// and returns the ids switched off.
    fn clear_siblings(&mut self, parent_id: &str, keep_variant_id: &str) -> Vec<String> {
        let siblings: Vec<String> = self
            .state
            .variant_selections(parent_id)
            .iter()
            .filter(|s| s.variant_id != keep_variant_id)
            .map(|s| s.variant_id.clone())
            .collect();
        for sibling in &siblings {
            self.state.set_variant_quantity(parent_id, sibling, 0);
        }
        siblings
    }

    /// Switches a heavy-duty candidate on at quantity 1, replacing the
    /// current heavy-duty selection when the resolver rejects it.
    fn admit_heavy_duty(&mut self, candidate_id: &str) -> IntentOutcome {
        let catalog = Arc::clone(&self.catalog);
        let outcome = match can_activate(&catalog, &self.state, candidate_id) {
            Admission::Allowed => IntentOutcome::Applied,
            Admission::Rejected(reason) => {
                let deactivated: Vec<String> = self
                    .state
                    .active_heavy_duty_ids(&catalog)
                    .into_iter()
                    .filter(|id| id != candidate_id)
                    .collect();
                for id in &deactivated {
                    self.state.deactivate(&catalog, id);
                }
                debug!(candidate_id, %reason, ?deactivated, "replacing heavy-duty selection");
                IntentOutcome::Replaced {
                    reason,
                    deactivated,
                }
            }
        };

        match catalog.item(candidate_id) {
            Some(CatalogItem::Variant { variant, parent }) => {
                self.state.set_variant_quantity(&parent.id, &variant.id, 1);
            }
            Some(CatalogItem::Appliance(appliance)) => self.state.set_quantity(&appliance.id, 1),
            None => {}
        }
        outcome
    }
}
