//! Property-based tests for the selection and sizing invariants.
//!
//! Random intent sequences run against the built-in catalog without the
//! override path; every intermediate state must respect the heavy-duty rules.

use std::sync::Arc;

use proptest::prelude::*;

use inverter_sizer::catalog::Catalog;
use inverter_sizer::selection::{Intent, MAX_CONCURRENT_HEAVY_DUTY, SelectionManager, SelectionState};
use inverter_sizer::sizing::{SizingConstants, calculate};

// =============================================================================
// Strategies
// =============================================================================

fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::builtin())
}

/// Every appliance and variant id, plus one id the catalog does not know.
fn all_ids() -> Vec<String> {
    let catalog = Catalog::builtin();
    let mut ids: Vec<String> = catalog.appliances().iter().map(|a| a.id.clone()).collect();
    for parent in catalog.appliances() {
        ids.extend(catalog.variants_of(&parent.id).map(|v| v.id.clone()));
    }
    ids.push("unknown_thing".to_string());
    ids
}

/// (parent, variant) pairs, including one deliberately mismatched pair.
fn variant_pairs() -> Vec<(String, String)> {
    let catalog = Catalog::builtin();
    let mut pairs: Vec<(String, String)> = catalog
        .appliances()
        .iter()
        .flat_map(|parent| {
            catalog
                .variants_of(&parent.id)
                .map(|v| (parent.id.clone(), v.id.clone()))
                .collect::<Vec<_>>()
        })
        .collect();
    pairs.push(("led_tv".to_string(), "ac_1hp".to_string()));
    pairs
}

fn light_duty_ids() -> Vec<String> {
    let catalog = Catalog::builtin();
    all_ids()
        .into_iter()
        .filter(|id| catalog.item(id).is_some() && !catalog.is_heavy_duty(id))
        .collect()
}

/// Light-duty appliances without variants, whose quantity is set directly.
fn plain_light_ids() -> Vec<String> {
    Catalog::builtin()
        .appliances()
        .iter()
        .filter(|a| !a.heavy_duty && !a.has_variants)
        .map(|a| a.id.clone())
        .collect()
}

/// Any intent except the user-confirmed override.
fn intent_strategy() -> impl Strategy<Value = Intent> {
    prop_oneof![
        4 => (prop::sample::select(all_ids()), -2i64..4).prop_map(|(appliance, quantity)| {
            Intent::SetQuantity { appliance, quantity }
        }),
        4 => (prop::sample::select(variant_pairs()), -1i64..4).prop_map(
            |((appliance, variant), quantity)| Intent::SetVariantQuantity {
                appliance,
                variant,
                quantity,
            }
        ),
        1 => Just(Intent::TurnOffNonEssentials),
        1 => Just(Intent::TurnOffFans),
        1 => prop::collection::vec(prop::sample::select(all_ids()), 0..4)
            .prop_map(|ids| Intent::TurnOff { ids }),
        1 => (1.0f64..3000.0, 1i64..4).prop_map(|(wattage_w, quantity)| Intent::AddCustom {
            name: "Load".to_string(),
            wattage_w,
            quantity,
        }),
        1 => (1u8..4).prop_map(|n| Intent::RemoveCustom {
            id: format!("custom-{n}"),
        }),
        1 => (1u8..4, -1i64..4).prop_map(|(n, quantity)| Intent::SetCustomQuantity {
            id: format!("custom-{n}"),
            quantity,
        }),
        1 => Just(Intent::Reset),
    ]
}

fn intents() -> impl Strategy<Value = Vec<Intent>> {
    prop::collection::vec(intent_strategy(), 0..40)
}

// =============================================================================
// Heavy-duty invariants
// =============================================================================

proptest! {
    /// At most two heavy-duty items, exactly one when a solo item is on,
    /// and any pair is listed in the compatibility table.
    #[test]
    fn heavy_duty_rules_hold_after_every_intent(sequence in intents()) {
        let mut manager = SelectionManager::new(catalog());
        for intent in &sequence {
            manager.apply(intent);
            let heavy = manager.active_heavy_duty_ids();
            prop_assert!(heavy.len() <= MAX_CONCURRENT_HEAVY_DUTY, "{heavy:?}");
            if manager.solo_active() {
                prop_assert_eq!(heavy.len(), 1, "solo must run alone: {:?}", heavy);
            }
            if let [a, b] = heavy.as_slice() {
                prop_assert!(manager.catalog().is_allowed_pair(a, b), "{a} + {b} not allowed");
            }
        }
    }

    /// Light-duty items are never blocked, whatever is selected.
    #[test]
    fn light_duty_is_always_admitted(
        sequence in intents(),
        candidate in prop::sample::select(light_duty_ids()),
    ) {
        let mut manager = SelectionManager::new(catalog());
        manager.apply_all(&sequence);
        prop_assert!(manager.can_activate(&candidate).is_allowed());
    }

    /// Activating a solo item without override leaves it as the only heavy-duty item.
    #[test]
    fn solo_activation_is_exclusive(
        sequence in intents(),
        solo in prop::sample::select(vec!["microwave", "iron", "water_pump", "ac_2hp", "ac_2hp_inv"]),
    ) {
        let mut manager = SelectionManager::new(catalog());
        manager.apply_all(&sequence);
        manager.set_quantity(solo, 1);
        prop_assert_eq!(manager.active_heavy_duty_ids(), vec![solo.to_string()]);
    }
}

// =============================================================================
// State and sizing properties
// =============================================================================

proptest! {
    /// Reset always returns to the initial state.
    #[test]
    fn reset_clears_everything(sequence in intents()) {
        let mut manager = SelectionManager::new(catalog());
        manager.apply_all(&sequence);
        manager.reset();
        prop_assert_eq!(manager.state(), &SelectionState::new());
    }

    /// Sizing is a pure function of the selection.
    #[test]
    fn calculate_is_idempotent(sequence in intents()) {
        let mut manager = SelectionManager::new(catalog());
        manager.apply_all(&sequence);
        let constants = SizingConstants::default();
        let first = calculate(manager.catalog(), manager.state(), &constants);
        let second = calculate(manager.catalog(), manager.state(), &constants);
        prop_assert_eq!(first, second);
    }

    /// Raising one quantity never lowers the total load.
    #[test]
    fn total_load_is_monotone_in_quantity(
        sequence in intents(),
        id in prop::sample::select(plain_light_ids()),
    ) {
        let mut manager = SelectionManager::new(catalog());
        manager.apply_all(&sequence);
        let constants = SizingConstants::default();
        let before = manager.calculate(&constants);

        let quantity = i64::from(manager.state().quantity(&id));
        manager.set_quantity(&id, quantity + 1);
        let after = manager.calculate(&constants);

        prop_assert!(after.total_load_w >= before.total_load_w);
        prop_assert!(after.required_kva >= before.required_kva);
        prop_assert!(after.recommended_inverter_kva >= before.recommended_inverter_kva);
    }

    /// The recommendation always covers the requirement unless flagged undersized.
    #[test]
    fn recommendation_covers_requirement(sequence in intents()) {
        let mut manager = SelectionManager::new(catalog());
        manager.apply_all(&sequence);
        let result = manager.calculate(&SizingConstants::default());
        prop_assert_eq!(
            result.undersized,
            result.recommended_inverter_kva < result.required_kva
        );
    }
}
