//! End-to-end selection and sizing scenarios.

mod common;

use inverter_sizer::selection::{Admission, IntentOutcome, RejectReason, SelectionState};
use inverter_sizer::sizing::{SizingConstants, Warning};

#[test]
fn single_motor_appliance_sizes_to_three_and_a_half_kva() {
    let mut manager = common::builtin_manager();
    manager.set_variant_quantity("air_conditioner", "ac_1hp", 1);

    let result = manager.calculate(&SizingConstants::default());
    assert_eq!(result.total_load_w, 900);
    assert_eq!(result.peak_surge_w, 1800);
    assert_eq!(result.adjusted_surge_w, 900);
    assert_eq!(result.required_power_w, 2160);
    assert_eq!(result.required_kva, 2.7);
    assert_eq!(result.recommended_inverter_kva, 3.5);
    assert!(!result.undersized);
}

#[test]
fn selecting_heavy_duty_while_solo_is_active_replaces_it() {
    let mut manager = common::test_manager();
    manager.set_quantity("pump", 1);
    assert!(manager.solo_active());

    assert_eq!(
        manager.can_activate("press"),
        Admission::Rejected(RejectReason::SoloSelected)
    );
    let outcome = manager.set_quantity("press", 1);
    assert_eq!(
        outcome,
        IntentOutcome::Replaced {
            reason: RejectReason::SoloSelected,
            deactivated: vec!["pump".to_string()],
        }
    );
    assert_eq!(manager.state().quantity("pump"), 0);
    assert_eq!(manager.state().quantity("press"), 1);
    assert!(!manager.solo_active());
}

#[test]
fn third_heavy_duty_replaces_an_incompatible_pair() {
    let mut manager = common::test_manager();
    manager.set_quantity("mixer", 1);
    // mixer/kiln is not an allowed pair; only an override gets both on.
    assert_eq!(
        manager.force_activate("kiln"),
        IntentOutcome::Forced {
            bypassed: Some(RejectReason::NotCompatible)
        }
    );
    assert_eq!(manager.active_heavy_duty_ids().len(), 2);

    let outcome = manager.set_quantity("press", 1);
    assert!(matches!(
        outcome,
        IntentOutcome::Replaced {
            reason: RejectReason::MaxTwoHeavyDuty,
            ..
        }
    ));
    assert_eq!(manager.active_heavy_duty_ids(), vec!["press".to_string()]);
}

#[test]
fn single_select_variant_replaces_sibling_entirely() {
    let mut manager = common::test_manager();
    manager.set_variant_quantity("lamp", "lamp_small", 2);
    manager.set_variant_quantity("lamp", "lamp_large", 1);

    let selections = manager.state().variant_selections("lamp");
    assert_eq!(selections.len(), 1);
    assert_eq!(selections[0].variant_id, "lamp_large");
    assert_eq!(selections[0].quantity, 1);
}

#[test]
fn peak_surge_is_the_max_not_the_sum() {
    let mut manager = common::test_manager();
    manager.set_quantity("motor_a", 1);
    manager.set_quantity("motor_b", 1);

    let result = manager.calculate(&SizingConstants::default());
    assert_eq!(result.peak_surge_w, 500);
    assert_eq!(result.adjusted_surge_w, 250);
    assert_eq!(result.total_load_w, 550);
}

#[test]
fn light_duty_is_allowed_even_next_to_a_solo_appliance() {
    let mut manager = common::builtin_manager();
    manager.set_quantity("water_pump", 1);
    for id in ["ceiling_fan", "desktop", "tv_75", "led_40w", "led_bulb"] {
        assert!(manager.can_activate(id).is_allowed(), "{id} should be allowed");
    }
}

#[test]
fn solo_activation_leaves_it_alone() {
    let mut manager = common::builtin_manager();
    manager.set_variant_quantity("air_conditioner", "ac_1hp", 1);
    manager.set_variant_quantity("refrigerator", "deep_freezer", 1);
    manager.set_quantity("laptop", 1);

    manager.set_variant_quantity("air_conditioner", "ac_2hp", 1);
    assert_eq!(manager.active_heavy_duty_ids(), vec!["ac_2hp".to_string()]);
    assert_eq!(manager.state().quantity("laptop"), 1);

    let result = manager.calculate(&SizingConstants::default());
    assert!(
        result
            .warnings
            .contains(&Warning::SoloReminder("2HP Air Conditioner".to_string()))
    );
}

#[test]
fn reset_returns_to_initial_state() {
    let mut manager = common::builtin_manager();
    manager.set_quantity("ceiling_fan", 3);
    manager.set_variant_quantity("led_bulb", "led_20w", 5);
    manager.force_activate("microwave");
    manager.force_activate("washing_machine");
    manager.add_custom_equipment("Aquarium pump", 35.0, 2);

    manager.reset();
    assert_eq!(manager.state(), &SelectionState::new());
    assert_eq!(
        manager.add_custom_equipment("Freezer chest", 150.0, 1),
        IntentOutcome::CustomAdded {
            id: "custom-1".to_string()
        }
    );
}

#[test]
fn forced_combination_still_gets_sized_and_warned() {
    let mut manager = common::builtin_manager();
    manager.set_quantity("microwave", 1);
    manager.force_activate("electric_kettle");

    let result = manager.calculate(&SizingConstants::default());
    let messages = result.warning_messages();
    assert!(messages.contains(
        &"Electric Kettle should not run with other heavy-duty appliances.".to_string()
    ));
    assert!(messages.contains(
        &"Microwave Oven should not run with other heavy-duty appliances.".to_string()
    ));
    assert_eq!(result.total_load_w, 2700);
    assert_eq!(result.active_heavy_duty.len(), 2);
}

#[test]
fn heavy_load_saturates_at_largest_inverter() {
    let mut manager = common::builtin_manager();
    manager.add_custom_equipment("Borehole pump", 9000.0, 2);

    let result = manager.calculate(&SizingConstants::default());
    assert_eq!(result.recommended_inverter_kva, 20.0);
    assert!(result.undersized);
    assert!(
        result
            .recommendations
            .iter()
            .any(|r| r.contains("ventilation"))
    );
}
