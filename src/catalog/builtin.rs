//! Built-in household catalog.

use super::CatalogData;
use super::types::{Appliance, AvoidCombination, Category, HEAVY_DUTY_CATEGORY, Variant};

const ALLOWED_PAIRS: &[(&str, &str)] = &[
    ("ac_1hp", "refrigerator"),
    ("ac_1hp", "mini_fridge"),
    ("ac_1hp", "top_bottom_freezer"),
    ("ac_1hp", "deep_freezer"),
    ("ac_1hp_inv", "refrigerator"),
    ("ac_1hp_inv", "mini_fridge"),
    ("ac_1hp_inv", "top_bottom_freezer"),
    ("ac_1hp_inv", "deep_freezer"),
    ("ac_15hp", "refrigerator"),
    ("ac_15hp", "mini_fridge"),
    ("ac_15hp_inv", "refrigerator"),
    ("ac_15hp_inv", "mini_fridge"),
    ("refrigerator", "deep_freezer"),
    ("mini_fridge", "deep_freezer"),
    ("top_bottom_freezer", "mini_fridge"),
    ("refrigerator", "toaster"),
    ("mini_fridge", "toaster"),
    ("washing_machine", "refrigerator"),
    ("washing_machine", "mini_fridge"),
];

const AC_AND_PUMP: &str = "Avoid running AC and Water Pump together - high surge load.";

const AVOID: &[(&[&str], &str)] = &[
    (&["ac_1hp", "water_pump"], AC_AND_PUMP),
    (&["ac_15hp", "water_pump"], AC_AND_PUMP),
    (&["ac_2hp", "water_pump"], AC_AND_PUMP),
    (
        &["electric_kettle"],
        "Electric Kettle should not run with other heavy-duty appliances.",
    ),
    (
        &["space_heater"],
        "Space Heater should not run with other heavy-duty appliances.",
    ),
    (
        &["iron"],
        "Electric Iron should not run with other heavy-duty appliances.",
    ),
    (
        &["microwave"],
        "Microwave Oven should not run with other heavy-duty appliances.",
    ),
    (
        &["vacuum"],
        "Vacuum Cleaner should not run with other heavy-duty appliances.",
    ),
    (
        &["washing_machine", "water_pump"],
        "Avoid running Washing Machine and Water Pump together.",
    ),
];

fn categories() -> Vec<Category> {
    [
        ("lighting", "Lighting"),
        ("entertainment", "Entertainment"),
        ("kitchen", "Kitchen"),
        ("cooling", "Cooling"),
        ("office", "Office & Work"),
        (HEAVY_DUTY_CATEGORY, "Heavy Duty Appliances"),
    ]
    .into_iter()
    .map(|(id, name)| Category {
        id: id.to_string(),
        name: name.to_string(),
    })
    .collect()
}

fn appliances() -> Vec<Appliance> {
    vec![
        Appliance::light("led_bulb", "LED Bulb", 10.0, 1.0, "lighting").with_variants(true),
        Appliance::light("fluorescent", "Fluorescent Tube", 40.0, 1.2, "lighting"),
        Appliance::light("outdoor_light", "Outdoor Light", 60.0, 1.0, "lighting"),
        Appliance::light("led_tv", "LED TV", 50.0, 1.0, "entertainment").with_variants(true),
        Appliance::light("sound_system", "Sound System", 100.0, 1.5, "entertainment"),
        Appliance::light("gaming_console", "Gaming Console", 200.0, 1.0, "entertainment"),
        Appliance::light("decoder", "Cable/Satellite Decoder", 25.0, 1.0, "entertainment"),
        Appliance::light("blender", "Blender", 400.0, 3.0, "kitchen"),
        Appliance::light("ceiling_fan", "Ceiling Fan", 75.0, 1.5, "cooling"),
        Appliance::light("standing_fan", "Standing Fan", 55.0, 1.5, "cooling"),
        Appliance::light("laptop", "Laptop", 65.0, 1.0, "office"),
        Appliance::light("desktop", "Desktop Computer", 250.0, 1.5, "office"),
        Appliance::light("monitor", "Computer Monitor", 40.0, 1.0, "office"),
        Appliance::light("printer", "Printer", 150.0, 2.0, "office"),
        Appliance::light("router", "WiFi Router", 15.0, 1.0, "office"),
        Appliance::light("phone_charger", "Phone Charger", 10.0, 1.0, "office"),
        Appliance::heavy("air_conditioner", "Air Conditioner", 900.0, 3.0, false)
            .with_variants(false),
        Appliance::heavy("refrigerator", "Refrigerator", 350.0, 3.0, false).with_variants(false),
        Appliance::heavy("microwave", "Microwave Oven", 1200.0, 2.0, true),
        Appliance::heavy("electric_kettle", "Electric Kettle", 1500.0, 1.0, true),
        Appliance::heavy("washing_machine", "Washing Machine", 700.0, 3.0, false),
        Appliance::heavy("iron", "Electric Iron", 1200.0, 1.0, true),
        Appliance::heavy("water_pump", "Water Pump (1HP)", 750.0, 3.0, true),
        Appliance::heavy("space_heater", "Space Heater", 1500.0, 1.0, true),
        Appliance::heavy("toaster", "Toaster", 800.0, 1.0, false),
        Appliance::heavy("vacuum", "Vacuum Cleaner", 1000.0, 2.0, true),
    ]
}

fn variants() -> Vec<Variant> {
    vec![
        Variant::new("led_10w", "led_bulb", "10W", 10.0, 1.0),
        Variant::new("led_15w", "led_bulb", "15W", 15.0, 1.0),
        Variant::new("led_20w", "led_bulb", "20W", 20.0, 1.0),
        Variant::new("led_30w", "led_bulb", "30W", 30.0, 1.0),
        Variant::new("led_40w", "led_bulb", "40W", 40.0, 1.0),
        Variant::new("tv_24", "led_tv", "24\"", 30.0, 1.0),
        Variant::new("tv_32", "led_tv", "32\"", 50.0, 1.0),
        Variant::new("tv_43", "led_tv", "43\"", 80.0, 1.0),
        Variant::new("tv_50", "led_tv", "50\"", 100.0, 1.0),
        Variant::new("tv_55", "led_tv", "55\"", 120.0, 1.0),
        Variant::new("tv_65", "led_tv", "65\"", 150.0, 1.0),
        Variant::new("tv_75", "led_tv", "75\"", 200.0, 1.0),
        Variant::new("mini_fridge", "refrigerator", "Mini Fridge", 100.0, 3.0),
        Variant::new("top_bottom_freezer", "refrigerator", "Top/Bottom Freezer", 350.0, 3.0),
        Variant::new("deep_freezer", "refrigerator", "Deep Freezer", 600.0, 3.0),
        Variant::new("ac_1hp", "air_conditioner", "1HP", 900.0, 3.0),
        Variant::new("ac_15hp", "air_conditioner", "1.5HP", 1200.0, 3.0),
        Variant::new("ac_2hp", "air_conditioner", "2HP", 1800.0, 3.0),
        Variant::new("ac_1hp_inv", "air_conditioner", "1HP (Inverter)", 700.0, 2.0),
        Variant::new("ac_15hp_inv", "air_conditioner", "1.5HP (Inverter)", 950.0, 2.0),
        Variant::new("ac_2hp_inv", "air_conditioner", "2HP (Inverter)", 1400.0, 2.0),
    ]
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

pub(super) fn data() -> CatalogData {
    CatalogData {
        categories: categories(),
        appliances: appliances(),
        variants: variants(),
        allowed_pairs: ALLOWED_PAIRS
            .iter()
            .map(|(a, b)| ((*a).to_string(), (*b).to_string()))
            .collect(),
        avoid_combinations: AVOID
            .iter()
            .map(|(combo, warning)| AvoidCombination {
                ids: ids(combo),
                warning: (*warning).to_string(),
            })
            .collect(),
        solo_variants: ids(&["ac_2hp", "ac_2hp_inv"]),
        essential_ids: ids(&[
            "led_bulb",
            "phone_charger",
            "ceiling_fan",
            "standing_fan",
            "laptop",
            "router",
        ]),
        fan_ids: ids(&["ceiling_fan", "standing_fan"]),
        heating_ids: ids(&["microwave", "toaster"]),
        ac_family: ids(&["air_conditioner"]),
        refrigeration_family: ids(&["refrigerator"]),
    }
}
