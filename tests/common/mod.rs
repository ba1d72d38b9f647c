//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use inverter_sizer::catalog::{Appliance, Catalog, CatalogData, Category, Variant};
use inverter_sizer::selection::SelectionManager;

/// Manager over the built-in household catalog.
pub fn builtin_manager() -> SelectionManager {
    SelectionManager::new(Arc::new(Catalog::builtin()))
}

/// Small catalog for rule-level scenarios.
///
/// - `motor_a` (250 W, surge 3) and `motor_b` (300 W, surge 2): light duty
/// - `lamp`: light-duty single-select parent with variants `lamp_small`, `lamp_large`
/// - `pump` (solo), `press`, `kiln`, `mixer`: heavy duty; only
///   `press`/`mixer` and `press`/`kiln` are allowed pairs
pub fn test_catalog() -> Catalog {
    Catalog::new(CatalogData {
        categories: vec![
            Category {
                id: "workshop".to_string(),
                name: "Workshop".to_string(),
            },
            Category {
                id: "heavy-duty".to_string(),
                name: "Heavy Duty".to_string(),
            },
        ],
        appliances: vec![
            Appliance::light("motor_a", "Motor A", 250.0, 3.0, "workshop"),
            Appliance::light("motor_b", "Motor B", 300.0, 2.0, "workshop"),
            Appliance::light("lamp", "Lamp", 20.0, 1.0, "workshop").with_variants(false),
            Appliance::heavy("pump", "Pump", 750.0, 3.0, true),
            Appliance::heavy("press", "Press", 1000.0, 2.0, false),
            Appliance::heavy("kiln", "Kiln", 1500.0, 1.0, false),
            Appliance::heavy("mixer", "Mixer", 600.0, 2.0, false),
        ],
        variants: vec![
            Variant::new("lamp_small", "lamp", "Small", 10.0, 1.0),
            Variant::new("lamp_large", "lamp", "Large", 40.0, 1.0),
        ],
        allowed_pairs: vec![
            ("press".to_string(), "mixer".to_string()),
            ("kiln".to_string(), "press".to_string()),
        ],
        essential_ids: vec!["lamp".to_string()],
        ..CatalogData::default()
    })
}

/// Manager over [`test_catalog`].
pub fn test_manager() -> SelectionManager {
    SelectionManager::new(Arc::new(test_catalog()))
}
