//! User intents accepted by the selection manager.
//!
//! Intents are plain data so they can be replayed from a scenario file or
//! posted to the HTTP API. Quantities are signed on the wire; negatives
//! clamp to zero.

use serde::{Deserialize, Serialize};

fn one() -> i64 {
    1
}

/// One state transition requested by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Set the quantity of an appliance (last choice wins on conflicts).
    SetQuantity { appliance: String, quantity: i64 },
    /// Set the quantity of one variant of a variant-bearing appliance.
    SetVariantQuantity {
        appliance: String,
        variant: String,
        quantity: i64,
    },
    /// User-confirmed activation that bypasses the compatibility rules.
    ForceActivate { id: String },
    /// Switch off light-duty appliances outside the essential set.
    TurnOffNonEssentials,
    /// Switch off every listed appliance or variant.
    TurnOff { ids: Vec<String> },
    /// Switch off every fan in the catalog.
    TurnOffFans,
    AddCustom {
        name: String,
        wattage_w: f64,
        #[serde(default = "one")]
        quantity: i64,
    },
    RemoveCustom { id: String },
    /// A quantity of zero or less removes the entry.
    SetCustomQuantity { id: String, quantity: i64 },
    Reset,
}

impl Intent {
    /// Id of the catalog item this intent would switch on, if any.
    pub fn activation_target(&self) -> Option<&str> {
        match self {
            Self::SetQuantity {
                appliance,
                quantity,
            } if *quantity > 0 => Some(appliance),
            Self::SetVariantQuantity {
                variant, quantity, ..
            } if *quantity > 0 => Some(variant),
            Self::ForceActivate { id } => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            selection: Vec<Intent>,
        }
        let toml = r#"
[[selection]]
intent = "set_quantity"
appliance = "ceiling_fan"
quantity = 2

[[selection]]
intent = "add_custom"
name = "Aquarium pump"
wattage_w = 35.0

[[selection]]
intent = "reset"
"#;
        let parsed: Wrapper = toml::from_str(toml).expect("intents should parse");
        assert_eq!(
            parsed.selection,
            vec![
                Intent::SetQuantity {
                    appliance: "ceiling_fan".to_string(),
                    quantity: 2
                },
                Intent::AddCustom {
                    name: "Aquarium pump".to_string(),
                    wattage_w: 35.0,
                    quantity: 1
                },
                Intent::Reset,
            ]
        );
    }

    #[test]
    fn parses_tagged_json() {
        let intent: Intent = serde_json::from_str(
            r#"{"intent":"set_variant_quantity","appliance":"led_tv","variant":"tv_43","quantity":1}"#,
        )
        .expect("intent should parse");
        assert_eq!(intent.activation_target(), Some("tv_43"));
    }

    #[test]
    fn deactivation_has_no_target() {
        let intent = Intent::SetQuantity {
            appliance: "microwave".to_string(),
            quantity: 0,
        };
        assert_eq!(intent.activation_target(), None);
        assert_eq!(Intent::Reset.activation_target(), None);
    }
}
