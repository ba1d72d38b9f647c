//! Selection state, compatibility rules and the intents that change them.

pub mod advice;
pub mod intent;
pub mod manager;
pub mod resolver;
pub mod state;

pub use advice::{Advice, Prompt, advise};
pub use intent::Intent;
pub use manager::{IgnoredReason, IntentOutcome, MAX_CUSTOM_WATTAGE_W, SelectionManager};
pub use resolver::{Admission, MAX_CONCURRENT_HEAVY_DUTY, RejectReason, can_activate};
pub use state::{CustomEquipment, SelectionState, VariantSelection};
