//! Appliance selection and inverter load-sizing engine.

#[cfg(feature = "api")]
pub mod api;
pub mod catalog;
pub mod config;
pub mod io;
/// Selection state, compatibility rules, intents and confirmation prompts.
pub mod selection;
pub mod sizing;
