//! Confirmation prompts that precede an intent.
//!
//! The core never blocks on a dialog. The presentation layer asks
//! [`advise`] first; on [`Advice::Confirm`] it shows the prompt and, if the
//! user accepts, applies [`Prompt::on_confirm`] followed by the original
//! intent (or the override itself, for [`Prompt::Override`]).

use std::fmt;

use serde::Serialize;

use super::intent::Intent;
use super::resolver::{RejectReason, can_activate, competing_ids};
use super::state::SelectionState;
use crate::catalog::Catalog;

/// A dialog the user should see before an intent runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "prompt", rename_all = "snake_case")]
pub enum Prompt {
    /// The candidate is disabled by the compatibility rules.
    Override {
        id: String,
        reason: RejectReason,
        conflicting_names: Vec<String>,
    },
    /// An AC is about to start while fans are running.
    AcFanConflict,
    /// A heavy-duty item is about to start while non-essential loads run.
    HeavyDutyFirst,
}

impl Prompt {
    /// Intent that carries out the user's acceptance.
    pub fn on_confirm(&self) -> Intent {
        match self {
            Self::Override { id, .. } => Intent::ForceActivate { id: id.clone() },
            Self::AcFanConflict => Intent::TurnOffFans,
            Self::HeavyDutyFirst => Intent::TurnOffNonEssentials,
        }
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Override {
                conflicting_names, ..
            } => write!(
                f,
                "Using this appliance alongside {} will require a very large inverter size. \
                 Do you wish to proceed?",
                conflicting_names.join(", ")
            ),
            Self::AcFanConflict => f.write_str(
                "We noticed you have fans already selected. \
                 Do you wish to switch them OFF while selecting the AC?",
            ),
            Self::HeavyDutyFirst => f.write_str(
                "It is recommended to switch off other household appliances \
                 when using heavy-duty device.",
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "advice", content = "prompt", rename_all = "snake_case")]
pub enum Advice {
    Proceed,
    Confirm(Prompt),
}

/// Decides whether `intent` needs a confirmation first.
///
/// Only intents that switch something on can prompt. Checks run in the
/// order override, AC/fan conflict, heavy-duty-first; the first hit wins.
pub fn advise(catalog: &Catalog, state: &SelectionState, intent: &Intent) -> Advice {
    let Some(target) = intent.activation_target() else {
        return Advice::Proceed;
    };
    // A forced activation is already the confirmed path.
    if matches!(intent, Intent::ForceActivate { .. }) {
        return Advice::Proceed;
    }
    let target = resolve_target(catalog, target);
    if !catalog.is_heavy_duty(&target) || state.is_active(catalog, &target) {
        return Advice::Proceed;
    }

    if let Some(reason) = can_activate(catalog, state, &target).reason() {
        return Advice::Confirm(Prompt::Override {
            conflicting_names: competing_ids(catalog, state, &target)
                .iter()
                .filter_map(|id| catalog.display_name(id))
                .collect(),
            id: target,
            reason,
        });
    }
    if catalog.is_air_conditioning(&target) && state.fans_active(catalog) {
        return Advice::Confirm(Prompt::AcFanConflict);
    }
    if non_essentials_active(catalog, state) {
        return Advice::Confirm(Prompt::HeavyDutyFirst);
    }
    Advice::Proceed
}

/// A variant-bearing parent stands for its default variant.
fn resolve_target(catalog: &Catalog, id: &str) -> String {
    match catalog.appliance(id) {
        Some(a) if a.has_variants => catalog
            .default_variant(&a.id)
            .map_or_else(|| id.to_string(), |v| v.id.clone()),
        _ => id.to_string(),
    }
}

fn non_essentials_active(catalog: &Catalog, state: &SelectionState) -> bool {
    catalog.appliances().iter().any(|a| {
        !a.heavy_duty && !catalog.is_essential(&a.id) && state.appliance_quantity(catalog, &a.id) > 0
    })
}
