//! Heavy-duty compatibility rules.
//!
//! [`can_activate`] is a pure query over a selection snapshot. A rejection is
//! advisory: the presentation layer turns it into a confirmation prompt and
//! the manager's default policy replaces the conflicting selection.

use std::fmt;

use serde::Serialize;

use super::state::SelectionState;
use crate::catalog::{Catalog, CatalogItem};

/// Maximum number of non-solo heavy-duty items that may run together.
pub const MAX_CONCURRENT_HEAVY_DUTY: usize = 2;

/// Why a heavy-duty candidate cannot join the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// A solo-only item is already on.
    SoloSelected,
    /// The candidate is solo-only and another heavy-duty item is on.
    MustBeUsedAlone,
    /// Two heavy-duty items are already on.
    MaxTwoHeavyDuty,
    /// The candidate does not pair with the item already on.
    NotCompatible,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::SoloSelected => "Solo appliance selected",
            Self::MustBeUsedAlone => "Must be used alone",
            Self::MaxTwoHeavyDuty => "Max 2 heavy-duty",
            Self::NotCompatible => "Not compatible",
        };
        f.write_str(text)
    }
}

/// Outcome of a compatibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Admission {
    Allowed,
    Rejected(RejectReason),
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            Self::Allowed => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }
}

/// Decides whether `candidate_id` may be switched on alongside the current selection.
///
/// Light-duty items, unknown ids and items already on are always allowed
/// (switching off is never restricted). When the candidate is a variant of a
/// single-select appliance its siblings are ignored, since choosing it
/// replaces them.
pub fn can_activate(catalog: &Catalog, state: &SelectionState, candidate_id: &str) -> Admission {
    let Some(candidate) = catalog.item(candidate_id) else {
        return Admission::Allowed;
    };
    if !candidate.is_heavy_duty() || state.is_active(catalog, candidate_id) {
        return Admission::Allowed;
    }

    let active = competing_ids(catalog, state, candidate_id);

    if active.iter().any(|id| catalog.is_solo_only(id)) {
        return Admission::Rejected(RejectReason::SoloSelected);
    }
    if catalog.is_solo_only(candidate_id) && !active.is_empty() {
        return Admission::Rejected(RejectReason::MustBeUsedAlone);
    }
    if active.len() >= MAX_CONCURRENT_HEAVY_DUTY {
        return Admission::Rejected(RejectReason::MaxTwoHeavyDuty);
    }
    if let [existing] = active.as_slice() {
        if !catalog.is_allowed_pair(existing, candidate_id) {
            return Admission::Rejected(RejectReason::NotCompatible);
        }
    }
    Admission::Allowed
}

/// Active heavy-duty ids that would still be on after switching
/// `candidate_id` on. Single-select siblings of a variant candidate are
/// left out since choosing it replaces them.
pub(crate) fn competing_ids(catalog: &Catalog, state: &SelectionState, candidate_id: &str) -> Vec<String> {
    let mut active = state.active_heavy_duty_ids(catalog);
    if let Some(CatalogItem::Variant { parent, .. }) = catalog.item(candidate_id) {
        if !parent.allow_multiple {
            active.retain(|id| {
                catalog
                    .variant(id)
                    .is_none_or(|sibling| sibling.parent_id != parent.id)
            });
        }
    }
    active
}
