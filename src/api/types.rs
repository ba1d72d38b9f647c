//! API response types.

use serde::Serialize;

use crate::selection::{Admission, Advice, IntentOutcome, SelectionManager, SelectionState};
use crate::sizing::{BackupEstimate, BatteryBank, SizingConstants, SizingResult};

/// Current selection with everything derived from it.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub selection: SelectionState,
    pub active_count: usize,
    pub solo_active: bool,
    pub fans_active: bool,
    pub result: SizingResult,
    pub backup: BackupEstimate,
}

impl StateResponse {
    pub fn snapshot(
        manager: &SelectionManager,
        constants: &SizingConstants,
        battery: &BatteryBank,
    ) -> Self {
        let result = manager.calculate(constants);
        let backup = battery.estimate(&result);
        let selection = manager.state().clone();
        Self {
            active_count: selection.active_count(),
            solo_active: manager.solo_active(),
            fans_active: selection.fans_active(manager.catalog()),
            selection,
            result,
            backup,
        }
    }
}

/// Whether an item can be switched on, and what the user should be asked.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub id: String,
    pub active: bool,
    pub admission: Admission,
    pub advice: Advice,
}

/// Outcome of an applied intent plus the resulting state.
#[derive(Debug, Serialize)]
pub struct IntentResponse {
    pub outcome: IntentOutcome,
    pub state: StateResponse,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
