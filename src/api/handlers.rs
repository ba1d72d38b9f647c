//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{AvailabilityResponse, ErrorResponse, IntentResponse, StateResponse};
use crate::catalog::Catalog;
use crate::selection::{Advice, Intent, advise};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// `GET /catalog` → 200 + `Catalog` JSON
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<Catalog> {
    Json(state.manager().catalog().clone())
}

/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let manager = state.manager();
    Json(StateResponse::snapshot(
        &manager,
        &state.constants,
        &state.battery,
    ))
}

/// Resolver verdict and confirmation prompt for switching `id` on.
///
/// `GET /availability/{id}` → 200 + `AvailabilityResponse`
/// `GET /availability/unknown` → 404 + `ErrorResponse`
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let manager = state.manager();
    if manager.catalog().item(&id).is_none() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("unknown appliance or variant \"{id}\""),
            }),
        ));
    }
    let intent = Intent::SetQuantity {
        appliance: id.clone(),
        quantity: 1,
    };
    Ok(Json(AvailabilityResponse {
        active: manager.state().is_active(manager.catalog(), &id),
        admission: manager.can_activate(&id),
        advice: advise(manager.catalog(), manager.state(), &intent),
        id,
    }))
}

/// `POST /advice` with an `Intent` body → 200 + `Advice`
pub async fn post_advice(
    State(state): State<Arc<AppState>>,
    Json(intent): Json<Intent>,
) -> Json<Advice> {
    let manager = state.manager();
    Json(advise(manager.catalog(), manager.state(), &intent))
}

/// Applies one intent.
///
/// `POST /intents` with an `Intent` body → 200 + `IntentResponse`. Unknown
/// ids are reported in the outcome, not as an HTTP error.
pub async fn post_intent(
    State(state): State<Arc<AppState>>,
    Json(intent): Json<Intent>,
) -> Json<IntentResponse> {
    let mut manager = state.manager();
    let outcome = manager.apply(&intent);
    Json(IntentResponse {
        outcome,
        state: StateResponse::snapshot(&manager, &state.constants, &state.battery),
    })
}
