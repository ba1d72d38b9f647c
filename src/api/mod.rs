//! REST API over a shared selection manager.
//!
//! Endpoints:
//! - `GET /catalog`: appliances, variants and compatibility tables
//! - `GET /state`: current selection, sizing result and backup estimate
//! - `GET /availability/{id}`: resolver verdict and prompt for switching `id` on
//! - `POST /advice`: prompt an intent would raise, without applying it
//! - `POST /intents`: apply one intent and return the new state

mod handlers;
pub mod types;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::Router;
use axum::routing::{get, post};

use crate::selection::SelectionManager;
use crate::sizing::{BatteryBank, SizingConstants};

/// Application state shared across all request handlers.
///
/// The manager is the only writer of the selection, so every mutation goes
/// through its mutex; sizing is recomputed from the locked snapshot.
pub struct AppState {
    /// Selection manager holding the catalog and current selection.
    pub manager: Mutex<SelectionManager>,
    /// Sizing factors used for every result.
    pub constants: SizingConstants,
    /// Battery bank used for the backup estimate.
    pub battery: BatteryBank,
}

impl AppState {
    pub fn new(manager: SelectionManager, constants: SizingConstants, battery: BatteryBank) -> Self {
        Self {
            manager: Mutex::new(manager),
            constants,
            battery,
        }
    }

    /// Locks the manager. A poisoned lock is recovered: intents never leave
    /// the selection half-applied.
    fn manager(&self) -> MutexGuard<'_, SelectionManager> {
        self.manager.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/catalog", get(handlers::get_catalog))
        .route("/state", get(handlers::get_state))
        .route("/availability/{id}", get(handlers::get_availability))
        .route("/advice", post(handlers::post_advice))
        .route("/intents", post(handlers::post_intent))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
