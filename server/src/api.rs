//! HTTP-Abfragen (nur lesend)
//!
//! Ein unbekannter Raum liefert eine leere Liste, keinen Fehler.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use klatsch_core::limits::STANDARD_RAUM;
use klatsch_protocol::{ClientInfo, NachrichtInfo};
use klatsch_signaling::dto::history_info;

use crate::AppState;

/// Routen der Abfrage-Schnittstelle
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/", get(wurzel))
        .route("/api/rooms", get(raeume))
        .route("/api/messages", get(nachrichten_standard))
        .route("/api/messages/:room", get(nachrichten))
        .route("/api/users", get(nutzer_standard))
        .route("/api/users/:room", get(nutzer))
}

/// GET / – Lebenszeichen
pub async fn wurzel() -> impl IntoResponse {
    "Klatsch Chat-Server laeuft"
}

/// GET /api/rooms
pub async fn raeume(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.chat.raeume.raum_namen().to_vec())
}

pub async fn nachrichten_standard(State(state): State<AppState>) -> Json<Vec<NachrichtInfo>> {
    Json(history_von(&state, STANDARD_RAUM))
}

/// GET /api/messages/:room
pub async fn nachrichten(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Json<Vec<NachrichtInfo>> {
    Json(history_von(&state, &room))
}

pub async fn nutzer_standard(State(state): State<AppState>) -> Json<Vec<ClientInfo>> {
    Json(state.chat.presence().nutzer(STANDARD_RAUM))
}

/// GET /api/users/:room
pub async fn nutzer(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Json<Vec<ClientInfo>> {
    Json(state.chat.presence().nutzer(&room))
}

fn history_von(state: &AppState, raum: &str) -> Vec<NachrichtInfo> {
    match state.chat.raeume.history(raum) {
        Ok(history) => history_info(&history),
        Err(e) => {
            tracing::debug!(raum = %raum, fehler = %e, "History fuer unbekannten Raum angefragt");
            Vec::new()
        }
    }
}
