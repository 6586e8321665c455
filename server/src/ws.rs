//! WebSocket-Endpunkt `GET /ws`

use axum::{
    extract::{ws::WebSocketUpgrade, ConnectInfo, State},
    response::Response,
};
use klatsch_signaling::ClientConnection;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::AppState;

/// Nimmt das Upgrade an und startet die Verbindung in einem eigenen Task
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(peer_addr): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> Response {
    let verbindung = ClientConnection::neu(Arc::clone(&state.chat), peer_addr);
    let shutdown_rx = state.shutdown_rx.clone();
    ws.on_upgrade(move |socket| verbindung.verarbeiten(socket, shutdown_rx))
}
