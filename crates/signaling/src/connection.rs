//! Client-Connection – Verwaltet eine einzelne WebSocket-Verbindung
//!
//! Jede WebSocket-Verbindung bekommt eine `ClientConnection` in einem eigenen
//! tokio-Task. Nur dieser Task schreibt in den Socket; alle anderen Teile
//! des Servers reihen Events in die Send-Queue des Clients ein.
//!
//! ## Keepalive
//! - Server sendet alle `keepalive_sek` einen Ping
//! - Kommt innerhalb von `verbindungs_timeout_sek` kein Frame, wird getrennt

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use klatsch_core::ClientId;
use klatsch_protocol::{ClientEvent, RejectCode, ServerEvent};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};

use crate::router::MessageRouter;
use crate::server_state::ChatState;
use crate::session::{Fortsetzung, Sitzung};
use crate::typing::TippTimer;

/// Verwaltet eine einzelne Client-Verbindung
pub struct ClientConnection {
    state: Arc<ChatState>,
    peer_addr: SocketAddr,
}

impl ClientConnection {
    pub fn neu(state: Arc<ChatState>, peer_addr: SocketAddr) -> Self {
        Self { state, peer_addr }
    }

    /// Startet die Verbindungs-Verarbeitungsschleife
    ///
    /// Diese Methode laeuft bis die Verbindung getrennt wird oder ein
    /// Shutdown-Signal eingeht.
    pub async fn verarbeiten(self, socket: WebSocket, mut shutdown_rx: watch::Receiver<bool>) {
        let peer_addr = self.peer_addr;
        let config = Arc::clone(&self.state.config);
        let keepalive_intervall = Duration::from_secs(config.keepalive_sek.max(1));
        let timeout_dauer = Duration::from_secs(config.verbindungs_timeout_sek.max(1));

        let client_id = ClientId::new();
        tracing::info!(peer = %peer_addr, client_id = %client_id, "Neue Verbindung");

        let (mut ws_tx, mut ws_rx) = socket.split();

        // Ausgehende Events (Broadcaster -> WebSocket)
        let mut sende_rx = self
            .state
            .broadcaster
            .client_registrieren(client_id, config.send_queue_groesse);

        let (ablauf_tx, mut ablauf_rx) = mpsc::channel::<u64>(4);
        let mut sitzung = Sitzung::neu(
            client_id,
            MessageRouter::neu(Arc::clone(&self.state)),
            TippTimer::neu(config.tipp_timeout, ablauf_tx),
        );

        self.state.broadcaster.an_client_senden(
            &client_id,
            ServerEvent::Connected {
                client_id,
                rooms: self.state.raeume.raum_namen().to_vec(),
            },
        );

        let mut letzter_empfang = Instant::now();
        let mut keepalive = tokio::time::interval(keepalive_intervall);
        // Erster Tick kommt sofort
        keepalive.tick().await;

        loop {
            tokio::select! {
                // Eingehender Frame vom Client
                frame = ws_rx.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            letzter_empfang = Instant::now();
                            match ClientEvent::from_json(&text) {
                                Ok(event) => {
                                    tracing::trace!(client_id = %client_id, event = event.art(), "Event empfangen");
                                    if sitzung.verarbeiten(event) == Fortsetzung::Beenden {
                                        tracing::info!(client_id = %client_id, "Client hat sich abgemeldet");
                                        break;
                                    }
                                }
                                Err(e) => {
                                    tracing::warn!(client_id = %client_id, fehler = %e, "Ungueltiges Event");
                                    self.state.broadcaster.an_client_senden(
                                        &client_id,
                                        ServerEvent::rejected(RejectCode::InvalidRequest, e.to_string()),
                                    );
                                }
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            tracing::info!(peer = %peer_addr, client_id = %client_id, "Verbindung vom Client getrennt");
                            break;
                        }
                        Some(Ok(_)) => {
                            // Ping/Pong/Binary zaehlen nur als Lebenszeichen
                            letzter_empfang = Instant::now();
                        }
                        Some(Err(e)) => {
                            tracing::warn!(client_id = %client_id, fehler = %e, "WebSocket-Lesefehler");
                            break;
                        }
                    }
                }

                // Ausgehendes Event aus dem Broadcaster
                Some(ausgehend) = sende_rx.recv() => {
                    let json = match ausgehend.to_json() {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!(client_id = %client_id, fehler = %e, "Event nicht serialisierbar");
                            continue;
                        }
                    };
                    if let Err(e) = ws_tx.send(Message::Text(json)).await {
                        tracing::warn!(client_id = %client_id, fehler = %e, "Senden fehlgeschlagen");
                        break;
                    }
                }

                // Tipp-Timer abgelaufen
                Some(generation) = ablauf_rx.recv() => {
                    sitzung.tipp_ablauf(generation);
                }

                // Keepalive-Ping
                _ = keepalive.tick() => {
                    if letzter_empfang.elapsed() > timeout_dauer {
                        tracing::warn!(peer = %peer_addr, client_id = %client_id, "Verbindungs-Timeout");
                        break;
                    }
                    if let Err(e) = ws_tx.send(Message::Ping(Vec::new())).await {
                        tracing::warn!(client_id = %client_id, fehler = %e, "Ping-Senden fehlgeschlagen");
                        break;
                    }
                }

                // Shutdown-Signal
                Ok(()) = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!(client_id = %client_id, "Shutdown-Signal – Verbindung wird getrennt");
                        let _ = ws_tx.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
        }

        sitzung.trennen();
        tracing::info!(peer = %peer_addr, client_id = %client_id, "Verbindungs-Task beendet");
    }
}
