//! Event-Broadcaster – Sendet Events an einzelne oder mehrere Clients
//!
//! Der EventBroadcaster verwaltet die Send-Queues aller verbundenen Clients.
//! Senden ist nie blockierend: Events werden per `try_send` eingereiht und
//! erst von der jeweiligen `ClientConnection` ins Netz geschrieben. Ein
//! langsamer Client kann so keinen anderen Client aufhalten.
//!
//! ## Selektives Broadcasting
//! - An einen Client: `an_client_senden`
//! - An eine Liste von Clients: `an_clients_senden`

use dashmap::DashMap;
use klatsch_core::ClientId;
use klatsch_protocol::ServerEvent;
use std::sync::Arc;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// ClientSender
// ---------------------------------------------------------------------------

/// Handle auf die Send-Queue eines verbundenen Clients
#[derive(Clone, Debug)]
pub struct ClientSender {
    pub client_id: ClientId,
    pub tx: mpsc::Sender<ServerEvent>,
}

impl ClientSender {
    /// Sendet ein Event nicht-blockierend an den Client
    ///
    /// Gibt `false` zurueck wenn die Queue voll oder geschlossen ist.
    pub fn senden(&self, event: ServerEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(client_id = %self.client_id, "Send-Queue voll – Event verworfen");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(client_id = %self.client_id, "Send-Queue geschlossen (Client getrennt)");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// EventBroadcaster
// ---------------------------------------------------------------------------

/// Zentraler Event-Broadcaster fuer alle verbundenen Clients
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct EventBroadcaster {
    inner: Arc<DashMap<ClientId, ClientSender>>,
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::neu()
    }
}

impl EventBroadcaster {
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Registriert einen neuen Client und gibt seine Empfangs-Queue zurueck
    ///
    /// Die `ClientConnection` liest aus dieser Queue und schreibt in den WebSocket.
    pub fn client_registrieren(
        &self,
        client_id: ClientId,
        queue_groesse: usize,
    ) -> mpsc::Receiver<ServerEvent> {
        let (tx, rx) = mpsc::channel(queue_groesse.max(1));
        self.inner.insert(client_id, ClientSender { client_id, tx });
        tracing::debug!(client_id = %client_id, "Client im Broadcaster registriert");
        rx
    }

    /// Entfernt einen Client aus dem Broadcaster
    pub fn client_entfernen(&self, client_id: &ClientId) {
        if self.inner.remove(client_id).is_some() {
            tracing::debug!(client_id = %client_id, "Client aus Broadcaster entfernt");
        }
    }

    /// Sendet ein Event an einen einzelnen Client
    ///
    /// Gibt `true` zurueck wenn der Client gefunden und das Event eingereiht wurde.
    pub fn an_client_senden(&self, client_id: &ClientId, event: ServerEvent) -> bool {
        match self.inner.get(client_id) {
            Some(sender) => sender.senden(event),
            None => {
                tracing::debug!(client_id = %client_id, "Senden an unbekannten Client");
                false
            }
        }
    }

    /// Sendet ein Event an mehrere Clients
    ///
    /// Gibt die Anzahl der erfolgreichen Sendungen zurueck.
    pub fn an_clients_senden<'a, I>(&self, client_ids: I, event: &ServerEvent) -> usize
    where
        I: IntoIterator<Item = &'a ClientId>,
    {
        client_ids
            .into_iter()
            .filter(|id| self.an_client_senden(id, event.clone()))
            .count()
    }

    /// Anzahl registrierter Clients (gebunden oder nicht)
    pub fn client_anzahl(&self) -> usize {
        self.inner.len()
    }

    pub fn ist_registriert(&self, client_id: &ClientId) -> bool {
        self.inner.contains_key(client_id)
    }
}
