//! Gemeinsamer Server-Zustand fuer den Signaling-Service
//!
//! Haelt Registry, Raum-Speicher, Broadcaster und Zaehler, die sicher
//! zwischen tokio-Tasks geteilt werden koennen.

use klatsch_chat::RoomStore;
use klatsch_core::limits::STANDARD_RAEUME;
use klatsch_core::ClientId;
use klatsch_protocol::ServerEvent;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::broadcast::EventBroadcaster;
use crate::presence::PresenceBroadcaster;
use crate::registry::ConnectionRegistry;
use crate::unread::UnreadZaehler;

/// Konfiguration fuer den Signaling-Service
#[derive(Debug, Clone)]
pub struct SignalingConfig {
    /// Feste Raumliste (unveraenderlich nach dem Start)
    pub raeume: Vec<String>,
    /// Nach dieser Zeit ohne Tipp-Event wird `typing(false)` angenommen (0 = aus)
    pub tipp_timeout: Duration,
    /// Keepalive-Intervall in Sekunden
    pub keepalive_sek: u64,
    /// Timeout fuer inaktive Verbindungen in Sekunden
    pub verbindungs_timeout_sek: u64,
    /// Groesse der Send-Queue pro Client
    pub send_queue_groesse: usize,
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self {
            raeume: STANDARD_RAEUME.iter().map(|r| r.to_string()).collect(),
            tipp_timeout: Duration::from_millis(3000),
            keepalive_sek: 30,
            verbindungs_timeout_sek: 90,
            send_queue_groesse: 64,
        }
    }
}

/// Gemeinsamer Server-Zustand (thread-safe, Arc-geteilt)
pub struct ChatState {
    pub config: Arc<SignalingConfig>,
    /// Wer ist in welchem Raum
    pub registry: ConnectionRegistry,
    /// History und Tipp-Status pro Raum
    pub raeume: RoomStore,
    /// Send-Queues aller verbundenen Clients
    pub broadcaster: EventBroadcaster,
    pub unread: UnreadZaehler,
    /// Startzeitpunkt des Servers (fuer Uptime-Berechnung)
    pub start_time: Instant,
}

impl ChatState {
    pub fn neu(config: SignalingConfig) -> Arc<Self> {
        let raeume = RoomStore::neu(&config.raeume);
        // Doppelte Eintraege sind im RoomStore bereits entfernt
        let namen = raeume.raum_namen().to_vec();

        Arc::new(Self {
            registry: ConnectionRegistry::neu(&namen),
            unread: UnreadZaehler::neu(&namen),
            raeume,
            broadcaster: EventBroadcaster::neu(),
            config: Arc::new(config),
            start_time: Instant::now(),
        })
    }

    /// Sendet ein Event an alle Verbindungen eines Raums
    ///
    /// Gibt die Anzahl der erfolgreichen Sendungen zurueck.
    pub fn an_raum_senden(&self, raum: &str, event: &ServerEvent) -> usize {
        let empfaenger: Vec<ClientId> = self
            .registry
            .nach_raum(raum)
            .into_iter()
            .map(|v| v.client_id)
            .collect();
        self.broadcaster.an_clients_senden(&empfaenger, event)
    }

    pub fn presence(&self) -> PresenceBroadcaster<'_> {
        PresenceBroadcaster::neu(self)
    }

    pub fn uptime_sek(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
