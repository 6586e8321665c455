//! WebSocket-Events (JSON-Textframes)
//!
//! Definiert alle Events die ueber die WebSocket-Verbindung zwischen
//! Client und Server ausgetauscht werden.
//!
//! ## Design
//! - Geschlossene Tagged Enums: ein Variant pro Event-Art, `"type"` als Tag
//! - JSON-Serialisierung via serde
//! - Eingehend (`ClientEvent`) und ausgehend (`ServerEvent`) sind getrennte
//!   Typen, damit der Server nie versehentlich ein Server-Event annimmt

use chrono::{DateTime, Utc};
use klatsch_core::{limits::STANDARD_RAUM, ClientId, MessageId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Ablehnungs-Codes
// ---------------------------------------------------------------------------

/// Codes fuer Ablehnungen, die nur an den anfragenden Client gehen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectCode {
    /// Frame war kein gueltiges Event
    InvalidRequest,
    /// Raum gehoert nicht zur festen Raumliste
    InvalidRoom,
    /// Anzeigename oder Nachrichtentext ungueltig
    ValidationFailed,
}

// ---------------------------------------------------------------------------
// Gemeinsame Strukturen
// ---------------------------------------------------------------------------

/// Zusammenfassung einer Verbindung fuer Nutzerlisten
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub client_id: ClientId,
    pub display_name: String,
    pub room: String,
}

/// Nachricht wie sie an Clients ausgeliefert wird
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NachrichtInfo {
    pub id: MessageId,
    pub sender: String,
    pub sender_id: ClientId,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Raum der Nachricht (None bei privaten Nachrichten)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub room: Option<String>,
    pub is_private: bool,
    /// Empfaenger (nur bei privaten Nachrichten)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub recipient_id: Option<ClientId>,
    pub reactions: BTreeMap<String, Vec<String>>,
    pub read_by: Vec<String>,
}

fn standard_raum() -> String {
    STANDARD_RAUM.to_string()
}

// ---------------------------------------------------------------------------
// Client -> Server
// ---------------------------------------------------------------------------

/// Alle Events die ein Client senden darf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Mit Anzeigenamen einem Raum beitreten
    Join {
        display_name: String,
        #[serde(default = "standard_raum")]
        room: String,
    },
    /// Nachricht in den aktuellen Raum senden
    Send { message: String },
    /// Private Nachricht an genau eine andere Verbindung
    PrivateSend { to: ClientId, message: String },
    /// Tipp-Status setzen
    Typing { is_typing: bool },
    /// In einen anderen Raum wechseln
    SwitchRoom { room: String },
    /// Reaktion auf eine Nachricht im aktuellen Raum
    React { message_id: MessageId, emoji: String },
    /// Nachricht als gelesen markieren
    MarkRead { message_id: MessageId },
    /// Sitzung beenden (entspricht dem Schliessen der Verbindung)
    Disconnect,
}

impl ClientEvent {
    /// Deserialisiert ein Event aus einem JSON-Textframe
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Kurzname fuer Logs
    pub fn art(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Send { .. } => "send",
            Self::PrivateSend { .. } => "private_send",
            Self::Typing { .. } => "typing",
            Self::SwitchRoom { .. } => "switch_room",
            Self::React { .. } => "react",
            Self::MarkRead { .. } => "mark_read",
            Self::Disconnect => "disconnect",
        }
    }
}

// ---------------------------------------------------------------------------
// Server -> Client
// ---------------------------------------------------------------------------

/// Alle Events die der Server an Clients sendet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Begruessung direkt nach dem Verbindungsaufbau
    Connected {
        client_id: ClientId,
        rooms: Vec<String>,
    },
    /// History eines Raums (beim Beitritt und beim Raumwechsel)
    RoomHistory {
        room: String,
        messages: Vec<NachrichtInfo>,
    },
    /// Neue Nachricht im Raum
    NewMessage { message: NachrichtInfo },
    /// Private Nachricht (nur Sender und Empfaenger)
    PrivateMessage { message: NachrichtInfo },
    /// Aktuelle Nutzerliste eines Raums
    UserList { room: String, users: Vec<ClientInfo> },
    /// Jemand ist dem Raum beigetreten
    UserJoined {
        display_name: String,
        client_id: ClientId,
    },
    /// Jemand hat den Server verlassen
    UserLeft {
        display_name: String,
        client_id: ClientId,
    },
    /// Wer tippt gerade im Raum
    TypingNames { room: String, names: Vec<String> },
    /// Reaktionen oder Lesebestaetigungen einer Nachricht haben sich geaendert
    MessageUpdated { message: NachrichtInfo },
    /// Ungelesene Nachrichten pro Raum
    UnreadCounts { counts: BTreeMap<String, u32> },
    /// Ablehnung einer Anfrage (nur an den Anfragenden)
    Rejected { code: RejectCode, reason: String },
}

impl ServerEvent {
    /// Erstellt eine Ablehnung
    pub fn rejected(code: RejectCode, reason: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            reason: reason.into(),
        }
    }

    /// Serialisiert das Event als JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
