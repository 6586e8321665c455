//! Gemeinsame Identifikationstypen fuer Klatsch
//!
//! Alle IDs verwenden das Newtype-Pattern um Verwechslungen zwischen
//! verschiedenen ID-Arten zur Compilezeit auszuschliessen.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identitaet einer lebenden Verbindung
///
/// Wird beim Oeffnen der Verbindung vergeben und ist nur so lange gueltig
/// wie die Verbindung besteht.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub Uuid);

impl ClientId {
    /// Erstellt eine neue zufaellige ClientId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "client:{}", self.0)
    }
}

/// Nachrichten-ID
///
/// Prozessweit eindeutig und monoton steigend, damit IDs direkt nach
/// Aktualitaet verglichen werden koennen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl MessageId {
    /// Gibt den inneren Zaehlerwert zurueck
    pub fn inner(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "msg:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_id_eindeutig() {
        let a = ClientId::new();
        let b = ClientId::new();
        assert_ne!(a, b, "Zwei neue ClientIds muessen verschieden sein");
    }

    #[test]
    fn client_id_display() {
        let id = ClientId(Uuid::nil());
        assert!(id.to_string().starts_with("client:"));
    }

    #[test]
    fn message_id_ordnung() {
        assert!(MessageId(1) < MessageId(2));
        assert_eq!(MessageId(7).to_string(), "msg:7");
    }

    #[test]
    fn ids_werden_transparent_serialisiert() {
        let uid = ClientId(Uuid::nil());
        let json = serde_json::to_string(&uid).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");

        let mid: MessageId = serde_json::from_str("42").unwrap();
        assert_eq!(mid, MessageId(42));
    }
}
