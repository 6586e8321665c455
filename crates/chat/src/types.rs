//! Domain-Typen fuer Chat-Nachrichten

use chrono::{DateTime, Utc};
use klatsch_core::{ClientId, MessageId};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Wohin eine Nachricht gehoert: genau ein Raum oder privat, nie beides
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NachrichtenZiel {
    Raum(String),
    Privat { empfaenger_id: ClientId },
}

/// Eine Chat-Nachricht
///
/// Die Kernfelder sind nach dem Erstellen unveraenderlich. Reaktionen und
/// Lesebestaetigungen koennen nur wachsen.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatNachricht {
    id: MessageId,
    sender: String,
    sender_id: ClientId,
    inhalt: String,
    erstellt_am: DateTime<Utc>,
    ziel: NachrichtenZiel,
    /// Symbol -> Anzeigenamen in Reihenfolge der Reaktion
    reaktionen: BTreeMap<String, Vec<String>>,
    gelesen_von: Vec<String>,
}

impl ChatNachricht {
    fn neu(
        id: MessageId,
        sender: &str,
        sender_id: ClientId,
        inhalt: &str,
        ziel: NachrichtenZiel,
    ) -> Self {
        Self {
            id,
            sender: sender.to_string(),
            sender_id,
            inhalt: inhalt.to_string(),
            erstellt_am: Utc::now(),
            ziel,
            reaktionen: BTreeMap::new(),
            // Der Sender hat seine eigene Nachricht immer gelesen
            gelesen_von: vec![sender.to_string()],
        }
    }

    /// Erstellt eine Nachricht fuer die History eines Raums
    pub fn neu_im_raum(
        id: MessageId,
        sender: &str,
        sender_id: ClientId,
        inhalt: &str,
        raum: &str,
    ) -> Self {
        Self::neu(
            id,
            sender,
            sender_id,
            inhalt,
            NachrichtenZiel::Raum(raum.to_string()),
        )
    }

    /// Erstellt eine private Nachricht (wird in keinem Raum gespeichert)
    pub fn neu_privat(
        id: MessageId,
        sender: &str,
        sender_id: ClientId,
        inhalt: &str,
        empfaenger_id: ClientId,
    ) -> Self {
        Self::neu(
            id,
            sender,
            sender_id,
            inhalt,
            NachrichtenZiel::Privat { empfaenger_id },
        )
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn sender_id(&self) -> ClientId {
        self.sender_id
    }

    pub fn inhalt(&self) -> &str {
        &self.inhalt
    }

    pub fn erstellt_am(&self) -> DateTime<Utc> {
        self.erstellt_am
    }

    pub fn ziel(&self) -> &NachrichtenZiel {
        &self.ziel
    }

    /// Raum der Nachricht, `None` bei privaten Nachrichten
    pub fn raum(&self) -> Option<&str> {
        match &self.ziel {
            NachrichtenZiel::Raum(raum) => Some(raum),
            NachrichtenZiel::Privat { .. } => None,
        }
    }

    pub fn ist_privat(&self) -> bool {
        matches!(self.ziel, NachrichtenZiel::Privat { .. })
    }

    pub fn reaktionen(&self) -> &BTreeMap<String, Vec<String>> {
        &self.reaktionen
    }

    pub fn gelesen_von(&self) -> &[String] {
        &self.gelesen_von
    }

    /// Fuegt eine Reaktion hinzu. Gibt `false` zurueck wenn sie schon existierte.
    pub(crate) fn reaktion_hinzufuegen(&mut self, symbol: &str, anzeigename: &str) -> bool {
        let namen = self.reaktionen.entry(symbol.to_string()).or_default();
        if namen.iter().any(|n| n == anzeigename) {
            return false;
        }
        namen.push(anzeigename.to_string());
        true
    }

    /// Markiert die Nachricht als gelesen. Gibt `false` zurueck wenn schon gelesen.
    pub(crate) fn als_gelesen_markieren(&mut self, anzeigename: &str) -> bool {
        if self.gelesen_von.iter().any(|n| n == anzeigename) {
            return false;
        }
        self.gelesen_von.push(anzeigename.to_string());
        true
    }
}

/// Prozessweiter Generator fuer Nachrichten-IDs
///
/// Streng monoton steigend, beginnend bei 1.
#[derive(Debug, Default)]
pub struct NachrichtenIdGenerator {
    letzte: AtomicU64,
}

impl NachrichtenIdGenerator {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Vergibt die naechste ID
    pub fn naechste(&self) -> MessageId {
        MessageId(self.letzte.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_hat_eigene_nachricht_gelesen() {
        let n = ChatNachricht::neu_im_raum(MessageId(1), "anna", ClientId::new(), "hi", "general");
        assert_eq!(n.gelesen_von(), ["anna".to_string()]);
        assert_eq!(n.raum(), Some("general"));
        assert!(!n.ist_privat());
    }

    #[test]
    fn private_nachricht_hat_keinen_raum() {
        let empfaenger = ClientId::new();
        let n = ChatNachricht::neu_privat(MessageId(2), "anna", ClientId::new(), "psst", empfaenger);
        assert!(n.ist_privat());
        assert_eq!(n.raum(), None);
        assert_eq!(n.ziel(), &NachrichtenZiel::Privat { empfaenger_id: empfaenger });
    }

    #[test]
    fn reaktion_ist_idempotent() {
        let mut n =
            ChatNachricht::neu_im_raum(MessageId(1), "anna", ClientId::new(), "hi", "general");
        assert!(n.reaktion_hinzufuegen("👍", "ben"));
        assert!(!n.reaktion_hinzufuegen("👍", "ben"));
        assert!(n.reaktion_hinzufuegen("🎉", "ben"));
        assert_eq!(n.reaktionen()["👍"], vec!["ben".to_string()]);
        assert_eq!(n.reaktionen().len(), 2);
    }

    #[test]
    fn gelesen_markieren_ist_idempotent() {
        let mut n =
            ChatNachricht::neu_im_raum(MessageId(1), "anna", ClientId::new(), "hi", "general");
        assert!(!n.als_gelesen_markieren("anna"));
        assert!(n.als_gelesen_markieren("ben"));
        assert!(!n.als_gelesen_markieren("ben"));
        assert_eq!(n.gelesen_von().len(), 2);
    }

    #[test]
    fn ids_steigen_monoton() {
        let generator = NachrichtenIdGenerator::neu();
        let a = generator.naechste();
        let b = generator.naechste();
        assert_eq!(a, MessageId(1));
        assert!(b > a);
    }
}
