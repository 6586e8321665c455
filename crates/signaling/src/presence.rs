//! Presence – Wer ist in einem Raum und wer tippt gerade
//!
//! Die Sicht auf einen Raum wird immer frisch aus Registry und RoomStore
//! berechnet, nie zwischengespeichert.
//!
//! `tippende_senden` und `ansicht` sperren den Raum selbst und duerfen
//! daher nicht innerhalb von `RoomStore::mit_raum` aufgerufen werden.

use klatsch_protocol::{ClientInfo, ServerEvent};

use crate::server_state::ChatState;

/// Momentaufnahme eines Raums
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceAnsicht {
    pub users: Vec<ClientInfo>,
    pub typing_names: Vec<String>,
}

pub struct PresenceBroadcaster<'a> {
    state: &'a ChatState,
}

impl<'a> PresenceBroadcaster<'a> {
    pub fn neu(state: &'a ChatState) -> Self {
        Self { state }
    }

    /// Nutzer in Beitrittsreihenfolge
    pub fn nutzer(&self, raum: &str) -> Vec<ClientInfo> {
        self.state
            .registry
            .nach_raum(raum)
            .iter()
            .map(|v| v.info())
            .collect()
    }

    pub fn ansicht(&self, raum: &str) -> PresenceAnsicht {
        PresenceAnsicht {
            users: self.nutzer(raum),
            typing_names: self.state.raeume.tippende(raum),
        }
    }

    /// Sendet die aktuelle Nutzerliste an alle im Raum
    pub fn nutzerliste_senden(&self, raum: &str) -> usize {
        let event = ServerEvent::UserList {
            room: raum.to_string(),
            users: self.nutzer(raum),
        };
        self.state.an_raum_senden(raum, &event)
    }

    /// Sendet die aktuelle Tipp-Liste an alle im Raum
    pub fn tippende_senden(&self, raum: &str) -> usize {
        let event = ServerEvent::TypingNames {
            room: raum.to_string(),
            names: self.state.raeume.tippende(raum),
        };
        self.state.an_raum_senden(raum, &event)
    }
}
