//! Umwandlung von Domain-Typen in Protokoll-Strukturen

use klatsch_chat::{ChatNachricht, NachrichtenZiel};
use klatsch_protocol::NachrichtInfo;

/// Wandelt eine gespeicherte Nachricht in die ausgelieferte Form um
pub fn nachricht_info(nachricht: &ChatNachricht) -> NachrichtInfo {
    let (room, recipient_id) = match nachricht.ziel() {
        NachrichtenZiel::Raum(raum) => (Some(raum.clone()), None),
        NachrichtenZiel::Privat { empfaenger_id } => (None, Some(*empfaenger_id)),
    };

    NachrichtInfo {
        id: nachricht.id(),
        sender: nachricht.sender().to_string(),
        sender_id: nachricht.sender_id(),
        message: nachricht.inhalt().to_string(),
        timestamp: nachricht.erstellt_am(),
        room,
        is_private: nachricht.ist_privat(),
        recipient_id,
        reactions: nachricht.reaktionen().clone(),
        read_by: nachricht.gelesen_von().to_vec(),
    }
}

/// Wandelt eine History in die ausgelieferte Form um
pub fn history_info(nachrichten: &[ChatNachricht]) -> Vec<NachrichtInfo> {
    nachrichten.iter().map(nachricht_info).collect()
}
