//! Eingabepruefung fuer Anzeigenamen und Nachrichtentexte
//!
//! Laengen werden in Zeichen gezaehlt, nicht in Bytes.

use klatsch_core::limits::{MAX_ANZEIGENAME_ZEICHEN, MAX_NACHRICHT_ZEICHEN};

use crate::error::{ChatError, ChatResult};

/// Prueft einen Anzeigenamen und gibt ihn ohne umgebende Leerzeichen zurueck
pub fn anzeigename_pruefen(name: &str) -> ChatResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ChatError::UngueltigeEingabe(
            "Anzeigename darf nicht leer sein".into(),
        ));
    }

    let zeichen = name.chars().count();
    if zeichen > MAX_ANZEIGENAME_ZEICHEN {
        return Err(ChatError::UngueltigeEingabe(format!(
            "Anzeigename zu lang: {} Zeichen (Maximum: {})",
            zeichen, MAX_ANZEIGENAME_ZEICHEN
        )));
    }

    Ok(name.to_string())
}

/// Prueft einen Nachrichtentext. Der Text selbst wird nicht veraendert.
pub fn nachricht_pruefen(inhalt: &str) -> ChatResult<()> {
    if inhalt.trim().is_empty() {
        return Err(ChatError::UngueltigeEingabe(
            "Nachrichteninhalt darf nicht leer sein".into(),
        ));
    }

    let zeichen = inhalt.chars().count();
    if zeichen > MAX_NACHRICHT_ZEICHEN {
        return Err(ChatError::UngueltigeEingabe(format!(
            "Nachricht zu lang: {} Zeichen (Maximum: {})",
            zeichen, MAX_NACHRICHT_ZEICHEN
        )));
    }

    Ok(())
}
