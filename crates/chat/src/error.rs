//! Fehlertypen fuer das Chat-Crate

use klatsch_core::MessageId;
use thiserror::Error;

/// Chat-Fehlertypen
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("Ungueltiger Raum: {0}")]
    UngueltigerRaum(String),

    #[error("Nachricht nicht gefunden: {0}")]
    NachrichtNichtGefunden(MessageId),

    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),
}

pub type ChatResult<T> = Result<T, ChatError>;
