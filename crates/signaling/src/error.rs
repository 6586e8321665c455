//! Fehlertypen fuer den Signaling-Service

use klatsch_chat::ChatError;
use klatsch_core::ClientId;
use klatsch_protocol::RejectCode;
use thiserror::Error;

/// Fehlertyp fuer den Signaling-Service
#[derive(Debug, Error)]
pub enum SignalingError {
    /// Identitaet ist bereits an eine Verbindung gebunden
    #[error("Identitaet bereits gebunden: {0}")]
    DoppelteIdentitaet(ClientId),

    /// Identitaet ist nicht (mehr) in der Registry
    #[error("Unbekannte Identitaet: {0}")]
    UnbekannteIdentitaet(ClientId),

    /// Fehler aus Raum-Store oder Eingabepruefung
    #[error(transparent)]
    Chat(#[from] ChatError),

    /// Protokollfehler (ungueltiges Frame, falscher Zustand)
    #[error("Protokollfehler: {0}")]
    Protokoll(String),

    /// Senden an Client fehlgeschlagen (Queue voll oder geschlossen)
    #[error("Senden fehlgeschlagen")]
    SendFehler,
}

impl SignalingError {
    /// Erstellt einen Protokollfehler
    pub fn protokoll(msg: impl Into<String>) -> Self {
        Self::Protokoll(msg.into())
    }

    /// Ablehnungs-Code fuer den Anfragenden
    ///
    /// `None` bedeutet: Anfrage wird still verworfen.
    pub fn ablehnung(&self) -> Option<RejectCode> {
        match self {
            Self::Chat(ChatError::UngueltigerRaum(_)) => Some(RejectCode::InvalidRoom),
            Self::Chat(ChatError::UngueltigeEingabe(_)) => Some(RejectCode::ValidationFailed),
            Self::Protokoll(_) => Some(RejectCode::InvalidRequest),
            Self::Chat(ChatError::NachrichtNichtGefunden(_))
            | Self::UnbekannteIdentitaet(_)
            | Self::DoppelteIdentitaet(_)
            | Self::SendFehler => None,
        }
    }
}

/// Result-Typ fuer den Signaling-Service
pub type SignalingResult<T> = Result<T, SignalingError>;
