//! klatsch-signaling – Sitzungs- und Raumkoordination
//!
//! Dieser Crate implementiert den Echtzeit-Teil von Klatsch. Er verwaltet
//! WebSocket-Verbindungen, Raum-Mitgliedschaften, Tipp-Status und die
//! Verteilung aller Events an die richtigen Clients.
//!
//! ## Architektur
//!
//! ```text
//! WebSocket-Upgrade (Server-Crate)
//!     |
//!     v
//! ClientConnection (pro Verbindung ein Task)
//!     |  Sitzung: Ungebunden -> Beigetreten -> Getrennt
//!     |
//!     v
//! MessageRouter
//!     +-- beitreten / raum_wechseln
//!     +-- senden / privat_senden
//!     +-- tippen (mit TippTimer)
//!     +-- reagieren / als_gelesen_markieren
//!     +-- trennen
//!
//! ConnectionRegistry – Wer ist in welchem Raum
//! PresenceBroadcaster – Nutzer- und Tipp-Listen pro Raum
//! EventBroadcaster   – Events in die Send-Queues der Clients
//! UnreadZaehler      – Ungelesene Nachrichten pro Verbindung und Raum
//! ```

pub mod broadcast;
pub mod connection;
pub mod dto;
pub mod error;
pub mod presence;
pub mod registry;
pub mod router;
pub mod server_state;
pub mod session;
pub mod typing;
pub mod unread;

// Bequeme Re-Exporte
pub use broadcast::EventBroadcaster;
pub use connection::ClientConnection;
pub use error::{SignalingError, SignalingResult};
pub use presence::{PresenceAnsicht, PresenceBroadcaster};
pub use registry::{ConnectionRegistry, Verbindung};
pub use router::{MessageRouter, Mitglied};
pub use server_state::{ChatState, SignalingConfig};
pub use session::{Fortsetzung, Sitzung, SitzungsZustand};
pub use typing::TippTimer;
pub use unread::{UnreadStand, UnreadZaehler};
