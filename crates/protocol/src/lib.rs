//! klatsch-protocol – Event-Definitionen
//!
//! Dieses Crate definiert alle Events, die zwischen Client und Server
//! ueber die WebSocket-Verbindung ausgetauscht werden, sowie die
//! Antwort-Typen der lesenden HTTP-Endpunkte.

pub mod events;

pub use events::{ClientEvent, ClientInfo, NachrichtInfo, RejectCode, ServerEvent};
