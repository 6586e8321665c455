//! klatsch-core – Gemeinsame Typen und Grenzwerte
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von allen
//! anderen Klatsch-Crates gemeinsam genutzt werden.

pub mod limits;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use types::{ClientId, MessageId};
