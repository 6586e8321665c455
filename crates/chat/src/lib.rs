//! klatsch-chat – Raum-Speicher
//!
//! Dieses Crate implementiert:
//! - RoomStore: pro Raum eine begrenzte History (FIFO, 100 Nachrichten)
//!   und die Menge der gerade tippenden Verbindungen
//! - ChatNachricht: unveraenderliche Kernfelder plus Reaktionen und
//!   Lesebestaetigungen, die nur wachsen
//! - Validierung von Anzeigenamen und Nachrichtentexten
//!
//! # Beispiel
//!
//! ```
//! use klatsch_chat::{ChatNachricht, RoomStore};
//! use klatsch_core::ClientId;
//!
//! let store = RoomStore::neu(["general", "tech"]);
//! let id = store.ids().naechste();
//! let nachricht = ChatNachricht::neu_im_raum(id, "anna", ClientId::new(), "hallo", "general");
//! store.anhaengen("general", nachricht).unwrap();
//! assert_eq!(store.history("general").unwrap().len(), 1);
//! ```

pub mod error;
pub mod store;
pub mod types;
pub mod validierung;

// Bequeme Re-Exporte
pub use error::{ChatError, ChatResult};
pub use store::{LeseStatus, Raum, RoomStore};
pub use types::{ChatNachricht, NachrichtenIdGenerator, NachrichtenZiel};
