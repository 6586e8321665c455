//! Protokoll-Grenzwerte
//!
//! Gelten serverweit und sind nicht konfigurierbar.

/// Maximale Laenge eines Anzeigenamens in Zeichen
pub const MAX_ANZEIGENAME_ZEICHEN: usize = 20;

/// Maximale Laenge eines Nachrichtentexts in Zeichen
pub const MAX_NACHRICHT_ZEICHEN: usize = 500;

/// Maximale Anzahl Nachrichten in der History eines Raums
pub const HISTORY_KAPAZITAET: usize = 100;

/// Raum, der verwendet wird wenn ein Client keinen angibt
pub const STANDARD_RAUM: &str = "general";

/// Fest definierte Raeume, falls die Konfiguration keine vorgibt
pub const STANDARD_RAEUME: [&str; 3] = ["general", "random", "tech"];
