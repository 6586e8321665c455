//! RoomStore – History, Reaktionen, Lesebestaetigungen und Tipp-Status pro Raum
//!
//! Die Raumliste ist nach dem Start fest. Jeder Raum hat seine eigene
//! Sperre; die Map der Raeume selbst wird nach der Konstruktion nicht mehr
//! veraendert und braucht daher keine.
//!
//! ## History
//! FIFO mit Kapazitaet [`HISTORY_KAPAZITAET`]. Das Verdraengen der aeltesten
//! Nachricht passiert im selben kritischen Abschnitt wie das Anhaengen und
//! ist nach aussen nur ueber die naechste History-Abfrage sichtbar.

use klatsch_core::{limits::HISTORY_KAPAZITAET, ClientId, MessageId};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

use crate::error::{ChatError, ChatResult};
use crate::types::{ChatNachricht, NachrichtenIdGenerator};

// ---------------------------------------------------------------------------
// LeseStatus
// ---------------------------------------------------------------------------

/// Ergebnis einer Lesebestaetigung
#[derive(Debug, Clone, PartialEq)]
pub enum LeseStatus {
    /// Name wurde neu eingetragen
    Aktualisiert(ChatNachricht),
    /// Name war schon eingetragen, nichts zu verteilen
    Unveraendert,
}

// ---------------------------------------------------------------------------
// Raum
// ---------------------------------------------------------------------------

/// Zustand eines einzelnen Raums
#[derive(Debug)]
pub struct Raum {
    name: String,
    nachrichten: VecDeque<ChatNachricht>,
    /// Tippende Verbindungen in Reihenfolge des Tipp-Beginns
    tippende: Vec<(ClientId, String)>,
}

impl Raum {
    fn neu(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nachrichten: VecDeque::with_capacity(HISTORY_KAPAZITAET + 1),
            tippende: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Anzahl der Nachrichten in der History
    pub fn laenge(&self) -> usize {
        self.nachrichten.len()
    }

    /// Haengt eine Nachricht an und verdraengt bei Ueberlauf die aelteste
    ///
    /// Gibt die verdraengte Nachricht zurueck.
    pub fn anhaengen(&mut self, nachricht: ChatNachricht) -> ChatResult<Option<ChatNachricht>> {
        if nachricht.raum() != Some(self.name.as_str()) {
            return Err(ChatError::UngueltigeEingabe(format!(
                "Nachricht {} gehoert nicht in Raum '{}'",
                nachricht.id(),
                self.name
            )));
        }

        Ok(self.einreihen(nachricht))
    }

    /// Einzige Stelle, an der die Kapazitaet der History durchgesetzt wird
    fn einreihen(&mut self, nachricht: ChatNachricht) -> Option<ChatNachricht> {
        self.nachrichten.push_back(nachricht);
        if self.nachrichten.len() > HISTORY_KAPAZITAET {
            return self.nachrichten.pop_front();
        }
        None
    }

    /// Erstellt eine Nachricht mit frischer ID und haengt sie an
    ///
    /// Die ID wird innerhalb der Raumsperre vergeben, damit die Reihenfolge
    /// der History der Reihenfolge der IDs entspricht.
    pub fn nachricht_erstellen(
        &mut self,
        ids: &NachrichtenIdGenerator,
        sender: &str,
        sender_id: ClientId,
        inhalt: &str,
    ) -> ChatNachricht {
        let nachricht =
            ChatNachricht::neu_im_raum(ids.naechste(), sender, sender_id, inhalt, &self.name);
        if let Some(verdraengt) = self.einreihen(nachricht.clone()) {
            tracing::trace!(room = %self.name, message_id = %verdraengt.id(), "Nachricht verdraengt");
        }
        nachricht
    }

    /// Kopie der aktuellen History (aelteste zuerst)
    pub fn history(&self) -> Vec<ChatNachricht> {
        self.nachrichten.iter().cloned().collect()
    }

    pub fn nachricht(&self, id: MessageId) -> Option<&ChatNachricht> {
        self.nachrichten.iter().find(|n| n.id() == id)
    }

    fn nachricht_mut(&mut self, id: MessageId) -> ChatResult<&mut ChatNachricht> {
        self.nachrichten
            .iter_mut()
            .find(|n| n.id() == id)
            .ok_or(ChatError::NachrichtNichtGefunden(id))
    }

    /// Traegt eine Reaktion ein (idempotent) und gibt die Nachricht zurueck
    pub fn reagieren(
        &mut self,
        id: MessageId,
        symbol: &str,
        anzeigename: &str,
    ) -> ChatResult<ChatNachricht> {
        let nachricht = self.nachricht_mut(id)?;
        nachricht.reaktion_hinzufuegen(symbol, anzeigename);
        Ok(nachricht.clone())
    }

    /// Traegt eine Lesebestaetigung ein (idempotent)
    pub fn als_gelesen_markieren(
        &mut self,
        id: MessageId,
        anzeigename: &str,
    ) -> ChatResult<LeseStatus> {
        let nachricht = self.nachricht_mut(id)?;
        if nachricht.als_gelesen_markieren(anzeigename) {
            Ok(LeseStatus::Aktualisiert(nachricht.clone()))
        } else {
            Ok(LeseStatus::Unveraendert)
        }
    }

    /// Setzt oder entfernt den Tipp-Status. Gibt `true` zurueck wenn sich etwas geaendert hat.
    pub fn tippen_setzen(&mut self, client_id: ClientId, anzeigename: &str, tippt: bool) -> bool {
        let position = self.tippende.iter().position(|(id, _)| *id == client_id);
        match (tippt, position) {
            (true, None) => {
                self.tippende.push((client_id, anzeigename.to_string()));
                true
            }
            (false, Some(index)) => {
                self.tippende.remove(index);
                true
            }
            _ => false,
        }
    }

    /// Anzeigenamen aller gerade Tippenden
    pub fn tippende(&self) -> Vec<String> {
        self.tippende.iter().map(|(_, name)| name.clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// RoomStore
// ---------------------------------------------------------------------------

/// Alle Raeume des Servers
pub struct RoomStore {
    raeume: HashMap<String, Mutex<Raum>>,
    /// Raumnamen in konfigurierter Reihenfolge
    namen: Vec<String>,
    ids: NachrichtenIdGenerator,
}

impl RoomStore {
    /// Legt alle Raeume der festen Raumliste an
    ///
    /// Doppelte Namen werden ignoriert.
    pub fn neu<I, S>(raeume: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        let mut namen = Vec::new();
        for raum in raeume {
            let raum = raum.as_ref();
            if map.contains_key(raum) {
                continue;
            }
            map.insert(raum.to_string(), Mutex::new(Raum::neu(raum)));
            namen.push(raum.to_string());
        }

        tracing::debug!(raeume = ?namen, "RoomStore angelegt");

        Self {
            raeume: map,
            namen,
            ids: NachrichtenIdGenerator::neu(),
        }
    }

    /// Raumnamen in konfigurierter Reihenfolge
    pub fn raum_namen(&self) -> &[String] {
        &self.namen
    }

    pub fn ist_gueltig(&self, raum: &str) -> bool {
        self.raeume.contains_key(raum)
    }

    /// ID-Generator (auch fuer private Nachrichten)
    pub fn ids(&self) -> &NachrichtenIdGenerator {
        &self.ids
    }

    /// Fuehrt `f` innerhalb der Sperre eines Raums aus
    pub fn mit_raum<R>(&self, raum: &str, f: impl FnOnce(&mut Raum) -> R) -> ChatResult<R> {
        let eintrag = self
            .raeume
            .get(raum)
            .ok_or_else(|| ChatError::UngueltigerRaum(raum.to_string()))?;
        let mut guard = eintrag.lock();
        Ok(f(&mut guard))
    }

    /// Haengt eine fertige Nachricht an die History an
    pub fn anhaengen(&self, raum: &str, nachricht: ChatNachricht) -> ChatResult<ChatNachricht> {
        self.mit_raum(raum, |r| {
            let kopie = nachricht.clone();
            if let Some(verdraengt) = r.anhaengen(nachricht)? {
                tracing::trace!(room = %raum, message_id = %verdraengt.id(), "Nachricht verdraengt");
            }
            Ok(kopie)
        })?
    }

    /// Erstellt eine Nachricht mit frischer ID im Raum
    pub fn nachricht_erstellen(
        &self,
        raum: &str,
        sender: &str,
        sender_id: ClientId,
        inhalt: &str,
    ) -> ChatResult<ChatNachricht> {
        self.mit_raum(raum, |r| r.nachricht_erstellen(&self.ids, sender, sender_id, inhalt))
    }

    pub fn history(&self, raum: &str) -> ChatResult<Vec<ChatNachricht>> {
        self.mit_raum(raum, |r| r.history())
    }

    pub fn nachricht_finden(&self, raum: &str, id: MessageId) -> ChatResult<ChatNachricht> {
        self.mit_raum(raum, |r| r.nachricht(id).cloned())?
            .ok_or(ChatError::NachrichtNichtGefunden(id))
    }

    pub fn reagieren(
        &self,
        raum: &str,
        id: MessageId,
        symbol: &str,
        anzeigename: &str,
    ) -> ChatResult<ChatNachricht> {
        self.mit_raum(raum, |r| r.reagieren(id, symbol, anzeigename))?
    }

    pub fn als_gelesen_markieren(
        &self,
        raum: &str,
        id: MessageId,
        anzeigename: &str,
    ) -> ChatResult<LeseStatus> {
        self.mit_raum(raum, |r| r.als_gelesen_markieren(id, anzeigename))?
    }

    /// Setzt den Tipp-Status
    ///
    /// Ein unbekannter Raum ist ein Programmierfehler des Aufrufers und wird
    /// nur geloggt.
    pub fn tippen_setzen(
        &self,
        raum: &str,
        client_id: ClientId,
        anzeigename: &str,
        tippt: bool,
    ) -> bool {
        match self.mit_raum(raum, |r| r.tippen_setzen(client_id, anzeigename, tippt)) {
            Ok(geaendert) => geaendert,
            Err(e) => {
                tracing::error!(room = %raum, client_id = %client_id, fehler = %e, "Tipp-Status fuer unbekannten Raum");
                false
            }
        }
    }

    pub fn tippende(&self, raum: &str) -> Vec<String> {
        self.mit_raum(raum, |r| r.tippende()).unwrap_or_default()
    }

    /// Anzahl Nachrichten in der History eines Raums (0 fuer unbekannte Raeume)
    pub fn history_laenge(&self, raum: &str) -> usize {
        self.mit_raum(raum, |r| r.laenge()).unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
