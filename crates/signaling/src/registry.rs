//! Verbindungs-Registry – welche Identitaet ist in welchem Raum
//!
//! Einzige Quelle der Wahrheit fuer Mitgliedschaften. Jede Identitaet ist
//! hoechstens einmal gebunden und immer genau einem Raum zugeordnet.
//! Nutzerlisten werden ausschliesslich hieraus abgeleitet.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use klatsch_core::ClientId;
use klatsch_protocol::ClientInfo;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use klatsch_chat::ChatError;

use crate::error::{SignalingError, SignalingResult};

/// Eine gebundene Verbindung
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verbindung {
    pub client_id: ClientId,
    pub display_name: String,
    pub room: String,
    /// Beitrittsreihenfolge (fuer stabile Nutzerlisten)
    pub beitritt_seq: u64,
}

impl Verbindung {
    /// Darstellung fuer Nutzerlisten
    pub fn info(&self) -> ClientInfo {
        ClientInfo {
            client_id: self.client_id,
            display_name: self.display_name.clone(),
            room: self.room.clone(),
        }
    }
}

/// Registry aller gebundenen Verbindungen
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct ConnectionRegistry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    verbindungen: DashMap<ClientId, Verbindung>,
    gueltige_raeume: HashSet<String>,
    naechste_seq: AtomicU64,
}

impl ConnectionRegistry {
    /// Erstellt eine leere Registry fuer die gegebene Raumliste
    pub fn neu<I, S>(raeume: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            inner: Arc::new(RegistryInner {
                verbindungen: DashMap::new(),
                gueltige_raeume: raeume.into_iter().map(|r| r.as_ref().to_string()).collect(),
                naechste_seq: AtomicU64::new(0),
            }),
        }
    }

    fn raum_pruefen(&self, raum: &str) -> SignalingResult<()> {
        if self.inner.gueltige_raeume.contains(raum) {
            Ok(())
        } else {
            Err(ChatError::UngueltigerRaum(raum.to_string()).into())
        }
    }

    /// Bindet eine Identitaet an Anzeigenamen und Raum
    pub fn binden(
        &self,
        client_id: ClientId,
        display_name: &str,
        raum: &str,
    ) -> SignalingResult<Verbindung> {
        self.raum_pruefen(raum)?;

        match self.inner.verbindungen.entry(client_id) {
            Entry::Occupied(_) => Err(SignalingError::DoppelteIdentitaet(client_id)),
            Entry::Vacant(eintrag) => {
                let verbindung = Verbindung {
                    client_id,
                    display_name: display_name.to_string(),
                    room: raum.to_string(),
                    beitritt_seq: self.inner.naechste_seq.fetch_add(1, Ordering::Relaxed),
                };
                eintrag.insert(verbindung.clone());
                tracing::debug!(client_id = %client_id, raum = %raum, "Verbindung gebunden");
                Ok(verbindung)
            }
        }
    }

    /// Ordnet eine gebundene Identitaet einem anderen Raum zu
    ///
    /// Gibt den vorherigen Raum zurueck.
    pub fn umbinden(&self, client_id: ClientId, neuer_raum: &str) -> SignalingResult<String> {
        self.raum_pruefen(neuer_raum)?;

        let mut verbindung = self
            .inner
            .verbindungen
            .get_mut(&client_id)
            .ok_or(SignalingError::UnbekannteIdentitaet(client_id))?;
        let alt = std::mem::replace(&mut verbindung.room, neuer_raum.to_string());
        // Im neuen Raum zaehlt die Ankunft als Beitritt
        verbindung.beitritt_seq = self.inner.naechste_seq.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(client_id = %client_id, von = %alt, nach = %neuer_raum, "Verbindung umgebunden");
        Ok(alt)
    }

    /// Entfernt eine Identitaet. Ohne Bindung passiert nichts.
    pub fn loesen(&self, client_id: &ClientId) -> Option<Verbindung> {
        self.inner.verbindungen.remove(client_id).map(|(_, v)| v)
    }

    /// Alle Verbindungen eines Raums in Beitrittsreihenfolge
    pub fn nach_raum(&self, raum: &str) -> Vec<Verbindung> {
        let mut liste: Vec<Verbindung> = self
            .inner
            .verbindungen
            .iter()
            .filter(|e| e.room == raum)
            .map(|e| e.value().clone())
            .collect();
        liste.sort_by_key(|v| v.beitritt_seq);
        liste
    }

    pub fn verbindung(&self, client_id: &ClientId) -> Option<Verbindung> {
        self.inner.verbindungen.get(client_id).map(|v| v.clone())
    }

    /// Aktueller Raum einer Identitaet
    pub fn raum_von(&self, client_id: &ClientId) -> Option<String> {
        self.inner.verbindungen.get(client_id).map(|v| v.room.clone())
    }

    pub fn ist_gebunden(&self, client_id: &ClientId) -> bool {
        self.inner.verbindungen.contains_key(client_id)
    }

    /// Anzahl gebundener Verbindungen
    pub fn anzahl(&self) -> usize {
        self.inner.verbindungen.len()
    }

    /// Alle Verbindungen (ohne bestimmte Reihenfolge)
    pub fn alle(&self) -> Vec<Verbindung> {
        self.inner
            .verbindungen
            .iter()
            .map(|e| e.value().clone())
            .collect()
    }
}
