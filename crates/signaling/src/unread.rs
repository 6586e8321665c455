//! Ungelesen-Zaehler pro Verbindung und Raum
//!
//! Eine neue Nachricht in Raum R erhoeht R fuer alle gebundenen Verbindungen,
//! die gerade in einem anderen Raum sind. Beitritt oder Wechsel nach R setzt
//! R zurueck. Beim Trennen wird der Eintrag verworfen.

use dashmap::DashMap;
use klatsch_core::ClientId;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Zaehlerstand einer Verbindung: Raum -> Anzahl
pub type UnreadStand = BTreeMap<String, u32>;

#[derive(Clone)]
pub struct UnreadZaehler {
    inner: Arc<UnreadInner>,
}

struct UnreadInner {
    raeume: Vec<String>,
    zaehler: DashMap<ClientId, UnreadStand>,
}

impl UnreadZaehler {
    pub fn neu<I, S>(raeume: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            inner: Arc::new(UnreadInner {
                raeume: raeume.into_iter().map(|r| r.as_ref().to_string()).collect(),
                zaehler: DashMap::new(),
            }),
        }
    }

    fn leerer_stand(&self) -> UnreadStand {
        self.inner.raeume.iter().map(|r| (r.clone(), 0)).collect()
    }

    /// Erhoeht den Zaehler fuer `raum` und gibt den neuen Stand zurueck
    ///
    /// Nur bestehende Eintraege werden erhoeht. Angelegt wird ein Eintrag
    /// ausschliesslich ueber [`zuruecksetzen`](Self::zuruecksetzen) beim
    /// Beitritt; nach `entfernen` liefert diese Methode `None`.
    pub fn erhoehen(&self, client_id: ClientId, raum: &str) -> Option<UnreadStand> {
        let mut stand = self.inner.zaehler.get_mut(&client_id)?;
        *stand.entry(raum.to_string()).or_insert(0) += 1;
        Some(stand.clone())
    }

    /// Setzt den Zaehler fuer `raum` auf 0 und gibt den neuen Stand zurueck
    pub fn zuruecksetzen(&self, client_id: ClientId, raum: &str) -> UnreadStand {
        let mut stand = self
            .inner
            .zaehler
            .entry(client_id)
            .or_insert_with(|| self.leerer_stand());
        stand.insert(raum.to_string(), 0);
        stand.clone()
    }

    /// Aktueller Stand (alle Raeume 0 wenn unbekannt)
    pub fn stand(&self, client_id: &ClientId) -> UnreadStand {
        self.inner
            .zaehler
            .get(client_id)
            .map(|s| s.clone())
            .unwrap_or_else(|| self.leerer_stand())
    }

    pub fn entfernen(&self, client_id: &ClientId) {
        self.inner.zaehler.remove(client_id);
    }

    /// Anzahl Verbindungen mit Zaehlerstand
    pub fn anzahl(&self) -> usize {
        self.inner.zaehler.len()
    }
}
