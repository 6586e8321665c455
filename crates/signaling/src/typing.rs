//! Tipp-Timer pro Verbindung
//!
//! Nach `typing(true)` wird der Tipp-Status automatisch zurueckgesetzt, wenn
//! innerhalb des Timeouts kein weiteres Tipp-Event kommt. Der Timer handelt
//! nicht selbst: er meldet den Ablauf mit seiner Generation an die eigene
//! Verbindung, die dann prueft ob der Timer noch aktuell ist.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub struct TippTimer {
    timeout: Duration,
    generation: u64,
    token: Option<CancellationToken>,
    ablauf_tx: mpsc::Sender<u64>,
}

impl TippTimer {
    /// Erstellt einen Timer. Ein Timeout von 0 deaktiviert das Zuruecksetzen.
    pub fn neu(timeout: Duration, ablauf_tx: mpsc::Sender<u64>) -> Self {
        Self {
            timeout,
            generation: 0,
            token: None,
            ablauf_tx,
        }
    }

    /// Startet den Timer neu (ein laufender Timer wird abgebrochen)
    pub fn starten(&mut self) {
        self.abbrechen();
        if self.timeout.is_zero() {
            return;
        }

        self.generation += 1;
        let generation = self.generation;
        let token = CancellationToken::new();
        let abbruch = token.clone();
        let timeout = self.timeout;
        let tx = self.ablauf_tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = abbruch.cancelled() => {}
                _ = tokio::time::sleep(timeout) => {
                    let _ = tx.send(generation).await;
                }
            }
        });

        self.token = Some(token);
    }

    pub fn abbrechen(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }

    /// Prueft ob ein gemeldeter Ablauf zum laufenden Timer gehoert
    ///
    /// Ein aktueller Ablauf beendet den Timer.
    pub fn ablauf_uebernehmen(&mut self, generation: u64) -> bool {
        let aktuell = self.token.is_some() && generation == self.generation;
        if aktuell {
            self.token = None;
        }
        aktuell
    }

    pub fn laeuft(&self) -> bool {
        self.token.is_some()
    }
}

impl Drop for TippTimer {
    fn drop(&mut self) {
        self.abbrechen();
    }
}
