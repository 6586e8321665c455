//! Sitzung – Zustandsautomat einer einzelnen Verbindung
//!
//! ```text
//! Ungebunden --join--> Beigetreten --disconnect/close--> Getrennt
//!      \___________________disconnect/close______________/
//! ```
//!
//! Im Zustand `Ungebunden` wird nur `join` angenommen, alles andere wird
//! still verworfen. `Getrennt` ist endgueltig.

use klatsch_core::ClientId;
use klatsch_protocol::ClientEvent;

use crate::router::{MessageRouter, Mitglied};
use crate::typing::TippTimer;

/// Zustand einer Sitzung
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitzungsZustand {
    Ungebunden,
    Beigetreten(Mitglied),
    Getrennt,
}

/// Ob die Verbindung nach einem Event weiterlaufen soll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fortsetzung {
    Weiter,
    Beenden,
}

pub struct Sitzung {
    client_id: ClientId,
    zustand: SitzungsZustand,
    router: MessageRouter,
    tipp_timer: TippTimer,
}

impl Sitzung {
    pub fn neu(client_id: ClientId, router: MessageRouter, tipp_timer: TippTimer) -> Self {
        Self {
            client_id,
            zustand: SitzungsZustand::Ungebunden,
            router,
            tipp_timer,
        }
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn zustand(&self) -> &SitzungsZustand {
        &self.zustand
    }

    /// Verarbeitet ein eingehendes Event
    pub fn verarbeiten(&mut self, event: ClientEvent) -> Fortsetzung {
        if event == ClientEvent::Disconnect {
            self.trennen();
            return Fortsetzung::Beenden;
        }

        match self.zustand.clone() {
            SitzungsZustand::Ungebunden => self.ungebunden_verarbeiten(event),
            SitzungsZustand::Beigetreten(mitglied) => self.beigetreten_verarbeiten(&mitglied, event),
            SitzungsZustand::Getrennt => {
                tracing::trace!(client_id = %self.client_id, event = event.art(), "Event nach Trennung verworfen");
            }
        }

        Fortsetzung::Weiter
    }

    fn ungebunden_verarbeiten(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::Join { display_name, room } => {
                if let Some(mitglied) = self.router.beitreten(self.client_id, &display_name, &room) {
                    self.zustand = SitzungsZustand::Beigetreten(mitglied);
                }
            }
            andere => {
                tracing::debug!(client_id = %self.client_id, event = andere.art(), "Event vor Beitritt verworfen");
            }
        }
    }

    fn beigetreten_verarbeiten(&mut self, mitglied: &Mitglied, event: ClientEvent) {
        match event {
            ClientEvent::Send { message } => self.router.senden(mitglied, &message),
            ClientEvent::PrivateSend { to, message } => {
                self.router.privat_senden(mitglied, to, &message)
            }
            ClientEvent::Typing { is_typing } => {
                self.router.tippen(mitglied, is_typing);
                if is_typing {
                    self.tipp_timer.starten();
                } else {
                    self.tipp_timer.abbrechen();
                }
            }
            ClientEvent::SwitchRoom { room } => {
                self.tipp_timer.abbrechen();
                self.router.raum_wechseln(mitglied, &room);
            }
            ClientEvent::React { message_id, emoji } => {
                self.router.reagieren(mitglied, message_id, &emoji)
            }
            ClientEvent::MarkRead { message_id } => {
                self.router.als_gelesen_markieren(mitglied, message_id)
            }
            ClientEvent::Join { .. } | ClientEvent::Disconnect => {
                tracing::debug!(client_id = %self.client_id, event = event.art(), "Event im Zustand Beigetreten verworfen");
            }
        }
    }

    /// Meldung des Tipp-Timers
    ///
    /// Nur ein noch aktueller Timer setzt den Tipp-Status zurueck.
    pub fn tipp_ablauf(&mut self, generation: u64) {
        if !self.tipp_timer.ablauf_uebernehmen(generation) {
            return;
        }
        if let SitzungsZustand::Beigetreten(mitglied) = &self.zustand {
            tracing::trace!(client_id = %self.client_id, "Tipp-Timeout abgelaufen");
            self.router.tippen(mitglied, false);
        }
    }

    /// Beendet die Sitzung (idempotent)
    pub fn trennen(&mut self) {
        if self.zustand == SitzungsZustand::Getrennt {
            return;
        }
        self.tipp_timer.abbrechen();
        self.router.trennen(self.client_id);
        self.zustand = SitzungsZustand::Getrennt;
    }
}

impl Drop for Sitzung {
    fn drop(&mut self) {
        self.trennen();
    }
}
