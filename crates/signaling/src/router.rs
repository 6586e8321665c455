//! Message-Router – Fuehrt die Operationen einer beigetretenen Sitzung aus
//!
//! Jede Operation liest den aktuellen Raum aus der Registry, aendert den
//! RoomStore und verteilt die Folge-Events ueber den Broadcaster.
//!
//! ## Reihenfolge
//! Events, die eine Raum-History veraendern, werden innerhalb der Raumsperre
//! in die Send-Queues eingereiht. Alle Mitglieder eines Raums sehen
//! Nachrichten daher in derselben Reihenfolge wie die History.
//!
//! ## Fehler
//! - Ungueltiger Raum / ungueltige Eingabe: `rejected` nur an den Anfragenden
//! - Unbekannte Identitaet / unbekannte Nachricht: still verworfen
//!
//! Alle Operationen ausser `beitreten` und `trennen` verlangen ein
//! [`Mitglied`], das nur `beitreten` erzeugt.

use klatsch_chat::validierung::{anzeigename_pruefen, nachricht_pruefen};
use klatsch_chat::{ChatError, ChatNachricht, LeseStatus};
use klatsch_core::{ClientId, MessageId};
use klatsch_protocol::ServerEvent;
use std::sync::Arc;

use crate::dto::{history_info, nachricht_info};
use crate::error::{SignalingError, SignalingResult};
use crate::server_state::ChatState;

// ---------------------------------------------------------------------------
// Mitglied
// ---------------------------------------------------------------------------

/// Nachweis eines erfolgreichen Beitritts
///
/// Kann ausserhalb dieses Crates nicht konstruiert werden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mitglied {
    client_id: ClientId,
    display_name: String,
}

impl Mitglied {
    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

// ---------------------------------------------------------------------------
// MessageRouter
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct MessageRouter {
    state: Arc<ChatState>,
}

impl MessageRouter {
    pub fn neu(state: Arc<ChatState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<ChatState> {
        &self.state
    }

    /// Tritt einem Raum bei
    ///
    /// Gibt `None` zurueck wenn der Beitritt abgelehnt oder verworfen wurde.
    pub fn beitreten(&self, client_id: ClientId, display_name: &str, raum: &str) -> Option<Mitglied> {
        match self.beitreten_intern(client_id, display_name, raum) {
            Ok(mitglied) => Some(mitglied),
            Err(e) => {
                self.fehler_behandeln(client_id, "join", e);
                None
            }
        }
    }

    fn beitreten_intern(
        &self,
        client_id: ClientId,
        display_name: &str,
        raum: &str,
    ) -> SignalingResult<Mitglied> {
        let display_name = anzeigename_pruefen(display_name)?;
        let state = &self.state;

        // Binden und History-Snapshot unter derselben Sperre: jede spaetere
        // Nachricht kommt als new_message, jede fruehere steht in der History
        state.raeume.mit_raum(raum, |r| -> SignalingResult<()> {
            state.registry.binden(client_id, &display_name, raum)?;
            state.broadcaster.an_client_senden(
                &client_id,
                ServerEvent::RoomHistory {
                    room: raum.to_string(),
                    messages: history_info(&r.history()),
                },
            );
            Ok(())
        })??;

        self.unread_zuruecksetzen(client_id, raum);
        state.presence().nutzerliste_senden(raum);
        state.an_raum_senden(
            raum,
            &ServerEvent::UserJoined {
                display_name: display_name.clone(),
                client_id,
            },
        );

        tracing::info!(client_id = %client_id, name = %display_name, raum = %raum, "Raum beigetreten");

        Ok(Mitglied {
            client_id,
            display_name,
        })
    }

    /// Sendet eine Nachricht in den aktuellen Raum
    pub fn senden(&self, mitglied: &Mitglied, inhalt: &str) {
        let ergebnis = self.senden_intern(mitglied, inhalt);
        self.ergebnis_behandeln(mitglied, "send", ergebnis);
    }

    fn senden_intern(&self, mitglied: &Mitglied, inhalt: &str) -> SignalingResult<()> {
        nachricht_pruefen(inhalt)?;
        let raum = self.aktueller_raum(mitglied)?;
        let state = &self.state;

        let nachricht = state.raeume.mit_raum(&raum, |r| {
            let nachricht =
                r.nachricht_erstellen(state.raeume.ids(), &mitglied.display_name, mitglied.client_id, inhalt);
            state.an_raum_senden(
                &raum,
                &ServerEvent::NewMessage {
                    message: nachricht_info(&nachricht),
                },
            );
            nachricht
        })?;

        self.unread_verteilen(&raum);

        tracing::debug!(
            client_id = %mitglied.client_id,
            raum = %raum,
            message_id = %nachricht.id(),
            "Nachricht gesendet"
        );
        Ok(())
    }

    /// Sendet eine private Nachricht an genau eine andere Verbindung
    pub fn privat_senden(&self, mitglied: &Mitglied, an: ClientId, inhalt: &str) {
        let ergebnis = self.privat_senden_intern(mitglied, an, inhalt);
        self.ergebnis_behandeln(mitglied, "private_send", ergebnis);
    }

    fn privat_senden_intern(
        &self,
        mitglied: &Mitglied,
        an: ClientId,
        inhalt: &str,
    ) -> SignalingResult<()> {
        nachricht_pruefen(inhalt)?;
        self.aktueller_raum(mitglied)?;

        if !self.state.registry.ist_gebunden(&an) {
            tracing::debug!(client_id = %mitglied.client_id, an = %an, "Empfaenger unbekannt – private Nachricht verworfen");
            return Ok(());
        }

        let nachricht = ChatNachricht::neu_privat(
            self.state.raeume.ids().naechste(),
            &mitglied.display_name,
            mitglied.client_id,
            inhalt,
            an,
        );
        let event = ServerEvent::PrivateMessage {
            message: nachricht_info(&nachricht),
        };

        // Eine Nachricht an sich selbst wird nur einmal zugestellt
        if an != mitglied.client_id {
            self.state.broadcaster.an_client_senden(&an, event.clone());
        }
        self.state
            .broadcaster
            .an_client_senden(&mitglied.client_id, event);

        tracing::debug!(client_id = %mitglied.client_id, an = %an, message_id = %nachricht.id(), "Private Nachricht gesendet");
        Ok(())
    }

    /// Setzt oder entfernt den Tipp-Status im aktuellen Raum
    pub fn tippen(&self, mitglied: &Mitglied, tippt: bool) {
        let ergebnis = self.tippen_intern(mitglied, tippt);
        self.ergebnis_behandeln(mitglied, "typing", ergebnis);
    }

    fn tippen_intern(&self, mitglied: &Mitglied, tippt: bool) -> SignalingResult<()> {
        let raum = self.aktueller_raum(mitglied)?;
        self.tippen_in_raum(mitglied, &raum, tippt)?;
        Ok(())
    }

    /// Aendert den Tipp-Status und verteilt die neue Liste nur bei einer Aenderung
    fn tippen_in_raum(&self, mitglied: &Mitglied, raum: &str, tippt: bool) -> SignalingResult<bool> {
        let state = &self.state;
        let geaendert = state.raeume.mit_raum(raum, |r| {
            let geaendert = r.tippen_setzen(mitglied.client_id, &mitglied.display_name, tippt);
            // Wiederholte Tipp-Events mit gleichem Status erzeugen kein typing_names
            if geaendert {
                state.an_raum_senden(
                    raum,
                    &ServerEvent::TypingNames {
                        room: raum.to_string(),
                        names: r.tippende(),
                    },
                );
            }
            geaendert
        })?;
        Ok(geaendert)
    }

    /// Wechselt in einen anderen Raum
    pub fn raum_wechseln(&self, mitglied: &Mitglied, neuer_raum: &str) {
        let ergebnis = self.raum_wechseln_intern(mitglied, neuer_raum);
        self.ergebnis_behandeln(mitglied, "switch_room", ergebnis);
    }

    fn raum_wechseln_intern(&self, mitglied: &Mitglied, neuer_raum: &str) -> SignalingResult<()> {
        let state = &self.state;
        if !state.raeume.ist_gueltig(neuer_raum) {
            return Err(ChatError::UngueltigerRaum(neuer_raum.to_string()).into());
        }

        let aktuell = self.aktueller_raum(mitglied)?;
        if aktuell == neuer_raum {
            tracing::debug!(client_id = %mitglied.client_id, raum = %neuer_raum, "Wechsel in aktuellen Raum ignoriert");
            return Ok(());
        }

        let alter_raum = state.raeume.mit_raum(neuer_raum, |r| -> SignalingResult<String> {
            let alt = state.registry.umbinden(mitglied.client_id, neuer_raum)?;
            state.broadcaster.an_client_senden(
                &mitglied.client_id,
                ServerEvent::RoomHistory {
                    room: neuer_raum.to_string(),
                    messages: history_info(&r.history()),
                },
            );
            Ok(alt)
        })??;

        self.tippen_in_raum(mitglied, &alter_raum, false)?;
        self.unread_zuruecksetzen(mitglied.client_id, neuer_raum);
        state.presence().nutzerliste_senden(&alter_raum);
        state.presence().nutzerliste_senden(neuer_raum);

        tracing::info!(
            client_id = %mitglied.client_id,
            von = %alter_raum,
            nach = %neuer_raum,
            "Raum gewechselt"
        );
        Ok(())
    }

    /// Reagiert auf eine Nachricht im aktuellen Raum
    pub fn reagieren(&self, mitglied: &Mitglied, message_id: MessageId, symbol: &str) {
        let ergebnis = self.reagieren_intern(mitglied, message_id, symbol);
        self.ergebnis_behandeln(mitglied, "react", ergebnis);
    }

    fn reagieren_intern(
        &self,
        mitglied: &Mitglied,
        message_id: MessageId,
        symbol: &str,
    ) -> SignalingResult<()> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(ChatError::UngueltigeEingabe("Reaktion darf nicht leer sein".into()).into());
        }

        let raum = self.aktueller_raum(mitglied)?;
        let state = &self.state;
        state.raeume.mit_raum(&raum, |r| -> SignalingResult<()> {
            let nachricht = r.reagieren(message_id, symbol, &mitglied.display_name)?;
            state.an_raum_senden(
                &raum,
                &ServerEvent::MessageUpdated {
                    message: nachricht_info(&nachricht),
                },
            );
            Ok(())
        })??;
        Ok(())
    }

    /// Markiert eine Nachricht im aktuellen Raum als gelesen
    pub fn als_gelesen_markieren(&self, mitglied: &Mitglied, message_id: MessageId) {
        let ergebnis = self.als_gelesen_markieren_intern(mitglied, message_id);
        self.ergebnis_behandeln(mitglied, "mark_read", ergebnis);
    }

    fn als_gelesen_markieren_intern(
        &self,
        mitglied: &Mitglied,
        message_id: MessageId,
    ) -> SignalingResult<()> {
        let raum = self.aktueller_raum(mitglied)?;
        let state = &self.state;
        state.raeume.mit_raum(&raum, |r| -> SignalingResult<()> {
            if let LeseStatus::Aktualisiert(nachricht) =
                r.als_gelesen_markieren(message_id, &mitglied.display_name)?
            {
                state.an_raum_senden(
                    &raum,
                    &ServerEvent::MessageUpdated {
                        message: nachricht_info(&nachricht),
                    },
                );
            }
            Ok(())
        })??;
        Ok(())
    }

    /// Raeumt eine Verbindung vollstaendig ab (idempotent)
    ///
    /// Funktioniert auch fuer Verbindungen, die nie beigetreten sind.
    pub fn trennen(&self, client_id: ClientId) {
        let state = &self.state;
        let verbindung = state.registry.loesen(&client_id);
        state.broadcaster.client_entfernen(&client_id);
        state.unread.entfernen(&client_id);

        let Some(verbindung) = verbindung else {
            tracing::trace!(client_id = %client_id, "Trennen ohne Bindung");
            return;
        };

        let raum = &verbindung.room;
        state
            .raeume
            .tippen_setzen(raum, client_id, &verbindung.display_name, false);
        state.an_raum_senden(
            raum,
            &ServerEvent::UserLeft {
                display_name: verbindung.display_name.clone(),
                client_id,
            },
        );
        state.presence().nutzerliste_senden(raum);
        state.presence().tippende_senden(raum);

        tracing::info!(client_id = %client_id, name = %verbindung.display_name, raum = %raum, "Verbindung getrennt");
    }

    // -----------------------------------------------------------------------
    // Hilfsfunktionen
    // -----------------------------------------------------------------------

    fn aktueller_raum(&self, mitglied: &Mitglied) -> SignalingResult<String> {
        self.state
            .registry
            .raum_von(&mitglied.client_id)
            .ok_or(SignalingError::UnbekannteIdentitaet(mitglied.client_id))
    }

    fn unread_zuruecksetzen(&self, client_id: ClientId, raum: &str) {
        let counts = self.state.unread.zuruecksetzen(client_id, raum);
        self.state
            .broadcaster
            .an_client_senden(&client_id, ServerEvent::UnreadCounts { counts });
    }

    /// Erhoeht den Zaehler fuer alle gebundenen Verbindungen in anderen Raeumen
    fn unread_verteilen(&self, raum: &str) {
        for verbindung in self.state.registry.alle() {
            if verbindung.room == raum {
                continue;
            }
            // Zwischen Snapshot und Schleife getrennte Verbindungen fehlen hier
            let Some(counts) = self.state.unread.erhoehen(verbindung.client_id, raum) else {
                continue;
            };
            self.state
                .broadcaster
                .an_client_senden(&verbindung.client_id, ServerEvent::UnreadCounts { counts });
        }
    }

    fn ergebnis_behandeln(&self, mitglied: &Mitglied, aktion: &str, ergebnis: SignalingResult<()>) {
        if let Err(e) = ergebnis {
            self.fehler_behandeln(mitglied.client_id, aktion, e);
        }
    }

    fn fehler_behandeln(&self, client_id: ClientId, aktion: &str, fehler: SignalingError) {
        match fehler.ablehnung() {
            Some(code) => {
                tracing::debug!(client_id = %client_id, aktion, fehler = %fehler, "Anfrage abgelehnt");
                self.state
                    .broadcaster
                    .an_client_senden(&client_id, ServerEvent::rejected(code, fehler.to_string()));
            }
            None if matches!(fehler, SignalingError::DoppelteIdentitaet(_)) => {
                tracing::error!(client_id = %client_id, aktion, fehler = %fehler, "Identitaet doppelt gebunden – Anfrage verworfen");
            }
            None => {
                tracing::debug!(client_id = %client_id, aktion, fehler = %fehler, "Anfrage verworfen");
            }
        }
    }
}
