//! Integration-Tests fuer Sitzungen, Router und Broadcasting (ohne Netzwerk)

use klatsch_core::{ClientId, MessageId};
use klatsch_protocol::{ClientEvent, NachrichtInfo, RejectCode, ServerEvent};
use klatsch_signaling::{
    ChatState, Fortsetzung, MessageRouter, SignalingConfig, Sitzung, SitzungsZustand, TippTimer,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

struct TestClient {
    id: ClientId,
    sitzung: Sitzung,
    rx: mpsc::Receiver<ServerEvent>,
    ablauf_rx: mpsc::Receiver<u64>,
}

impl TestClient {
    fn neu(state: &Arc<ChatState>) -> Self {
        let id = ClientId::new();
        let rx = state.broadcaster.client_registrieren(id, 256);
        let (ablauf_tx, ablauf_rx) = mpsc::channel(4);
        let sitzung = Sitzung::neu(
            id,
            MessageRouter::neu(Arc::clone(state)),
            TippTimer::neu(state.config.tipp_timeout, ablauf_tx),
        );
        Self {
            id,
            sitzung,
            rx,
            ablauf_rx,
        }
    }

    fn beigetreten(state: &Arc<ChatState>, name: &str, raum: &str) -> Self {
        let mut client = Self::neu(state);
        client.event(ClientEvent::Join {
            display_name: name.into(),
            room: raum.into(),
        });
        assert!(matches!(
            client.sitzung.zustand(),
            SitzungsZustand::Beigetreten(_)
        ));
        client.leeren();
        client
    }

    fn event(&mut self, event: ClientEvent) -> Fortsetzung {
        self.sitzung.verarbeiten(event)
    }

    fn senden(&mut self, text: &str) {
        self.event(ClientEvent::Send {
            message: text.into(),
        });
    }

    /// Alle bisher eingereihten Events
    fn empfangen(&mut self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn leeren(&mut self) {
        self.empfangen();
    }

    fn neue_nachrichten(&mut self) -> Vec<NachrichtInfo> {
        self.empfangen()
            .into_iter()
            .filter_map(|e| match e {
                ServerEvent::NewMessage { message } => Some(message),
                _ => None,
            })
            .collect()
    }
}

fn state() -> Arc<ChatState> {
    ChatState::neu(SignalingConfig::default())
}

fn history_von(events: &[ServerEvent]) -> Option<(String, Vec<NachrichtInfo>)> {
    events.iter().find_map(|e| match e {
        ServerEvent::RoomHistory { room, messages } => Some((room.clone(), messages.clone())),
        _ => None,
    })
}

fn nutzerliste_von(events: &[ServerEvent], raum: &str) -> Option<Vec<String>> {
    events.iter().rev().find_map(|e| match e {
        ServerEvent::UserList { room, users } if room == raum => {
            Some(users.iter().map(|u| u.display_name.clone()).collect())
        }
        _ => None,
    })
}

fn tippende_von(events: &[ServerEvent]) -> Option<Vec<String>> {
    events.iter().rev().find_map(|e| match e {
        ServerEvent::TypingNames { names, .. } => Some(names.clone()),
        _ => None,
    })
}

fn ablehnung_von(events: &[ServerEvent]) -> Option<RejectCode> {
    events.iter().find_map(|e| match e {
        ServerEvent::Rejected { code, .. } => Some(*code),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Beitritt
// ---------------------------------------------------------------------------

#[tokio::test]
async fn beitritt_liefert_history_und_nutzerliste() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "general");
    anna.senden("erste");
    anna.senden("zweite");

    let mut ben = TestClient::neu(&state);
    ben.event(ClientEvent::Join {
        display_name: "ben".into(),
        room: "general".into(),
    });

    let events = ben.empfangen();
    let (raum, history) = history_von(&events).unwrap();
    assert_eq!(raum, "general");
    let texte: Vec<&str> = history.iter().map(|n| n.message.as_str()).collect();
    assert_eq!(texte, ["erste", "zweite"]);
    assert_eq!(nutzerliste_von(&events, "general").unwrap(), ["anna", "ben"]);

    let bei_anna = anna.empfangen();
    assert!(bei_anna.iter().any(|e| matches!(
        e,
        ServerEvent::UserJoined { display_name, client_id } if display_name == "ben" && *client_id == ben.id
    )));
}

#[tokio::test]
async fn beitritt_in_unbekannten_raum_wird_abgelehnt() {
    let state = state();
    let mut anna = TestClient::neu(&state);
    anna.event(ClientEvent::Join {
        display_name: "anna".into(),
        room: "lobby".into(),
    });

    assert_eq!(ablehnung_von(&anna.empfangen()), Some(RejectCode::InvalidRoom));
    assert_eq!(anna.sitzung.zustand(), &SitzungsZustand::Ungebunden);
    assert_eq!(state.registry.anzahl(), 0);
}

#[tokio::test]
async fn ungueltiger_anzeigename_wird_abgelehnt() {
    let state = state();
    let mut anna = TestClient::neu(&state);
    anna.event(ClientEvent::Join {
        display_name: "x".repeat(21),
        room: "general".into(),
    });
    assert_eq!(
        ablehnung_von(&anna.empfangen()),
        Some(RejectCode::ValidationFailed)
    );

    anna.event(ClientEvent::Join {
        display_name: "   ".into(),
        room: "general".into(),
    });
    assert_eq!(
        ablehnung_von(&anna.empfangen()),
        Some(RejectCode::ValidationFailed)
    );
    assert_eq!(anna.sitzung.zustand(), &SitzungsZustand::Ungebunden);
}

#[tokio::test]
async fn events_vor_beitritt_werden_verworfen() {
    let state = state();
    let mut anna = TestClient::neu(&state);
    let mut ben = TestClient::beigetreten(&state, "ben", "general");

    anna.senden("hallo?");
    anna.event(ClientEvent::Typing { is_typing: true });
    anna.event(ClientEvent::SwitchRoom {
        room: "tech".into(),
    });

    assert!(anna.empfangen().is_empty());
    assert!(ben.empfangen().is_empty());
    assert_eq!(state.raeume.history_laenge("general"), 0);
}

#[tokio::test]
async fn zweiter_join_wird_ignoriert() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "general");
    anna.event(ClientEvent::Join {
        display_name: "anna2".into(),
        room: "tech".into(),
    });

    assert!(anna.empfangen().is_empty());
    assert_eq!(state.registry.raum_von(&anna.id).as_deref(), Some("general"));
}

// ---------------------------------------------------------------------------
// Nachrichten
// ---------------------------------------------------------------------------

#[tokio::test]
async fn nachricht_nur_im_eigenen_raum() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "general");
    let mut ben = TestClient::beigetreten(&state, "ben", "general");
    let mut carla = TestClient::beigetreten(&state, "carla", "tech");
    anna.leeren();

    ben.senden("hallo general");

    let bei_anna = anna.neue_nachrichten();
    let bei_ben = ben.neue_nachrichten();
    assert_eq!(bei_anna.len(), 1);
    assert_eq!(bei_anna, bei_ben);
    assert_eq!(bei_anna[0].sender, "ben");
    assert_eq!(bei_anna[0].room.as_deref(), Some("general"));
    assert!(carla.neue_nachrichten().is_empty());
    assert_eq!(state.raeume.history_laenge("tech"), 0);
}

#[tokio::test]
async fn reihenfolge_entspricht_der_history() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "random");
    let mut ben = TestClient::beigetreten(&state, "ben", "random");
    anna.leeren();

    for i in 0..5 {
        anna.senden(&format!("a{i}"));
        ben.senden(&format!("b{i}"));
    }

    let bei_anna: Vec<MessageId> = anna.neue_nachrichten().iter().map(|n| n.id).collect();
    let bei_ben: Vec<MessageId> = ben.neue_nachrichten().iter().map(|n| n.id).collect();
    let history: Vec<MessageId> = state
        .raeume
        .history("random")
        .unwrap()
        .iter()
        .map(|n| n.id())
        .collect();

    assert_eq!(bei_anna, history);
    assert_eq!(bei_ben, history);
    assert!(history.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn leere_oder_zu_lange_nachricht_wird_abgelehnt() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "general");

    anna.senden("   ");
    assert_eq!(
        ablehnung_von(&anna.empfangen()),
        Some(RejectCode::ValidationFailed)
    );

    anna.senden(&"x".repeat(501));
    assert_eq!(
        ablehnung_von(&anna.empfangen()),
        Some(RejectCode::ValidationFailed)
    );

    anna.senden(&"x".repeat(500));
    assert_eq!(anna.neue_nachrichten().len(), 1);
}

#[tokio::test]
async fn history_behaelt_die_letzten_hundert() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "general");
    for i in 1..=101 {
        anna.senden(&format!("n{i}"));
    }

    let history = state.raeume.history("general").unwrap();
    assert_eq!(history.len(), 100);
    assert_eq!(history[0].inhalt(), "n2");
    assert_eq!(history[99].inhalt(), "n101");
}

#[tokio::test]
async fn private_nachricht_nur_an_sender_und_empfaenger() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "general");
    let mut ben = TestClient::beigetreten(&state, "ben", "tech");
    let mut carla = TestClient::beigetreten(&state, "carla", "general");
    anna.leeren();

    anna.event(ClientEvent::PrivateSend {
        to: ben.id,
        message: "psst".into(),
    });

    let privat = |events: Vec<ServerEvent>| -> Vec<NachrichtInfo> {
        events
            .into_iter()
            .filter_map(|e| match e {
                ServerEvent::PrivateMessage { message } => Some(message),
                _ => None,
            })
            .collect()
    };

    let bei_ben = privat(ben.empfangen());
    let bei_anna = privat(anna.empfangen());
    assert_eq!(bei_ben.len(), 1);
    assert_eq!(bei_anna, bei_ben);
    assert!(bei_ben[0].is_private);
    assert_eq!(bei_ben[0].recipient_id, Some(ben.id));
    assert_eq!(bei_ben[0].room, None);
    assert!(carla.empfangen().is_empty());

    // Private Nachrichten landen in keiner History
    assert_eq!(state.raeume.history_laenge("general"), 0);
    assert_eq!(state.raeume.history_laenge("tech"), 0);
}

#[tokio::test]
async fn private_nachricht_an_unbekannten_wird_verworfen() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "general");
    anna.event(ClientEvent::PrivateSend {
        to: ClientId::new(),
        message: "hallo?".into(),
    });
    assert!(anna.empfangen().is_empty());
}

// ---------------------------------------------------------------------------
// Tippen
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tipp_status_an_den_raum() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "tech");
    let mut ben = TestClient::beigetreten(&state, "ben", "tech");
    let mut carla = TestClient::beigetreten(&state, "carla", "general");
    anna.leeren();

    anna.event(ClientEvent::Typing { is_typing: true });
    assert_eq!(tippende_von(&ben.empfangen()).unwrap(), ["anna"]);

    anna.event(ClientEvent::Typing { is_typing: false });
    assert!(tippende_von(&ben.empfangen()).unwrap().is_empty());
    assert!(tippende_von(&carla.empfangen()).is_none());
}

#[tokio::test]
async fn wiederholtes_tippen_ohne_neue_liste() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "tech");
    let mut ben = TestClient::beigetreten(&state, "ben", "tech");
    anna.leeren();

    anna.event(ClientEvent::Typing { is_typing: true });
    assert_eq!(tippende_von(&ben.empfangen()).unwrap(), ["anna"]);

    // Tastendruecke halten den Status, die Liste bleibt gleich
    anna.event(ClientEvent::Typing { is_typing: true });
    anna.event(ClientEvent::Typing { is_typing: true });
    assert!(tippende_von(&ben.empfangen()).is_none());

    anna.event(ClientEvent::Typing { is_typing: false });
    anna.event(ClientEvent::Typing { is_typing: false });
    let events = ben.empfangen();
    let listen = events
        .iter()
        .filter(|e| matches!(e, ServerEvent::TypingNames { .. }))
        .count();
    assert_eq!(listen, 1);
}

#[tokio::test(start_paused = true)]
async fn tipp_status_laeuft_ab() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "tech");
    let mut ben = TestClient::beigetreten(&state, "ben", "tech");

    anna.event(ClientEvent::Typing { is_typing: true });
    ben.leeren();

    let generation = anna.ablauf_rx.recv().await.unwrap();
    anna.sitzung.tipp_ablauf(generation);

    assert!(tippende_von(&ben.empfangen()).unwrap().is_empty());
    assert!(state.raeume.tippende("tech").is_empty());
}

#[tokio::test(start_paused = true)]
async fn erneutes_tippen_verlaengert_den_timer() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "tech");

    anna.event(ClientEvent::Typing { is_typing: true });
    tokio::time::sleep(Duration::from_millis(2000)).await;
    anna.event(ClientEvent::Typing { is_typing: true });
    tokio::time::sleep(Duration::from_millis(2000)).await;

    // Erster Timer wurde abgebrochen, zweiter laeuft noch
    assert!(anna.ablauf_rx.try_recv().is_err());
    assert_eq!(state.raeume.tippende("tech"), ["anna"]);
}

// ---------------------------------------------------------------------------
// Raumwechsel
// ---------------------------------------------------------------------------

#[tokio::test]
async fn raumwechsel_aktualisiert_beide_raeume() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "general");
    let mut ben = TestClient::beigetreten(&state, "ben", "general");
    let mut carla = TestClient::beigetreten(&state, "carla", "tech");
    carla.senden("tech-nachricht");
    anna.leeren();
    ben.leeren();
    carla.leeren();

    anna.event(ClientEvent::Typing { is_typing: true });
    ben.leeren();
    anna.event(ClientEvent::SwitchRoom {
        room: "tech".into(),
    });

    let bei_anna = anna.empfangen();
    let (raum, history) = history_von(&bei_anna).unwrap();
    assert_eq!(raum, "tech");
    assert_eq!(history.len(), 1);
    assert_eq!(nutzerliste_von(&bei_anna, "tech").unwrap(), ["carla", "anna"]);

    let bei_ben = ben.empfangen();
    assert_eq!(nutzerliste_von(&bei_ben, "general").unwrap(), ["ben"]);
    // Tipp-Status im alten Raum ist weg
    assert!(tippende_von(&bei_ben).unwrap().is_empty());

    assert_eq!(nutzerliste_von(&carla.empfangen(), "tech").unwrap(), ["carla", "anna"]);

    // Nachrichten gehen jetzt nur noch nach tech
    anna.senden("bin da");
    assert!(ben.neue_nachrichten().is_empty());
    assert_eq!(carla.neue_nachrichten().len(), 1);
}

#[tokio::test]
async fn raumwechsel_in_unbekannten_raum() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "general");
    anna.event(ClientEvent::SwitchRoom {
        room: "lobby".into(),
    });

    assert_eq!(ablehnung_von(&anna.empfangen()), Some(RejectCode::InvalidRoom));
    assert_eq!(state.registry.raum_von(&anna.id).as_deref(), Some("general"));
}

#[tokio::test]
async fn wechsel_in_aktuellen_raum_ist_wirkungslos() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "general");
    anna.event(ClientEvent::SwitchRoom {
        room: "general".into(),
    });
    assert!(anna.empfangen().is_empty());
}

// ---------------------------------------------------------------------------
// Reaktionen und Lesebestaetigungen
// ---------------------------------------------------------------------------

fn aktualisiert_von(events: &[ServerEvent]) -> Vec<NachrichtInfo> {
    events
        .iter()
        .filter_map(|e| match e {
            ServerEvent::MessageUpdated { message } => Some(message.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn reaktion_ist_idempotent() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "general");
    let mut ben = TestClient::beigetreten(&state, "ben", "general");
    anna.senden("hallo");
    let id = ben.neue_nachrichten()[0].id;
    anna.leeren();

    for _ in 0..2 {
        ben.event(ClientEvent::React {
            message_id: id,
            emoji: "👍".into(),
        });
    }

    let updates = aktualisiert_von(&anna.empfangen());
    assert!(!updates.is_empty());
    let letzte = updates.last().unwrap();
    assert_eq!(letzte.reactions["👍"], vec!["ben".to_string()]);
}

#[tokio::test]
async fn reaktion_auf_unbekannte_nachricht_wird_verworfen() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "general");
    anna.event(ClientEvent::React {
        message_id: MessageId(999),
        emoji: "👍".into(),
    });
    assert!(anna.empfangen().is_empty());
}

#[tokio::test]
async fn gelesen_markieren() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "general");
    let mut ben = TestClient::beigetreten(&state, "ben", "general");
    anna.senden("hallo");
    let id = ben.neue_nachrichten()[0].id;
    anna.leeren();

    ben.event(ClientEvent::MarkRead { message_id: id });
    let updates = aktualisiert_von(&anna.empfangen());
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].read_by, ["anna", "ben"]);

    // Zweites Markieren aendert nichts und sendet nichts
    ben.event(ClientEvent::MarkRead { message_id: id });
    assert!(aktualisiert_von(&anna.empfangen()).is_empty());
}

// ---------------------------------------------------------------------------
// Ungelesen-Zaehler
// ---------------------------------------------------------------------------

fn zaehler_von(events: &[ServerEvent]) -> Option<std::collections::BTreeMap<String, u32>> {
    events.iter().rev().find_map(|e| match e {
        ServerEvent::UnreadCounts { counts } => Some(counts.clone()),
        _ => None,
    })
}

#[tokio::test]
async fn ungelesen_zaehlt_nur_den_raum_der_nachricht() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "general");
    let mut ben = TestClient::beigetreten(&state, "ben", "tech");
    anna.leeren();

    ben.senden("eins");
    ben.senden("zwei");

    let counts = zaehler_von(&anna.empfangen()).unwrap();
    assert_eq!(counts["tech"], 2);
    assert_eq!(counts["general"], 0);
    assert_eq!(counts["random"], 0);
    // Im eigenen Raum wird nichts gezaehlt
    assert!(zaehler_von(&ben.empfangen()).is_none());

    anna.event(ClientEvent::SwitchRoom {
        room: "tech".into(),
    });
    let counts = zaehler_von(&anna.empfangen()).unwrap();
    assert_eq!(counts["tech"], 0);
}

#[tokio::test]
async fn ungelesen_kein_eintrag_fuer_getrennte_verbindung() {
    let state = state();
    let _anna = TestClient::beigetreten(&state, "anna", "general");
    let ben = TestClient::beigetreten(&state, "ben", "tech");
    let ben_id = ben.id;

    // Verteilen arbeitet auf einem Snapshot, Ben trennt sich dazwischen
    let snapshot = state.registry.alle();
    drop(ben);
    for verbindung in snapshot.iter().filter(|v| v.room != "general") {
        assert_eq!(state.unread.erhoehen(verbindung.client_id, "general"), None);
    }

    assert!(!state.registry.ist_gebunden(&ben_id));
    assert_eq!(state.unread.stand(&ben_id)["general"], 0);
    assert_eq!(state.unread.anzahl(), 1);
}

#[tokio::test]
async fn ungelesen_eintraege_nur_fuer_gebundene() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "general");
    let ben = TestClient::beigetreten(&state, "ben", "tech");
    let carla = TestClient::beigetreten(&state, "carla", "random");
    assert_eq!(state.unread.anzahl(), 3);

    drop(ben);
    drop(carla);
    anna.senden("hallo");

    assert_eq!(state.unread.anzahl(), 1);
}

// ---------------------------------------------------------------------------
// Trennen
// ---------------------------------------------------------------------------

#[tokio::test]
async fn trennen_raeumt_alles_ab() {
    let state = state();
    let mut anna = TestClient::beigetreten(&state, "anna", "general");
    let mut ben = TestClient::beigetreten(&state, "ben", "general");
    anna.event(ClientEvent::Typing { is_typing: true });
    ben.leeren();

    assert_eq!(anna.event(ClientEvent::Disconnect), Fortsetzung::Beenden);
    assert_eq!(anna.sitzung.zustand(), &SitzungsZustand::Getrennt);

    let bei_ben = ben.empfangen();
    assert!(bei_ben.iter().any(|e| matches!(
        e,
        ServerEvent::UserLeft { display_name, .. } if display_name == "anna"
    )));
    assert_eq!(nutzerliste_von(&bei_ben, "general").unwrap(), ["ben"]);
    assert!(tippende_von(&bei_ben).unwrap().is_empty());
    assert!(!state.registry.ist_gebunden(&anna.id));
    assert!(!state.broadcaster.ist_registriert(&anna.id));

    // Idempotent und danach wirkungslos
    anna.sitzung.trennen();
    anna.senden("noch da?");
    assert!(ben.empfangen().is_empty());
}

#[tokio::test]
async fn trennen_ohne_beitritt() {
    let state = state();
    let mut anna = TestClient::neu(&state);
    let mut ben = TestClient::beigetreten(&state, "ben", "general");

    anna.sitzung.trennen();
    assert!(ben.empfangen().is_empty());
    assert!(!state.broadcaster.ist_registriert(&anna.id));
}

#[tokio::test]
async fn verworfene_sitzung_wird_getrennt() {
    let state = state();
    let anna = TestClient::beigetreten(&state, "anna", "general");
    let anna_id = anna.id;
    drop(anna);

    assert!(!state.registry.ist_gebunden(&anna_id));
    assert!(state.registry.nach_raum("general").is_empty());
}

// ---------------------------------------------------------------------------
// Nebenlaeufigkeit
// ---------------------------------------------------------------------------

#[test]
fn parallele_sender_sehen_dieselbe_reihenfolge() {
    const SENDER: usize = 4;
    const PRO_SENDER: usize = 50;

    let state = state();
    let mut clients: Vec<TestClient> = (0..SENDER)
        .map(|i| TestClient::beigetreten(&state, &format!("nutzer{i}"), "general"))
        .collect();
    for client in &mut clients {
        client.leeren();
    }

    std::thread::scope(|s| {
        for (i, client) in clients.iter_mut().enumerate() {
            s.spawn(move || {
                for n in 0..PRO_SENDER {
                    client.senden(&format!("{i}-{n}"));
                }
            });
        }
    });

    let history: Vec<MessageId> = state
        .raeume
        .history("general")
        .unwrap()
        .iter()
        .map(|n| n.id())
        .collect();
    assert!(history.len() <= 100);
    assert!(history.windows(2).all(|w| w[0] < w[1]));

    let erste: Vec<MessageId> = clients[0].neue_nachrichten().iter().map(|n| n.id).collect();
    assert_eq!(erste.len(), SENDER * PRO_SENDER);
    assert!(erste.windows(2).all(|w| w[0] < w[1]));
    // Die History ist das Ende der Empfangsreihenfolge
    assert_eq!(erste[erste.len() - history.len()..], history[..]);

    for client in clients.iter_mut().skip(1) {
        let ids: Vec<MessageId> = client.neue_nachrichten().iter().map(|n| n.id).collect();
        assert_eq!(ids, erste);
    }
}
