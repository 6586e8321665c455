//! klatsch-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und stellt den oeffentlichen Einstiegspunkt
//! fuer Integrationstests bereit.

pub mod api;
pub mod config;
pub mod ws;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use config::ServerConfig;
use klatsch_observability::{ChatMetrics, HealthState, MetrikQuelle, RaumMetrik};
use klatsch_signaling::ChatState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};

/// Geteilter Zustand aller HTTP- und WebSocket-Handler
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatState>,
    /// Wird beim Herunterfahren auf `true` gesetzt
    pub shutdown_rx: watch::Receiver<bool>,
}

/// Metrik-Quelle ueber dem Chat-Zustand
pub struct ChatQuelle(pub Arc<ChatState>);

impl MetrikQuelle for ChatQuelle {
    fn verbundene_clients(&self) -> usize {
        self.0.registry.anzahl()
    }

    fn raeume(&self) -> Vec<RaumMetrik> {
        let chat = &self.0;
        chat.raeume
            .raum_namen()
            .iter()
            .map(|name| {
                let ansicht = chat.presence().ansicht(name);
                RaumMetrik {
                    name: name.clone(),
                    nutzer: ansicht.users.len(),
                    history: chat.raeume.history_laenge(name),
                    tippende: ansicht.typing_names.len(),
                }
            })
            .collect()
    }
}

/// CORS fuer den konfigurierten Client-Origin ("*" erlaubt alle)
pub fn cors_layer(client_url: &str) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if client_url.trim() == "*" {
        return Ok(cors.allow_origin(Any));
    }

    let origin: HeaderValue = client_url
        .parse()
        .map_err(|e| anyhow::anyhow!("Ungueltige CLIENT_URL '{client_url}': {e}"))?;
    Ok(cors.allow_origin(origin))
}

/// Baut den vollstaendigen HTTP/WebSocket-Router
pub fn app(state: AppState, metriken: ChatMetrics, client_url: &str) -> Result<Router> {
    let router = api::api_router()
        .route("/ws", get(ws::ws_handler))
        .layer(axum::middleware::from_fn_with_state(
            metriken,
            klatsch_observability::timing_middleware,
        ))
        .layer(cors_layer(client_url)?)
        .with_state(state);
    Ok(router)
}

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Chat-Zustand und Metriken anlegen
    /// 2. Observability-Server starten (falls aktiviert)
    /// 3. HTTP/WebSocket-Listener starten
    /// 4. Auf Ctrl-C warten: Health auf `unhealthy`, alle Verbindungen
    ///    schliessen, danach den Observability-Server beenden
    pub async fn starten(self) -> Result<()> {
        let chat = ChatState::neu(self.config.signaling_config());
        let metriken = ChatMetrics::neu()?;
        let health = HealthState::neu();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        // Observability laeuft bis der Haupt-Listener vollstaendig beendet ist
        let (observability_stop_tx, observability_stop_rx) = watch::channel(false);

        tracing::info!(
            server_name = %self.config.server.name,
            adresse = %self.config.bind_adresse(),
            raeume = ?chat.raeume.raum_namen(),
            "Server startet"
        );

        let observability_task = if self.config.observability.aktiviert {
            let bind_addr: SocketAddr = self.config.observability_bind_adresse().parse()?;
            let quelle: Arc<dyn MetrikQuelle> = Arc::new(ChatQuelle(Arc::clone(&chat)));
            let mut rx = observability_stop_rx;
            Some(tokio::spawn(klatsch_observability::observability_server_starten(
                bind_addr,
                metriken.clone(),
                quelle,
                health.clone(),
                async move {
                    let _ = rx.wait_for(|stop| *stop).await;
                },
            )))
        } else {
            None
        };

        let state = AppState {
            chat,
            shutdown_rx: shutdown_rx.clone(),
        };
        let router = app(state, metriken, &self.config.netzwerk.client_url)?;

        let listener = tokio::net::TcpListener::bind(self.config.bind_adresse()).await?;
        tracing::info!(adresse = %self.config.bind_adresse(), "HTTP/WebSocket-Listener bereit");

        let mut rx = shutdown_rx;
        let serve = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            let _ = rx.wait_for(|stop| *stop).await;
        });

        let server_task = tokio::spawn(async move { serve.await });

        tracing::info!("Server laeuft. Warte auf Shutdown-Signal (Ctrl-C)...");
        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutdown-Signal empfangen, Server wird beendet");

        health.herunterfahren();
        let _ = shutdown_tx.send(true);

        server_task.await??;
        tracing::info!("HTTP/WebSocket-Listener beendet");

        let _ = observability_stop_tx.send(true);
        if let Some(task) = observability_task {
            if let Err(e) = task.await? {
                tracing::warn!(fehler = %e, "Observability-Server mit Fehler beendet");
            }
        }

        Ok(())
    }
}
