//! Prometheus-kompatible Metriken fuer Klatsch
//!
//! Registrierte Metriken:
//! - `klatsch_connected_clients` – Gauge: Aktuell gebundene Verbindungen
//! - `klatsch_room_users` – Gauge pro Raum: Nutzer im Raum
//! - `klatsch_room_history_len` – Gauge pro Raum: Nachrichten in der History
//! - `klatsch_room_typing` – Gauge pro Raum: Gerade tippende Nutzer
//! - `klatsch_http_requests_total` – Counter: HTTP-Anfragen (method, path, status)
//! - `klatsch_http_request_duration_seconds` – Histogram: HTTP-Antwortzeit
//!
//! Die Raum-Gauges werden nicht laufend gepflegt, sondern bei jedem Scrape
//! aus einer [`MetrikQuelle`] gelesen.

use anyhow::Result;
use axum::{extract::State, response::IntoResponse, routing::get, Router};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

/// Momentaufnahme eines Raums fuer die Metriken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaumMetrik {
    pub name: String,
    pub nutzer: usize,
    pub history: usize,
    pub tippende: usize,
}

/// Liefert den aktuellen Zustand des Chat-Servers
pub trait MetrikQuelle: Send + Sync {
    fn verbundene_clients(&self) -> usize;
    fn raeume(&self) -> Vec<RaumMetrik>;
}

/// Alle Klatsch-Prometheus-Metriken
#[derive(Clone)]
pub struct ChatMetrics {
    pub registry: Arc<Registry>,

    // Chat-Metriken
    pub connected_clients: IntGauge,
    pub room_users: IntGaugeVec,
    pub room_history_len: IntGaugeVec,
    pub room_typing: IntGaugeVec,

    // HTTP-Metriken
    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
}

impl ChatMetrics {
    /// Erstellt und registriert alle Metriken in einer neuen Registry
    pub fn neu() -> Result<Self> {
        let registry = Registry::new();

        // --- Chat-Metriken ---
        let connected_clients = IntGauge::with_opts(Opts::new(
            "klatsch_connected_clients",
            "Anzahl aktuell gebundener Verbindungen",
        ))?;
        registry.register(Box::new(connected_clients.clone()))?;

        let room_users = IntGaugeVec::new(
            Opts::new("klatsch_room_users", "Anzahl Nutzer pro Raum"),
            &["room"],
        )?;
        registry.register(Box::new(room_users.clone()))?;

        let room_history_len = IntGaugeVec::new(
            Opts::new(
                "klatsch_room_history_len",
                "Anzahl Nachrichten in der History pro Raum",
            ),
            &["room"],
        )?;
        registry.register(Box::new(room_history_len.clone()))?;

        let room_typing = IntGaugeVec::new(
            Opts::new("klatsch_room_typing", "Anzahl tippender Nutzer pro Raum"),
            &["room"],
        )?;
        registry.register(Box::new(room_typing.clone()))?;

        // --- HTTP-Metriken ---
        let http_requests_total = IntCounterVec::new(
            Opts::new("klatsch_http_requests_total", "Gesamtanzahl HTTP-Anfragen"),
            &["method", "path", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "klatsch_http_request_duration_seconds",
                "HTTP-Antwortzeit in Sekunden",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
            ]),
            &["method", "path"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            connected_clients,
            room_users,
            room_history_len,
            room_typing,
            http_requests_total,
            http_request_duration_seconds,
        })
    }

    /// Uebernimmt den aktuellen Zustand aus der Quelle
    pub fn aktualisieren(&self, quelle: &dyn MetrikQuelle) {
        self.connected_clients
            .set(quelle.verbundene_clients() as i64);

        for raum in quelle.raeume() {
            let labels = [raum.name.as_str()];
            self.room_users
                .with_label_values(&labels)
                .set(raum.nutzer as i64);
            self.room_history_len
                .with_label_values(&labels)
                .set(raum.history as i64);
            self.room_typing
                .with_label_values(&labels)
                .set(raum.tippende as i64);
        }
    }

    /// Zaehlt eine abgeschlossene HTTP-Anfrage
    pub fn http_anfrage_erfassen(&self, methode: &str, pfad: &str, status: u16, dauer_sek: f64) {
        self.http_requests_total
            .with_label_values(&[methode, pfad, &status.to_string()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[methode, pfad])
            .observe(dauer_sek);
    }

    /// Exportiert alle Metriken im Prometheus-Textformat
    pub fn exportieren(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[derive(Clone)]
struct MetrikState {
    metriken: ChatMetrics,
    quelle: Arc<dyn MetrikQuelle>,
}

/// Axum-Router fuer den `/metrics`-Endpunkt
pub fn metrics_router(metriken: ChatMetrics, quelle: Arc<dyn MetrikQuelle>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(MetrikState { metriken, quelle })
}

async fn metrics_handler(State(state): State<MetrikState>) -> impl IntoResponse {
    state.metriken.aktualisieren(state.quelle.as_ref());

    match state.metriken.exportieren() {
        Ok(text) => (
            axum::http::StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4",
            )],
            text,
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Metriken-Export fehlgeschlagen: {err}");
            axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
