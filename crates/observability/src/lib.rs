//! # klatsch-observability
//!
//! Observability-Crate fuer Klatsch:
//! - Prometheus-kompatible Metriken (`/metrics`)
//! - Health-Check-Endpunkt (`/health`)
//! - Structured JSON Logging via tracing-subscriber
//! - Request-Timing Middleware

pub mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;

pub use health::{health_router, HealthResponse, HealthState, HealthStatus};
pub use logging::{logging_einstellungen_pruefen, logging_initialisieren, LogFormat};
pub use metrics::{metrics_router, ChatMetrics, MetrikQuelle, RaumMetrik};
pub use middleware::{request_timing_layer, timing_middleware};

use anyhow::Result;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

/// Router mit `/metrics` und `/health`
pub fn observability_router(
    metriken: ChatMetrics,
    quelle: Arc<dyn MetrikQuelle>,
    health: HealthState,
) -> axum::Router {
    axum::Router::new()
        .merge(metrics_router(metriken, quelle))
        .merge(health_router(health))
        .layer(request_timing_layer())
}

/// Startet den Observability-HTTP-Server (Metriken + Health)
///
/// Endpunkte:
/// - `GET /metrics` – Prometheus scrape format
/// - `GET /health`  – Health-Check JSON
///
/// Laeuft bis `shutdown` abgeschlossen ist. Wird erst nach dem
/// Haupt-Listener beendet; bis dahin meldet `/health` `unhealthy`.
pub async fn observability_server_starten(
    bind_addr: SocketAddr,
    metriken: ChatMetrics,
    quelle: Arc<dyn MetrikQuelle>,
    health: HealthState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = observability_router(metriken, quelle, health);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Observability-Server gestartet");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
