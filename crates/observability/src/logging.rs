//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable:
//! - `KLATSCH_LOG_LEVEL`: Log-Level oder Filter-Direktive, Standard: info
//! - `KLATSCH_LOG_FORMAT`: Format (text/json), Standard: text
//!
//! Umgebungsvariablen haben Vorrang vor der Konfigurationsdatei.

use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

const LEVEL_ENV: &str = "KLATSCH_LOG_LEVEL";
const FORMAT_ENV: &str = "KLATSCH_LOG_FORMAT";

/// Ausgabeformat der Logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            andere => Err(anyhow::anyhow!(
                "Ungueltiges Log-Format '{andere}' (erlaubt: text, json)"
            )),
        }
    }
}

/// Prueft Log-Level und -Format aus der Konfigurationsdatei
pub fn logging_einstellungen_pruefen(level: &str, format: &str) -> anyhow::Result<LogFormat> {
    Level::from_str(level).map_err(|_| {
        anyhow::anyhow!("Ungueltiges Log-Level '{level}' (erlaubt: trace, debug, info, warn, error)")
    })?;
    format.parse()
}

/// Initialisiert das Logging-System.
///
/// Ein ungueltiger `KLATSCH_LOG_LEVEL` faellt auf `level` zurueck, ein
/// ungueltiges `KLATSCH_LOG_FORMAT` auf `format`.
pub fn logging_initialisieren(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_env(LEVEL_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format = std::env::var(FORMAT_ENV)
        .ok()
        .and_then(|wert| wert.parse().ok())
        .unwrap_or(format);

    match format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_current_span(true)
                .init();
        }
        LogFormat::Text => {
            fmt().with_env_filter(filter).with_target(true).init();
        }
    }
}
