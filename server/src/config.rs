//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist. `PORT` und `CLIENT_URL` aus der Umgebung haben Vorrang.

use anyhow::bail;
use klatsch_core::limits::STANDARD_RAEUME;
use klatsch_observability::{logging_einstellungen_pruefen, LogFormat};
use klatsch_signaling::SignalingConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Sitzungs-Einstellungen (Tippen, Keepalive, Queues)
    pub sitzung: SitzungsEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
    /// Observability-Einstellungen (Metriken, Health)
    pub observability: ObservabilityEinstellungen,
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename des Servers
    pub name: String,
    /// Feste Raumliste
    pub raeume: Vec<String>,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "Klatsch Server".into(),
            raeume: STANDARD_RAEUME.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Bind-Adresse fuer HTTP und WebSocket
    pub bind_adresse: String,
    /// Port fuer HTTP und WebSocket
    pub port: u16,
    /// Erlaubter CORS-Origin ("*" = alle)
    pub client_url: String,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            port: 5000,
            client_url: "http://localhost:5173".into(),
        }
    }
}

/// Sitzungs-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitzungsEinstellungen {
    /// Tipp-Status verfaellt nach dieser Zeit ohne neues Tipp-Event (0 = nie)
    pub tipp_timeout_ms: u64,
    /// Keepalive-Intervall in Sekunden
    pub keepalive_sek: u64,
    /// Timeout fuer inaktive Verbindungen in Sekunden
    pub verbindungs_timeout_sek: u64,
    /// Groesse der Send-Queue pro Client
    pub send_queue_groesse: usize,
}

impl Default for SitzungsEinstellungen {
    fn default() -> Self {
        Self {
            tipp_timeout_ms: 3000,
            keepalive_sek: 30,
            verbindungs_timeout_sek: 90,
            send_queue_groesse: 64,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

/// Observability-Einstellungen (Metriken + Health-Check)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityEinstellungen {
    /// Aktiviert den Observability-Server
    pub aktiviert: bool,
    /// Port fuer Metriken und Health (Standard: 9300)
    pub port: u16,
}

impl Default for ObservabilityEinstellungen {
    fn default() -> Self {
        Self {
            aktiviert: true,
            port: 9300,
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei und wendet die
    /// Umgebungsvariablen an.
    /// Verwendet Standardwerte wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        let mut config = match std::fs::read_to_string(pfad) {
            Ok(inhalt) => toml::from_str::<Self>(&inhalt)
                .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Self::default()
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
                ))
            }
        };

        config.umgebung_anwenden(|name| std::env::var(name).ok())?;
        config
            .pruefen()
            .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
        Ok(config)
    }

    /// Prueft Werte, die sich nicht ueber den Typ ausdruecken lassen
    pub fn pruefen(&self) -> anyhow::Result<()> {
        if self.server.raeume.is_empty() {
            bail!("[server] raeume darf nicht leer sein");
        }
        if self.sitzung.send_queue_groesse == 0 {
            bail!("[sitzung] send_queue_groesse muss groesser als 0 sein");
        }
        self.log_format()?;
        Ok(())
    }

    /// Geprueftes Log-Format aus `[logging]`
    pub fn log_format(&self) -> anyhow::Result<LogFormat> {
        logging_einstellungen_pruefen(&self.logging.level, &self.logging.format)
    }

    /// Uebernimmt `PORT` und `CLIENT_URL` aus der Umgebung
    pub fn umgebung_anwenden<F>(&mut self, lesen: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lesen("PORT") {
            self.netzwerk.port = port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Ungueltiger PORT '{port}': {e}"))?;
        }
        if let Some(url) = lesen("CLIENT_URL") {
            self.netzwerk.client_url = url;
        }
        Ok(())
    }

    /// Gibt die Bind-Adresse fuer HTTP und WebSocket zurueck
    pub fn bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.port)
    }

    /// Gibt die Bind-Adresse fuer den Observability-Server zurueck
    pub fn observability_bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.observability.port)
    }

    /// Konfiguration fuer den Signaling-Service
    pub fn signaling_config(&self) -> SignalingConfig {
        SignalingConfig {
            raeume: self.server.raeume.clone(),
            tipp_timeout: Duration::from_millis(self.sitzung.tipp_timeout_ms),
            keepalive_sek: self.sitzung.keepalive_sek,
            verbindungs_timeout_sek: self.sitzung.verbindungs_timeout_sek,
            send_queue_groesse: self.sitzung.send_queue_groesse,
        }
    }
}
