//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte; nur das Token-Secret muss gesetzt werden,
//! entweder in `[auth]` oder ueber `SHOP_TOKEN_SECRET`.

use std::net::SocketAddr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use shopwerk_auth::{HashParameter, STANDARD_LEBENSDAUER_SEK};
use shopwerk_db::DatabaseConfig;

/// Umgebungsvariable, die `auth.token_secret` ueberschreibt
pub const SECRET_ENV: &str = "SHOP_TOKEN_SECRET";

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Datenbank-Einstellungen
    pub datenbank: DatenbankEinstellungen,
    /// Token und Passwort-Hashing
    pub auth: AuthEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
    /// Observability-Einstellungen (Metriken, Health)
    pub observability: ObservabilityEinstellungen,
    /// Erster Super-Administrator
    pub bootstrap: BootstrapEinstellungen,
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    pub bind_adresse: String,
    /// Port fuer die REST-API
    pub api_port: u16,
    /// CORS-Origins (leer = alle erlaubt)
    pub cors_origins: Vec<String>,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            api_port: 8080,
            cors_origins: vec![],
        }
    }
}

/// Datenbank-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL
    pub url: String,
    /// Maximale Verbindungspool-Groesse
    pub max_verbindungen: u32,
    pub sqlite_wal: bool,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        let standard = DatabaseConfig::default();
        Self {
            url: standard.url,
            max_verbindungen: standard.max_verbindungen,
            sqlite_wal: standard.sqlite_wal,
        }
    }
}

/// Token- und Hashing-Einstellungen
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthEinstellungen {
    /// HS256-Secret (leer = muss per Umgebung gesetzt werden)
    pub token_secret: String,
    /// Token-Lebensdauer in Sekunden
    pub token_lebensdauer_sek: i64,
    /// Argon2 Speicher in KiB
    pub argon2_speicher_kib: u32,
    pub argon2_iterationen: u32,
    pub argon2_parallelitaet: u32,
}

impl Default for AuthEinstellungen {
    fn default() -> Self {
        let hash = HashParameter::default();
        Self {
            token_secret: String::new(),
            token_lebensdauer_sek: STANDARD_LEBENSDAUER_SEK,
            argon2_speicher_kib: hash.speicher_kib,
            argon2_iterationen: hash.iterationen,
            argon2_parallelitaet: hash.parallelitaet,
        }
    }
}

impl std::fmt::Debug for AuthEinstellungen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthEinstellungen")
            .field("token_secret", &"<verborgen>")
            .field("token_lebensdauer_sek", &self.token_lebensdauer_sek)
            .field("argon2_speicher_kib", &self.argon2_speicher_kib)
            .field("argon2_iterationen", &self.argon2_iterationen)
            .field("argon2_parallelitaet", &self.argon2_parallelitaet)
            .finish()
    }
}

impl AuthEinstellungen {
    pub fn hash_parameter(&self) -> HashParameter {
        HashParameter {
            speicher_kib: self.argon2_speicher_kib,
            iterationen: self.argon2_iterationen,
            parallelitaet: self.argon2_parallelitaet,
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
    /// Liefert `/metrics` aus
    pub metriken_aktiviert: bool,
    /// Intervall der DB-Pruefung fuer `/health`
    pub health_intervall_sek: u64,
}

impl Default for ObservabilityEinstellungen {
    fn default() -> Self {
        Self {
            metriken_aktiviert: true,
            health_intervall_sek: 15,
        }
    }
}

/// Erster Super-Administrator; wird nur angelegt, wenn die E-Mail frei ist
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapEinstellungen {
    pub email: Option<String>,
    pub passwort: Option<String>,
    pub vorname: String,
    pub nachname: String,
}

impl std::fmt::Debug for BootstrapEinstellungen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapEinstellungen")
            .field("email", &self.email)
            .field("passwort", &self.passwort.as_ref().map(|_| "<verborgen>"))
            .finish_non_exhaustive()
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    /// `SHOP_TOKEN_SECRET` ueberschreibt das Secret aus der Datei.
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

        if let Ok(secret) = std::env::var(SECRET_ENV) {
            config.auth.token_secret = secret;
        }
        Ok(config)
    }

    /// Gibt die Bind-Adresse fuer die REST-API zurueck
    pub fn api_bind_adresse(&self) -> anyhow::Result<SocketAddr> {
        let adresse = format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.api_port);
        adresse
            .parse()
            .with_context(|| format!("Ungueltige Bind-Adresse '{adresse}'"))
    }

    pub fn datenbank_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.datenbank.url.clone(),
            max_verbindungen: self.datenbank.max_verbindungen,
            sqlite_wal: self.datenbank.sqlite_wal,
        }
    }
}
