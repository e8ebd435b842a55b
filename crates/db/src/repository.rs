//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Auth-Logik von der konkreten
//! Datenbank. `SqliteDb` implementiert alle Traits. Lookups filtern
//! inaktive Datensaetze heraus; es gibt keinen Cache, jeder Aufruf liest
//! frisch aus der Datenbank.

use async_trait::async_trait;
use uuid::Uuid;

use shopwerk_core::PrincipalArt;

use crate::error::DbError;
use crate::models::{
    AdministratorRecord, KundeRecord, NeueSitzung, NeuerAdministrator, NeuerKunde, SitzungRecord,
};

/// Result-Alias fuer Datenbankoperationen
pub type DbResult<T> = Result<T, DbError>;

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://shopwerk.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://shopwerk.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Repository fuer Kunden-Konten
#[async_trait]
pub trait KundenRepository: Send + Sync {
    /// Legt einen Kunden an; `DbError::Eindeutigkeit` bei bekannter E-Mail
    async fn create_customer(&self, data: NeuerKunde<'_>) -> DbResult<KundeRecord>;

    /// Laedt einen aktiven Kunden anhand der E-Mail
    async fn find_customer_by_email(&self, email: &str) -> DbResult<Option<KundeRecord>>;

    /// Laedt einen aktiven Kunden anhand der ID
    async fn find_customer_by_id(&self, id: Uuid) -> DbResult<Option<KundeRecord>>;

    /// Setzt das Aktiv-Flag; `false` wenn keine Zeile existiert
    async fn set_customer_active(&self, id: Uuid, aktiv: bool) -> DbResult<bool>;
}

/// Repository fuer Administrator-Konten
#[async_trait]
pub trait AdministratorRepository: Send + Sync {
    /// Legt einen Administrator an; `DbError::Eindeutigkeit` bei bekannter E-Mail
    async fn create_administrator(
        &self,
        data: NeuerAdministrator<'_>,
    ) -> DbResult<AdministratorRecord>;

    /// Laedt einen aktiven Administrator anhand der E-Mail
    async fn find_administrator_by_email(
        &self,
        email: &str,
    ) -> DbResult<Option<AdministratorRecord>>;

    /// Laedt einen aktiven Administrator anhand der ID
    async fn find_administrator_by_id(&self, id: Uuid) -> DbResult<Option<AdministratorRecord>>;

    /// Setzt das Aktiv-Flag; `false` wenn keine Zeile existiert
    async fn set_administrator_active(&self, id: Uuid, aktiv: bool) -> DbResult<bool>;

    /// Aktualisiert den Zeitpunkt des letzten Zugriffs
    async fn touch_last_access(&self, id: Uuid) -> DbResult<()>;

    /// Prueft ob irgendein Administrator (auch inaktiv) diese E-Mail traegt
    async fn administrator_email_exists(&self, email: &str) -> DbResult<bool>;
}

/// Repository fuer das Sitzungs-Ledger
#[async_trait]
pub trait SitzungsRepository: Send + Sync {
    /// Traegt ein ausgestelltes Token (gehasht) ein
    async fn insert_session(&self, data: NeueSitzung<'_>) -> DbResult<SitzungRecord>;

    /// Markiert alle aktiven Eintraege eines Subjekts als inaktiv,
    /// ausgenommen `ausser_hash`. Gibt die Anzahl betroffener Zeilen zurueck.
    async fn deactivate_sessions_for_subject(
        &self,
        subject_id: Uuid,
        kind: PrincipalArt,
        ausser_hash: Option<&str>,
    ) -> DbResult<u64>;

    /// Markiert den Eintrag mit diesem Token-Hash als inaktiv
    async fn deactivate_session(&self, token_hash: &str) -> DbResult<bool>;

    /// Alle Eintraege eines Subjekts, neueste zuerst
    async fn list_sessions_for_subject(
        &self,
        subject_id: Uuid,
        kind: PrincipalArt,
    ) -> DbResult<Vec<SitzungRecord>>;
}

/// Sammel-Trait fuer einen vollstaendigen Konto-Speicher
pub trait KontoSpeicher: KundenRepository + AdministratorRepository + SitzungsRepository {}

impl<T> KontoSpeicher for T where T: KundenRepository + AdministratorRepository + SitzungsRepository {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_config_standard() {
        let cfg = DatabaseConfig::default();
        assert!(cfg.sqlite_wal);
        assert_eq!(cfg.max_verbindungen, 5);
        assert!(cfg.url.starts_with("sqlite://"));
    }
}
