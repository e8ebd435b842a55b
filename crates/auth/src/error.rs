//! Fehlertypen fuer den Auth-Service

use thiserror::Error;

/// Alle moeglichen Fehler im Auth-Service
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Passwort ---
    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    // --- Authentifizierung ---
    /// Unbekannte E-Mail und falsches Passwort sind nicht unterscheidbar
    #[error("E-Mail oder Passwort falsch")]
    UngueltigeAnmeldedaten,

    /// Konto nach Token-Ausstellung deaktiviert oder geloescht
    #[error("Konto inaktiv")]
    KontoInaktiv,

    // --- Token ---
    #[error("Token ungueltig")]
    TokenUngueltig,

    #[error("Token-Signatur ungueltig")]
    TokenSignatur,

    #[error("Token abgelaufen")]
    TokenAbgelaufen,

    // --- Berechtigungen ---
    #[error("Zugriff verweigert: Berechtigung '{0}' fehlt")]
    BerechtigungFehlt(String),

    #[error("Zugriff verweigert: Rolle '{0}' erforderlich")]
    RolleFehlt(String),

    // --- Kontoverwaltung ---
    #[error("E-Mail bereits vergeben: {0}")]
    EmailVergeben(String),

    #[error("Konto nicht gefunden: {0}")]
    KontoNichtGefunden(String),

    // --- Konfiguration ---
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    // --- Datenbank ---
    #[error("Datenbankfehler: {0}")]
    Datenbank(#[from] shopwerk_db::DbError),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Gibt true zurueck fuer Fehler, die zu `401 Unauthorized` fuehren
    pub fn ist_authentifizierung(&self) -> bool {
        matches!(
            self,
            Self::UngueltigeAnmeldedaten
                | Self::KontoInaktiv
                | Self::TokenUngueltig
                | Self::TokenSignatur
                | Self::TokenAbgelaufen
        )
    }

    /// Gibt true zurueck fuer Fehler, die zu `403 Forbidden` fuehren
    pub fn ist_autorisierung(&self) -> bool {
        matches!(self, Self::BerechtigungFehlt(_) | Self::RolleFehlt(_))
    }
}

/// Result-Alias fuer den Auth-Service
pub type AuthResult<T> = Result<T, AuthError>;
