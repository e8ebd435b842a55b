//! Datenbankmodelle fuer Shopwerk
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank und enthalten
//! den Passwort-Hash. Nach aussen gehen nur die passwortfreien Typen aus
//! `shopwerk_core`, erzeugt ueber `in_principal()`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use shopwerk_core::{AdminRolle, Administrator, Kunde, Principal, PrincipalArt};

// ---------------------------------------------------------------------------
// Kunden
// ---------------------------------------------------------------------------

/// Kunden-Datensatz aus der Datenbank
#[derive(Clone)]
pub struct KundeRecord {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl KundeRecord {
    /// Entfernt den Passwort-Hash
    pub fn in_kunde(self) -> Kunde {
        Kunde {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            created_at: self.created_at,
            is_active: self.is_active,
        }
    }

    pub fn in_principal(self) -> Principal {
        Principal::Kunde(self.in_kunde())
    }
}

impl std::fmt::Debug for KundeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KundeRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<verborgen>")
            .field("created_at", &self.created_at)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

/// Daten zum Anlegen eines neuen Kunden (Passwort bereits gehasht)
#[derive(Debug, Clone)]
pub struct NeuerKunde<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Administratoren
// ---------------------------------------------------------------------------

/// Administrator-Datensatz aus der Datenbank
#[derive(Clone)]
pub struct AdministratorRecord {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: AdminRolle,
    pub created_at: DateTime<Utc>,
    pub last_access: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl AdministratorRecord {
    /// Entfernt den Passwort-Hash
    pub fn in_administrator(self) -> Administrator {
        Administrator {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            role: self.role,
            created_at: self.created_at,
            last_access: self.last_access,
            is_active: self.is_active,
        }
    }

    pub fn in_principal(self) -> Principal {
        Principal::Administrator(self.in_administrator())
    }
}

impl std::fmt::Debug for AdministratorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdministratorRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<verborgen>")
            .field("role", &self.role)
            .field("last_access", &self.last_access)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

/// Daten zum Anlegen eines neuen Administrators (Passwort bereits gehasht)
#[derive(Debug, Clone)]
pub struct NeuerAdministrator<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: AdminRolle,
}

// ---------------------------------------------------------------------------
// Sitzungs-Ledger
// ---------------------------------------------------------------------------

/// Ledger-Eintrag fuer ein ausgestelltes Token
#[derive(Debug, Clone, serde::Serialize)]
pub struct SitzungRecord {
    pub id: Uuid,
    pub token_hash: String,
    pub subject_id: Uuid,
    pub subject_kind: PrincipalArt,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Daten fuer einen neuen Ledger-Eintrag
#[derive(Debug, Clone)]
pub struct NeueSitzung<'a> {
    pub token_hash: &'a str,
    pub subject_id: Uuid,
    pub subject_kind: PrincipalArt,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
