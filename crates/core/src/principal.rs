//! Aussendarstellung authentifizierter Principals
//!
//! Diese Typen verlassen den Credential-Store und werden an Route-Handler
//! und in JSON-Antworten weitergegeben. Sie enthalten bewusst keinen
//! Passwort-Hash; die DB-Records bieten dafuer `in_principal()`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{AdminRolle, PrincipalArt};

/// Kunde ohne Credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kunde {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Administrator ohne Credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Administrator {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: AdminRolle,
    pub created_at: DateTime<Utc>,
    pub last_access: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// Ein authentifizierter Akteur
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Principal {
    #[serde(rename = "user")]
    Kunde(Kunde),
    #[serde(rename = "admin")]
    Administrator(Administrator),
}

impl Principal {
    pub fn id(&self) -> Uuid {
        match self {
            Self::Kunde(k) => k.id,
            Self::Administrator(a) => a.id,
        }
    }

    pub fn art(&self) -> PrincipalArt {
        match self {
            Self::Kunde(_) => PrincipalArt::Kunde,
            Self::Administrator(_) => PrincipalArt::Administrator,
        }
    }

    pub fn ist_aktiv(&self) -> bool {
        match self {
            Self::Kunde(k) => k.is_active,
            Self::Administrator(a) => a.is_active,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Self::Kunde(k) => &k.email,
            Self::Administrator(a) => &a.email,
        }
    }

    /// Gibt den Administrator zurueck, falls der Principal einer ist
    pub fn als_administrator(&self) -> Option<&Administrator> {
        match self {
            Self::Administrator(a) => Some(a),
            Self::Kunde(_) => None,
        }
    }
}
