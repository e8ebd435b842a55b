//! Gemeinsame Aufzaehlungstypen fuer Shopwerk
//!
//! Principal-Art und Administrator-Rolle werden sowohl in der Datenbank
//! (als Text) als auch im Token (als JSON-String) abgelegt. Die
//! String-Darstellung ist deshalb fest und darf nicht geaendert werden.

use serde::{Deserialize, Serialize};

/// Art eines Principals
///
/// Kunden und Administratoren haben getrennte E-Mail-Namensraeume und
/// getrennte Tabellen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrincipalArt {
    /// Endkunde des Shops
    #[serde(rename = "user")]
    Kunde,
    /// Mitarbeiter mit Verwaltungsrechten
    #[serde(rename = "admin")]
    Administrator,
}

impl PrincipalArt {
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Kunde => "user",
            Self::Administrator => "admin",
        }
    }
}

impl std::fmt::Display for PrincipalArt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.als_str())
    }
}

impl std::str::FromStr for PrincipalArt {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::Kunde),
            "admin" => Ok(Self::Administrator),
            other => Err(format!("Unbekannte Principal-Art: {other}")),
        }
    }
}

/// Rolle eines Administrators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRolle {
    /// Standard-Rolle neuer Administratoren
    #[default]
    Admin,
    /// Erweiterte Rolle, Obermenge von `Admin`
    SuperAdmin,
}

impl AdminRolle {
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl std::fmt::Display for AdminRolle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.als_str())
    }
}

impl std::str::FromStr for AdminRolle {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            other => Err(format!("Unbekannte Administrator-Rolle: {other}")),
        }
    }
}
