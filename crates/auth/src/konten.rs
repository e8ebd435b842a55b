//! Konto-Verwaltung (Credential-Store)
//!
//! Kapselt die Repositories und den Passwort-Hasher. Passwort-Hashes
//! verlassen dieses Modul nie; nach aussen gehen nur `Principal`,
//! `Kunde` und `Administrator`.
//!
//! E-Mail-Adressen werden vor jedem Zugriff getrimmt und klein geschrieben.

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use shopwerk_core::{AdminRolle, Administrator, Kunde, Principal, PrincipalArt};
use shopwerk_db::{
    models::{NeuerAdministrator, NeuerKunde},
    AdministratorRepository, KundenRepository,
};

use crate::{
    error::{AuthError, AuthResult},
    password::PasswortHasher,
};

/// Normalisiert eine E-Mail-Adresse (trim + lowercase)
pub fn email_normalisieren(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Eingabe fuer eine Kunden-Registrierung
#[derive(Clone, Deserialize)]
pub struct KundenRegistrierung {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(rename = "password")]
    pub passwort: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Eingabe zum Anlegen eines Administrators
#[derive(Clone, Deserialize)]
pub struct AdministratorAnlage {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(rename = "password")]
    pub passwort: String,
    /// Fehlt die Rolle, wird `admin` vergeben
    #[serde(default)]
    pub role: Option<AdminRolle>,
}

/// Credential-Store ueber Kunden- und Administrator-Tabellen
pub struct KontoService<S> {
    speicher: Arc<S>,
    hasher: PasswortHasher,
}

impl<S> KontoService<S>
where
    S: KundenRepository + AdministratorRepository,
{
    pub fn neu(speicher: Arc<S>, hasher: PasswortHasher) -> Self {
        Self { speicher, hasher }
    }

    /// Legt einen Kunden an
    ///
    /// Bei bereits vergebener E-Mail: `EmailVergeben`, es entsteht keine Zeile.
    pub async fn kunde_anlegen(&self, eingabe: KundenRegistrierung) -> AuthResult<Kunde> {
        let email = email_normalisieren(&eingabe.email);
        let hash = self.hasher.hashen_async(eingabe.passwort).await?;

        let ergebnis = self
            .speicher
            .create_customer(NeuerKunde {
                first_name: &eingabe.first_name,
                last_name: &eingabe.last_name,
                email: &email,
                password_hash: &hash,
                phone: eingabe.phone.as_deref(),
                address: eingabe.address.as_deref(),
            })
            .await;

        match ergebnis {
            Ok(record) => {
                tracing::info!(kunde_id = %record.id, "Kunde angelegt");
                Ok(record.in_kunde())
            }
            Err(e) if e.ist_eindeutigkeit() => Err(AuthError::EmailVergeben(email)),
            Err(e) => Err(e.into()),
        }
    }

    /// Legt einen Administrator an; ohne Rollenangabe mit Rolle `admin`
    pub async fn administrator_anlegen(
        &self,
        eingabe: AdministratorAnlage,
    ) -> AuthResult<Administrator> {
        let email = email_normalisieren(&eingabe.email);
        let role = eingabe.role.unwrap_or_default();
        let hash = self.hasher.hashen_async(eingabe.passwort).await?;

        let ergebnis = self
            .speicher
            .create_administrator(NeuerAdministrator {
                first_name: &eingabe.first_name,
                last_name: &eingabe.last_name,
                email: &email,
                password_hash: &hash,
                role,
            })
            .await;

        match ergebnis {
            Ok(record) => {
                tracing::info!(
                    admin_id = %record.id,
                    rolle = %record.role,
                    "Administrator angelegt"
                );
                Ok(record.in_administrator())
            }
            Err(e) if e.ist_eindeutigkeit() => Err(AuthError::EmailVergeben(email)),
            Err(e) => Err(e.into()),
        }
    }

    /// Sucht einen aktiven Principal anhand der E-Mail
    pub async fn nach_email_finden(
        &self,
        art: PrincipalArt,
        email: &str,
    ) -> AuthResult<Option<Principal>> {
        let email = email_normalisieren(email);
        Ok(self
            .anmeldedaten_laden(art, &email)
            .await?
            .map(|(principal, _)| principal))
    }

    /// Sucht einen aktiven Principal anhand der ID
    pub async fn nach_id_finden(
        &self,
        art: PrincipalArt,
        id: Uuid,
    ) -> AuthResult<Option<Principal>> {
        let principal = match art {
            PrincipalArt::Kunde => self
                .speicher
                .find_customer_by_id(id)
                .await?
                .map(|r| r.in_principal()),
            PrincipalArt::Administrator => self
                .speicher
                .find_administrator_by_id(id)
                .await?
                .map(|r| r.in_principal()),
        };
        Ok(principal)
    }

    /// Prueft E-Mail und Passwort
    ///
    /// Unbekannte E-Mail, inaktives Konto und falsches Passwort ergeben
    /// denselben Fehler. Bei unbekannter E-Mail wird gegen einen
    /// Dummy-Hash verifiziert, damit die Laufzeit vergleichbar bleibt.
    pub async fn anmeldedaten_pruefen(
        &self,
        art: PrincipalArt,
        email: &str,
        passwort: &str,
    ) -> AuthResult<Principal> {
        let email = email_normalisieren(email);
        let geladen = self.anmeldedaten_laden(art, &email).await?;

        let (principal, hash) = match geladen {
            Some((p, h)) => (Some(p), Some(h)),
            None => (None, None),
        };

        let korrekt = self
            .hasher
            .verifizieren_async(passwort.to_string(), hash)
            .await?;

        match principal {
            Some(p) if korrekt => Ok(p),
            _ => {
                tracing::warn!(art = %art, "Fehlgeschlagener Anmeldeversuch");
                Err(AuthError::UngueltigeAnmeldedaten)
            }
        }
    }

    async fn anmeldedaten_laden(
        &self,
        art: PrincipalArt,
        email: &str,
    ) -> AuthResult<Option<(Principal, String)>> {
        let geladen = match art {
            PrincipalArt::Kunde => self
                .speicher
                .find_customer_by_email(email)
                .await?
                .map(|mut r| {
                    let hash = std::mem::take(&mut r.password_hash);
                    (r.in_principal(), hash)
                }),
            PrincipalArt::Administrator => self
                .speicher
                .find_administrator_by_email(email)
                .await?
                .map(|mut r| {
                    let hash = std::mem::take(&mut r.password_hash);
                    (r.in_principal(), hash)
                }),
        };
        Ok(geladen)
    }

    /// Deaktiviert ein Konto (weiches Loeschen)
    pub async fn deaktivieren(&self, art: PrincipalArt, id: Uuid) -> AuthResult<()> {
        self.aktiv_setzen(art, id, false).await
    }

    /// Reaktiviert ein deaktiviertes Konto
    pub async fn reaktivieren(&self, art: PrincipalArt, id: Uuid) -> AuthResult<()> {
        self.aktiv_setzen(art, id, true).await
    }

    async fn aktiv_setzen(&self, art: PrincipalArt, id: Uuid, aktiv: bool) -> AuthResult<()> {
        let betroffen = match art {
            PrincipalArt::Kunde => self.speicher.set_customer_active(id, aktiv).await?,
            PrincipalArt::Administrator => {
                self.speicher.set_administrator_active(id, aktiv).await?
            }
        };
        if !betroffen {
            return Err(AuthError::KontoNichtGefunden(id.to_string()));
        }
        tracing::info!(art = %art, id = %id, aktiv, "Konto-Status geaendert");
        Ok(())
    }

    /// Setzt den letzten Zugriff eines Administrators auf jetzt
    pub async fn letzten_zugriff_setzen(&self, admin_id: Uuid) -> AuthResult<()> {
        self.speicher.touch_last_access(admin_id).await?;
        Ok(())
    }

    /// Legt den ersten Super-Administrator an, falls die E-Mail noch
    /// keinem Administrator gehoert. Gibt `true` zurueck wenn angelegt.
    pub async fn super_admin_sicherstellen(&self, eingabe: AdministratorAnlage) -> AuthResult<bool> {
        let email = email_normalisieren(&eingabe.email);
        if self.speicher.administrator_email_exists(&email).await? {
            tracing::debug!("Bootstrap-Administrator existiert bereits");
            return Ok(false);
        }

        self.administrator_anlegen(AdministratorAnlage {
            role: Some(AdminRolle::SuperAdmin),
            ..eingabe
        })
        .await?;
        Ok(true)
    }
}
