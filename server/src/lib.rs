//! shopwerk-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und stellt den oeffentlichen Einstiegspunkt
//! fuer Integrationstests bereit.

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use config::ServerConfig;

use shopwerk_api::{app_erstellen, ApiState, RestServer, RestServerKonfig};
use shopwerk_auth::{AdministratorAnlage, AuthService, PasswortHasher, TokenDienst};
use shopwerk_db::SqliteDb;
use shopwerk_observability::{db_ueberwachung_starten, HealthState, ShopMetriken};

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Baut Datenbank und Dienste auf, ohne einen Listener zu oeffnen
    pub async fn dienste_aufbauen(&self) -> Result<(Arc<SqliteDb>, Arc<AuthService<SqliteDb>>)> {
        let auth_cfg = &self.config.auth;

        // Fehlkonfiguration vor dem Oeffnen der Datenbank erkennen
        let tokens = TokenDienst::neu(&auth_cfg.token_secret, auth_cfg.token_lebensdauer_sek)
            .context("Token-Dienst konnte nicht erstellt werden")?;
        let hasher = PasswortHasher::neu(auth_cfg.hash_parameter())
            .context("Passwort-Hasher konnte nicht erstellt werden")?;

        tracing::info!(url = %self.config.datenbank.url, "Datenbankverbindung wird hergestellt");
        let db = Arc::new(
            SqliteDb::oeffnen(&self.config.datenbank_config())
                .await
                .context("Datenbank konnte nicht geoeffnet werden")?,
        );

        let auth = Arc::new(AuthService::neu(Arc::clone(&db), hasher, tokens));
        self.bootstrap(&auth).await?;
        Ok((db, auth))
    }

    /// Legt den konfigurierten Super-Administrator an, falls noetig
    async fn bootstrap(&self, auth: &AuthService<SqliteDb>) -> Result<()> {
        let bootstrap = &self.config.bootstrap;
        let (Some(email), Some(passwort)) = (&bootstrap.email, &bootstrap.passwort) else {
            tracing::debug!("Kein Bootstrap-Administrator konfiguriert");
            return Ok(());
        };

        let angelegt = auth
            .konten()
            .super_admin_sicherstellen(AdministratorAnlage {
                first_name: bootstrap.vorname.clone(),
                last_name: bootstrap.nachname.clone(),
                email: email.clone(),
                passwort: passwort.clone(),
                role: None,
            })
            .await
            .context("Bootstrap-Administrator konnte nicht angelegt werden")?;

        if angelegt {
            tracing::info!(email = %email, "Bootstrap-Super-Administrator angelegt");
        }
        Ok(())
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbank oeffnen, Migrationen, Bootstrap
    /// 2. DB-Ueberwachung fuer `/health` starten
    /// 3. REST-API starten
    /// 4. Auf Ctrl-C warten
    pub async fn starten(self) -> Result<()> {
        let bind_addr = self.config.api_bind_adresse()?;
        tracing::info!(api = %bind_addr, "Server startet");

        let (db, auth) = self.dienste_aufbauen().await?;

        let health = HealthState::neu();
        let intervall = Duration::from_secs(self.config.observability.health_intervall_sek.max(1));
        let ueberwachung = db_ueberwachung_starten(health.clone(), intervall, move || {
            let db = Arc::clone(&db);
            async move { db.ping().await }
        });

        let metriken = ShopMetriken::neu().context("Metriken konnten nicht registriert werden")?;
        let konfig = RestServerKonfig {
            bind_addr,
            cors_origins: self.config.netzwerk.cors_origins.clone(),
            metriken_aktiviert: self.config.observability.metriken_aktiviert,
        };
        let app = app_erstellen(ApiState::neu(auth, metriken), health, &konfig);

        tracing::info!("Server laeuft. Warte auf Shutdown-Signal (Ctrl-C)...");
        RestServer::neu(konfig)
            .starten(app, async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(fehler = %e, "Shutdown-Signal nicht empfangbar");
                }
                tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
            })
            .await?;

        ueberwachung.abort();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopwerk_core::{AdminRolle, PrincipalArt};

    fn test_config() -> ServerConfig {
        let mut config = ServerConfig::default();
        config.datenbank.url = "sqlite::memory:".into();
        config.datenbank.max_verbindungen = 1;
        config.datenbank.sqlite_wal = false;
        config.auth.token_secret = "server-test-secret".into();
        config.auth.argon2_speicher_kib = 1024;
        config.auth.argon2_iterationen = 1;
        config
    }

    #[tokio::test]
    async fn leeres_secret_verhindert_start() {
        let mut config = test_config();
        config.auth.token_secret.clear();
        assert!(Server::neu(config).dienste_aufbauen().await.is_err());
    }

    #[tokio::test]
    async fn riesige_token_lebensdauer_verhindert_start() {
        let mut config = test_config();
        config.auth.token_lebensdauer_sek = i64::MAX;
        assert!(Server::neu(config).dienste_aufbauen().await.is_err());
    }

    #[tokio::test]
    async fn bootstrap_legt_super_admin_an() {
        let mut config = test_config();
        config.bootstrap.email = Some("Root@Shop.de".into());
        config.bootstrap.passwort = Some("start-pw".into());

        let server = Server::neu(config);
        let (_db, auth) = server.dienste_aufbauen().await.unwrap();

        let root = auth
            .konten()
            .nach_email_finden(PrincipalArt::Administrator, "root@shop.de")
            .await
            .unwrap()
            .expect("Bootstrap-Administrator fehlt");
        assert_eq!(
            root.als_administrator().map(|a| a.role),
            Some(AdminRolle::SuperAdmin)
        );

        // Zweiter Lauf auf derselben Datenbank legt nichts an
        server.bootstrap(&auth).await.unwrap();
        assert!(auth
            .administrator_anmelden("root@shop.de", "start-pw")
            .await
            .is_ok());
    }
}
