//! Auth-Service fuer Shopwerk
//!
//! Zentraler Service fuer Registrierung, Anmeldung, Abmeldung und
//! Token-Aufloesung. Verbindet Credential-Store, Token-Dienst und
//! Sitzungs-Ledger.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use shopwerk_core::{Administrator, Principal, PrincipalArt};
use shopwerk_db::{models::SitzungRecord, KontoSpeicher};

use crate::{
    error::{AuthError, AuthResult},
    konten::{AdministratorAnlage, KontoService, KundenRegistrierung},
    ledger::SitzungsLedger,
    password::PasswortHasher,
    token::TokenDienst,
};

/// Ergebnis einer erfolgreichen Anmeldung oder Registrierung
#[derive(Debug, Clone, Serialize)]
pub struct Anmeldung {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub principal: Principal,
}

/// Auth-Service – zentraler Einstiegspunkt fuer alle Authentifizierungsvorgaenge
pub struct AuthService<S> {
    konten: KontoService<S>,
    ledger: SitzungsLedger<S>,
    tokens: TokenDienst,
}

impl<S: KontoSpeicher> AuthService<S> {
    /// Erstellt einen neuen AuthService
    pub fn neu(speicher: Arc<S>, hasher: PasswortHasher, tokens: TokenDienst) -> Self {
        Self {
            konten: KontoService::neu(Arc::clone(&speicher), hasher),
            ledger: SitzungsLedger::neu(speicher),
            tokens,
        }
    }

    pub fn konten(&self) -> &KontoService<S> {
        &self.konten
    }

    pub fn tokens(&self) -> &TokenDienst {
        &self.tokens
    }

    /// Registriert einen Kunden und meldet ihn direkt an
    pub async fn kunde_registrieren(&self, eingabe: KundenRegistrierung) -> AuthResult<Anmeldung> {
        let kunde = self.konten.kunde_anlegen(eingabe).await?;
        self.token_ausgeben(Principal::Kunde(kunde)).await
    }

    /// Meldet einen Kunden mit E-Mail und Passwort an
    pub async fn kunde_anmelden(&self, email: &str, passwort: &str) -> AuthResult<Anmeldung> {
        let principal = self
            .konten
            .anmeldedaten_pruefen(PrincipalArt::Kunde, email, passwort)
            .await?;

        tracing::info!(kunde_id = %principal.id(), "Kunde angemeldet");
        self.token_ausgeben(principal).await
    }

    /// Meldet einen Administrator an und setzt den letzten Zugriff
    pub async fn administrator_anmelden(
        &self,
        email: &str,
        passwort: &str,
    ) -> AuthResult<Anmeldung> {
        let principal = self
            .konten
            .anmeldedaten_pruefen(PrincipalArt::Administrator, email, passwort)
            .await?;
        let id = principal.id();

        self.konten.letzten_zugriff_setzen(id).await?;
        let principal = self
            .konten
            .nach_id_finden(PrincipalArt::Administrator, id)
            .await?
            .unwrap_or(principal);

        tracing::info!(admin_id = %id, "Administrator angemeldet");
        self.token_ausgeben(principal).await
    }

    async fn token_ausgeben(&self, principal: Principal) -> AuthResult<Anmeldung> {
        let ausgestellt = self.tokens.ausstellen(principal.id(), principal.art())?;
        self.ledger.eintragen(&ausgestellt).await;

        Ok(Anmeldung {
            expires_at: ausgestellt.claims.laeuft_ab_am(),
            token: ausgestellt.token,
            principal,
        })
    }

    /// Loest ein Bearer-Token zum aktuellen Principal auf
    pub async fn token_aufloesen(&self, token: &str) -> AuthResult<Principal> {
        self.token_aufloesen_zum(token, Utc::now()).await
    }

    /// Wie `token_aufloesen`, mit explizitem Zeitpunkt fuer die Ablaufpruefung
    ///
    /// Der Principal wird bei jedem Aufruf frisch geladen. Ein inzwischen
    /// deaktiviertes oder geloeschtes Konto ergibt `KontoInaktiv`.
    pub async fn token_aufloesen_zum(
        &self,
        token: &str,
        jetzt: DateTime<Utc>,
    ) -> AuthResult<Principal> {
        let claims = self.tokens.verifizieren_zum(token, jetzt)?;

        let principal = self
            .konten
            .nach_id_finden(claims.kind, claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::debug!(subjekt = %claims.sub, art = %claims.kind, "Token fuer inaktives Konto");
                AuthError::KontoInaktiv
            })?;

        if !principal.ist_aktiv() {
            return Err(AuthError::KontoInaktiv);
        }
        Ok(principal)
    }

    /// Meldet ab, indem der Ledger-Eintrag des Tokens deaktiviert wird
    ///
    /// Das Token selbst bleibt bis zum Ablauf kryptographisch gueltig.
    pub async fn abmelden(&self, token: &str) -> AuthResult<bool> {
        let betroffen = self.ledger.abmelden(token).await?;
        tracing::debug!(betroffen, "Abmeldung verarbeitet");
        Ok(betroffen)
    }

    /// Legt einen Administrator an
    pub async fn administrator_anlegen(
        &self,
        eingabe: AdministratorAnlage,
    ) -> AuthResult<Administrator> {
        self.konten.administrator_anlegen(eingabe).await
    }

    /// Deaktiviert ein Konto; ausgestellte Tokens werden ab sofort abgelehnt
    pub async fn konto_deaktivieren(&self, art: PrincipalArt, id: Uuid) -> AuthResult<()> {
        self.konten.deaktivieren(art, id).await?;
        self.ledger.alle_beenden(id, art).await;
        Ok(())
    }

    pub async fn konto_reaktivieren(&self, art: PrincipalArt, id: Uuid) -> AuthResult<()> {
        self.konten.reaktivieren(art, id).await
    }

    /// Ledger-Eintraege eines Subjekts, neueste zuerst
    pub async fn sitzungen_fuer(
        &self,
        subjekt: Uuid,
        art: PrincipalArt,
    ) -> AuthResult<Vec<SitzungRecord>> {
        self.ledger.sitzungen_fuer(subjekt, art).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::token_hash;
    use crate::password::test_hasher;
    use async_trait::async_trait;
    use chrono::Duration;
    use shopwerk_core::AdminRolle;
    use shopwerk_db::{
        models::{
            AdministratorRecord, KundeRecord, NeueSitzung, NeuerAdministrator, NeuerKunde,
        },
        AdministratorRepository, DbError, DbResult, KundenRepository, SitzungsRepository,
        SqliteDb,
    };

    async fn service() -> AuthService<SqliteDb> {
        let db = SqliteDb::in_memory().await.unwrap();
        AuthService::neu(
            Arc::new(db),
            test_hasher(),
            TokenDienst::neu("service-test-secret", 3600).unwrap(),
        )
    }

    fn registrierung(email: &str) -> KundenRegistrierung {
        KundenRegistrierung {
            first_name: "Anna".into(),
            last_name: "Berg".into(),
            email: email.into(),
            passwort: "geheim123".into(),
            phone: None,
            address: None,
        }
    }

    fn anlage(email: &str, role: AdminRolle) -> AdministratorAnlage {
        AdministratorAnlage {
            first_name: "Bernd".into(),
            last_name: "Kraus".into(),
            email: email.into(),
            passwort: "admin-pw".into(),
            role: Some(role),
        }
    }

    #[tokio::test]
    async fn registrieren_anmelden_aufloesen() {
        let svc = service().await;
        let registriert = svc.kunde_registrieren(registrierung("a@x.com")).await.unwrap();

        let anmeldung = svc.kunde_anmelden("a@x.com", "geheim123").await.unwrap();
        assert_eq!(anmeldung.principal.id(), registriert.principal.id());

        let principal = svc.token_aufloesen(&anmeldung.token).await.unwrap();
        assert_eq!(principal.id(), registriert.principal.id());
        assert_eq!(principal.art(), PrincipalArt::Kunde);
    }

    #[tokio::test]
    async fn aufloesen_ist_idempotent() {
        let svc = service().await;
        let anmeldung = svc.kunde_registrieren(registrierung("b@x.com")).await.unwrap();

        let erstes = svc.token_aufloesen(&anmeldung.token).await.unwrap();
        let zweites = svc.token_aufloesen(&anmeldung.token).await.unwrap();
        assert_eq!(erstes, zweites);
    }

    #[tokio::test]
    async fn deaktivierung_nach_ausstellung_wird_erkannt() {
        let svc = service().await;
        let anmeldung = svc.kunde_registrieren(registrierung("c@x.com")).await.unwrap();
        let id = anmeldung.principal.id();

        svc.konto_deaktivieren(PrincipalArt::Kunde, id).await.unwrap();
        let err = svc.token_aufloesen(&anmeldung.token).await.unwrap_err();
        assert!(matches!(err, AuthError::KontoInaktiv));

        // Ledger-Eintraege sind beendet
        let eintraege = svc.sitzungen_fuer(id, PrincipalArt::Kunde).await.unwrap();
        assert!(eintraege.iter().all(|e| !e.is_active));

        // Nach Reaktivierung ist dasselbe Token wieder gueltig
        svc.konto_reaktivieren(PrincipalArt::Kunde, id).await.unwrap();
        assert!(svc.token_aufloesen(&anmeldung.token).await.is_ok());
    }

    #[tokio::test]
    async fn abgelaufenes_token_wird_abgelehnt() {
        let svc = service().await;
        let anmeldung = svc.kunde_registrieren(registrierung("d@x.com")).await.unwrap();

        let spaeter = anmeldung.expires_at + Duration::seconds(1);
        let err = svc
            .token_aufloesen_zum(&anmeldung.token, spaeter)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenAbgelaufen));
    }

    #[tokio::test]
    async fn kunden_token_ist_kein_admin_token() {
        let svc = service().await;
        let admin = svc
            .administrator_anlegen(anlage("e@x.com", AdminRolle::Admin))
            .await
            .unwrap();

        // Token mit Admin-ID, aber Art "user": kein Kunde mit dieser ID
        let gefaelscht = svc
            .tokens()
            .ausstellen(admin.id, PrincipalArt::Kunde)
            .unwrap();
        let err = svc.token_aufloesen(&gefaelscht.token).await.unwrap_err();
        assert!(matches!(err, AuthError::KontoInaktiv));
    }

    #[tokio::test]
    async fn administrator_anmelden_setzt_letzten_zugriff() {
        let svc = service().await;
        svc.administrator_anlegen(anlage("f@shop.de", AdminRolle::SuperAdmin))
            .await
            .unwrap();

        let anmeldung = svc.administrator_anmelden("F@shop.de", "admin-pw").await.unwrap();
        let admin = anmeldung
            .principal
            .als_administrator()
            .expect("Principal muss Administrator sein");
        assert!(admin.last_access.is_some());
        assert_eq!(admin.role, AdminRolle::SuperAdmin);

        // Kunden-Login mit Admin-Daten schlaegt fehl
        let err = svc.kunde_anmelden("f@shop.de", "admin-pw").await.unwrap_err();
        assert!(matches!(err, AuthError::UngueltigeAnmeldedaten));
    }

    #[tokio::test]
    async fn neue_anmeldung_loest_fruehere_ab_und_abmelden() {
        let svc = service().await;
        let erste = svc.kunde_registrieren(registrierung("g@x.com")).await.unwrap();
        let zweite = svc.kunde_anmelden("g@x.com", "geheim123").await.unwrap();
        let id = zweite.principal.id();

        let eintraege = svc.sitzungen_fuer(id, PrincipalArt::Kunde).await.unwrap();
        assert_eq!(eintraege.len(), 2);
        assert_eq!(eintraege.iter().filter(|e| e.is_active).count(), 1);
        // Neuester Eintrag zuerst, auch innerhalb derselben Sekunde
        assert!(eintraege[0].is_active);
        assert_eq!(eintraege[0].token_hash, token_hash(&zweite.token));

        // Das Ledger ist nur ein Protokoll: das erste Token bleibt gueltig
        assert!(svc.token_aufloesen(&erste.token).await.is_ok());

        assert!(svc.abmelden(&zweite.token).await.unwrap());
        let eintraege = svc.sitzungen_fuer(id, PrincipalArt::Kunde).await.unwrap();
        assert!(eintraege.iter().all(|e| !e.is_active));
    }

    /// Speicher, dessen Ledger-Schreibzugriffe immer fehlschlagen
    struct LedgerDefekt(SqliteDb);

    #[async_trait]
    impl KundenRepository for LedgerDefekt {
        async fn create_customer(&self, data: NeuerKunde<'_>) -> DbResult<KundeRecord> {
            self.0.create_customer(data).await
        }
        async fn find_customer_by_email(&self, email: &str) -> DbResult<Option<KundeRecord>> {
            self.0.find_customer_by_email(email).await
        }
        async fn find_customer_by_id(&self, id: Uuid) -> DbResult<Option<KundeRecord>> {
            self.0.find_customer_by_id(id).await
        }
        async fn set_customer_active(&self, id: Uuid, aktiv: bool) -> DbResult<bool> {
            self.0.set_customer_active(id, aktiv).await
        }
    }

    #[async_trait]
    impl AdministratorRepository for LedgerDefekt {
        async fn create_administrator(
            &self,
            data: NeuerAdministrator<'_>,
        ) -> DbResult<AdministratorRecord> {
            self.0.create_administrator(data).await
        }
        async fn find_administrator_by_email(
            &self,
            email: &str,
        ) -> DbResult<Option<AdministratorRecord>> {
            self.0.find_administrator_by_email(email).await
        }
        async fn find_administrator_by_id(
            &self,
            id: Uuid,
        ) -> DbResult<Option<AdministratorRecord>> {
            self.0.find_administrator_by_id(id).await
        }
        async fn set_administrator_active(&self, id: Uuid, aktiv: bool) -> DbResult<bool> {
            self.0.set_administrator_active(id, aktiv).await
        }
        async fn touch_last_access(&self, id: Uuid) -> DbResult<()> {
            self.0.touch_last_access(id).await
        }
        async fn administrator_email_exists(&self, email: &str) -> DbResult<bool> {
            self.0.administrator_email_exists(email).await
        }
    }

    #[async_trait]
    impl SitzungsRepository for LedgerDefekt {
        async fn insert_session(&self, _data: NeueSitzung<'_>) -> DbResult<SitzungRecord> {
            Err(DbError::intern("Ledger nicht erreichbar"))
        }
        async fn deactivate_sessions_for_subject(
            &self,
            _subject_id: Uuid,
            _kind: PrincipalArt,
            _ausser_hash: Option<&str>,
        ) -> DbResult<u64> {
            Err(DbError::intern("Ledger nicht erreichbar"))
        }
        async fn deactivate_session(&self, _token_hash: &str) -> DbResult<bool> {
            Err(DbError::intern("Ledger nicht erreichbar"))
        }
        async fn list_sessions_for_subject(
            &self,
            _subject_id: Uuid,
            _kind: PrincipalArt,
        ) -> DbResult<Vec<SitzungRecord>> {
            Err(DbError::intern("Ledger nicht erreichbar"))
        }
    }

    #[tokio::test]
    async fn ledger_fehler_blockiert_anmeldung_nicht() {
        let db = SqliteDb::in_memory().await.unwrap();
        let svc = AuthService::neu(
            Arc::new(LedgerDefekt(db)),
            test_hasher(),
            TokenDienst::neu("service-test-secret", 3600).unwrap(),
        );

        let anmeldung = svc.kunde_registrieren(registrierung("h@x.com")).await.unwrap();
        assert!(svc.token_aufloesen(&anmeldung.token).await.is_ok());

        // Deaktivierung gelingt trotz defektem Ledger
        svc.konto_deaktivieren(PrincipalArt::Kunde, anmeldung.principal.id())
            .await
            .unwrap();

        // Abmelden meldet den Speicherfehler
        assert!(matches!(
            svc.abmelden(&anmeldung.token).await,
            Err(AuthError::Datenbank(_))
        ));
    }
}
