//! Sitzungs-Ledger
//!
//! Jedes ausgestellte Token wird als SHA-256-Hash mit Subjekt und Ablauf
//! protokolliert. Eine neue Anmeldung loest fruehere Eintraege desselben
//! Subjekts ab. Das Ledger ist ein Protokoll: die Token-Verifikation liest
//! es nicht, und Schreibfehler verhindern keine Anmeldung.
//!
//! Abloesen heisst: erst einfuegen, dann alle anderen aktiven Eintraege des
//! Subjekts deaktivieren. Zwei gleichzeitige Anmeldungen desselben Subjekts
//! koennen sich dabei gegenseitig deaktivieren, sodass kein Eintrag aktiv
//! bleibt. Die Tokens selbst bleiben davon unberuehrt gueltig.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use uuid::Uuid;

use shopwerk_core::PrincipalArt;
use shopwerk_db::{models::NeueSitzung, models::SitzungRecord, SitzungsRepository};

use crate::{error::AuthResult, token::AusgestelltesToken};

/// SHA-256 eines Tokens als Hex-String
pub fn token_hash(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

/// Protokoll ausgestellter Tokens
pub struct SitzungsLedger<S> {
    speicher: Arc<S>,
}

impl<S: SitzungsRepository> SitzungsLedger<S> {
    pub fn neu(speicher: Arc<S>) -> Self {
        Self { speicher }
    }

    /// Traegt ein frisch ausgestelltes Token ein und loest fruehere
    /// Eintraege des Subjekts ab. Fehler werden nur protokolliert.
    pub async fn eintragen(&self, ausgestellt: &AusgestelltesToken) {
        let hash = token_hash(&ausgestellt.token);
        let claims = &ausgestellt.claims;

        let eintrag = NeueSitzung {
            token_hash: &hash,
            subject_id: claims.sub,
            subject_kind: claims.kind,
            created_at: claims.ausgestellt_am(),
            expires_at: claims.laeuft_ab_am(),
        };

        if let Err(e) = self.speicher.insert_session(eintrag).await {
            tracing::warn!(
                subjekt = %claims.sub,
                art = %claims.kind,
                fehler = %e,
                "Ledger-Eintrag fehlgeschlagen"
            );
            return;
        }

        match self
            .speicher
            .deactivate_sessions_for_subject(claims.sub, claims.kind, Some(&hash))
            .await
        {
            Ok(0) => {}
            Ok(abgeloest) => {
                tracing::debug!(subjekt = %claims.sub, abgeloest, "Fruehere Sitzungen abgeloest")
            }
            Err(e) => tracing::warn!(
                subjekt = %claims.sub,
                fehler = %e,
                "Fruehere Sitzungen konnten nicht abgeloest werden"
            ),
        }
    }

    /// Markiert den Eintrag des Tokens als inaktiv
    ///
    /// Gibt `false` zurueck wenn kein aktiver Eintrag existierte.
    pub async fn abmelden(&self, token: &str) -> AuthResult<bool> {
        let hash = token_hash(token);
        Ok(self.speicher.deactivate_session(&hash).await?)
    }

    /// Beendet alle aktiven Eintraege eines Subjekts; Fehler werden nur protokolliert
    pub async fn alle_beenden(&self, subjekt: Uuid, art: PrincipalArt) {
        match self
            .speicher
            .deactivate_sessions_for_subject(subjekt, art, None)
            .await
        {
            Ok(anzahl) => tracing::debug!(subjekt = %subjekt, anzahl, "Sitzungen beendet"),
            Err(e) => tracing::warn!(subjekt = %subjekt, fehler = %e, "Sitzungen nicht beendet"),
        }
    }

    /// Alle Eintraege eines Subjekts, neueste zuerst
    pub async fn sitzungen_fuer(
        &self,
        subjekt: Uuid,
        art: PrincipalArt,
    ) -> AuthResult<Vec<SitzungRecord>> {
        Ok(self
            .speicher
            .list_sessions_for_subject(subjekt, art)
            .await?)
    }
}
