//! Passwort-Hashing mit Argon2id
//!
//! Der Arbeitsaufwand (Speicher, Iterationen, Parallelismus) kommt aus der
//! Konfiguration und wird beim Erstellen des Hashers einmal validiert.
//! Hashen und Verifizieren sind CPU-lastig; die `_async`-Varianten laufen
//! auf dem Blocking-Pool von tokio.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::error::{AuthError, AuthResult};

/// Klartext fuer den Vergleichs-Hash bei unbekannten E-Mails
const DUMMY_PASSWORT: &str = "shopwerk::kein-konto";

/// Argon2id-Arbeitsaufwand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParameter {
    /// Speicher in KiB
    pub speicher_kib: u32,
    /// Anzahl Iterationen
    pub iterationen: u32,
    /// Parallelismus (Lanes)
    pub parallelitaet: u32,
}

impl Default for HashParameter {
    /// OWASP-Empfehlung: 64 MiB, 3 Iterationen, 1 Lane
    fn default() -> Self {
        Self {
            speicher_kib: 64 * 1024,
            iterationen: 3,
            parallelitaet: 1,
        }
    }
}

/// Argon2id-Hasher mit festem Arbeitsaufwand
#[derive(Clone)]
pub struct PasswortHasher {
    params: Params,
    dummy_hash: Arc<str>,
}

impl PasswortHasher {
    /// Erstellt einen Hasher; schlaegt bei ungueltigen Parametern fehl
    pub fn neu(parameter: HashParameter) -> AuthResult<Self> {
        let params = Params::new(
            parameter.speicher_kib,
            parameter.iterationen,
            parameter.parallelitaet,
            None,
        )
        .map_err(|e| AuthError::Konfiguration(format!("Ungueltige Argon2-Parameter: {e}")))?;

        let mut hasher = Self {
            params,
            dummy_hash: Arc::from(""),
        };
        hasher.dummy_hash = Arc::from(hasher.hashen(DUMMY_PASSWORT)?);
        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hasht ein Passwort mit zufaelligem Salt und gibt den PHC-String zurueck
    pub fn hashen(&self, passwort: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(passwort.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswortHashing(e.to_string()))
    }

    /// Verifiziert ein Passwort gegen einen PHC-Hash
    ///
    /// Ein nicht parsebarer Hash ergibt `false`.
    pub fn verifizieren(&self, passwort: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            tracing::warn!("Gespeicherter Passwort-Hash nicht parsebar");
            return false;
        };
        self.argon2()
            .verify_password(passwort.as_bytes(), &parsed)
            .is_ok()
    }

    /// Verifiziert gegen einen festen Hash, um die Laufzeit bei
    /// unbekannten Konten anzugleichen. Ergebnis ist immer `false`.
    pub fn gegen_dummy_verifizieren(&self, passwort: &str) -> bool {
        let _ = self.verifizieren(passwort, &self.dummy_hash);
        false
    }

    /// `hashen` auf dem Blocking-Pool
    pub async fn hashen_async(&self, passwort: String) -> AuthResult<String> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hashen(&passwort))
            .await
            .map_err(|e| AuthError::intern(format!("Hash-Task abgebrochen: {e}")))?
    }

    /// `verifizieren` auf dem Blocking-Pool; `None` prueft gegen den Dummy-Hash
    pub async fn verifizieren_async(
        &self,
        passwort: String,
        hash: Option<String>,
    ) -> AuthResult<bool> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || match hash {
            Some(hash) => hasher.verifizieren(&passwort, &hash),
            None => hasher.gegen_dummy_verifizieren(&passwort),
        })
        .await
        .map_err(|e| AuthError::intern(format!("Verifikations-Task abgebrochen: {e}")))
    }
}

#[cfg(test)]
pub(crate) fn test_hasher() -> PasswortHasher {
    // Minimaler Aufwand, damit Tests schnell laufen
    PasswortHasher::neu(HashParameter {
        speicher_kib: 1024,
        iterationen: 1,
        parallelitaet: 1,
    })
    .expect("Test-Hasher")
}
