//! Signierte Zugangs-Tokens (JWT, HS256)
//!
//! Ein Token traegt Subjekt-ID, Principal-Art, Ausstellungs- und
//! Ablaufzeitpunkt. Die Verifikation ist rein zustandslos: Signatur und
//! Ablauf werden geprueft, die Datenbank wird nicht befragt.
//!
//! Der Ablauf wird gegen einen uebergebenen Zeitpunkt geprueft
//! (`verifizieren_zum`), damit Tests die Uhr kontrollieren koennen.
//! Ein Token ist abgelaufen, sobald `jetzt >= exp`.

use std::collections::HashSet;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopwerk_core::PrincipalArt;

use crate::error::{AuthError, AuthResult};

/// Standard-Lebensdauer eines Tokens in Sekunden
pub const STANDARD_LEBENSDAUER_SEK: i64 = 3600;

/// Obergrenze fuer die konfigurierbare Lebensdauer (30 Tage)
pub const MAX_LEBENSDAUER_SEK: i64 = 30 * 24 * 3600;

/// Claims im Token-Payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subjekt-ID
    pub sub: Uuid,
    /// Principal-Art ("user" oder "admin")
    pub kind: PrincipalArt,
    /// Ausgestellt (Unix-Sekunden)
    pub iat: i64,
    /// Ablauf (Unix-Sekunden)
    pub exp: i64,
    /// Eindeutige Token-ID, macht zwei Tokens derselben Sekunde unterscheidbar
    pub jti: Uuid,
}

impl TokenClaims {
    pub fn laeuft_ab_am(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn ausgestellt_am(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Ergebnis einer Ausstellung
#[derive(Debug, Clone)]
pub struct AusgestelltesToken {
    pub token: String,
    pub claims: TokenClaims,
}

/// Stellt Tokens aus und verifiziert sie
#[derive(Clone)]
pub struct TokenDienst {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lebensdauer: Duration,
}

impl std::fmt::Debug for TokenDienst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDienst")
            .field("secret", &"<verborgen>")
            .field("lebensdauer_sek", &self.lebensdauer.num_seconds())
            .finish()
    }
}

impl TokenDienst {
    /// Erstellt den Dienst. Ein leeres Secret oder eine Lebensdauer
    /// ausserhalb von `1..=MAX_LEBENSDAUER_SEK` sind Konfigurationsfehler.
    pub fn neu(secret: &str, lebensdauer_sek: i64) -> AuthResult<Self> {
        if secret.is_empty() {
            return Err(AuthError::Konfiguration(
                "Token-Secret darf nicht leer sein".into(),
            ));
        }
        if !(1..=MAX_LEBENSDAUER_SEK).contains(&lebensdauer_sek) {
            return Err(AuthError::Konfiguration(format!(
                "Token-Lebensdauer muss zwischen 1 und {MAX_LEBENSDAUER_SEK} Sekunden liegen, ist {lebensdauer_sek}"
            )));
        }
        let lebensdauer = Duration::try_seconds(lebensdauer_sek).ok_or_else(|| {
            AuthError::Konfiguration(format!("Token-Lebensdauer {lebensdauer_sek} nicht darstellbar"))
        })?;

        let mut validation = Validation::new(Algorithm::HS256);
        // Ablauf wird in `verifizieren_zum` gegen die uebergebene Zeit geprueft
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims =
            HashSet::from(["exp".to_string(), "sub".to_string(), "iat".to_string()]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lebensdauer,
        })
    }

    pub fn lebensdauer(&self) -> Duration {
        self.lebensdauer
    }

    /// Stellt ein Token fuer das Subjekt aus, gueltig ab jetzt
    pub fn ausstellen(&self, subjekt: Uuid, art: PrincipalArt) -> AuthResult<AusgestelltesToken> {
        self.ausstellen_zum(subjekt, art, Utc::now())
    }

    /// Stellt ein Token mit explizitem Ausstellungszeitpunkt aus
    pub fn ausstellen_zum(
        &self,
        subjekt: Uuid,
        art: PrincipalArt,
        jetzt: DateTime<Utc>,
    ) -> AuthResult<AusgestelltesToken> {
        let iat = jetzt.timestamp();
        let exp = iat
            .checked_add(self.lebensdauer.num_seconds())
            .ok_or_else(|| AuthError::intern("Token-Ablauf ausserhalb des Zeitbereichs"))?;
        let claims = TokenClaims {
            sub: subjekt,
            kind: art,
            iat,
            exp,
            jti: Uuid::new_v4(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::intern(format!("Token-Signatur fehlgeschlagen: {e}")))?;

        Ok(AusgestelltesToken { token, claims })
    }

    /// Verifiziert Signatur und Ablauf gegen die aktuelle Zeit
    pub fn verifizieren(&self, token: &str) -> AuthResult<TokenClaims> {
        self.verifizieren_zum(token, Utc::now())
    }

    /// Verifiziert Signatur und Ablauf gegen `jetzt`
    ///
    /// Fehler:
    /// - `TokenUngueltig` bei Formfehlern oder fremdem Algorithmus
    /// - `TokenSignatur` bei falscher Signatur
    /// - `TokenAbgelaufen` wenn `jetzt >= exp`
    pub fn verifizieren_zum(&self, token: &str, jetzt: DateTime<Utc>) -> AuthResult<TokenClaims> {
        let daten = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::TokenSignatur,
                ErrorKind::ExpiredSignature => AuthError::TokenAbgelaufen,
                _ => {
                    tracing::debug!(fehler = %e, "Token nicht dekodierbar");
                    AuthError::TokenUngueltig
                }
            })?;

        let claims = daten.claims;
        if jetzt.timestamp() >= claims.exp {
            return Err(AuthError::TokenAbgelaufen);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dienst() -> TokenDienst {
        TokenDienst::neu("test-secret-mit-ausreichender-laenge", 3600).unwrap()
    }

    #[test]
    fn ausstellen_und_verifizieren() {
        let dienst = dienst();
        let id = Uuid::new_v4();
        let ausgestellt = dienst.ausstellen(id, PrincipalArt::Kunde).unwrap();

        let claims = dienst.verifizieren(&ausgestellt.token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.kind, PrincipalArt::Kunde);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims, ausgestellt.claims);
    }

    #[test]
    fn verifizieren_ist_idempotent() {
        let dienst = dienst();
        let ausgestellt = dienst
            .ausstellen(Uuid::new_v4(), PrincipalArt::Administrator)
            .unwrap();
        let erstes = dienst.verifizieren(&ausgestellt.token).unwrap();
        let zweites = dienst.verifizieren(&ausgestellt.token).unwrap();
        assert_eq!(erstes, zweites);
    }

    #[test]
    fn ablauf_ist_inklusiv() {
        let dienst = dienst();
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let ausgestellt = dienst
            .ausstellen_zum(Uuid::new_v4(), PrincipalArt::Kunde, start)
            .unwrap();

        let kurz_davor = start + Duration::seconds(3599);
        assert!(dienst.verifizieren_zum(&ausgestellt.token, kurz_davor).is_ok());

        let genau_exp = start + Duration::seconds(3600);
        assert!(matches!(
            dienst.verifizieren_zum(&ausgestellt.token, genau_exp),
            Err(AuthError::TokenAbgelaufen)
        ));

        let spaeter = start + Duration::hours(5);
        assert!(matches!(
            dienst.verifizieren_zum(&ausgestellt.token, spaeter),
            Err(AuthError::TokenAbgelaufen)
        ));
    }

    #[test]
    fn fremdes_secret_ergibt_signaturfehler() {
        let a = dienst();
        let b = TokenDienst::neu("ein-ganz-anderes-secret", 3600).unwrap();
        let ausgestellt = a.ausstellen(Uuid::new_v4(), PrincipalArt::Kunde).unwrap();

        assert!(matches!(
            b.verifizieren(&ausgestellt.token),
            Err(AuthError::TokenSignatur)
        ));
    }

    #[test]
    fn vertauschter_payload_ergibt_signaturfehler() {
        let dienst = dienst();
        let opfer = dienst.ausstellen(Uuid::new_v4(), PrincipalArt::Kunde).unwrap();
        let angreifer = dienst
            .ausstellen(Uuid::new_v4(), PrincipalArt::Administrator)
            .unwrap();

        let teile_opfer: Vec<&str> = opfer.token.split('.').collect();
        let teile_angreifer: Vec<&str> = angreifer.token.split('.').collect();
        let gefaelscht = format!(
            "{}.{}.{}",
            teile_opfer[0], teile_angreifer[1], teile_opfer[2]
        );

        assert!(matches!(
            dienst.verifizieren(&gefaelscht),
            Err(AuthError::TokenSignatur)
        ));
    }

    #[test]
    fn formfehler_ergeben_ungueltig() {
        let dienst = dienst();
        for token in ["", "kein-jwt", "a.b", "a.b.c.d"] {
            assert!(
                matches!(dienst.verifizieren(token), Err(AuthError::TokenUngueltig)),
                "'{token}' muss als ungueltig gelten"
            );
        }
    }

    #[test]
    fn fremder_algorithmus_wird_abgelehnt() {
        let dienst = dienst();
        let claims = TokenClaims {
            sub: Uuid::new_v4(),
            kind: PrincipalArt::Administrator,
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 60,
            jti: Uuid::new_v4(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"test-secret-mit-ausreichender-laenge"),
        )
        .unwrap();

        assert!(matches!(
            dienst.verifizieren(&token),
            Err(AuthError::TokenUngueltig)
        ));
    }

    #[test]
    fn leeres_secret_ist_konfigurationsfehler() {
        assert!(matches!(
            TokenDienst::neu("", 3600),
            Err(AuthError::Konfiguration(_))
        ));
        assert!(matches!(
            TokenDienst::neu("secret", 0),
            Err(AuthError::Konfiguration(_))
        ));
    }

    #[test]
    fn zu_lange_lebensdauer_ist_konfigurationsfehler() {
        for sek in [i64::MAX, MAX_LEBENSDAUER_SEK + 1, -1] {
            assert!(
                matches!(
                    TokenDienst::neu("secret", sek),
                    Err(AuthError::Konfiguration(_))
                ),
                "Lebensdauer {sek} wurde akzeptiert"
            );
        }

        let maximal = TokenDienst::neu("secret", MAX_LEBENSDAUER_SEK).unwrap();
        let ausgestellt = maximal
            .ausstellen(Uuid::new_v4(), PrincipalArt::Kunde)
            .unwrap();
        assert_eq!(
            ausgestellt.claims.exp - ausgestellt.claims.iat,
            MAX_LEBENSDAUER_SEK
        );
    }

    #[test]
    fn debug_verbirgt_secret() {
        let ausgabe = format!("{:?}", dienst());
        assert!(!ausgabe.contains("test-secret"));
    }
}
