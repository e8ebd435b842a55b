//! shopwerk-auth – Authentifizierung und Autorisierung
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit Argon2id (konfigurierbarer Aufwand)
//! - Credential-Store fuer Kunden und Administratoren
//! - Signierte Bearer-Tokens (HS256) mit Ablaufzeit
//! - Sitzungs-Ledger ausgestellter Tokens
//! - Statische Rollen-Berechtigungs-Matrix
//! - AuthService (Registrierung, Anmeldung, Abmeldung, Token-Aufloesung)

pub mod error;
pub mod konten;
pub mod ledger;
pub mod password;
pub mod policy;
pub mod service;
pub mod token;

// Bequeme Re-Exporte
pub use error::{AuthError, AuthResult};
pub use konten::{email_normalisieren, AdministratorAnlage, KontoService, KundenRegistrierung};
pub use ledger::{token_hash, SitzungsLedger};
pub use password::{HashParameter, PasswortHasher};
pub use policy::{berechtigungen, darf_ausfuehren, ist_super_admin};
pub use service::{Anmeldung, AuthService};
pub use token::{AusgestelltesToken, TokenClaims, TokenDienst, MAX_LEBENSDAUER_SEK, STANDARD_LEBENSDAUER_SEK};
