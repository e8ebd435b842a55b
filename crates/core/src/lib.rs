//! shopwerk-core – Gemeinsame Typen
//!
//! Principal-Art, Administrator-Rolle und die passwortfreie
//! Aussendarstellung von Kunden und Administratoren. Wird von allen anderen
//! Shopwerk-Crates genutzt.

pub mod principal;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use principal::{Administrator, Kunde, Principal};
pub use types::{AdminRolle, PrincipalArt};
