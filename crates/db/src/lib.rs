//! shopwerk-db – Credential-Store und Sitzungs-Ledger
//!
//! Dieses Crate stellt das Repository-Pattern fuer Kunden, Administratoren
//! und das Sitzungs-Ledger bereit. Die einzige Implementierung ist
//! SQLite via sqlx; Migrationen liegen unter `migrations/`.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::DbError;
pub use repository::{
    AdministratorRepository, DatabaseConfig, DbResult, KontoSpeicher, KundenRepository,
    SitzungsRepository,
};
pub use sqlite::SqliteDb;
