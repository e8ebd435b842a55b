//! SQLite-Backend-Implementierungen fuer alle Repository-Traits

pub mod administrators;
pub mod customers;
pub mod pool;
pub mod sessions;

pub use pool::SqliteDb;
