//! shopwerk-api – REST-Schnittstelle fuer Shopwerk
//!
//! Stellt die Auth-Endpunkte fuer Kunden und Administratoren bereit,
//! loest Bearer-Tokens zu Principals auf und schuetzt Verwaltungsrouten
//! mit Guards (Art, Berechtigung, Super-Admin).

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

use std::sync::Arc;

use shopwerk_auth::AuthService;
use shopwerk_db::SqliteDb;
use shopwerk_observability::ShopMetriken;

pub use error::{fehler_antwort, ApiError, ApiResult};
pub use middleware::Angemeldet;
pub use server::{app_erstellen, RestServer, RestServerKonfig};

/// Axum-State fuer die REST-API
#[derive(Clone)]
pub struct ApiState {
    pub auth: Arc<AuthService<SqliteDb>>,
    pub metriken: ShopMetriken,
}

impl ApiState {
    pub fn neu(auth: Arc<AuthService<SqliteDb>>, metriken: ShopMetriken) -> Self {
        Self { auth, metriken }
    }
}
