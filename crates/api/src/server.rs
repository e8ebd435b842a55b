//! Axum HTTP-Server fuer die REST-API

use std::future::Future;
use std::net::SocketAddr;

use anyhow::Result;
use axum::http::{HeaderValue, Method};
use axum::middleware;
use axum::Router;
use tower_http::cors::CorsLayer;

use shopwerk_observability::{
    health_router, metrics_router, request_timing_layer, timing_middleware, HealthState,
};

use crate::{routes::v1_router, ApiState};

/// REST-Server-Konfiguration
#[derive(Debug, Clone)]
pub struct RestServerKonfig {
    pub bind_addr: SocketAddr,
    /// Erlaubte CORS-Origins. Leer = alle Origins erlaubt (nur fuer Entwicklung).
    pub cors_origins: Vec<String>,
    /// Ob `/metrics` auf diesem Listener ausgeliefert wird
    pub metriken_aktiviert: bool,
}

impl Default for RestServerKonfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            cors_origins: vec![],
            metriken_aktiviert: true,
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
}

/// Baut die vollstaendige Anwendung: /v1-Routen, Health und Metriken
pub fn app_erstellen(state: ApiState, health: HealthState, konfig: &RestServerKonfig) -> Router {
    let metriken = state.metriken.clone();

    let mut app = v1_router(&state)
        .layer(middleware::from_fn_with_state(
            metriken.clone(),
            timing_middleware,
        ))
        .with_state(state)
        .merge(health_router(health));

    if konfig.metriken_aktiviert {
        app = app.merge(metrics_router(metriken));
    }

    app.layer(request_timing_layer())
        .layer(cors_layer(&konfig.cors_origins))
}

/// Axum HTTP-Server fuer die REST-API
pub struct RestServer {
    konfig: RestServerKonfig,
}

impl RestServer {
    pub fn neu(konfig: RestServerKonfig) -> Self {
        Self { konfig }
    }

    pub fn konfig(&self) -> &RestServerKonfig {
        &self.konfig
    }

    /// Startet den REST-Server und laeuft bis `shutdown` abgeschlossen ist
    pub async fn starten<F>(self, app: Router, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(self.konfig.bind_addr).await?;
        tracing::info!(addr = %self.konfig.bind_addr, "REST-Server gestartet");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("REST-Server beendet");
        Ok(())
    }
}
