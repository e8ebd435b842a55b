//! Prometheus-kompatible Metriken fuer Shopwerk
//!
//! Registrierte Metriken:
//! - `shopwerk_anmeldungen_total` – Counter: Anmeldeversuche (kind, result)
//! - `shopwerk_token_abgelehnt_total` – Counter: Abgelehnte Bearer-Tokens (grund)
//! - `shopwerk_zugriff_verweigert_total` – Counter: Guard-Ablehnungen (guard)
//! - `shopwerk_http_requests_total` – Counter: HTTP-Anfragen (method, path, status)
//! - `shopwerk_http_request_duration_seconds` – Histogram: HTTP-Antwortzeit

use std::sync::Arc;

use anyhow::Result;
use axum::{extract::State, response::IntoResponse, routing::get, Router};
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

/// Alle Shopwerk-Prometheus-Metriken
#[derive(Clone)]
pub struct ShopMetriken {
    pub registry: Arc<Registry>,

    // Auth-Metriken
    pub anmeldungen_total: IntCounterVec,
    pub token_abgelehnt_total: IntCounterVec,
    pub zugriff_verweigert_total: IntCounterVec,

    // HTTP-Metriken
    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
}

impl ShopMetriken {
    /// Erstellt und registriert alle Metriken in einer neuen Registry
    pub fn neu() -> Result<Self> {
        let registry = Registry::new();

        // --- Auth-Metriken ---
        let anmeldungen_total = IntCounterVec::new(
            Opts::new("shopwerk_anmeldungen_total", "Anmeldeversuche nach Art und Ergebnis"),
            &["kind", "result"],
        )?;
        registry.register(Box::new(anmeldungen_total.clone()))?;

        let token_abgelehnt_total = IntCounterVec::new(
            Opts::new(
                "shopwerk_token_abgelehnt_total",
                "Abgelehnte Bearer-Tokens nach Grund",
            ),
            &["grund"],
        )?;
        registry.register(Box::new(token_abgelehnt_total.clone()))?;

        let zugriff_verweigert_total = IntCounterVec::new(
            Opts::new(
                "shopwerk_zugriff_verweigert_total",
                "Von Guards abgelehnte Anfragen",
            ),
            &["guard"],
        )?;
        registry.register(Box::new(zugriff_verweigert_total.clone()))?;

        // --- HTTP-Metriken ---
        let http_requests_total = IntCounterVec::new(
            Opts::new("shopwerk_http_requests_total", "Gesamtanzahl HTTP-Anfragen"),
            &["method", "path", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "shopwerk_http_request_duration_seconds",
                "HTTP-Antwortzeit in Sekunden",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
            ]),
            &["method", "path"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            anmeldungen_total,
            token_abgelehnt_total,
            zugriff_verweigert_total,
            http_requests_total,
            http_request_duration_seconds,
        })
    }

    /// Zaehlt einen Anmeldeversuch (`kind`: user/admin, `result`: ok/fehler)
    pub fn anmeldung_zaehlen(&self, kind: &str, erfolgreich: bool) {
        let result = if erfolgreich { "ok" } else { "fehler" };
        self.anmeldungen_total
            .with_label_values(&[kind, result])
            .inc();
    }

    pub fn token_abgelehnt(&self, grund: &str) {
        self.token_abgelehnt_total.with_label_values(&[grund]).inc();
    }

    pub fn zugriff_verweigert(&self, guard: &str) {
        self.zugriff_verweigert_total
            .with_label_values(&[guard])
            .inc();
    }

    /// Exportiert alle Metriken im Prometheus-Textformat
    pub fn exportieren(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Axum-Router fuer den `/metrics`-Endpunkt
pub fn metrics_router(metriken: ShopMetriken) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metriken)
}

async fn metrics_handler(State(metriken): State<ShopMetriken>) -> impl IntoResponse {
    match metriken.exportieren() {
        Ok(text) => (
            axum::http::StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4",
            )],
            text,
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Metriken-Export fehlgeschlagen: {err}");
            axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
