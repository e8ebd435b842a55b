//! Axum-Middleware fuer Principal-Aufloesung und Zugriffs-Guards
//!
//! `principal_aufloesen` laeuft vor allen geschuetzten Routen. Ohne
//! Bearer-Token wird die Anfrage unveraendert weitergereicht; die Guards
//! entscheiden dann. Ein vorhandenes, aber ungueltiges Token fuehrt sofort
//! zu `401`.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use shopwerk_auth::{darf_ausfuehren, ist_super_admin, AuthError};
use shopwerk_core::{Administrator, Principal};
use shopwerk_observability::ShopMetriken;

use crate::{error::ApiError, ApiState};

/// Ergebnis der Header-Auswertung
#[derive(Debug, PartialEq, Eq)]
pub enum BearerFund<'a> {
    /// Kein Authorization-Header oder anderes Schema
    Keiner,
    /// Schema `Bearer` ohne Token
    Leer,
    Token(&'a str),
}

/// Extrahiert das Bearer-Token aus dem Authorization-Header
///
/// Das Schema wird ohne Beachtung der Gross-/Kleinschreibung verglichen.
pub fn bearer_token(headers: &HeaderMap) -> BearerFund<'_> {
    let Some(wert) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
        return BearerFund::Keiner;
    };
    let wert = wert.trim();
    let (schema, rest) = wert.split_once(' ').unwrap_or((wert, ""));
    if !schema.eq_ignore_ascii_case("bearer") {
        return BearerFund::Keiner;
    }
    match rest.trim() {
        "" => BearerFund::Leer,
        token => BearerFund::Token(token),
    }
}

/// Authentifizierter Principal samt vorgelegtem Token (Request-Extension)
#[derive(Debug, Clone)]
pub struct Angemeldet {
    pub principal: Principal,
    pub token: String,
}

impl Angemeldet {
    fn administrator(&self) -> Option<&Administrator> {
        self.principal.als_administrator()
    }
}

fn ablehnungsgrund(fehler: &AuthError) -> &'static str {
    match fehler {
        AuthError::TokenAbgelaufen => "abgelaufen",
        AuthError::TokenSignatur => "signatur",
        AuthError::TokenUngueltig => "ungueltig",
        AuthError::KontoInaktiv => "konto_inaktiv",
        _ => "intern",
    }
}

/// Loest das Bearer-Token zum Principal auf und legt ihn als
/// `Angemeldet` in die Request-Extensions
pub async fn principal_aufloesen(
    State(state): State<ApiState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(req.headers()) {
        BearerFund::Keiner => return next.run(req).await,
        BearerFund::Leer => {
            state.metriken.token_abgelehnt("leer");
            return ApiError::Auth(AuthError::TokenUngueltig).into_response();
        }
        BearerFund::Token(t) => t.to_string(),
    };

    match state.auth.token_aufloesen(&token).await {
        Ok(principal) => {
            tracing::debug!(principal = %principal.id(), art = %principal.art(), "Principal aufgeloest");
            req.extensions_mut().insert(Angemeldet { principal, token });
            next.run(req).await
        }
        Err(e) => {
            let grund = ablehnungsgrund(&e);
            state.metriken.token_abgelehnt(grund);
            tracing::debug!(grund, "Bearer-Token abgelehnt");
            ApiError::Auth(e).into_response()
        }
    }
}

fn angemeldet(req: &Request) -> Option<&Angemeldet> {
    req.extensions().get::<Angemeldet>()
}

/// Guard: irgendein authentifizierter Principal
pub async fn angemeldet_erfordern(
    State(metriken): State<ShopMetriken>,
    req: Request,
    next: Next,
) -> Response {
    if angemeldet(&req).is_none() {
        metriken.zugriff_verweigert("angemeldet");
        return ApiError::NichtAuthentifiziert.into_response();
    }
    next.run(req).await
}

/// Guard: authentifizierter Kunde
pub async fn kunde_erfordern(
    State(metriken): State<ShopMetriken>,
    req: Request,
    next: Next,
) -> Response {
    match angemeldet(&req).map(|a| &a.principal) {
        Some(Principal::Kunde(_)) => next.run(req).await,
        _ => {
            metriken.zugriff_verweigert("kunde");
            ApiError::FalscheArt("Kunde").into_response()
        }
    }
}

/// Guard: authentifizierter Administrator
pub async fn administrator_erfordern(
    State(metriken): State<ShopMetriken>,
    req: Request,
    next: Next,
) -> Response {
    if angemeldet(&req).and_then(Angemeldet::administrator).is_none() {
        metriken.zugriff_verweigert("administrator");
        return ApiError::FalscheArt("Administrator").into_response();
    }
    next.run(req).await
}

/// Zustand fuer `berechtigung_erfordern`
#[derive(Clone)]
pub struct BerechtigungsGuard {
    pub berechtigung: &'static str,
    pub metriken: ShopMetriken,
}

impl BerechtigungsGuard {
    pub fn neu(berechtigung: &'static str, metriken: ShopMetriken) -> Self {
        Self {
            berechtigung,
            metriken,
        }
    }
}

/// Guard: Administrator, dessen Rolle die Berechtigung besitzt
pub async fn berechtigung_erfordern(
    State(guard): State<BerechtigungsGuard>,
    req: Request,
    next: Next,
) -> Response {
    let Some(admin) = angemeldet(&req).and_then(Angemeldet::administrator) else {
        guard.metriken.zugriff_verweigert("administrator");
        return ApiError::FalscheArt("Administrator").into_response();
    };

    if !darf_ausfuehren(admin.role.als_str(), guard.berechtigung) {
        tracing::warn!(
            admin_id = %admin.id,
            rolle = %admin.role,
            berechtigung = guard.berechtigung,
            "Berechtigung fehlt"
        );
        guard.metriken.zugriff_verweigert("berechtigung");
        return ApiError::Auth(AuthError::BerechtigungFehlt(guard.berechtigung.to_string()))
            .into_response();
    }
    next.run(req).await
}

/// Guard: Administrator mit Rolle `super_admin`
pub async fn super_admin_erfordern(
    State(metriken): State<ShopMetriken>,
    req: Request,
    next: Next,
) -> Response {
    let Some(admin) = angemeldet(&req).and_then(Angemeldet::administrator) else {
        metriken.zugriff_verweigert("administrator");
        return ApiError::FalscheArt("Administrator").into_response();
    };

    if !ist_super_admin(admin.role.als_str()) {
        tracing::warn!(admin_id = %admin.id, rolle = %admin.role, "Super-Admin erforderlich");
        metriken.zugriff_verweigert("super_admin");
        return ApiError::Auth(AuthError::RolleFehlt("super_admin".into())).into_response();
    }
    next.run(req).await
}
