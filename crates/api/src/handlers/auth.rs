//! REST-Handler fuer Kunden-Authentifizierung

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde::Deserialize;

use shopwerk_auth::{Anmeldung, AuthError, KundenRegistrierung};
use shopwerk_core::{Principal, PrincipalArt};

use crate::{error::ApiResult, extract::JsonBody, middleware::Angemeldet, ApiState};

/// Anmeldedaten fuer Kunden und Administratoren
#[derive(Deserialize)]
pub struct AnmeldeBody {
    pub email: String,
    pub password: String,
}

/// `POST /v1/auth/register`
pub async fn registrieren(
    State(state): State<ApiState>,
    JsonBody(body): JsonBody<KundenRegistrierung>,
) -> ApiResult<impl IntoResponse> {
    let anmeldung = state.auth.kunde_registrieren(body).await?;
    Ok((StatusCode::CREATED, Json(anmeldung)))
}

/// `POST /v1/auth/login`
pub async fn anmelden(
    State(state): State<ApiState>,
    JsonBody(body): JsonBody<AnmeldeBody>,
) -> ApiResult<Json<Anmeldung>> {
    let ergebnis = state.auth.kunde_anmelden(&body.email, &body.password).await;
    anmeldung_zaehlen(&state, PrincipalArt::Kunde, &ergebnis);
    Ok(Json(ergebnis?))
}

pub(crate) fn anmeldung_zaehlen(
    state: &ApiState,
    art: PrincipalArt,
    ergebnis: &Result<Anmeldung, AuthError>,
) {
    match ergebnis {
        Ok(_) => state.metriken.anmeldung_zaehlen(art.als_str(), true),
        Err(AuthError::UngueltigeAnmeldedaten) => {
            state.metriken.anmeldung_zaehlen(art.als_str(), false)
        }
        Err(_) => {}
    }
}

/// `POST /v1/auth/logout`
pub async fn abmelden(
    State(state): State<ApiState>,
    Extension(angemeldet): Extension<Angemeldet>,
) -> ApiResult<StatusCode> {
    state.auth.abmelden(&angemeldet.token).await?;
    tracing::info!(principal = %angemeldet.principal.id(), "Abgemeldet");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /v1/auth/me`
pub async fn ich(Extension(angemeldet): Extension<Angemeldet>) -> Json<Principal> {
    Json(angemeldet.principal)
}
