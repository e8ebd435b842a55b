//! REST-Handler fuer Administratoren

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};

use shopwerk_auth::{AdministratorAnlage, Anmeldung};
use shopwerk_core::{Principal, PrincipalArt};
use shopwerk_db::models::SitzungRecord;

use crate::{
    error::{ApiError, ApiResult},
    extract::{id_parsen, JsonBody},
    handlers::auth::{anmeldung_zaehlen, AnmeldeBody},
    middleware::Angemeldet,
    ApiState,
};

/// `POST /v1/admin/auth/login`
pub async fn anmelden(
    State(state): State<ApiState>,
    JsonBody(body): JsonBody<AnmeldeBody>,
) -> ApiResult<Json<Anmeldung>> {
    let ergebnis = state
        .auth
        .administrator_anmelden(&body.email, &body.password)
        .await;
    anmeldung_zaehlen(&state, PrincipalArt::Administrator, &ergebnis);
    Ok(Json(ergebnis?))
}

/// `GET /v1/admin/me`
pub async fn ich(Extension(angemeldet): Extension<Angemeldet>) -> Json<Principal> {
    Json(angemeldet.principal)
}

/// `POST /v1/admin/administrators` (Berechtigung `create_admins`)
pub async fn administrator_anlegen(
    State(state): State<ApiState>,
    Extension(angemeldet): Extension<Angemeldet>,
    JsonBody(body): JsonBody<AdministratorAnlage>,
) -> ApiResult<impl IntoResponse> {
    let admin = state.auth.administrator_anlegen(body).await?;
    tracing::info!(
        angelegt_von = %angemeldet.principal.id(),
        admin_id = %admin.id,
        "Administrator ueber API angelegt"
    );
    Ok((StatusCode::CREATED, Json(admin)))
}

async fn status_aendern(
    state: &ApiState,
    angemeldet: &Angemeldet,
    art: PrincipalArt,
    id: &str,
    aktiv: bool,
) -> ApiResult<StatusCode> {
    let id = id_parsen(id)?;
    if aktiv {
        state.auth.konto_reaktivieren(art, id).await?;
    } else {
        state.auth.konto_deaktivieren(art, id).await?;
    }
    tracing::info!(
        ausgefuehrt_von = %angemeldet.principal.id(),
        art = %art,
        id = %id,
        aktiv,
        "Konto-Status ueber API geaendert"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /v1/admin/administrators/:id/deactivate` (Berechtigung `update_admins`)
pub async fn administrator_deaktivieren(
    State(state): State<ApiState>,
    Extension(angemeldet): Extension<Angemeldet>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    status_aendern(&state, &angemeldet, PrincipalArt::Administrator, &id, false).await
}

/// `POST /v1/admin/administrators/:id/reactivate` (Berechtigung `update_admins`)
pub async fn administrator_reaktivieren(
    State(state): State<ApiState>,
    Extension(angemeldet): Extension<Angemeldet>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    status_aendern(&state, &angemeldet, PrincipalArt::Administrator, &id, true).await
}

/// `POST /v1/admin/customers/:id/deactivate` (Berechtigung `update_users`)
pub async fn kunde_deaktivieren(
    State(state): State<ApiState>,
    Extension(angemeldet): Extension<Angemeldet>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    status_aendern(&state, &angemeldet, PrincipalArt::Kunde, &id, false).await
}

/// `POST /v1/admin/customers/:id/reactivate` (Berechtigung `update_users`)
pub async fn kunde_reaktivieren(
    State(state): State<ApiState>,
    Extension(angemeldet): Extension<Angemeldet>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    status_aendern(&state, &angemeldet, PrincipalArt::Kunde, &id, true).await
}

/// `GET /v1/admin/sessions/:kind/:id` (nur Super-Admin)
pub async fn sitzungen(
    State(state): State<ApiState>,
    Path((kind, id)): Path<(String, String)>,
) -> ApiResult<Json<Vec<SitzungRecord>>> {
    let art: PrincipalArt = kind.parse().map_err(ApiError::UngueltigeAnfrage)?;
    let id = id_parsen(&id)?;
    Ok(Json(state.auth.sitzungen_fuer(id, art).await?))
}
