//! Route-Definitionen fuer die REST-API (/v1/...)

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use shopwerk_auth::berechtigungen;

use crate::{
    handlers,
    middleware::{
        administrator_erfordern, angemeldet_erfordern, berechtigung_erfordern, kunde_erfordern,
        principal_aufloesen, super_admin_erfordern, BerechtigungsGuard,
    },
    ApiState,
};

/// Erstellt den vollstaendigen /v1/-Router
pub fn v1_router(state: &ApiState) -> Router<ApiState> {
    let metriken = state.metriken.clone();
    let berechtigung = |name: &'static str| {
        from_fn_with_state(
            BerechtigungsGuard::neu(name, metriken.clone()),
            berechtigung_erfordern,
        )
    };

    let oeffentlich = Router::new()
        .route("/v1/auth/register", post(handlers::auth::registrieren))
        .route("/v1/auth/login", post(handlers::auth::anmelden))
        .route("/v1/admin/auth/login", post(handlers::admin::anmelden));

    let sitzung = Router::new()
        .route("/v1/auth/logout", post(handlers::auth::abmelden))
        .route_layer(from_fn_with_state(metriken.clone(), angemeldet_erfordern));

    let kunde = Router::new()
        .route("/v1/auth/me", get(handlers::auth::ich))
        .route_layer(from_fn_with_state(metriken.clone(), kunde_erfordern));

    let administrator = Router::new()
        .route("/v1/admin/me", get(handlers::admin::ich))
        .route_layer(from_fn_with_state(metriken.clone(), administrator_erfordern));

    let admins_anlegen = Router::new()
        .route(
            "/v1/admin/administrators",
            post(handlers::admin::administrator_anlegen),
        )
        .route_layer(berechtigung(berechtigungen::CREATE_ADMINS));

    let admins_verwalten = Router::new()
        .route(
            "/v1/admin/administrators/:id/deactivate",
            post(handlers::admin::administrator_deaktivieren),
        )
        .route(
            "/v1/admin/administrators/:id/reactivate",
            post(handlers::admin::administrator_reaktivieren),
        )
        .route_layer(berechtigung(berechtigungen::UPDATE_ADMINS));

    let kunden_verwalten = Router::new()
        .route(
            "/v1/admin/customers/:id/deactivate",
            post(handlers::admin::kunde_deaktivieren),
        )
        .route(
            "/v1/admin/customers/:id/reactivate",
            post(handlers::admin::kunde_reaktivieren),
        )
        .route_layer(berechtigung(berechtigungen::UPDATE_USERS));

    let sitzungen = Router::new()
        .route(
            "/v1/admin/sessions/:kind/:id",
            get(handlers::admin::sitzungen),
        )
        .route_layer(from_fn_with_state(metriken.clone(), super_admin_erfordern));

    // Principal-Aufloesung laeuft vor allen Guards
    let geschuetzt = Router::new()
        .merge(sitzung)
        .merge(kunde)
        .merge(administrator)
        .merge(admins_anlegen)
        .merge(admins_verwalten)
        .merge(kunden_verwalten)
        .merge(sitzungen)
        .route_layer(from_fn_with_state(state.clone(), principal_aufloesen));

    oeffentlich.merge(geschuetzt)
}
