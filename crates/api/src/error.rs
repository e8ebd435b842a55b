//! Fehlertypen und Fehlerantworten der REST-API
//!
//! Jede Fehlerantwort hat die Form
//! `{"error": {"code": <HTTP-Status>, "message": "..."}}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

use shopwerk_auth::AuthError;

/// Alle moeglichen Fehler in der REST-API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentifizierung erforderlich")]
    NichtAuthentifiziert,

    #[error("Authentifizierung als {0} erforderlich")]
    FalscheArt(&'static str),

    #[error("Ungueltige Anfrage: {0}")]
    UngueltigeAnfrage(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::UngueltigeAnfrage(rejection.body_text())
    }
}

impl ApiError {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::NichtAuthentifiziert | Self::FalscheArt(_) => StatusCode::UNAUTHORIZED,
            Self::UngueltigeAnfrage(_) => StatusCode::BAD_REQUEST,
            Self::Auth(e) => match e {
                e if e.ist_authentifizierung() => StatusCode::UNAUTHORIZED,
                e if e.ist_autorisierung() => StatusCode::FORBIDDEN,
                AuthError::EmailVergeben(_) => StatusCode::CONFLICT,
                AuthError::KontoNichtGefunden(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Text fuer den Client
    ///
    /// Ein inaktives Konto wird wie ein ungueltiges Token gemeldet.
    /// Interne Ursachen werden nicht nach aussen gegeben.
    pub fn client_nachricht(&self) -> String {
        match self {
            Self::Auth(AuthError::KontoInaktiv) => AuthError::TokenUngueltig.to_string(),
            e if e.http_status() == StatusCode::INTERNAL_SERVER_ERROR => {
                "Interner Serverfehler".to_string()
            }
            e => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(fehler = %self, "Anfrage mit internem Fehler abgebrochen");
        }
        fehler_antwort(status, &self.client_nachricht())
    }
}

/// Fehlerantwort fuer die REST-API
pub fn fehler_antwort(status: StatusCode, nachricht: &str) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": nachricht
            }
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopwerk_db::DbError;

    #[test]
    fn status_zuordnung() {
        let faelle = [
            (ApiError::NichtAuthentifiziert, 401),
            (ApiError::Auth(AuthError::UngueltigeAnmeldedaten), 401),
            (ApiError::Auth(AuthError::TokenAbgelaufen), 401),
            (ApiError::Auth(AuthError::KontoInaktiv), 401),
            (
                ApiError::Auth(AuthError::BerechtigungFehlt("create_admins".into())),
                403,
            ),
            (ApiError::Auth(AuthError::RolleFehlt("super_admin".into())), 403),
            (ApiError::Auth(AuthError::EmailVergeben("a@x.com".into())), 409),
            (ApiError::UngueltigeAnfrage("kaputt".into()), 400),
            (ApiError::Auth(DbError::intern("weg").into()), 500),
        ];
        for (fehler, erwartet) in faelle {
            assert_eq!(fehler.http_status().as_u16(), erwartet, "{fehler:?}");
        }
    }

    #[test]
    fn inaktives_konto_wie_ungueltiges_token() {
        assert_eq!(
            ApiError::Auth(AuthError::KontoInaktiv).client_nachricht(),
            ApiError::Auth(AuthError::TokenUngueltig).client_nachricht()
        );
    }

    #[test]
    fn interne_ursache_bleibt_verborgen() {
        let fehler = ApiError::Auth(DbError::intern("geheimer Pfad /var/db").into());
        assert_eq!(fehler.client_nachricht(), "Interner Serverfehler");
    }
}
