//! Extraktoren mit einheitlichen Fehlerantworten

use axum::extract::FromRequest;
use uuid::Uuid;

use crate::error::ApiError;

/// JSON-Body; Parse-Fehler werden als `400` im API-Fehlerformat gemeldet
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Parst eine ID aus einem Pfadsegment
pub fn id_parsen(roh: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(roh).map_err(|_| ApiError::UngueltigeAnfrage(format!("Ungueltige ID: {roh}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_parsen_akzeptiert_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(id_parsen(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn id_parsen_lehnt_muell_ab() {
        assert!(matches!(
            id_parsen("42"),
            Err(ApiError::UngueltigeAnfrage(_))
        ));
    }
}
