//! SQLite-Implementierung des SitzungsRepository (Ledger)

use async_trait::async_trait;
use uuid::Uuid;

use shopwerk_core::PrincipalArt;

use crate::error::{ist_unique_verletzung, DbError};
use crate::models::{NeueSitzung, SitzungRecord};
use crate::repository::{DbResult, SitzungsRepository};
use crate::sqlite::pool::{parse_uuid, parse_zeit, SqliteDb};

#[async_trait]
impl SitzungsRepository for SqliteDb {
    async fn insert_session(&self, data: NeueSitzung<'_>) -> DbResult<SitzungRecord> {
        let id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO user_sessions
               (id, token_hash, subject_id, subject_kind, created_at, expires_at, is_active)
             VALUES (?, ?, ?, ?, ?, ?, 1)",
        )
        .bind(id.to_string())
        .bind(data.token_hash)
        .bind(data.subject_id.to_string())
        .bind(data.subject_kind.als_str())
        .bind(data.created_at.to_rfc3339())
        .bind(data.expires_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if ist_unique_verletzung(&e) {
                DbError::Eindeutigkeit("Token-Hash bereits im Ledger".into())
            } else {
                DbError::Sqlx(e)
            }
        })?;

        Ok(SitzungRecord {
            id,
            token_hash: data.token_hash.to_string(),
            subject_id: data.subject_id,
            subject_kind: data.subject_kind,
            created_at: data.created_at,
            expires_at: data.expires_at,
            is_active: true,
        })
    }

    async fn deactivate_sessions_for_subject(
        &self,
        subject_id: Uuid,
        kind: PrincipalArt,
        ausser_hash: Option<&str>,
    ) -> DbResult<u64> {
        let affected = sqlx::query(
            "UPDATE user_sessions SET is_active = 0
             WHERE subject_id = ? AND subject_kind = ? AND is_active = 1
               AND (? IS NULL OR token_hash <> ?)",
        )
        .bind(subject_id.to_string())
        .bind(kind.als_str())
        .bind(ausser_hash)
        .bind(ausser_hash)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(affected)
    }

    async fn deactivate_session(&self, token_hash: &str) -> DbResult<bool> {
        let affected = sqlx::query(
            "UPDATE user_sessions SET is_active = 0 WHERE token_hash = ? AND is_active = 1",
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(affected > 0)
    }

    async fn list_sessions_for_subject(
        &self,
        subject_id: Uuid,
        kind: PrincipalArt,
    ) -> DbResult<Vec<SitzungRecord>> {
        let rows = sqlx::query(
            "SELECT id, token_hash, subject_id, subject_kind, created_at, expires_at, is_active
             FROM user_sessions
             WHERE subject_id = ? AND subject_kind = ?
             ORDER BY created_at DESC, rowid DESC",
        )
        .bind(subject_id.to_string())
        .bind(kind.als_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_sitzung).collect()
    }
}

fn row_to_sitzung(row: &sqlx::sqlite::SqliteRow) -> DbResult<SitzungRecord> {
    use sqlx::Row as _;

    let id_str: String = row.try_get("id")?;
    let subject_str: String = row.try_get("subject_id")?;
    let kind_str: String = row.try_get("subject_kind")?;
    let created_at_str: String = row.try_get("created_at")?;
    let expires_at_str: String = row.try_get("expires_at")?;
    let is_active: i64 = row.try_get("is_active")?;

    Ok(SitzungRecord {
        id: parse_uuid(&id_str, "user_sessions.id")?,
        token_hash: row.try_get("token_hash")?,
        subject_id: parse_uuid(&subject_str, "user_sessions.subject_id")?,
        subject_kind: kind_str
            .parse::<PrincipalArt>()
            .map_err(DbError::UngueltigeDaten)?,
        created_at: parse_zeit(&created_at_str, "user_sessions.created_at")?,
        expires_at: parse_zeit(&expires_at_str, "user_sessions.expires_at")?,
        is_active: is_active != 0,
    })
}
