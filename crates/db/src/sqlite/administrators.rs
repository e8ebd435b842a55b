//! SQLite-Implementierung des AdministratorRepository

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use shopwerk_core::AdminRolle;

use crate::error::{ist_unique_verletzung, DbError};
use crate::models::{AdministratorRecord, NeuerAdministrator};
use crate::repository::{AdministratorRepository, DbResult};
use crate::sqlite::pool::{parse_opt_zeit, parse_uuid, parse_zeit, SqliteDb};

const ADMIN_SPALTEN: &str =
    "id, first_name, last_name, email, password_hash, role, created_at, last_access, is_active";

#[async_trait]
impl AdministratorRepository for SqliteDb {
    async fn create_administrator(
        &self,
        data: NeuerAdministrator<'_>,
    ) -> DbResult<AdministratorRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO administrators
               (id, first_name, last_name, email, password_hash, role, created_at, is_active)
             VALUES (?, ?, ?, ?, ?, ?, ?, 1)",
        )
        .bind(id.to_string())
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role.als_str())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if ist_unique_verletzung(&e) {
                DbError::Eindeutigkeit(format!(
                    "Administrator-E-Mail '{}' bereits vergeben",
                    data.email
                ))
            } else {
                DbError::Sqlx(e)
            }
        })?;

        Ok(AdministratorRecord {
            id,
            first_name: data.first_name.to_string(),
            last_name: data.last_name.to_string(),
            email: data.email.to_string(),
            password_hash: data.password_hash.to_string(),
            role: data.role,
            created_at: now,
            last_access: None,
            is_active: true,
        })
    }

    async fn find_administrator_by_email(
        &self,
        email: &str,
    ) -> DbResult<Option<AdministratorRecord>> {
        let sql =
            format!("SELECT {ADMIN_SPALTEN} FROM administrators WHERE email = ? AND is_active = 1");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_administrator(&r)).transpose()
    }

    async fn find_administrator_by_id(&self, id: Uuid) -> DbResult<Option<AdministratorRecord>> {
        let sql =
            format!("SELECT {ADMIN_SPALTEN} FROM administrators WHERE id = ? AND is_active = 1");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_administrator(&r)).transpose()
    }

    async fn set_administrator_active(&self, id: Uuid, aktiv: bool) -> DbResult<bool> {
        let affected = sqlx::query("UPDATE administrators SET is_active = ? WHERE id = ?")
            .bind(aktiv as i64)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn touch_last_access(&self, id: Uuid) -> DbResult<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE administrators SET last_access = ? WHERE id = ?")
            .bind(&now)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn administrator_email_exists(&self, email: &str) -> DbResult<bool> {
        let anzahl: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM administrators WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(anzahl > 0)
    }
}

fn row_to_administrator(row: &sqlx::sqlite::SqliteRow) -> DbResult<AdministratorRecord> {
    use sqlx::Row as _;

    let id_str: String = row.try_get("id")?;
    let role_str: String = row.try_get("role")?;
    let role = role_str.parse::<AdminRolle>().map_err(DbError::UngueltigeDaten)?;
    let created_at_str: String = row.try_get("created_at")?;
    let last_access: Option<String> = row.try_get("last_access")?;
    let is_active: i64 = row.try_get("is_active")?;

    Ok(AdministratorRecord {
        id: parse_uuid(&id_str, "administrators.id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        role,
        created_at: parse_zeit(&created_at_str, "administrators.created_at")?,
        last_access: parse_opt_zeit(last_access, "administrators.last_access")?,
        is_active: is_active != 0,
    })
}
