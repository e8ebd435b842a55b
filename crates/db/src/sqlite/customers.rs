//! SQLite-Implementierung des KundenRepository

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{ist_unique_verletzung, DbError};
use crate::models::{KundeRecord, NeuerKunde};
use crate::repository::{DbResult, KundenRepository};
use crate::sqlite::pool::{parse_uuid, parse_zeit, SqliteDb};

const KUNDE_SPALTEN: &str =
    "id, first_name, last_name, email, password_hash, phone, address, created_at, is_active";

#[async_trait]
impl KundenRepository for SqliteDb {
    async fn create_customer(&self, data: NeuerKunde<'_>) -> DbResult<KundeRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO customers
               (id, first_name, last_name, email, password_hash, phone, address, created_at, is_active)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1)",
        )
        .bind(id.to_string())
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.phone)
        .bind(data.address)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if ist_unique_verletzung(&e) {
                DbError::Eindeutigkeit(format!("Kunden-E-Mail '{}' bereits vergeben", data.email))
            } else {
                DbError::Sqlx(e)
            }
        })?;

        Ok(KundeRecord {
            id,
            first_name: data.first_name.to_string(),
            last_name: data.last_name.to_string(),
            email: data.email.to_string(),
            password_hash: data.password_hash.to_string(),
            phone: data.phone.map(str::to_string),
            address: data.address.map(str::to_string),
            created_at: now,
            is_active: true,
        })
    }

    async fn find_customer_by_email(&self, email: &str) -> DbResult<Option<KundeRecord>> {
        let sql = format!("SELECT {KUNDE_SPALTEN} FROM customers WHERE email = ? AND is_active = 1");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_kunde(&r)).transpose()
    }

    async fn find_customer_by_id(&self, id: Uuid) -> DbResult<Option<KundeRecord>> {
        let sql = format!("SELECT {KUNDE_SPALTEN} FROM customers WHERE id = ? AND is_active = 1");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_kunde(&r)).transpose()
    }

    async fn set_customer_active(&self, id: Uuid, aktiv: bool) -> DbResult<bool> {
        // Weicher Loeschvorgang: Zeilen werden nie entfernt
        let affected = sqlx::query("UPDATE customers SET is_active = ? WHERE id = ?")
            .bind(aktiv as i64)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }
}

fn row_to_kunde(row: &sqlx::sqlite::SqliteRow) -> DbResult<KundeRecord> {
    use sqlx::Row as _;

    let id_str: String = row.try_get("id")?;
    let created_at_str: String = row.try_get("created_at")?;
    let is_active: i64 = row.try_get("is_active")?;

    Ok(KundeRecord {
        id: parse_uuid(&id_str, "customers.id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        created_at: parse_zeit(&created_at_str, "customers.created_at")?,
        is_active: is_active != 0,
    })
}
