//! Integration-Tests fuer KundenRepository (In-Memory SQLite)

use shopwerk_db::{models::NeuerKunde, KundenRepository, SqliteDb};

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden")
}

fn neuer_kunde(email: &str) -> NeuerKunde<'_> {
    NeuerKunde {
        first_name: "Anna",
        last_name: "Berg",
        email,
        password_hash: "hash_anna",
        phone: Some("+49 30 123456"),
        address: None,
    }
}

#[tokio::test]
async fn kunde_anlegen_und_laden() {
    let db = db().await;

    let kunde = db
        .create_customer(neuer_kunde("anna@example.com"))
        .await
        .expect("Kunde anlegen fehlgeschlagen");

    assert_eq!(kunde.email, "anna@example.com");
    assert!(kunde.is_active);

    let geladen = db
        .find_customer_by_id(kunde.id)
        .await
        .expect("find_customer_by_id fehlgeschlagen")
        .expect("Kunde sollte gefunden werden");

    assert_eq!(geladen.id, kunde.id);
    assert_eq!(geladen.phone.as_deref(), Some("+49 30 123456"));
    assert!(geladen.address.is_none());
}

#[tokio::test]
async fn kunde_nach_email_laden() {
    let db = db().await;
    db.create_customer(neuer_kunde("bob@example.com")).await.unwrap();

    let gefunden = db
        .find_customer_by_email("bob@example.com")
        .await
        .unwrap()
        .expect("Kunde 'bob' sollte gefunden werden");
    assert_eq!(gefunden.first_name, "Anna");

    let nicht_gefunden = db.find_customer_by_email("niemand@example.com").await.unwrap();
    assert!(nicht_gefunden.is_none());
}

#[tokio::test]
async fn doppelte_email_wird_abgelehnt_ohne_zweite_zeile() {
    let db = db().await;
    db.create_customer(neuer_kunde("a@x.com")).await.unwrap();

    let err = db.create_customer(neuer_kunde("a@x.com")).await;
    assert!(err.is_err());
    assert!(err.unwrap_err().ist_eindeutigkeit());

    let anzahl: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE email = ?")
        .bind("a@x.com")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(anzahl, 1);
}

#[tokio::test]
async fn deaktivieren_ist_weich_und_filtert_lookups() {
    let db = db().await;
    let kunde = db.create_customer(neuer_kunde("eve@example.com")).await.unwrap();

    assert!(db.set_customer_active(kunde.id, false).await.unwrap());

    // Lookups liefern nur aktive Kunden
    assert!(db.find_customer_by_id(kunde.id).await.unwrap().is_none());
    assert!(db
        .find_customer_by_email("eve@example.com")
        .await
        .unwrap()
        .is_none());

    // Die Zeile existiert weiterhin
    let anzahl: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE id = ?")
        .bind(kunde.id.to_string())
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(anzahl, 1);

    // Reaktivieren macht den Kunden wieder sichtbar
    assert!(db.set_customer_active(kunde.id, true).await.unwrap());
    assert!(db.find_customer_by_id(kunde.id).await.unwrap().is_some());
}

#[tokio::test]
async fn deaktivieren_unbekannter_id_gibt_false() {
    let db = db().await;
    let betroffen = db
        .set_customer_active(uuid::Uuid::new_v4(), false)
        .await
        .unwrap();
    assert!(!betroffen);
}
