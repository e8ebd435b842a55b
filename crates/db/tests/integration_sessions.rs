//! Integration-Tests fuer das Sitzungs-Ledger (In-Memory SQLite)

use chrono::{Duration, Utc};
use uuid::Uuid;

use shopwerk_core::PrincipalArt;
use shopwerk_db::{models::NeueSitzung, SitzungsRepository, SqliteDb};

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden")
}

fn sitzung(hash: &str, subject_id: Uuid, versatz_sek: i64) -> NeueSitzung<'_> {
    let erstellt = Utc::now() + Duration::seconds(versatz_sek);
    NeueSitzung {
        token_hash: hash,
        subject_id,
        subject_kind: PrincipalArt::Kunde,
        created_at: erstellt,
        expires_at: erstellt + Duration::hours(1),
    }
}

#[tokio::test]
async fn eintrag_anlegen_und_auflisten() {
    let db = db().await;
    let subject = Uuid::new_v4();

    db.insert_session(sitzung("hash_1", subject, -10)).await.unwrap();
    db.insert_session(sitzung("hash_2", subject, 0)).await.unwrap();

    let eintraege = db
        .list_sessions_for_subject(subject, PrincipalArt::Kunde)
        .await
        .unwrap();
    assert_eq!(eintraege.len(), 2);
    // Neueste zuerst
    assert_eq!(eintraege[0].token_hash, "hash_2");
    assert!(eintraege.iter().all(|e| e.is_active));

    // Andere Principal-Art ist ein eigener Namensraum
    let admins = db
        .list_sessions_for_subject(subject, PrincipalArt::Administrator)
        .await
        .unwrap();
    assert!(admins.is_empty());
}

#[tokio::test]
async fn fruehere_eintraege_werden_abgeloest() {
    let db = db().await;
    let subject = Uuid::new_v4();

    db.insert_session(sitzung("alt", subject, -10)).await.unwrap();
    db.insert_session(sitzung("neu", subject, 0)).await.unwrap();

    let betroffen = db
        .deactivate_sessions_for_subject(subject, PrincipalArt::Kunde, Some("neu"))
        .await
        .unwrap();
    assert_eq!(betroffen, 1);

    let eintraege = db
        .list_sessions_for_subject(subject, PrincipalArt::Kunde)
        .await
        .unwrap();
    let neu = eintraege.iter().find(|e| e.token_hash == "neu").unwrap();
    let alt = eintraege.iter().find(|e| e.token_hash == "alt").unwrap();
    assert!(neu.is_active);
    assert!(!alt.is_active);
}

#[tokio::test]
async fn einzelnen_eintrag_deaktivieren() {
    let db = db().await;
    let subject = Uuid::new_v4();
    db.insert_session(sitzung("abmelden", subject, 0)).await.unwrap();

    assert!(db.deactivate_session("abmelden").await.unwrap());
    // Zweites Abmelden betrifft keine Zeile mehr
    assert!(!db.deactivate_session("abmelden").await.unwrap());
    assert!(!db.deactivate_session("unbekannt").await.unwrap());
}

#[tokio::test]
async fn token_hash_ist_eindeutig() {
    let db = db().await;
    let subject = Uuid::new_v4();
    db.insert_session(sitzung("gleich", subject, 0)).await.unwrap();
    let err = db.insert_session(sitzung("gleich", subject, 1)).await;
    assert!(err.unwrap_err().ist_eindeutigkeit());
}

#[tokio::test]
async fn gleiche_sekunde_neuester_eintrag_zuerst() {
    let db = db().await;
    let subject = Uuid::new_v4();
    let zeitpunkt = Utc::now();

    for hash in ["erster", "zweiter", "dritter"] {
        db.insert_session(NeueSitzung {
            token_hash: hash,
            subject_id: subject,
            subject_kind: PrincipalArt::Kunde,
            created_at: zeitpunkt,
            expires_at: zeitpunkt + Duration::hours(1),
        })
        .await
        .unwrap();
    }
    db.deactivate_sessions_for_subject(subject, PrincipalArt::Kunde, Some("dritter"))
        .await
        .unwrap();

    let eintraege = db
        .list_sessions_for_subject(subject, PrincipalArt::Kunde)
        .await
        .unwrap();
    let reihenfolge: Vec<&str> = eintraege.iter().map(|e| e.token_hash.as_str()).collect();
    assert_eq!(reihenfolge, ["dritter", "zweiter", "erster"]);
    assert!(eintraege[0].is_active);
    assert!(eintraege[1..].iter().all(|e| !e.is_active));
}
