//! Gateway contract against a real PostgreSQL. Skipped unless `TEST_DATABASE_URL` is set.

use std::str::FromStr;
use users_api::{connect, CreateUser, PgUserStore, StoreError, UpdateUser, UserFilters, UserStore};
use uuid::Uuid;

async fn store() -> Option<PgUserStore> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let options = sqlx::postgres::PgConnectOptions::from_str(&url).unwrap();
    let pool = connect(options, 2).await.unwrap();
    let store = PgUserStore::new(pool);
    // Parallel tests can race on CREATE TABLE IF NOT EXISTS; the second attempt sees the table.
    if store.ensure_schema().await.is_err() {
        store.ensure_schema().await.unwrap();
    }
    Some(store)
}

/// Emails unique per run so tests can share one database.
fn unique_email(local: &str) -> String {
    format!("{}+{}@example.com", local, Uuid::new_v4().simple())
}

#[tokio::test]
async fn crud_round_trip() {
    let Some(store) = store().await else {
        return;
    };
    let email = unique_email("john");
    let input = CreateUser { name: "John Doe".into(), email: email.clone(), age: Some(30) };
    let user = store.create(&input).await.unwrap();
    assert_eq!(user.created_at, user.updated_at);
    assert_eq!(store.find_by_email(&email).await.unwrap(), Some(user.clone()));

    let patch = UpdateUser { age: Some(Some(31)), ..Default::default() };
    let updated = store.update(user.id, &patch).await.unwrap().unwrap();
    assert_eq!(updated.name, "John Doe");
    assert_eq!(updated.email, email);
    assert_eq!(updated.age, Some(31));
    assert!(updated.updated_at > user.updated_at);

    let cleared = store
        .update(user.id, &UpdateUser { age: Some(None), ..Default::default() })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cleared.age, None);

    assert!(store.delete(user.id).await.unwrap());
    assert_eq!(store.find_by_id(user.id).await.unwrap(), None);
    assert!(!store.delete(user.id).await.unwrap());
    assert_eq!(store.update(user.id, &UpdateUser::default()).await.unwrap(), None);
}

#[tokio::test]
async fn duplicate_email_violates_constraint() {
    let Some(store) = store().await else {
        return;
    };
    let email = unique_email("dup");
    let input = CreateUser { name: "A".into(), email: email.clone(), age: None };
    let user = store.create(&input).await.unwrap();
    let err = store.create(&input).await.unwrap_err();
    assert!(matches!(err, StoreError::ConstraintViolation(_)));
    store.delete(user.id).await.unwrap();
}

#[tokio::test]
async fn update_to_taken_email_violates_constraint() {
    let Some(store) = store().await else {
        return;
    };
    let a = store.create(&CreateUser { name: "A".into(), email: unique_email("a"), age: None }).await.unwrap();
    let b = store.create(&CreateUser { name: "B".into(), email: unique_email("b"), age: None }).await.unwrap();

    let patch = UpdateUser { email: Some(b.email.clone()), ..Default::default() };
    let err = store.update(a.id, &patch).await.unwrap_err();
    assert!(matches!(err, StoreError::ConstraintViolation(_)));
    assert_eq!(store.find_by_id(a.id).await.unwrap(), Some(a.clone()));

    store.delete(a.id).await.unwrap();
    store.delete(b.id).await.unwrap();
}

#[tokio::test]
async fn find_all_matches_literal_substrings_newest_first() {
    let Some(store) = store().await else {
        return;
    };
    let marker = Uuid::new_v4().simple().to_string();
    let older = store
        .create(&CreateUser { name: format!("{} 100% Real", marker), email: unique_email("a"), age: Some(40) })
        .await
        .unwrap();
    let newer = store
        .create(&CreateUser { name: format!("{} real", marker.to_uppercase()), email: unique_email("b"), age: Some(41) })
        .await
        .unwrap();

    let both = store
        .find_all(&UserFilters { name: Some(marker.clone()), ..Default::default() })
        .await
        .unwrap();
    let ids: Vec<Uuid> = both.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);

    let percent = store
        .find_all(&UserFilters { name: Some(format!("{} 100%", marker)), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(percent.len(), 1);

    let by_age = store
        .find_all(&UserFilters { name: Some(marker.clone()), age: Some(41), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(by_age, vec![newer.clone()]);

    store.delete(older.id).await.unwrap();
    store.delete(newer.id).await.unwrap();
}

#[tokio::test]
async fn ping_succeeds() {
    let Some(store) = store().await else {
        return;
    };
    store.ping().await.unwrap();
    sqlx::query("SELECT 1").execute(store.pool()).await.unwrap();
}
