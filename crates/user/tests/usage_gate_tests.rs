use std::str::FromStr;
use std::sync::Arc;

use mealweek_db::{MemoryStore, SqliteStore, Store};
use mealweek_shared::Error;
use mealweek_shared::user::SubscriptionStatus;
use mealweek_user::UsageGate;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use temp_dir::TempDir;

const MONTH: &str = "2026-08-01";

#[tokio::test]
async fn free_user_is_allowed_until_the_limit() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let gate = UsageGate::new(store.clone());

    // Third pass lands on the limit: allowed, counter becomes 3.
    for expected in 1..=3 {
        let pass = gate.check_and_reserve("john", MONTH).await?;
        assert!(pass.tracked);
        assert_eq!(pass.used, Some(expected));
    }

    // Fourth attempt is rejected and the counter stays put.
    let err = gate.check_and_reserve("john", MONTH).await.unwrap_err();
    assert!(matches!(err, Error::QuotaExceeded { used: 3, limit: 3 }));
    assert_eq!(err.code(), "quota_exceeded");
    assert_eq!(store.usage_count("john", MONTH).await?, 3);

    Ok(())
}

#[tokio::test]
async fn pro_user_is_always_allowed_and_still_counted() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    store.set_subscription("jane", SubscriptionStatus::Pro);
    let gate = UsageGate::new(store.clone());

    for expected in 1..=50 {
        let pass = gate.check_and_reserve("jane", MONTH).await?;
        assert!(pass.tracked);
        assert_eq!(pass.used, Some(expected));
    }

    assert_eq!(store.usage_count("jane", MONTH).await?, 50);

    Ok(())
}

#[tokio::test]
async fn months_are_tracked_independently() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let gate = UsageGate::new(store.clone());

    for _ in 0..3 {
        gate.check_and_reserve("john", "2026-07-01").await?;
    }
    assert!(gate.check_and_reserve("john", "2026-07-01").await.is_err());

    // A fresh month opens a fresh counter.
    let pass = gate.check_and_reserve("john", "2026-08-01").await?;
    assert_eq!(pass.used, Some(1));

    Ok(())
}

#[tokio::test]
async fn gate_fails_open_when_tables_are_absent() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let options = SqliteConnectOptions::from_str(&format!(
        "sqlite:{}",
        dir.child("db.sqlite3").to_str().unwrap()
    ))?
    .create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;

    // No migrations ran: every tracking table is missing.
    let store = Arc::new(SqliteStore::new(pool));
    let gate = UsageGate::new(store.clone());

    let pass = gate.check_and_reserve("john", MONTH).await?;
    assert!(!pass.tracked);
    assert_eq!(pass.used, None);

    Ok(())
}
