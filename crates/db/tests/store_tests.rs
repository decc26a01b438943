use std::path::PathBuf;
use std::str::FromStr;

use mealweek_db::{
    MealFilter, MemoryStore, NewMeal, NewMealIngredient, NewPlan, NewPlanItem, SqliteStore, Store,
    UsageReservation,
};
use mealweek_shared::user::SubscriptionStatus;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use sqlx_migrator::{Migrate, Plan};
use temp_dir::TempDir;

async fn setup_store(path: PathBuf) -> anyhow::Result<SqliteStore> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;

    let mut conn = pool.acquire().await?;
    mealweek_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(SqliteStore::new(pool))
}

fn sample_meal(title: &str, meal_type: &str, calories: i64, tags: &[&str]) -> NewMeal {
    NewMeal {
        title: title.to_owned(),
        meal_type: meal_type.to_owned(),
        calories,
        protein: Some(20.0),
        carbs: None,
        fat: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        instructions: None,
        ingredients: vec![NewMealIngredient {
            name: "Rice".to_owned(),
            quantity: Some(200.0),
            unit: Some("g".to_owned()),
            section: Some("Pantry".to_owned()),
        }],
    }
}

#[tokio::test]
async fn meal_round_trip_with_filters() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = setup_store(dir.child("db.sqlite3")).await?;

    store
        .insert_meal(sample_meal("Salmon & rice", "dinner", 650, &["fish"]))
        .await?;
    let wraps = store
        .insert_meal(sample_meal("Chicken wraps", "lunch", 550, &["high-protein"]))
        .await?;

    let all = store.list_meals(&MealFilter::default()).await?;
    assert_eq!(all.len(), 2);

    let lunches = store
        .list_meals(&MealFilter {
            meal_type: Some("lunch".to_owned()),
            tags_any: vec![],
        })
        .await?;
    assert_eq!(lunches.len(), 1);
    assert_eq!(lunches[0].title, "Chicken wraps");

    let tagged = store
        .list_meals(&MealFilter {
            meal_type: None,
            tags_any: vec!["high-protein".to_owned(), "vegetarian".to_owned()],
        })
        .await?;
    assert_eq!(tagged.len(), 1);

    let (found, ingredients) = store.find_meal(&wraps.id).await?.unwrap();
    assert_eq!(found.calories, 550);
    assert_eq!(ingredients.len(), 1);
    assert_eq!(ingredients[0].unit.as_deref(), Some("g"));

    assert!(store.delete_meal(&wraps.id).await?);
    assert!(!store.delete_meal(&wraps.id).await?);
    assert!(store.find_meal(&wraps.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn plan_round_trip_is_user_scoped() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = setup_store(dir.child("db.sqlite3")).await?;

    let items = vec![
        NewPlanItem {
            name: "Greek yogurt".to_owned(),
            quantity: 3500.0,
            unit: Some("g".to_owned()),
            section: Some("Dairy".to_owned()),
        },
        NewPlanItem {
            name: "Honey".to_owned(),
            quantity: 350.0,
            unit: Some("g".to_owned()),
            section: Some("Pantry".to_owned()),
        },
    ];

    let plan = store
        .insert_plan(
            NewPlan {
                user_id: "john".to_owned(),
                title: "My Weekly Plan".to_owned(),
                start_date: "2026-08-07".to_owned(),
                end_date: "2026-08-13".to_owned(),
            },
            &items,
        )
        .await?;

    let listed = store.list_plans("john").await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, plan.id);
    assert!(store.list_plans("albert").await?.is_empty());

    let (found, found_items) = store.find_plan("john", &plan.id).await?.unwrap();
    assert_eq!(found.start_date, "2026-08-07");
    assert_eq!(found_items.len(), 2);

    // Another user cannot see or delete the plan.
    assert!(store.find_plan("albert", &plan.id).await?.is_none());
    assert!(!store.delete_plan("albert", &plan.id).await?);

    assert!(store.delete_plan("john", &plan.id).await?);
    assert!(store.find_plan("john", &plan.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn usage_reservation_is_conditional() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = setup_store(dir.child("db.sqlite3")).await?;

    store.track_usage("john", "2026-08-01").await?;
    // Upsert is idempotent.
    store.track_usage("john", "2026-08-01").await?;
    assert_eq!(store.usage_count("john", "2026-08-01").await?, 0);

    for expected in 1..=3 {
        let reservation = store.reserve_usage("john", "2026-08-01", Some(3)).await?;
        assert_eq!(reservation, UsageReservation::Reserved { used: expected });
    }

    let reservation = store.reserve_usage("john", "2026-08-01", Some(3)).await?;
    assert_eq!(reservation, UsageReservation::Exhausted { used: 3 });
    assert_eq!(store.usage_count("john", "2026-08-01").await?, 3);

    // No limit: the guard is lifted but the count still moves.
    let reservation = store.reserve_usage("john", "2026-08-01", None).await?;
    assert_eq!(reservation, UsageReservation::Reserved { used: 4 });

    // A new month starts from zero.
    store.track_usage("john", "2026-09-01").await?;
    let reservation = store.reserve_usage("john", "2026-09-01", Some(3)).await?;
    assert_eq!(reservation, UsageReservation::Reserved { used: 1 });

    Ok(())
}

#[tokio::test]
async fn subscription_status_reads_external_rows() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = setup_store(dir.child("db.sqlite3")).await?;

    assert_eq!(store.subscription_status("john").await?, None);

    // The billing system owns this table; simulate its write directly.
    let options = SqliteConnectOptions::from_str(&format!(
        "sqlite:{}",
        dir.child("db.sqlite3").to_str().unwrap()
    ))?;
    let pool = SqlitePool::connect_with(options).await?;
    sqlx::query("INSERT INTO subscriptions (user_id, status) VALUES ('john', 'pro')")
        .execute(&pool)
        .await?;

    assert_eq!(
        store.subscription_status("john").await?,
        Some(SubscriptionStatus::Pro)
    );

    Ok(())
}

#[tokio::test]
async fn memory_store_mirrors_reservation_semantics() -> anyhow::Result<()> {
    let store = MemoryStore::new();

    store.track_usage("john", "2026-08-01").await?;
    for expected in 1..=3 {
        let reservation = store.reserve_usage("john", "2026-08-01", Some(3)).await?;
        assert_eq!(reservation, UsageReservation::Reserved { used: expected });
    }
    assert_eq!(
        store.reserve_usage("john", "2026-08-01", Some(3)).await?,
        UsageReservation::Exhausted { used: 3 }
    );

    store.set_subscription("john", SubscriptionStatus::Pro);
    assert_eq!(
        store.subscription_status("john").await?,
        Some(SubscriptionStatus::Pro)
    );

    Ok(())
}
