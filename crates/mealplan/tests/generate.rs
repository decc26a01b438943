use std::sync::Arc;

use mealweek_db::MemoryStore;
use mealweek_mealplan::{GenerateRequest, PlanGenerator, PlanService};
use mealweek_shared::Error;
use mealweek_shared::user::{CurrentUser, SubscriptionStatus};
use mealweek_user::UsageGate;

fn john() -> CurrentUser {
    CurrentUser {
        id: "john".to_owned(),
        email: "john@mealweek.localhost".to_owned(),
    }
}

fn service(store: Arc<MemoryStore>) -> PlanService {
    PlanService::new(
        store.clone(),
        PlanGenerator::mock(),
        UsageGate::new(store),
    )
}

#[tokio::test]
async fn generate_persists_plan_and_aggregated_items() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let service = service(store.clone());

    let generated = service.generate(&john(), GenerateRequest::default()).await?;

    assert_eq!(generated.plan.title, "My Weekly Plan");
    assert!(generated.tracked);

    // 10 distinct catalog ingredients, each summed over 7 days.
    assert_eq!(generated.shopping_list.len(), 10);
    let yogurt = generated
        .shopping_list
        .iter()
        .find(|item| item.name == "Greek yogurt")
        .unwrap();
    assert_eq!(yogurt.quantity, 3500.0);
    assert_eq!(yogurt.section.as_deref(), Some("Dairy"));

    // Section-ascending ordering: Bakery leads the list.
    assert_eq!(generated.shopping_list[0].name, "Tortilla wraps");

    let (row, items) = service.get(&john(), &generated.plan.id).await?;
    assert_eq!(items.len(), 10);
    assert_eq!(row.user_id, "john");

    // start/end span exactly one week.
    let start = mealweek_shared::parse_iso_date(&row.start_date).unwrap();
    let end = mealweek_shared::parse_iso_date(&row.end_date).unwrap();
    assert_eq!(end - start, time::Duration::days(6));

    Ok(())
}

#[tokio::test]
async fn free_quota_blocks_the_fourth_plan() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let service = service(store.clone());

    for _ in 0..3 {
        service.generate(&john(), GenerateRequest::default()).await?;
    }

    let err = service
        .generate(&john(), GenerateRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::QuotaExceeded { .. }));

    // The rejected attempt must not leave a plan behind.
    assert_eq!(service.list(&john()).await?.len(), 3);

    Ok(())
}

#[tokio::test]
async fn pro_users_generate_without_a_cap() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    store.set_subscription("john", SubscriptionStatus::Pro);
    let service = service(store.clone());

    for _ in 0..5 {
        service.generate(&john(), GenerateRequest::default()).await?;
    }

    assert_eq!(service.list(&john()).await?.len(), 5);

    Ok(())
}

#[tokio::test]
async fn anonymous_requests_are_rejected() {
    let store = Arc::new(MemoryStore::new());
    let service = service(store);

    let nobody = CurrentUser {
        id: String::new(),
        email: String::new(),
    };

    let err = service
        .generate(&nobody, GenerateRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth));
}

#[tokio::test]
async fn plans_are_scoped_to_their_owner() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let service = service(store.clone());

    let generated = service.generate(&john(), GenerateRequest::default()).await?;

    let albert = CurrentUser {
        id: "albert".to_owned(),
        email: "albert@mealweek.localhost".to_owned(),
    };

    let err = service.get(&albert, &generated.plan.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = service
        .delete(&albert, &generated.plan.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    service.delete(&john(), &generated.plan.id).await?;
    assert!(service.list(&john()).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn export_renders_quoted_csv() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let service = service(store.clone());

    let generated = service.generate(&john(), GenerateRequest::default()).await?;
    let csv = service.export_csv(&john(), &generated.plan.id).await?;

    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("\"Name\",\"Quantity\",\"Unit\",\"Section\"")
    );
    assert_eq!(lines.count(), 10);
    assert!(csv.contains("\"Greek yogurt\",\"3500\",\"g\",\"Dairy\""));

    Ok(())
}
