use std::sync::Arc;

use mealweek_db::{MemoryStore, SqliteStore, Store};
use mealweek_meal::MealService;
use mealweek_mealplan::{PlanGenerator, PlanService, TextClient};
use mealweek_user::UsageGate;

use crate::config::Config;

/// Wired application services shared by the CLI commands.
pub struct App {
    pub store: Arc<dyn Store>,
    pub meals: MealService,
    pub plans: PlanService,
}

impl App {
    pub async fn build(config: &Config) -> anyhow::Result<App> {
        let store: Arc<dyn Store> = if config.database.url.is_empty() {
            tracing::warn!("no database configured, using non-durable in-memory store");
            Arc::new(MemoryStore::new())
        } else {
            let pool =
                mealweek_db::connect(&config.database.url, config.database.max_connections).await?;
            Arc::new(SqliteStore::new(pool))
        };

        let generator = if config.generator.api_key.is_empty() {
            tracing::info!("no generator credential configured, using mock strategy");
            PlanGenerator::mock()
        } else {
            tracing::info!(model = %config.generator.model, "using generative strategy");
            PlanGenerator::generative(TextClient::new(
                &config.generator.api_url,
                &config.generator.api_key,
                &config.generator.model,
            ))
        };

        let gate = UsageGate::with_limit(store.clone(), config.quota.free_monthly_limit);

        Ok(App {
            meals: MealService::new(store.clone()),
            plans: PlanService::new(store.clone(), generator, gate),
            store,
        })
    }
}
