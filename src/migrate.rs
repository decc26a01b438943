//! Database migration commands.

use std::path::Path;
use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx_migrator::{Migrate, Plan};

use crate::config::Config;

/// Run all pending migrations, creating the database file if needed.
pub async fn migrate(config: &Config) -> anyhow::Result<()> {
    let url = config.database.url.as_str();
    if url.is_empty() {
        anyhow::bail!("no database configured, nothing to migrate");
    }

    tracing::info!(url, "running migrations");

    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;
    let mut conn = pool.acquire().await?;

    mealweek_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    drop(conn);
    pool.close().await;

    tracing::info!("migrations applied");

    Ok(())
}

/// Drop the database file if it exists and recreate it with migrations.
pub async fn reset(config: &Config) -> anyhow::Result<()> {
    let Some(path) = db_path(&config.database.url) else {
        anyhow::bail!("no database configured, nothing to reset");
    };

    if Path::new(path).exists() {
        std::fs::remove_file(path)?;
        tracing::info!(path, "dropped database");
    }

    migrate(config).await
}

fn db_path(url: &str) -> Option<&str> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);

    (!path.is_empty()).then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_path_strips_sqlite_schemes() {
        assert_eq!(db_path("sqlite:mealweek.db"), Some("mealweek.db"));
        assert_eq!(db_path("sqlite://data/mealweek.db"), Some("data/mealweek.db"));
        assert_eq!(db_path(""), None);
    }
}
