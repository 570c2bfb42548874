use anyhow::Context;

use crate::config::AppConfig;
use crate::database::DatabaseManager;

pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to DATABASE_URL")?;

    DatabaseManager::migrate(&pool).await.context("migration failed")?;
    pool.close().await;

    println!("Schema applied");
    Ok(())
}
