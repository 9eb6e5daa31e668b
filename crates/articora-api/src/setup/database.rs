use sqlx::SqlitePool;

use articora_core::Config;
use articora_db::{connect_pool, init_schema};

pub async fn setup_database(config: &Config) -> Result<SqlitePool, anyhow::Error> {
    let pool = connect_pool(
        &config.database_url,
        config.db_max_connections,
        config.db_timeout_seconds,
    )
    .await?;

    init_schema(&pool).await?;
    tracing::info!("Database ready");

    Ok(pool)
}
