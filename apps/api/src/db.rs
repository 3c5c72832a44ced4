use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("Failed to connect to DATABASE_URL")?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the append-only `profiles` table if it does not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            id          UUID PRIMARY KEY,
            user_id     TEXT NOT NULL,
            version     INTEGER NOT NULL,
            data        JSONB NOT NULL,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (user_id, version)
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create profiles table")?;

    info!("Profile schema ready");
    Ok(())
}
