use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{ProfileStore, ProfileVersionRow, StoredProfile};
use crate::models::profile::Profile;

/// Postgres-backed store over the append-only `profiles` table.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    /// Append-only INSERT. The next version is computed in the same statement
    /// and `UNIQUE (user_id, version)` rejects a concurrent duplicate.
    async fn save(&self, user_id: &str, profile: &Profile) -> Result<i32, sqlx::Error> {
        let version: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO profiles (id, user_id, version, data)
            SELECT $1, $2, COALESCE(MAX(version), 0) + 1, $3
            FROM profiles
            WHERE user_id = $2
            RETURNING version
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(Json(profile))
        .fetch_one(&self.pool)
        .await?;

        info!("Stored profile version {version} for user {user_id}");
        Ok(version)
    }

    async fn current(&self, user_id: &str) -> Result<Option<StoredProfile>, sqlx::Error> {
        let row: Option<(i32, Json<Profile>, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT version, data, created_at
            FROM profiles
            WHERE user_id = $1
            ORDER BY version DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(version, Json(profile), created_at)| StoredProfile {
            version,
            profile,
            created_at,
        }))
    }

    async fn history(&self, user_id: &str) -> Result<Vec<ProfileVersionRow>, sqlx::Error> {
        sqlx::query_as::<_, ProfileVersionRow>(
            "SELECT version, created_at FROM profiles WHERE user_id = $1 ORDER BY version ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
