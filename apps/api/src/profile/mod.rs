// Versioned profile storage. Every save appends a new version; nothing is
// ever updated in place, so earlier profiles stay retrievable.

pub mod handlers;
pub mod store;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::profile::Profile;

pub use store::PgProfileStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProfile {
    pub version: i32,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileVersionRow {
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Appends `profile` as the user's next version and returns that version.
    async fn save(&self, user_id: &str, profile: &Profile) -> Result<i32, sqlx::Error>;

    /// Highest stored version for the user.
    async fn current(&self, user_id: &str) -> Result<Option<StoredProfile>, sqlx::Error>;

    /// All versions, oldest first.
    async fn history(&self, user_id: &str) -> Result<Vec<ProfileVersionRow>, sqlx::Error>;
}
