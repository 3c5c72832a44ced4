use std::sync::Arc;

use axum::http::HeaderMap;

use crate::auth::{bearer_token, CurrentUserResolver, UserId};
use crate::pipeline::TailorPipeline;
use crate::profile::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<TailorPipeline>,
    /// Pluggable profile store. Default: PgProfileStore.
    pub profiles: Arc<dyn ProfileStore>,
    /// Identity strategy chosen at startup from IDENTITY_STRATEGY.
    pub resolver: Arc<dyn CurrentUserResolver>,
}

impl AppState {
    /// Resolves the caller from the `Authorization` header, if any.
    pub async fn current_user(&self, headers: &HeaderMap) -> Option<UserId> {
        self.resolver.resolve(bearer_token(headers)).await
    }
}
