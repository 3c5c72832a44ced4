use std::collections::HashMap;

use axum::{extract::State, http::HeaderMap, Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::auth::bearer_token;
use crate::errors::AppError;
use crate::models::artifact::RunSummary;
use crate::models::job::JobJD;
use crate::models::profile::Profile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Falls back to the caller's stored profile when omitted.
    #[serde(default)]
    pub profile: Option<Profile>,
    pub jobs: Vec<JobJD>,
    /// Accepted for client compatibility; no preference changes the output yet.
    #[serde(default)]
    pub prefs: HashMap<String, Value>,
}

/// POST /api/v1/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<RunSummary>, AppError> {
    if req.jobs.is_empty() {
        return Err(AppError::Validation("jobs must not be empty".to_string()));
    }
    if !req.prefs.is_empty() {
        debug!("Ignoring prefs: {:?}", req.prefs.keys().collect::<Vec<_>>());
    }

    let profile = match req.profile {
        Some(profile) => profile,
        None => {
            let user = state.current_user(&headers).await.ok_or(AppError::Unauthorized)?;
            state
                .profiles
                .current(&user)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(
                        "No profile in request and none stored for this user".to_string(),
                    )
                })?
                .profile
        }
    };

    let summary = state
        .pipeline
        .run_batch(
            &profile,
            &req.jobs,
            state.resolver.as_ref(),
            bearer_token(&headers),
        )
        .await?;
    Ok(Json(summary))
}
