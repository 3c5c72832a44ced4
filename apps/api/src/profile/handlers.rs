use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::profile::{ProfileVersionRow, StoredProfile};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SaveProfileResponse {
    pub ok: bool,
    pub version: i32,
}

/// POST /api/v1/profile
pub async fn handle_save_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(profile): Json<Profile>,
) -> Result<Json<SaveProfileResponse>, AppError> {
    let user = state.current_user(&headers).await.ok_or(AppError::Unauthorized)?;
    if profile.name.trim().is_empty() {
        return Err(AppError::Validation("profile.name must not be empty".to_string()));
    }
    let version = state.profiles.save(&user, &profile).await?;
    Ok(Json(SaveProfileResponse { ok: true, version }))
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StoredProfile>, AppError> {
    let user = state.current_user(&headers).await.ok_or(AppError::Unauthorized)?;
    let stored = state
        .profiles
        .current(&user)
        .await?
        .ok_or_else(|| AppError::NotFound("No profile stored for this user".to_string()))?;
    Ok(Json(stored))
}

/// GET /api/v1/profile/history
pub async fn handle_profile_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ProfileVersionRow>>, AppError> {
    let user = state.current_user(&headers).await.ok_or(AppError::Unauthorized)?;
    Ok(Json(state.profiles.history(&user).await?))
}
