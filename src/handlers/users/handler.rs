//! User handler implementations

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    ranking::ProgressionSummary,
    services::{ProfileUpdate, StandingsService, UserService},
    state::AppState,
};

use super::{
    request::{DeleteAccountRequest, UpdateProfileRequest},
    response::{DeleteAccountResponse, ProfileResponse},
};

/// Update own profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    payload.validate()?;

    let user = UserService::update_profile(
        state.db(),
        &auth_user.id,
        ProfileUpdate {
            username: payload.username.as_deref(),
            email: payload.email.as_deref(),
            bio: payload.bio.as_deref(),
        },
    )
    .await?;

    Ok(Json(ProfileResponse {
        message: "Profile updated".to_string(),
        user: user.into(),
    }))
}

/// Delete own account along with its entries and media
pub async fn delete_account(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<DeleteAccountRequest>,
) -> AppResult<Json<DeleteAccountResponse>> {
    payload.validate()?;

    UserService::delete_account(
        state.db(),
        state.notifier(),
        state.media(),
        &auth_user.id,
        &payload.password,
    )
    .await?;

    Ok(Json(DeleteAccountResponse {
        message: "Account deleted".to_string(),
    }))
}

/// Own tier, standings and achievements
pub async fn get_my_progression(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<ProgressionSummary>> {
    let summary = StandingsService::progression(state.db(), &auth_user.id).await?;
    Ok(Json(summary))
}

/// Another user's public progression
pub async fn get_user_progression(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProgressionSummary>> {
    UserService::get_user_by_id(state.db(), &id).await?;
    let summary = StandingsService::progression(state.db(), &id).await?;
    Ok(Json(summary))
}
