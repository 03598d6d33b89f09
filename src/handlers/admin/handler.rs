//! Admin handler implementations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::auth::AdminUser,
    services::{ArenaService, LedgerService, UserService},
    state::AppState,
};

use super::{
    request::{CreateArenaRequest, GrantBonusRequest, UpdateUserRoleRequest},
    response::{AdminArenaResponse, BonusResponse, RemovedEntryResponse, RoleResponse},
};

/// Create an arena
pub async fn create_arena(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateArenaRequest>,
) -> AppResult<(StatusCode, Json<AdminArenaResponse>)> {
    payload.validate()?;

    let arena = ArenaService::create_arena(
        state.db(),
        payload.name.trim(),
        payload.tier,
        payload.description.as_deref(),
        payload.token_cost,
        payload.max_participants,
    )
    .await?;

    info!(admin_id = %admin.id, arena_id = %arena.id, "Admin created arena");

    Ok((
        StatusCode::CREATED,
        Json(AdminArenaResponse {
            message: "Arena created".to_string(),
            arena,
        }),
    ))
}

/// Close an arena to new entries
pub async fn deactivate_arena(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AdminArenaResponse>> {
    let arena = ArenaService::deactivate_arena(state.db(), &id).await?;

    info!(admin_id = %admin.id, arena_id = %id, "Admin deactivated arena");

    Ok(Json(AdminArenaResponse {
        message: "Arena deactivated".to_string(),
        arena,
    }))
}

/// Delete an entry and its media
pub async fn remove_entry(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RemovedEntryResponse>> {
    let contestant = ArenaService::remove_entry(state.db(), state.media(), &id).await?;

    info!(admin_id = %admin.id, contestant_id = %id, "Admin removed entry");

    Ok(Json(RemovedEntryResponse {
        message: "Entry removed".to_string(),
        contestant: contestant.into(),
    }))
}

/// Credit bonus tokens to a user
pub async fn grant_bonus(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<GrantBonusRequest>,
) -> AppResult<Json<BonusResponse>> {
    payload.validate()?;

    let transaction =
        LedgerService::grant_bonus(state.db(), &id, payload.amount, &payload.reason).await?;

    info!(admin_id = %admin.id, user_id = %id, amount = payload.amount, "Admin granted bonus");

    Ok(Json(BonusResponse {
        message: format!("{} bonus tokens granted", payload.amount),
        transaction,
    }))
}

/// Change a user's role
pub async fn update_user_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRoleRequest>,
) -> AppResult<Json<RoleResponse>> {
    payload.validate()?;

    let user = UserService::set_role(state.db(), &id, &payload.role).await?;

    info!(admin_id = %admin.id, user_id = %id, role = %user.role, "Admin changed user role");

    Ok(Json(RoleResponse {
        message: "Role updated".to_string(),
        user: user.into(),
    }))
}
