//! Arena handler implementations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::{ArenaService, Command, StandingsService},
    state::AppState,
};

use super::{
    request::{JoinArenaRequest, ListArenasQuery},
    response::{
        ArenaListResponse, ArenaResponse, FinaleResponse, JoinArenaResponse, StandingsResponse,
    },
};

/// List arenas in tier order
pub async fn list_arenas(
    State(state): State<AppState>,
    Query(query): Query<ListArenasQuery>,
) -> AppResult<Json<ArenaListResponse>> {
    let arenas = ArenaService::list_arenas(state.db(), query.include_inactive).await?;

    Ok(Json(ArenaListResponse {
        arenas: arenas.into_iter().map(Into::into).collect(),
    }))
}

/// Get one arena
pub async fn get_arena(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ArenaResponse>> {
    let arena = ArenaService::get_arena(state.db(), &id).await?;
    Ok(Json(arena.into()))
}

/// Pay the entry fee and submit an entry
pub async fn join_arena(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<JoinArenaRequest>,
) -> AppResult<(StatusCode, Json<JoinArenaResponse>)> {
    let contestant = state
        .commands()
        .dispatch(Command::JoinArena {
            user_id: auth_user.id,
            arena_id: id,
            submission: payload,
        })
        .await?
        .into_contestant()?;

    Ok((
        StatusCode::CREATED,
        Json(JoinArenaResponse {
            message: "Joined arena".to_string(),
            contestant: contestant.into(),
        }),
    ))
}

/// Current ranking of an arena
pub async fn get_standings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<StandingsResponse>> {
    let (arena, standings) = StandingsService::arena_standings(state.db(), &id).await?;

    Ok(Json(StandingsResponse {
        arena_id: arena.id,
        arena_name: arena.name,
        tier: arena.tier,
        standings,
    }))
}

/// Top three of every active arena
pub async fn get_finale(State(state): State<AppState>) -> AppResult<Json<FinaleResponse>> {
    let finalists = StandingsService::finale(state.db()).await?;
    Ok(Json(FinaleResponse { finalists }))
}
