//! Contestant handler implementations

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    models::VoteKind,
    services::{ArenaService, Command},
    state::AppState,
};

use super::{
    request::VoteRequest,
    response::{ContestantResponse, VoteResponse, WithdrawResponse},
};

/// Get a contestant entry
pub async fn get_contestant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ContestantResponse>> {
    let contestant = ArenaService::get_contestant(state.db(), &id).await?;
    Ok(Json(contestant.into()))
}

/// Vote for a contestant
pub async fn cast_vote(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<VoteRequest>>,
) -> AppResult<Json<VoteResponse>> {
    let Json(payload) = payload.unwrap_or_default();

    let receipt = state
        .commands()
        .dispatch(Command::CastVote {
            user_id: auth_user.id,
            contestant_id: id,
            spend_tokens: payload.spend_tokens,
        })
        .await?
        .into_vote()?;

    let message = match receipt.kind {
        VoteKind::Free => "Free vote cast".to_string(),
        VoteKind::Paid => format!("Extra vote cast for {} tokens", receipt.tokens_spent),
    };

    Ok(Json(VoteResponse { message, receipt }))
}

/// Withdraw one's own entry
pub async fn withdraw_entry(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WithdrawResponse>> {
    let contestant = ArenaService::withdraw_entry(state.db(), &auth_user.id, &id).await?;

    Ok(Json(WithdrawResponse {
        message: "Entry withdrawn".to_string(),
        contestant: contestant.into(),
    }))
}
