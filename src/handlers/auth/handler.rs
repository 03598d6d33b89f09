//! Authentication handler implementations

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::json;
use validator::Validate;

use crate::{
    constants::templates,
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::{AuthService, UserService},
    state::AppState,
};

use super::{
    request::{LoginRequest, RegisterRequest},
    response::{AuthResponse, CurrentUserResponse, RegisterResponse},
};

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    // Validate request
    payload.validate()?;

    let user = AuthService::register(
        state.db(),
        &payload.username,
        &payload.email,
        &payload.password,
    )
    .await?;

    state
        .notifier()
        .notify(
            templates::WELCOME,
            &user.email,
            &json!({ "username": user.username }),
        )
        .await;

    let response = RegisterResponse {
        message: "User registered successfully".to_string(),
        user: user.into(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with username/email and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // Validate request
    payload.validate()?;

    let (user, access_token, expires_in) = AuthService::login(
        state.db(),
        &state.config().jwt,
        &payload.identifier,
        &payload.password,
    )
    .await?;

    Ok(Json(AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in,
        user: user.into(),
    }))
}

/// Get current authenticated user
pub async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<CurrentUserResponse>> {
    let user = UserService::get_user_by_id(state.db(), &auth_user.id).await?;

    Ok(Json(CurrentUserResponse { user: user.into() }))
}
