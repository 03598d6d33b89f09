//! Authentication middleware and extractors

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{constants::roles, error::AppError, services::AuthService, state::AppState};

/// Authenticated user extracted from JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == roles::ADMIN
    }
}

/// Decode the bearer token from request headers
fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthenticatedUser, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        debug!("Auth failed: Invalid Authorization format (expected 'Bearer <token>')");
        AppError::Unauthorized
    })?;

    let claims = AuthService::verify_token(token, secret).map_err(|e| {
        debug!(error = ?e, "Auth failed: Token verification failed");
        e
    })?;

    let id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

    Ok(AuthenticatedUser {
        id,
        username: claims.username,
        role: claims.role,
    })
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        let user = authenticate(&parts.headers, &state.config().jwt.secret)?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Authenticated user holding the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(AdminUser(user))
    }
}

/// Authentication middleware for whole route groups
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(request.headers(), &state.config().jwt.secret)?;

    debug!(
        path = %request.uri().path(),
        user_id = %user.id,
        role = %user.role,
        "User authenticated"
    );

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
