//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod admin;
pub mod arenas;
pub mod auth;
pub mod contestants;
pub mod health;
pub mod payments;
pub mod tokens;
pub mod users;

use axum::{middleware, Router};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Create all API routes
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(arenas::finale_routes())
        .nest("/auth", auth::routes())
        .nest("/arenas", arenas::routes())
        .nest("/contestants", contestants::routes())
        .nest("/tokens", tokens::routes())
        .nest("/payments", payments::routes())
        .nest("/users", users::routes())
        .nest(
            "/admin",
            admin::routes().route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}
