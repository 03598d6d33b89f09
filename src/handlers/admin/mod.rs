//! Admin management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{delete, post, put},
    Router,
};

use crate::state::AppState;

/// Admin routes
pub fn routes() -> Router<AppState> {
    Router::new()
        // Arena management
        .route("/arenas", post(handler::create_arena))
        .route("/arenas/{id}/deactivate", post(handler::deactivate_arena))
        .route("/contestants/{id}", delete(handler::remove_entry))
        // User management
        .route("/users/{id}/bonus", post(handler::grant_bonus))
        .route("/users/{id}/role", put(handler::update_user_role))
}
