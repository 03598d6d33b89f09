//! Arena handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Arena routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_arenas))
        .route("/{id}", get(handler::get_arena))
        .route("/{id}/join", post(handler::join_arena))
        .route("/{id}/standings", get(handler::get_standings))
}

/// Finale routes
pub fn finale_routes() -> Router<AppState> {
    Router::new().route("/finale", get(handler::get_finale))
}
