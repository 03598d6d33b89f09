//! Contestant handlers

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

/// Contestant routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(handler::get_contestant).delete(handler::withdraw_entry),
        )
        .route("/{id}/vote", post(handler::cast_vote))
}
