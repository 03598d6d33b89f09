//! Account management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, put},
    Router,
};

use crate::state::AppState;

/// User routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/me",
            put(handler::update_profile).delete(handler::delete_account),
        )
        .route("/me/progression", get(handler::get_my_progression))
        .route("/{id}/progression", get(handler::get_user_progression))
}
