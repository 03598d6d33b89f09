//! Token balance and ledger handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Token routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/packages", get(handler::list_packages))
        .route("/balance", get(handler::get_balance))
        .route("/transactions", get(handler::list_transactions))
}
