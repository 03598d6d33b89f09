//! Token purchase handlers

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

/// Payment routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_payments))
        .route("/checkout", post(handler::create_checkout))
        .route("/success", get(handler::payment_success))
        .route("/webhook", post(handler::payment_webhook))
}
