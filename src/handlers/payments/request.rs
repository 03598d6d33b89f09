//! Payment request DTOs

use serde::Deserialize;
use validator::Validate;

/// Start a purchase of the package holding `tokens` tokens
#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(range(min = 1, message = "Token amount must be positive"))]
    pub tokens: i64,
}

/// Query string of the provider's success redirect
#[derive(Debug, Deserialize)]
pub struct PaymentSuccessQuery {
    pub session_id: String,
}
