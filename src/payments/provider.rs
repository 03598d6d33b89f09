//! Payment provider trait and exchange types

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Everything the provider needs to open a checkout page
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub amount_cents: i64,
    pub currency: String,
    pub product_name: String,
    pub customer_email: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
    /// Echoed back on events; carries our payment and user IDs
    pub metadata: HashMap<String, String>,
}

/// A created checkout session
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Paid/unpaid state of a checkout session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub id: String,
    pub paid: bool,
    pub payment_intent_id: Option<String>,
}

/// Errors talking to the provider
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected provider response: {0}")]
    InvalidResponse(String),
}

/// Outbound calls to the payment processor
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Open a hosted checkout session
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, ProviderError>;

    /// Look up whether a checkout session has been paid
    async fn retrieve_session(&self, session_id: &str) -> Result<SessionStatus, ProviderError>;
}
