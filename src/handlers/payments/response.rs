//! Payment response DTOs

use serde::Serialize;
use uuid::Uuid;

use crate::{
    models::{Payment, PaymentStatus},
    services::CompletionOutcome,
};

/// Checkout session to redirect the user to
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub payment_id: Uuid,
    pub checkout_url: String,
    pub tokens: i64,
    pub amount_cents: i64,
    pub currency: String,
}

/// Payment as shown to its owner
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub status: PaymentStatus,
    pub tokens: i64,
    pub package_name: String,
    pub amount_cents: i64,
    pub currency: String,
}

impl From<&Payment> for PaymentResponse {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id,
            status: payment.status,
            tokens: payment.tokens,
            package_name: payment.package_name.clone(),
            amount_cents: payment.amount_cents,
            currency: payment.currency.clone(),
        }
    }
}

/// A user's recent payments
#[derive(Debug, Serialize)]
pub struct PaymentListResponse {
    pub payments: Vec<PaymentResponse>,
}

/// Result of the success redirect
#[derive(Debug, Serialize)]
pub struct PaymentSuccessResponse {
    pub message: String,
    pub payment: PaymentResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<i64>,
}

impl From<CompletionOutcome> for PaymentSuccessResponse {
    fn from(outcome: CompletionOutcome) -> Self {
        let (message, balance) = match &outcome {
            CompletionOutcome::Completed { payment, balance } => (
                format!("{} tokens added to your balance", payment.tokens),
                Some(*balance),
            ),
            CompletionOutcome::AlreadyCompleted(_) => {
                ("Payment already processed".to_string(), None)
            }
            CompletionOutcome::NotPaid(_) => ("Payment not completed".to_string(), None),
        };

        Self {
            message,
            payment: outcome.payment().into(),
            balance,
        }
    }
}

/// Acknowledgement returned to the provider
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}
