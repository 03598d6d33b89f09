//! Payment handler implementations

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use tracing::info;
use validator::Validate;

use crate::{
    constants::{MAX_PAGE_SIZE, WEBHOOK_SIGNATURE_HEADER},
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    services::{Command, PaymentService, WebhookOutcome},
    state::AppState,
};

use super::{
    request::{CheckoutRequest, PaymentSuccessQuery},
    response::{CheckoutResponse, PaymentListResponse, PaymentSuccessResponse, WebhookAck},
};

/// Current user's recent payments
pub async fn list_payments(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<PaymentListResponse>> {
    let payments = PaymentService::history(state.db(), &auth_user.id, i64::from(MAX_PAGE_SIZE)).await?;

    Ok(Json(PaymentListResponse {
        payments: payments.iter().map(Into::into).collect(),
    }))
}

/// Create a checkout session for a token package
pub async fn create_checkout(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    payload.validate()?;

    let checkout = state
        .commands()
        .dispatch(Command::CreatePayment {
            user_id: auth_user.id,
            tokens: payload.tokens,
        })
        .await?
        .into_checkout()?;

    Ok(Json(CheckoutResponse {
        payment_id: checkout.payment.id,
        checkout_url: checkout.checkout_url,
        tokens: checkout.payment.tokens,
        amount_cents: checkout.payment.amount_cents,
        currency: checkout.payment.currency,
    }))
}

/// Landing endpoint of the provider's success redirect
pub async fn payment_success(
    State(state): State<AppState>,
    Query(query): Query<PaymentSuccessQuery>,
) -> AppResult<Json<PaymentSuccessResponse>> {
    if query.session_id.trim().is_empty() {
        return Err(AppError::Validation("session_id is required".to_string()));
    }

    let outcome = state
        .commands()
        .dispatch(Command::CompletePayment {
            external_id: query.session_id,
        })
        .await?
        .into_completion()?;

    Ok(Json(outcome.into()))
}

/// Provider notifications; the raw body is needed for signature checks
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    let signature = headers
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::PaymentSignatureInvalid)?;

    let outcome = state.commands().handle_webhook(&body, signature).await?;

    match &outcome {
        WebhookOutcome::Ignored => {}
        WebhookOutcome::Settled(settled) => {
            info!(payment_id = %settled.payment().id, "Webhook settled payment")
        }
        WebhookOutcome::MarkedFailed(payment) => {
            info!(payment_id = %payment.id, "Webhook marked payment failed")
        }
        WebhookOutcome::Refunded { payment, .. } => {
            info!(payment_id = %payment.id, "Webhook refunded payment")
        }
        WebhookOutcome::RefundRejected(payment) => {
            info!(payment_id = %payment.id, "Webhook refund left for manual review")
        }
    }

    Ok(Json(WebhookAck { received: true }))
}
