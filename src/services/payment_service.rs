//! Payment settlement engine
//!
//! A payment moves `pending -> completed | failed`, and `completed -> refunded`.
//! Every transition is a conditional update on the current status, so the
//! success redirect and the provider webhook can both try to settle the same
//! payment and only one of them credits tokens.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    config::{PaymentConfig, TokenCatalog, TokenPackage},
    db::repositories::PaymentRepository,
    error::{AppError, AppResult},
    models::{LedgerContext, Payment, PaymentStatus, TransactionType, User},
    payments::{webhook, CheckoutRequest, PaymentProvider, ProviderEvent, WebhookEvent},
    services::LedgerService,
};

/// A checkout the user should be redirected to
#[derive(Debug, Clone)]
pub struct CheckoutStarted {
    pub payment: Payment,
    pub checkout_url: String,
}

/// Result of an attempt to settle a payment
#[derive(Debug, Clone)]
pub enum CompletionOutcome {
    /// This call credited the tokens
    Completed { payment: Payment, balance: i64 },
    /// Settled earlier; nothing changed
    AlreadyCompleted(Payment),
    /// The provider does not report the payment as paid, or it already failed
    NotPaid(Payment),
}

impl CompletionOutcome {
    pub fn payment(&self) -> &Payment {
        match self {
            Self::Completed { payment, .. } | Self::AlreadyCompleted(payment) | Self::NotPaid(payment) => {
                payment
            }
        }
    }
}

/// What a verified provider notification did
#[derive(Debug, Clone)]
pub enum WebhookOutcome {
    Settled(CompletionOutcome),
    MarkedFailed(Payment),
    Refunded { payment: Payment, balance: i64 },
    /// The purchased tokens were already spent; left for manual follow-up
    RefundRejected(Payment),
    Ignored,
}

/// Payment service
pub struct PaymentService {
    catalog: TokenCatalog,
    provider: Arc<dyn PaymentProvider>,
    config: PaymentConfig,
}

impl PaymentService {
    pub fn new(catalog: TokenCatalog, provider: Arc<dyn PaymentProvider>, config: PaymentConfig) -> Self {
        Self {
            catalog,
            provider,
            config,
        }
    }

    /// The packages on sale
    pub fn packages(&self) -> &[TokenPackage] {
        self.catalog.packages()
    }

    /// A user's most recent payments
    pub async fn history(pool: &PgPool, user_id: &Uuid, limit: i64) -> AppResult<Vec<Payment>> {
        PaymentRepository::list_for_user(pool, user_id, limit).await
    }

    /// Start a purchase of the package with exactly `tokens` tokens
    pub async fn create_payment(
        &self,
        pool: &PgPool,
        user: &User,
        tokens: i64,
    ) -> AppResult<CheckoutStarted> {
        let package = self
            .catalog
            .find(tokens)
            .ok_or(AppError::InvalidPackage(tokens))?;

        let payment = PaymentRepository::create(
            pool,
            &user.id,
            package.price_cents,
            &self.config.currency,
            package.tokens,
            &package.name,
        )
        .await?;

        let mut metadata = HashMap::new();
        metadata.insert("payment_id".to_string(), payment.id.to_string());
        metadata.insert("user_id".to_string(), user.id.to_string());
        metadata.insert("tokens".to_string(), package.tokens.to_string());

        let request = CheckoutRequest {
            amount_cents: package.price_cents,
            currency: self.config.currency.clone(),
            product_name: format!("{} - {} Tokens", package.name, package.tokens),
            customer_email: Some(user.email.clone()),
            success_url: self.config.success_url.clone(),
            cancel_url: self.config.cancel_url.clone(),
            metadata,
        };

        let session = match self.provider.create_checkout_session(&request).await {
            Ok(session) => session,
            Err(e) => {
                PaymentRepository::mark_failed(pool, &payment.id).await?;
                warn!(payment_id = %payment.id, error = %e, "Checkout session creation failed");
                return Err(AppError::PaymentProviderUnavailable(e.to_string()));
            }
        };

        let payment = PaymentRepository::set_checkout_session(pool, &payment.id, &session.id).await?;

        info!(
            payment_id = %payment.id,
            user_id = %user.id,
            tokens = payment.tokens,
            amount_cents = payment.amount_cents,
            session_id = %session.id,
            "Checkout started"
        );

        Ok(CheckoutStarted {
            payment,
            checkout_url: session.url,
        })
    }

    /// Settle a payment from the return redirect, after asking the provider
    /// whether it was paid. Safe to call any number of times.
    pub async fn complete_payment(
        &self,
        pool: &PgPool,
        external_id: &str,
    ) -> AppResult<CompletionOutcome> {
        let payment = PaymentRepository::find_by_external_id(pool, external_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        match payment.status {
            PaymentStatus::Completed | PaymentStatus::Refunded => {
                return Ok(CompletionOutcome::AlreadyCompleted(payment));
            }
            PaymentStatus::Failed => return Ok(CompletionOutcome::NotPaid(payment)),
            PaymentStatus::Pending => {}
        }

        let Some(session_id) = payment.checkout_session_id.clone() else {
            return Ok(CompletionOutcome::NotPaid(payment));
        };

        let status = self
            .provider
            .retrieve_session(&session_id)
            .await
            .map_err(|e| AppError::PaymentProviderUnavailable(e.to_string()))?;

        if !status.paid {
            return Ok(CompletionOutcome::NotPaid(payment));
        }

        self.settle(pool, &payment.id, status.payment_intent_id.as_deref())
            .await
    }

    /// pending -> completed plus the purchase credit, in one transaction
    pub async fn settle(
        &self,
        pool: &PgPool,
        payment_id: &Uuid,
        payment_intent_id: Option<&str>,
    ) -> AppResult<CompletionOutcome> {
        let mut tx = pool.begin().await?;

        let Some(payment) =
            PaymentRepository::mark_completed(&mut *tx, payment_id, payment_intent_id).await?
        else {
            let payment = PaymentRepository::find_by_id(&mut *tx, payment_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;
            return Ok(match payment.status {
                PaymentStatus::Failed | PaymentStatus::Pending => CompletionOutcome::NotPaid(payment),
                PaymentStatus::Completed | PaymentStatus::Refunded => {
                    CompletionOutcome::AlreadyCompleted(payment)
                }
            });
        };

        let context = LedgerContext::new(format!("Purchased {}", payment.package_name))
            .payment(payment.id);
        let transaction = LedgerService::credit(
            &mut *tx,
            &payment.user_id,
            payment.tokens,
            TransactionType::Purchase,
            &context,
        )
        .await?;

        tx.commit().await?;

        info!(
            payment_id = %payment.id,
            user_id = %payment.user_id,
            tokens = payment.tokens,
            balance_after = transaction.balance_after,
            "Payment completed"
        );

        Ok(CompletionOutcome::Completed {
            payment,
            balance: transaction.balance_after,
        })
    }

    /// Verify and apply a provider notification
    pub async fn handle_webhook(
        &self,
        pool: &PgPool,
        payload: &[u8],
        signature: &str,
    ) -> AppResult<WebhookOutcome> {
        if let Err(e) = webhook::verify_signature(
            payload,
            signature,
            &self.config.webhook_secret,
            self.config.webhook_tolerance_secs,
            Utc::now().timestamp(),
        ) {
            warn!(error = %e, "Rejected payment notification");
            return Err(AppError::PaymentSignatureInvalid);
        }

        let event = WebhookEvent::parse(payload)
            .map_err(|e| AppError::InvalidInput(format!("Malformed event: {}", e)))?;
        let reference = event.metadata_payment_id();

        info!(event_id = %event.id, event_type = %event.event_type, "Payment notification received");

        match event.classify() {
            ProviderEvent::CheckoutCompleted {
                session_id,
                payment_intent_id,
                paid,
            } => {
                if !paid {
                    return Ok(WebhookOutcome::Ignored);
                }
                let Some(payment) = Self::lookup(pool, &session_id, reference).await? else {
                    warn!(session_id = %session_id, "Completed session has no matching payment");
                    return Ok(WebhookOutcome::Ignored);
                };
                let outcome = self
                    .settle(pool, &payment.id, payment_intent_id.as_deref())
                    .await?;
                Ok(WebhookOutcome::Settled(outcome))
            }
            ProviderEvent::CheckoutExpired { session_id: external_id }
            | ProviderEvent::PaymentFailed {
                payment_intent_id: external_id,
            } => {
                let Some(payment) = Self::lookup(pool, &external_id, reference).await? else {
                    return Ok(WebhookOutcome::Ignored);
                };
                match PaymentRepository::mark_failed(pool, &payment.id).await? {
                    Some(payment) => {
                        info!(payment_id = %payment.id, "Payment marked failed");
                        Ok(WebhookOutcome::MarkedFailed(payment))
                    }
                    None => Ok(WebhookOutcome::Ignored),
                }
            }
            ProviderEvent::ChargeRefunded { payment_intent_id } => {
                let Some(payment) = Self::lookup(pool, &payment_intent_id, reference).await? else {
                    return Ok(WebhookOutcome::Ignored);
                };
                self.refund(pool, &payment.id).await
            }
            ProviderEvent::Ignored(event_type) => {
                info!(event_type = %event_type, "Ignoring payment notification");
                Ok(WebhookOutcome::Ignored)
            }
        }
    }

    async fn lookup(
        pool: &PgPool,
        external_id: &str,
        reference: Option<Uuid>,
    ) -> AppResult<Option<Payment>> {
        if let Some(payment) = PaymentRepository::find_by_external_id(pool, external_id).await? {
            return Ok(Some(payment));
        }
        match reference {
            Some(id) => PaymentRepository::find_by_id(pool, &id).await,
            None => Ok(None),
        }
    }

    /// completed -> refunded, taking the purchased tokens back
    async fn refund(&self, pool: &PgPool, payment_id: &Uuid) -> AppResult<WebhookOutcome> {
        let mut tx = pool.begin().await?;

        let Some(payment) = PaymentRepository::mark_refunded(&mut *tx, payment_id).await? else {
            return Ok(WebhookOutcome::Ignored);
        };

        let context = LedgerContext::new(format!("Refund of {}", payment.package_name))
            .payment(payment.id);
        let debit = LedgerService::debit(
            &mut *tx,
            &payment.user_id,
            payment.tokens,
            TransactionType::Refund,
            &context,
        )
        .await;

        match debit {
            Ok(transaction) => {
                tx.commit().await?;
                info!(
                    payment_id = %payment.id,
                    user_id = %payment.user_id,
                    tokens = payment.tokens,
                    "Payment refunded"
                );
                Ok(WebhookOutcome::Refunded {
                    payment,
                    balance: transaction.balance_after,
                })
            }
            Err(AppError::InsufficientFunds {
                required,
                available,
            }) => {
                tx.rollback().await?;
                error!(
                    payment_id = %payment.id,
                    user_id = %payment.user_id,
                    required = required,
                    available = available,
                    "Refund needs manual follow-up: purchased tokens already spent"
                );
                Ok(WebhookOutcome::RefundRejected(payment))
            }
            Err(e) => Err(e),
        }
    }
}
