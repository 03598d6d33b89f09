//! State-changing user actions
//!
//! Each mutating action is its own [`Command`] variant with typed input, and
//! [`CommandDispatcher::dispatch`] routes it to the engine that owns it.

use std::sync::Arc;

use serde_json::json;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::{
    config::EconomyConfig,
    constants::templates,
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    models::{Contestant, Payment},
    notifications::Notifier,
    services::{
        arena_service::EntrySubmission,
        payment_service::{CheckoutStarted, CompletionOutcome, WebhookOutcome},
        voting_service::VoteReceipt,
        ArenaService, PaymentService, UserService, VotingService,
    },
};

/// A mutating request against the token economy
#[derive(Debug, Clone)]
pub enum Command {
    CastVote {
        user_id: Uuid,
        contestant_id: Uuid,
        spend_tokens: bool,
    },
    JoinArena {
        user_id: Uuid,
        arena_id: Uuid,
        submission: EntrySubmission,
    },
    CreatePayment {
        user_id: Uuid,
        tokens: i64,
    },
    CompletePayment {
        external_id: String,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CastVote { .. } => "cast_vote",
            Self::JoinArena { .. } => "join_arena",
            Self::CreatePayment { .. } => "create_payment",
            Self::CompletePayment { .. } => "complete_payment",
        }
    }
}

/// Result of a dispatched command, one variant per command
#[derive(Debug, Clone)]
pub enum CommandOutcome {
    Voted(VoteReceipt),
    Joined(Contestant),
    CheckoutStarted(CheckoutStarted),
    PaymentSettled(CompletionOutcome),
}

fn mismatch(expected: &str) -> AppError {
    AppError::Internal(anyhow::anyhow!("command outcome is not {}", expected))
}

impl CommandOutcome {
    pub fn into_vote(self) -> AppResult<VoteReceipt> {
        match self {
            Self::Voted(receipt) => Ok(receipt),
            _ => Err(mismatch("a vote")),
        }
    }

    pub fn into_contestant(self) -> AppResult<Contestant> {
        match self {
            Self::Joined(contestant) => Ok(contestant),
            _ => Err(mismatch("an arena entry")),
        }
    }

    pub fn into_checkout(self) -> AppResult<CheckoutStarted> {
        match self {
            Self::CheckoutStarted(checkout) => Ok(checkout),
            _ => Err(mismatch("a checkout")),
        }
    }

    pub fn into_completion(self) -> AppResult<CompletionOutcome> {
        match self {
            Self::PaymentSettled(outcome) => Ok(outcome),
            _ => Err(mismatch("a payment completion")),
        }
    }
}

/// Routes commands to the voting, arena and payment engines
#[derive(Clone)]
pub struct CommandDispatcher {
    pool: PgPool,
    payments: Arc<PaymentService>,
    notifier: Arc<Notifier>,
    economy: EconomyConfig,
}

impl CommandDispatcher {
    pub fn new(
        pool: PgPool,
        payments: Arc<PaymentService>,
        notifier: Arc<Notifier>,
        economy: EconomyConfig,
    ) -> Self {
        Self {
            pool,
            payments,
            notifier,
            economy,
        }
    }

    pub fn payments(&self) -> &PaymentService {
        &self.payments
    }

    /// Run one command
    pub async fn dispatch(&self, command: Command) -> AppResult<CommandOutcome> {
        tracing::debug!(command = command.name(), "Dispatching command");

        match command {
            Command::CastVote {
                user_id,
                contestant_id,
                spend_tokens,
            } => VotingService::cast_vote(
                &self.pool,
                self.economy.vote_token_cost,
                &user_id,
                &contestant_id,
                spend_tokens,
            )
            .await
            .map(CommandOutcome::Voted),

            Command::JoinArena {
                user_id,
                arena_id,
                submission,
            } => ArenaService::join_arena(&self.pool, &user_id, &arena_id, &submission)
                .await
                .map(CommandOutcome::Joined),

            Command::CreatePayment { user_id, tokens } => {
                let user = UserService::get_user_by_id(&self.pool, &user_id).await?;
                self.payments
                    .create_payment(&self.pool, &user, tokens)
                    .await
                    .map(CommandOutcome::CheckoutStarted)
            }

            Command::CompletePayment { external_id } => {
                let outcome = self
                    .payments
                    .complete_payment(&self.pool, &external_id)
                    .await?;
                if let CompletionOutcome::Completed { payment, balance } = &outcome {
                    self.send_receipt(payment, *balance).await;
                }
                Ok(CommandOutcome::PaymentSettled(outcome))
            }
        }
    }

    /// Verify and apply a provider notification
    pub async fn handle_webhook(&self, payload: &[u8], signature: &str) -> AppResult<WebhookOutcome> {
        let outcome = self
            .payments
            .handle_webhook(&self.pool, payload, signature)
            .await?;

        if let WebhookOutcome::Settled(CompletionOutcome::Completed { payment, balance }) = &outcome {
            self.send_receipt(payment, *balance).await;
        }

        Ok(outcome)
    }

    async fn send_receipt(&self, payment: &Payment, balance: i64) {
        let user = match UserRepository::find_by_id(&self.pool, &payment.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return,
            Err(e) => {
                warn!(payment_id = %payment.id, error = %e, "Could not load purchaser for receipt");
                return;
            }
        };

        self.notifier
            .notify(
                templates::PURCHASE_RECEIPT,
                &user.email,
                &json!({
                    "username": user.username,
                    "package_name": payment.package_name,
                    "tokens": payment.tokens,
                    "balance": balance,
                }),
            )
            .await;
    }
}
