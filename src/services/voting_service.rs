//! Voting engine
//!
//! Per (user, contestant) pair a vote moves from "no vote" to "free vote cast",
//! after which only paid extra votes are possible. A paid vote writes a ledger
//! row and bumps the counter; it never adds a second vote row.

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    db::repositories::{ContestantRepository, VoteRepository},
    error::{AppError, AppResult},
    models::{LedgerContext, TransactionType, VoteKind},
    services::LedgerService,
};

/// Outcome of a successful vote
#[derive(Debug, Clone, Serialize)]
pub struct VoteReceipt {
    pub contestant_id: Uuid,
    pub kind: VoteKind,
    pub tokens_spent: i64,
    /// Counter after this vote
    pub votes: i64,
    /// Voter's balance after a paid vote
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<i64>,
}

/// Voting service
pub struct VotingService;

impl VotingService {
    /// Cast a vote for a contestant.
    ///
    /// `spend_tokens` only matters once the free vote is used: with no vote
    /// row yet the free vote is granted either way and nothing is charged.
    pub async fn cast_vote(
        pool: &PgPool,
        vote_cost: i64,
        user_id: &Uuid,
        contestant_id: &Uuid,
        spend_tokens: bool,
    ) -> AppResult<VoteReceipt> {
        let mut tx = pool.begin().await?;

        let contestant = ContestantRepository::find_for_update(&mut *tx, contestant_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| AppError::NotFound("Contestant not found".to_string()))?;

        let existing = VoteRepository::find(&mut *tx, user_id, contestant_id).await?;

        let (kind, tokens_spent, balance) = match (existing, spend_tokens) {
            (None, _) => {
                if VoteRepository::insert_free(&mut *tx, user_id, contestant_id)
                    .await?
                    .is_none()
                {
                    return Err(AppError::AlreadyVoted);
                }
                (VoteKind::Free, 0, None)
            }
            (Some(_), true) => {
                let context = LedgerContext::new(format!("Extra vote for {}", contestant.title))
                    .contestant(contestant.id)
                    .arena(contestant.arena_id);
                let transaction = LedgerService::debit(
                    &mut *tx,
                    user_id,
                    vote_cost,
                    TransactionType::Vote,
                    &context,
                )
                .await?;
                (VoteKind::Paid, vote_cost, Some(transaction.balance_after))
            }
            (Some(_), false) => return Err(AppError::AlreadyVoted),
        };

        let votes = ContestantRepository::increment_votes(&mut *tx, contestant_id).await?;

        tx.commit().await?;

        info!(
            user_id = %user_id,
            contestant_id = %contestant_id,
            kind = ?kind,
            tokens_spent = tokens_spent,
            votes = votes,
            "Vote cast"
        );

        Ok(VoteReceipt {
            contestant_id: *contestant_id,
            kind,
            tokens_spent,
            votes,
            balance,
        })
    }
}
