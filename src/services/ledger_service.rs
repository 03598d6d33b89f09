//! Token ledger primitives
//!
//! Every balance change goes through [`LedgerService::debit`] or
//! [`LedgerService::credit`] on the caller's transaction connection, so the
//! balance update and its ledger row commit or roll back together.

use sqlx::{PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::{
    db::repositories::{TransactionRepository, UserRepository},
    error::{AppError, AppResult},
    models::{LedgerContext, TokenTransaction, TransactionType},
};

/// One page of a user's ledger
#[derive(Debug, Clone)]
pub struct LedgerPage {
    pub transactions: Vec<TokenTransaction>,
    pub total: i64,
}

/// Ledger service
pub struct LedgerService;

impl LedgerService {
    /// Remove tokens from a user and record the debit
    pub async fn debit(
        conn: &mut PgConnection,
        user_id: &Uuid,
        amount: i64,
        transaction_type: TransactionType,
        context: &LedgerContext,
    ) -> AppResult<TokenTransaction> {
        if amount <= 0 {
            return Err(AppError::Validation(
                "Debit amount must be positive".to_string(),
            ));
        }

        let balance = match UserRepository::debit_tokens(conn, user_id, amount).await? {
            Some(balance) => balance,
            None => {
                let available = UserRepository::get_balance(&mut *conn, user_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
                return Err(AppError::InsufficientFunds {
                    required: amount,
                    available,
                });
            }
        };

        let transaction =
            TransactionRepository::insert(conn, user_id, transaction_type, -amount, balance, context)
                .await?;

        debug!(
            user_id = %user_id,
            amount = amount,
            balance_after = balance,
            kind = %transaction_type,
            "Tokens debited"
        );

        Ok(transaction)
    }

    /// Add tokens to a user and record the credit
    pub async fn credit(
        conn: &mut PgConnection,
        user_id: &Uuid,
        amount: i64,
        transaction_type: TransactionType,
        context: &LedgerContext,
    ) -> AppResult<TokenTransaction> {
        if amount <= 0 {
            return Err(AppError::Validation(
                "Credit amount must be positive".to_string(),
            ));
        }

        let balance = UserRepository::credit_tokens(conn, user_id, amount)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let transaction =
            TransactionRepository::insert(conn, user_id, transaction_type, amount, balance, context)
                .await?;

        debug!(
            user_id = %user_id,
            amount = amount,
            balance_after = balance,
            kind = %transaction_type,
            "Tokens credited"
        );

        Ok(transaction)
    }

    /// Grant bonus tokens in a transaction of their own
    pub async fn grant_bonus(
        pool: &PgPool,
        user_id: &Uuid,
        amount: i64,
        reason: &str,
    ) -> AppResult<TokenTransaction> {
        let mut tx = pool.begin().await?;
        let transaction = Self::credit(
            &mut *tx,
            user_id,
            amount,
            TransactionType::Bonus,
            &LedgerContext::new(reason),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(user_id = %user_id, amount = amount, "Bonus tokens granted");
        Ok(transaction)
    }

    /// Current token balance
    pub async fn balance(pool: &PgPool, user_id: &Uuid) -> AppResult<i64> {
        UserRepository::get_balance(pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// A user's ledger, newest first
    pub async fn history(
        pool: &PgPool,
        user_id: &Uuid,
        transaction_type: Option<TransactionType>,
        page: u32,
        per_page: u32,
    ) -> AppResult<LedgerPage> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(per_page);
        let (transactions, total) = TransactionRepository::list_for_user(
            pool,
            user_id,
            transaction_type,
            offset,
            i64::from(per_page),
        )
        .await?;

        Ok(LedgerPage {
            transactions,
            total,
        })
    }
}
