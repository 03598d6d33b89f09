//! Token transaction repository

use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{LedgerContext, TokenTransaction, TransactionType},
};

/// Repository for the append-only token ledger
pub struct TransactionRepository;

impl TransactionRepository {
    /// Append a ledger row
    pub async fn insert(
        conn: &mut PgConnection,
        user_id: &Uuid,
        transaction_type: TransactionType,
        amount: i64,
        balance_after: i64,
        context: &LedgerContext,
    ) -> AppResult<TokenTransaction> {
        let transaction = sqlx::query_as::<_, TokenTransaction>(
            r#"
            INSERT INTO token_transactions (
                user_id, transaction_type, amount, balance_after, description,
                contestant_id, arena_id, payment_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(transaction_type)
        .bind(amount)
        .bind(balance_after)
        .bind(&context.description)
        .bind(context.contestant_id)
        .bind(context.arena_id)
        .bind(context.payment_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(transaction)
    }

    /// List a user's ledger, newest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &Uuid,
        transaction_type: Option<TransactionType>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<TokenTransaction>, i64)> {
        let transactions = sqlx::query_as::<_, TokenTransaction>(
            r#"
            SELECT * FROM token_transactions
            WHERE user_id = $1 AND ($2::transaction_type IS NULL OR transaction_type = $2)
            ORDER BY created_at DESC, id
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(transaction_type)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM token_transactions
            WHERE user_id = $1 AND ($2::transaction_type IS NULL OR transaction_type = $2)
            "#,
        )
        .bind(user_id)
        .bind(transaction_type)
        .fetch_one(pool)
        .await?;

        Ok((transactions, total))
    }

    /// Count ledger rows of one type that reference a contestant
    pub async fn count_for_contestant<'e, E>(
        executor: E,
        contestant_id: &Uuid,
        transaction_type: TransactionType,
    ) -> AppResult<i64>
    where
        E: PgExecutor<'e>,
    {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM token_transactions
            WHERE contestant_id = $1 AND transaction_type = $2
            "#,
        )
        .bind(contestant_id)
        .bind(transaction_type)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    /// Ledger rows that reference a payment
    pub async fn list_for_payment<'e, E>(
        executor: E,
        payment_id: &Uuid,
    ) -> AppResult<Vec<TokenTransaction>>
    where
        E: PgExecutor<'e>,
    {
        let transactions = sqlx::query_as::<_, TokenTransaction>(
            r#"SELECT * FROM token_transactions WHERE payment_id = $1 ORDER BY created_at"#,
        )
        .bind(payment_id)
        .fetch_all(executor)
        .await?;

        Ok(transactions)
    }
}
