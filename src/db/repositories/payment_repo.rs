//! Payment repository

use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use crate::{error::AppResult, models::Payment};

/// Repository for payment database operations
pub struct PaymentRepository;

impl PaymentRepository {
    /// Create a pending payment
    pub async fn create(
        pool: &PgPool,
        user_id: &Uuid,
        amount_cents: i64,
        currency: &str,
        tokens: i64,
        package_name: &str,
    ) -> AppResult<Payment> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (user_id, amount_cents, currency, tokens, package_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(amount_cents)
        .bind(currency)
        .bind(tokens)
        .bind(package_name)
        .fetch_one(pool)
        .await?;

        Ok(payment)
    }

    /// Find payment by ID
    pub async fn find_by_id<'e, E>(executor: E, id: &Uuid) -> AppResult<Option<Payment>>
    where
        E: PgExecutor<'e>,
    {
        let payment = sqlx::query_as::<_, Payment>(r#"SELECT * FROM payments WHERE id = $1"#)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(payment)
    }

    /// Find payment by checkout session or payment intent identifier
    pub async fn find_by_external_id<'e, E>(
        executor: E,
        external_id: &str,
    ) -> AppResult<Option<Payment>>
    where
        E: PgExecutor<'e>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE checkout_session_id = $1 OR payment_intent_id = $1
            "#,
        )
        .bind(external_id)
        .fetch_optional(executor)
        .await?;

        Ok(payment)
    }

    /// Attach the provider's checkout session to a payment
    pub async fn set_checkout_session(
        pool: &PgPool,
        id: &Uuid,
        session_id: &str,
    ) -> AppResult<Payment> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET checkout_session_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(session_id)
        .fetch_one(pool)
        .await?;

        Ok(payment)
    }

    /// pending -> completed, only if still pending.
    ///
    /// `None` means another request already moved the payment on.
    pub async fn mark_completed(
        conn: &mut PgConnection,
        id: &Uuid,
        payment_intent_id: Option<&str>,
    ) -> AppResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET
                status = 'completed',
                completed_at = NOW(),
                payment_intent_id = COALESCE(payment_intent_id, $2),
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payment_intent_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(payment)
    }

    /// pending -> failed, only if still pending
    pub async fn mark_failed<'e, E>(executor: E, id: &Uuid) -> AppResult<Option<Payment>>
    where
        E: PgExecutor<'e>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET status = 'failed', updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(payment)
    }

    /// completed -> refunded, only if currently completed
    pub async fn mark_refunded(conn: &mut PgConnection, id: &Uuid) -> AppResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET status = 'refunded', updated_at = NOW()
            WHERE id = $1 AND status = 'completed'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(payment)
    }

    /// List a user's payments, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: &Uuid, limit: i64) -> AppResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(payments)
    }
}
