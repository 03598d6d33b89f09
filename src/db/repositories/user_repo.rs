//! User repository

use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use crate::{error::AppResult, models::User};

/// Repository for user database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(
        pool: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id<'e, E>(executor: E, id: &Uuid) -> AppResult<Option<User>>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1"#)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(user)
    }

    /// Find user by username, case-insensitively
    pub async fn find_by_username(pool: &PgPool, username: &str) -> AppResult<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE LOWER(username) = LOWER($1)"#)
                .bind(username)
                .fetch_optional(pool)
                .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE email = $1"#)
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Find user by username or email (for login)
    pub async fn find_by_identifier(pool: &PgPool, identifier: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT * FROM users WHERE LOWER(username) = LOWER($1) OR email = $1"#,
        )
        .bind(identifier)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Update profile fields
    pub async fn update_profile(
        pool: &PgPool,
        id: &Uuid,
        username: Option<&str>,
        email: Option<&str>,
        bio: Option<&str>,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                bio = COALESCE($4, bio),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(bio)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Update user role
    pub async fn update_role(pool: &PgPool, id: &Uuid, role: &str) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Hard-delete a user; entries, votes, payments and ledger rows cascade
    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Read the current token balance
    pub async fn get_balance<'e, E>(executor: E, id: &Uuid) -> AppResult<Option<i64>>
    where
        E: PgExecutor<'e>,
    {
        let balance: Option<i64> = sqlx::query_scalar(r#"SELECT tokens FROM users WHERE id = $1"#)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(balance)
    }

    /// Subtract tokens only if the balance covers the amount.
    ///
    /// Returns the new balance, or `None` when the user is missing or the
    /// balance is too low. The check and the write are one statement.
    pub async fn debit_tokens(
        conn: &mut PgConnection,
        id: &Uuid,
        amount: i64,
    ) -> AppResult<Option<i64>> {
        let balance: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET tokens = tokens - $2, updated_at = NOW()
            WHERE id = $1 AND tokens >= $2
            RETURNING tokens
            "#,
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(balance)
    }

    /// Add tokens, returning the new balance (`None` if the user is missing)
    pub async fn credit_tokens(
        conn: &mut PgConnection,
        id: &Uuid,
        amount: i64,
    ) -> AppResult<Option<i64>> {
        let balance: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET tokens = tokens + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING tokens
            "#,
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(balance)
    }
}
