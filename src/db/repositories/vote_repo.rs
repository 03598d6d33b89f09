//! Vote repository

use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use crate::{error::AppResult, models::Vote};

/// Repository for vote database operations
pub struct VoteRepository;

impl VoteRepository {
    /// Find the vote a user cast for a contestant
    pub async fn find<'e, E>(
        executor: E,
        user_id: &Uuid,
        contestant_id: &Uuid,
    ) -> AppResult<Option<Vote>>
    where
        E: PgExecutor<'e>,
    {
        let vote = sqlx::query_as::<_, Vote>(
            r#"SELECT * FROM votes WHERE user_id = $1 AND contestant_id = $2"#,
        )
        .bind(user_id)
        .bind(contestant_id)
        .fetch_optional(executor)
        .await?;

        Ok(vote)
    }

    /// Record the free vote; `None` if the pair already has a vote row
    pub async fn insert_free(
        conn: &mut PgConnection,
        user_id: &Uuid,
        contestant_id: &Uuid,
    ) -> AppResult<Option<Vote>> {
        let vote = sqlx::query_as::<_, Vote>(
            r#"
            INSERT INTO votes (user_id, contestant_id, is_free_vote, tokens_spent)
            VALUES ($1, $2, TRUE, 0)
            ON CONFLICT (user_id, contestant_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(contestant_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(vote)
    }

    /// Number of vote rows for a contestant
    pub async fn count_for_contestant<'e, E>(executor: E, contestant_id: &Uuid) -> AppResult<i64>
    where
        E: PgExecutor<'e>,
    {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM votes WHERE contestant_id = $1"#)
                .bind(contestant_id)
                .fetch_one(executor)
                .await?;

        Ok(count)
    }
}
