//! Contestant repository

use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Contestant, ContestantEntry},
};

const ENTRY_SELECT: &str = r#"
    SELECT
        c.id,
        c.user_id,
        u.username,
        c.arena_id,
        a.name AS arena_name,
        a.tier,
        c.title,
        c.media_kind,
        c.media_path,
        c.votes,
        c.created_at
    FROM contestants c
    JOIN users u ON u.id = c.user_id
    JOIN arenas a ON a.id = c.arena_id
"#;

/// Repository for contestant database operations
pub struct ContestantRepository;

impl ContestantRepository {
    /// Insert a new entry with zero votes
    pub async fn create(
        conn: &mut PgConnection,
        user_id: &Uuid,
        arena_id: &Uuid,
        title: &str,
        description: Option<&str>,
        media_kind: &str,
        media_path: Option<&str>,
    ) -> AppResult<Contestant> {
        let contestant = sqlx::query_as::<_, Contestant>(
            r#"
            INSERT INTO contestants (user_id, arena_id, title, description, media_kind, media_path)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(arena_id)
        .bind(title)
        .bind(description)
        .bind(media_kind)
        .bind(media_path)
        .fetch_one(&mut *conn)
        .await?;

        Ok(contestant)
    }

    /// Find contestant by ID
    pub async fn find_by_id<'e, E>(executor: E, id: &Uuid) -> AppResult<Option<Contestant>>
    where
        E: PgExecutor<'e>,
    {
        let contestant =
            sqlx::query_as::<_, Contestant>(r#"SELECT * FROM contestants WHERE id = $1"#)
                .bind(id)
                .fetch_optional(executor)
                .await?;

        Ok(contestant)
    }

    /// Find contestant by ID and lock the row until the transaction ends
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: &Uuid,
    ) -> AppResult<Option<Contestant>> {
        let contestant =
            sqlx::query_as::<_, Contestant>(r#"SELECT * FROM contestants WHERE id = $1 FOR UPDATE"#)
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(contestant)
    }

    /// Find the user's active entry in an arena
    pub async fn find_active<'e, E>(
        executor: E,
        user_id: &Uuid,
        arena_id: &Uuid,
    ) -> AppResult<Option<Contestant>>
    where
        E: PgExecutor<'e>,
    {
        let contestant = sqlx::query_as::<_, Contestant>(
            r#"
            SELECT * FROM contestants
            WHERE user_id = $1 AND arena_id = $2 AND is_active
            "#,
        )
        .bind(user_id)
        .bind(arena_id)
        .fetch_optional(executor)
        .await?;

        Ok(contestant)
    }

    /// Bump the vote counter by one, returning the new total
    pub async fn increment_votes(conn: &mut PgConnection, id: &Uuid) -> AppResult<i64> {
        let votes: i64 = sqlx::query_scalar(
            r#"
            UPDATE contestants
            SET votes = votes + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING votes
            "#,
        )
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(votes)
    }

    /// Soft-delete an entry owned by the user
    pub async fn deactivate(
        pool: &PgPool,
        id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<Option<Contestant>> {
        let contestant = sqlx::query_as::<_, Contestant>(
            r#"
            UPDATE contestants
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND is_active
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(contestant)
    }

    /// Hard-delete an entry, returning the removed row
    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<Option<Contestant>> {
        let contestant =
            sqlx::query_as::<_, Contestant>(r#"DELETE FROM contestants WHERE id = $1 RETURNING *"#)
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(contestant)
    }

    /// Active entries in an arena, best first
    pub async fn list_active_entries_for_arena(
        pool: &PgPool,
        arena_id: &Uuid,
    ) -> AppResult<Vec<ContestantEntry>> {
        let query = format!(
            "{} WHERE c.arena_id = $1 AND c.is_active ORDER BY c.votes DESC, c.created_at DESC",
            ENTRY_SELECT
        );

        let entries = sqlx::query_as::<_, ContestantEntry>(&query)
            .bind(arena_id)
            .fetch_all(pool)
            .await?;

        Ok(entries)
    }

    /// Active entries in every active arena, best first within each arena
    pub async fn list_active_entries(pool: &PgPool) -> AppResult<Vec<ContestantEntry>> {
        let query = format!(
            "{} WHERE c.is_active AND a.is_active ORDER BY a.tier DESC, c.arena_id, c.votes DESC, c.created_at DESC",
            ENTRY_SELECT
        );

        let entries = sqlx::query_as::<_, ContestantEntry>(&query)
            .fetch_all(pool)
            .await?;

        Ok(entries)
    }

    /// Arena IDs where the user holds an active entry
    pub async fn list_active_arena_ids_for_user(
        pool: &PgPool,
        user_id: &Uuid,
    ) -> AppResult<Vec<Uuid>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"SELECT arena_id FROM contestants WHERE user_id = $1 AND is_active"#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(ids)
    }

    /// Stored media paths of every entry a user owns, active or not
    pub async fn list_media_paths_for_user(pool: &PgPool, user_id: &Uuid) -> AppResult<Vec<String>> {
        let paths: Vec<String> = sqlx::query_scalar(
            r#"SELECT media_path FROM contestants WHERE user_id = $1 AND media_path IS NOT NULL"#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(paths)
    }
}
