//! Arena repository

use sqlx::{FromRow, PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use crate::{
    constants::DEFAULT_ARENA_CAPACITY,
    error::AppResult,
    models::{Arena, ArenaSeed, ArenaTier},
};

/// Arena row plus the active contestant count
#[derive(Debug, Clone, FromRow)]
pub struct ArenaWithCount {
    #[sqlx(flatten)]
    pub arena: Arena,
    pub participant_count: i64,
}

/// Repository for arena database operations
pub struct ArenaRepository;

impl ArenaRepository {
    /// Find arena by ID
    pub async fn find_by_id<'e, E>(executor: E, id: &Uuid) -> AppResult<Option<Arena>>
    where
        E: PgExecutor<'e>,
    {
        let arena = sqlx::query_as::<_, Arena>(r#"SELECT * FROM arenas WHERE id = $1"#)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(arena)
    }

    /// Find arena by ID and lock the row until the transaction ends.
    ///
    /// Concurrent joins for the same arena queue up behind this lock, so the
    /// capacity and membership checks that follow see committed state.
    pub async fn find_for_update(conn: &mut PgConnection, id: &Uuid) -> AppResult<Option<Arena>> {
        let arena = sqlx::query_as::<_, Arena>(r#"SELECT * FROM arenas WHERE id = $1 FOR UPDATE"#)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(arena)
    }

    /// List arenas ordered by tier, with participant counts
    pub async fn list(pool: &PgPool, include_inactive: bool) -> AppResult<Vec<ArenaWithCount>> {
        let arenas = sqlx::query_as::<_, ArenaWithCount>(
            r#"
            SELECT
                a.*,
                COUNT(c.id) FILTER (WHERE c.is_active) AS participant_count
            FROM arenas a
            LEFT JOIN contestants c ON c.arena_id = a.id
            WHERE ($1 OR a.is_active)
            GROUP BY a.id
            ORDER BY a.tier, a.name
            "#,
        )
        .bind(include_inactive)
        .fetch_all(pool)
        .await?;

        Ok(arenas)
    }

    /// Count active contestants in an arena
    pub async fn count_active_contestants<'e, E>(executor: E, arena_id: &Uuid) -> AppResult<i64>
    where
        E: PgExecutor<'e>,
    {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM contestants WHERE arena_id = $1 AND is_active"#,
        )
        .bind(arena_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    /// Create an arena
    pub async fn create(
        pool: &PgPool,
        name: &str,
        tier: ArenaTier,
        description: Option<&str>,
        token_cost: i64,
        max_participants: i32,
    ) -> AppResult<Arena> {
        let arena = sqlx::query_as::<_, Arena>(
            r#"
            INSERT INTO arenas (name, tier, description, token_cost, max_participants)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(tier)
        .bind(description)
        .bind(token_cost)
        .bind(max_participants)
        .fetch_one(pool)
        .await?;

        Ok(arena)
    }

    /// Insert a seeded arena unless one with that name already exists
    pub async fn insert_seed(pool: &PgPool, seed: &ArenaSeed) -> AppResult<Option<Arena>> {
        let arena = sqlx::query_as::<_, Arena>(
            r#"
            INSERT INTO arenas (name, tier, description, token_cost, max_participants, is_active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            ON CONFLICT (name) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(seed.name)
        .bind(seed.tier)
        .bind(seed.description)
        .bind(seed.token_cost)
        .bind(DEFAULT_ARENA_CAPACITY)
        .fetch_optional(pool)
        .await?;

        Ok(arena)
    }

    /// Stop an arena from accepting entries
    pub async fn deactivate(pool: &PgPool, id: &Uuid) -> AppResult<Option<Arena>> {
        let arena = sqlx::query_as::<_, Arena>(
            r#"
            UPDATE arenas
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(arena)
    }
}
