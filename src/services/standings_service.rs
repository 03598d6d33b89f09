//! Standings and progression views

use futures::future::try_join_all;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::{ArenaRepository, ContestantRepository},
    error::{AppError, AppResult},
    models::Arena,
    ranking::{self, ProgressionSummary, RankedEntry},
};

/// Standings service
pub struct StandingsService;

impl StandingsService {
    /// Ranked active entries of one arena
    pub async fn arena_standings(
        pool: &PgPool,
        arena_id: &Uuid,
    ) -> AppResult<(Arena, Vec<RankedEntry>)> {
        let arena = ArenaRepository::find_by_id(pool, arena_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Arena not found".to_string()))?;

        let entries = ContestantRepository::list_active_entries_for_arena(pool, arena_id).await?;

        Ok((arena, ranking::rank(entries)))
    }

    /// Podium of every active arena
    pub async fn finale(pool: &PgPool) -> AppResult<Vec<RankedEntry>> {
        let entries = ContestantRepository::list_active_entries(pool).await?;
        Ok(ranking::finale(&ranking::rank_by_arena(entries)))
    }

    /// A user's tier, standings, goals and achievements
    pub async fn progression(pool: &PgPool, user_id: &Uuid) -> AppResult<ProgressionSummary> {
        let arena_ids = ContestantRepository::list_active_arena_ids_for_user(pool, user_id).await?;

        let standings = try_join_all(arena_ids.iter().map(|arena_id| async move {
            let entries =
                ContestantRepository::list_active_entries_for_arena(pool, arena_id).await?;
            Ok::<_, AppError>(ranking::rank(entries))
        }))
        .await?;

        Ok(ranking::progression(*user_id, &standings))
    }
}
