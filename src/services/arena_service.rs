//! Arena membership engine

use serde::Deserialize;
use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{
        media_kinds, MAX_ENTRY_DESCRIPTION_LENGTH, MAX_ENTRY_TITLE_LENGTH, MAX_MEDIA_PATH_LENGTH,
    },
    db::repositories::{ArenaRepository, ArenaWithCount, ContestantRepository, UserRepository},
    error::{AppError, AppResult},
    models::{Arena, ArenaTier, Contestant, LedgerContext, TransactionType},
    services::LedgerService,
    storage::MediaStorage,
};

/// What a user submits when entering an arena
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EntrySubmission {
    #[validate(length(min = 1, max = MAX_ENTRY_TITLE_LENGTH))]
    pub title: String,

    #[validate(length(max = MAX_ENTRY_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    pub media_kind: String,

    #[validate(length(min = 1, max = MAX_MEDIA_PATH_LENGTH))]
    pub media_path: Option<String>,
}

impl EntrySubmission {
    fn check(&self) -> AppResult<()> {
        self.validate()?;
        if !media_kinds::ALL.contains(&self.media_kind.as_str()) {
            return Err(AppError::Validation(format!(
                "media_kind must be one of: {}",
                media_kinds::ALL.join(", ")
            )));
        }
        Ok(())
    }
}

/// Arena service
pub struct ArenaService;

impl ArenaService {
    /// Enter an arena: pay the fee and create the entry.
    ///
    /// Membership, funds and capacity are checked up front for a cheap
    /// rejection, then checked again while holding the arena row lock.
    pub async fn join_arena(
        pool: &PgPool,
        user_id: &Uuid,
        arena_id: &Uuid,
        submission: &EntrySubmission,
    ) -> AppResult<Contestant> {
        submission.check()?;

        let arena = ArenaRepository::find_by_id(pool, arena_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Arena not found".to_string()))?;
        Self::check_eligibility(&mut *pool.acquire().await?, &arena, user_id).await?;

        let mut tx = pool.begin().await?;

        let arena = ArenaRepository::find_for_update(&mut *tx, arena_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Arena not found".to_string()))?;
        Self::check_eligibility(&mut *tx, &arena, user_id).await?;

        let contestant = ContestantRepository::create(
            &mut *tx,
            user_id,
            arena_id,
            &submission.title,
            submission.description.as_deref(),
            &submission.media_kind,
            submission.media_path.as_deref(),
        )
        .await?;

        if arena.token_cost > 0 {
            let context = LedgerContext::new(format!("Entry fee for {}", arena.name))
                .arena(arena.id)
                .contestant(contestant.id);
            LedgerService::debit(
                &mut *tx,
                user_id,
                arena.token_cost,
                TransactionType::ArenaEntry,
                &context,
            )
            .await?;
        }

        tx.commit().await?;

        info!(
            user_id = %user_id,
            arena_id = %arena_id,
            contestant_id = %contestant.id,
            token_cost = arena.token_cost,
            "Arena joined"
        );

        Ok(contestant)
    }

    /// Membership, funds and capacity checks, in that order
    async fn check_eligibility(
        conn: &mut PgConnection,
        arena: &Arena,
        user_id: &Uuid,
    ) -> AppResult<()> {
        if !arena.is_active {
            return Err(AppError::Validation(
                "Arena is not accepting entries".to_string(),
            ));
        }

        if ContestantRepository::find_active(&mut *conn, user_id, &arena.id)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyJoined);
        }

        let available = UserRepository::get_balance(&mut *conn, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        if available < arena.token_cost {
            return Err(AppError::InsufficientFunds {
                required: arena.token_cost,
                available,
            });
        }

        let participants = ArenaRepository::count_active_contestants(&mut *conn, &arena.id).await?;
        if !arena.has_capacity(participants) {
            return Err(AppError::ArenaFull);
        }

        Ok(())
    }

    /// Withdraw one's own entry; the entry fee is not refunded
    pub async fn withdraw_entry(
        pool: &PgPool,
        user_id: &Uuid,
        contestant_id: &Uuid,
    ) -> AppResult<Contestant> {
        let contestant = ContestantRepository::deactivate(pool, contestant_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Entry not found".to_string()))?;

        info!(user_id = %user_id, contestant_id = %contestant_id, "Entry withdrawn");
        Ok(contestant)
    }

    /// Hard-delete an entry and its stored media
    pub async fn remove_entry(
        pool: &PgPool,
        storage: &MediaStorage,
        contestant_id: &Uuid,
    ) -> AppResult<Contestant> {
        let contestant = ContestantRepository::delete(pool, contestant_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Entry not found".to_string()))?;

        if let Some(path) = &contestant.media_path {
            if let Err(e) = storage.remove(path).await {
                warn!(contestant_id = %contestant_id, path = %path, error = %e, "Failed to delete entry media");
            }
        }

        info!(contestant_id = %contestant_id, "Entry removed");
        Ok(contestant)
    }

    /// Create an arena
    pub async fn create_arena(
        pool: &PgPool,
        name: &str,
        tier: ArenaTier,
        description: Option<&str>,
        token_cost: i64,
        max_participants: i32,
    ) -> AppResult<Arena> {
        if token_cost < 0 {
            return Err(AppError::Validation(
                "token_cost cannot be negative".to_string(),
            ));
        }
        if max_participants <= 0 {
            return Err(AppError::Validation(
                "max_participants must be positive".to_string(),
            ));
        }

        let arena =
            ArenaRepository::create(pool, name, tier, description, token_cost, max_participants)
                .await?;

        info!(arena_id = %arena.id, name = %arena.name, tier = %arena.tier, "Arena created");
        Ok(arena)
    }

    /// Close an arena to new entries
    pub async fn deactivate_arena(pool: &PgPool, arena_id: &Uuid) -> AppResult<Arena> {
        let arena = ArenaRepository::deactivate(pool, arena_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Arena not found".to_string()))?;

        info!(arena_id = %arena_id, "Arena deactivated");
        Ok(arena)
    }

    /// List arenas with participant counts
    pub async fn list_arenas(pool: &PgPool, include_inactive: bool) -> AppResult<Vec<ArenaWithCount>> {
        ArenaRepository::list(pool, include_inactive).await
    }

    /// Arena detail with its participant count
    pub async fn get_arena(pool: &PgPool, arena_id: &Uuid) -> AppResult<ArenaWithCount> {
        let arena = ArenaRepository::find_by_id(pool, arena_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Arena not found".to_string()))?;
        let participant_count = ArenaRepository::count_active_contestants(pool, arena_id).await?;

        Ok(ArenaWithCount {
            arena,
            participant_count,
        })
    }

    /// Contestant detail
    pub async fn get_contestant(pool: &PgPool, contestant_id: &Uuid) -> AppResult<Contestant> {
        ContestantRepository::find_by_id(pool, contestant_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contestant not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(media_kind: &str) -> EntrySubmission {
        EntrySubmission {
            title: "Fire juggling".to_string(),
            description: None,
            media_kind: media_kind.to_string(),
            media_path: Some("contestants/juggle.mp4".to_string()),
        }
    }

    #[test]
    fn test_submission_checks_media_kind() {
        assert!(submission("video").check().is_ok());
        assert!(submission("image").check().is_ok());
        assert!(matches!(
            submission("audio").check(),
            Err(AppError::Validation(_))
        ));
    }

    fn assert_send<T: Send>(_: &T) {}

    #[allow(dead_code)]
    fn join_future_is_send(pool: &PgPool, submission: &EntrySubmission) {
        let id = Uuid::nil();
        assert_send(&ArenaService::join_arena(pool, &id, &id, submission));
    }

    #[test]
    fn test_submission_requires_title() {
        let mut s = submission("video");
        s.title.clear();
        assert!(s.check().is_err());
    }
}
