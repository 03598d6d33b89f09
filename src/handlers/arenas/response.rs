//! Arena response DTOs

use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::repositories::ArenaWithCount,
    handlers::contestants::ContestantResponse,
    models::ArenaTier,
    ranking::RankedEntry,
};

/// Arena with occupancy
#[derive(Debug, Serialize)]
pub struct ArenaResponse {
    pub id: Uuid,
    pub name: String,
    pub tier: ArenaTier,
    pub description: Option<String>,
    pub token_cost: i64,
    pub max_participants: i32,
    pub participant_count: i64,
    pub spots_left: i64,
    pub is_active: bool,
}

impl From<ArenaWithCount> for ArenaResponse {
    fn from(row: ArenaWithCount) -> Self {
        let arena = row.arena;
        Self {
            spots_left: (i64::from(arena.max_participants) - row.participant_count).max(0),
            id: arena.id,
            name: arena.name,
            tier: arena.tier,
            description: arena.description,
            token_cost: arena.token_cost,
            max_participants: arena.max_participants,
            participant_count: row.participant_count,
            is_active: arena.is_active,
        }
    }
}

/// Arena list
#[derive(Debug, Serialize)]
pub struct ArenaListResponse {
    pub arenas: Vec<ArenaResponse>,
}

/// Successful arena entry
#[derive(Debug, Serialize)]
pub struct JoinArenaResponse {
    pub message: String,
    pub contestant: ContestantResponse,
}

/// Ranked entries of one arena
#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub arena_id: Uuid,
    pub arena_name: String,
    pub tier: ArenaTier,
    pub standings: Vec<RankedEntry>,
}

/// Podium entries of every arena
#[derive(Debug, Serialize)]
pub struct FinaleResponse {
    pub finalists: Vec<RankedEntry>,
}
