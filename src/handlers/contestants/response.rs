//! Contestant response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{models::Contestant, services::VoteReceipt};

/// A contestant entry
#[derive(Debug, Serialize)]
pub struct ContestantResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub arena_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub media_kind: String,
    pub media_path: Option<String>,
    pub votes: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Contestant> for ContestantResponse {
    fn from(c: Contestant) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            arena_id: c.arena_id,
            title: c.title,
            description: c.description,
            media_kind: c.media_kind,
            media_path: c.media_path,
            votes: c.votes,
            is_active: c.is_active,
            created_at: c.created_at,
        }
    }
}

/// Vote result
#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub message: String,
    #[serde(flatten)]
    pub receipt: VoteReceipt,
}

/// Withdrawal result
#[derive(Debug, Serialize)]
pub struct WithdrawResponse {
    pub message: String,
    pub contestant: ContestantResponse,
}
