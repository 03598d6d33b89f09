//! Vote model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vote database model, at most one per (user, contestant)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Vote {
    pub id: Uuid,
    pub user_id: Uuid,
    pub contestant_id: Uuid,
    pub is_free_vote: bool,
    pub tokens_spent: i64,
    pub created_at: DateTime<Utc>,
}

/// How a vote was paid for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Free,
    Paid,
}
