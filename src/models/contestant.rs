//! Contestant model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::ArenaTier;

/// Contestant database model: one user's entry in one arena
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Contestant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub arena_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub media_kind: String,
    pub media_path: Option<String>,
    /// Vote counter, updated in the same transaction as each vote
    pub votes: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contestant joined with its owner and arena, as used for standings
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ContestantEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub arena_id: Uuid,
    pub arena_name: String,
    pub tier: ArenaTier,
    pub title: String,
    pub media_kind: String,
    pub media_path: Option<String>,
    pub votes: i64,
    pub created_at: DateTime<Utc>,
}
