//! Admin response DTOs

use serde::Serialize;

use crate::{
    handlers::{auth::UserResponse, contestants::ContestantResponse},
    models::{Arena, TokenTransaction},
};

/// Arena after an admin change
#[derive(Debug, Serialize)]
pub struct AdminArenaResponse {
    pub message: String,
    pub arena: Arena,
}

/// Entry removed by an admin
#[derive(Debug, Serialize)]
pub struct RemovedEntryResponse {
    pub message: String,
    pub contestant: ContestantResponse,
}

/// Bonus ledger entry
#[derive(Debug, Serialize)]
pub struct BonusResponse {
    pub message: String,
    pub transaction: TokenTransaction,
}

/// User after a role change
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub message: String,
    pub user: UserResponse,
}
