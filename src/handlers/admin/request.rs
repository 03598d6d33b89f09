//! Admin request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::{constants::DEFAULT_ARENA_CAPACITY, models::ArenaTier};

/// Create arena request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateArenaRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub tier: ArenaTier,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[validate(range(min = 0))]
    pub token_cost: i64,

    #[serde(default = "default_capacity")]
    #[validate(range(min = 1))]
    pub max_participants: i32,
}

fn default_capacity() -> i32 {
    DEFAULT_ARENA_CAPACITY
}

/// Grant bonus tokens request
#[derive(Debug, Deserialize, Validate)]
pub struct GrantBonusRequest {
    #[validate(range(min = 1, message = "Bonus must be positive"))]
    pub amount: i64,

    #[validate(length(min = 1, max = 200))]
    pub reason: String,
}

/// Update user role request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRoleRequest {
    #[validate(length(min = 1))]
    pub role: String,
}
