//! User response DTOs

use serde::Serialize;

use crate::handlers::auth::UserResponse;

/// Profile after an update
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: String,
    pub user: UserResponse,
}

/// Account deletion confirmation
#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    pub message: String,
}
