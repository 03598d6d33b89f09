//! User request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::{MAX_BIO_LENGTH, MAX_PASSWORD_LENGTH, MAX_USERNAME_LENGTH, MIN_USERNAME_LENGTH};

/// Update own profile
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = MIN_USERNAME_LENGTH, max = MAX_USERNAME_LENGTH))]
    pub username: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = MAX_BIO_LENGTH))]
    pub bio: Option<String>,
}

/// Delete own account; the password must be confirmed
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteAccountRequest {
    #[validate(length(min = 1, max = MAX_PASSWORD_LENGTH))]
    pub password: String,
}
