//! User service

use serde_json::json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    constants::templates,
    db::repositories::{ContestantRepository, UserRepository},
    error::{AppError, AppResult},
    models::User,
    notifications::Notifier,
    services::AuthService,
    storage::MediaStorage,
    utils::validation::{validate_role, validate_username},
};

/// Profile fields a user may change
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate<'a> {
    pub username: Option<&'a str>,
    pub email: Option<&'a str>,
    pub bio: Option<&'a str>,
}

/// User service for business logic
pub struct UserService;

impl UserService {
    /// Get user by ID
    pub async fn get_user_by_id(pool: &PgPool, id: &Uuid) -> AppResult<User> {
        UserRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Update user profile
    pub async fn update_profile(
        pool: &PgPool,
        user_id: &Uuid,
        update: ProfileUpdate<'_>,
    ) -> AppResult<User> {
        let user = Self::get_user_by_id(pool, user_id).await?;

        if let Some(username) = update.username {
            validate_username(username).map_err(|e| AppError::Validation(e.to_string()))?;
            if let Some(existing) = UserRepository::find_by_username(pool, username).await? {
                if existing.id != user.id {
                    return Err(AppError::AlreadyExists("Username already taken".to_string()));
                }
            }
        }

        if let Some(email) = update.email {
            if let Some(existing) = UserRepository::find_by_email(pool, email).await? {
                if existing.id != user.id {
                    return Err(AppError::AlreadyExists("Email already registered".to_string()));
                }
            }
        }

        UserRepository::update_profile(pool, user_id, update.username, update.email, update.bio)
            .await
    }

    /// Change a user's role
    pub async fn set_role(pool: &PgPool, user_id: &Uuid, role: &str) -> AppResult<User> {
        validate_role(role).map_err(|e| AppError::Validation(e.to_string()))?;
        Self::get_user_by_id(pool, user_id).await?;
        UserRepository::update_role(pool, user_id, role).await
    }

    /// Delete an account after confirming the password.
    ///
    /// The goodbye mail and media cleanup are best effort; the account is
    /// gone either way once the row is deleted.
    pub async fn delete_account(
        pool: &PgPool,
        notifier: &Notifier,
        storage: &MediaStorage,
        user_id: &Uuid,
        password: &str,
    ) -> AppResult<()> {
        let user = Self::get_user_by_id(pool, user_id).await?;

        if !AuthService::verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let media = ContestantRepository::list_media_paths_for_user(pool, user_id).await?;

        if !UserRepository::delete(pool, user_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        notifier
            .notify(
                templates::ACCOUNT_DELETED,
                &user.email,
                &json!({ "username": user.username }),
            )
            .await;

        let removed = storage.remove_all(&media).await;

        info!(
            user_id = %user_id,
            media_files = removed,
            "Account deleted"
        );

        Ok(())
    }
}
