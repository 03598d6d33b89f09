//! Authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use crate::{
    config::JwtConfig,
    constants::roles,
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    models::User,
    utils::validation::validate_username,
};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub username: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Register a new member with an empty token balance
    pub async fn register(
        pool: &PgPool,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<User> {
        validate_username(username).map_err(|e| AppError::Validation(e.to_string()))?;

        // Usernames are unique regardless of case
        if UserRepository::find_by_username(pool, username).await?.is_some() {
            return Err(AppError::AlreadyExists("Username already taken".to_string()));
        }

        if UserRepository::find_by_email(pool, email).await?.is_some() {
            return Err(AppError::AlreadyExists("Email already registered".to_string()));
        }

        let password_hash = Self::hash_password(password)?;

        let user =
            UserRepository::create(pool, username, email, &password_hash, roles::MEMBER).await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Login with username/email and password, returning a bearer token
    pub async fn login(
        pool: &PgPool,
        jwt: &JwtConfig,
        identifier: &str,
        password: &str,
    ) -> AppResult<(User, String, i64)> {
        let user = UserRepository::find_by_identifier(pool, identifier)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !Self::verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let (access_token, expires_in) = Self::generate_access_token(&user, jwt)?;

        Ok((user, access_token, expires_in))
    }

    /// Verify JWT token and extract claims
    pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Hash password using Argon2
    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(hash)
    }

    /// Verify password against hash
    pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Generate access token
    pub fn generate_access_token(user: &User, jwt: &JwtConfig) -> AppResult<(String, i64)> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(jwt.expiry_hours);
        let expires_in = jwt.expiry_hours * 3600;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))?;

        Ok((token, expires_in))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiry_hours: 1,
        }
    }

    fn user() -> User {
        User {
            id: uuid::Uuid::new_v4(),
            username: "nova".to_string(),
            email: "nova@test.local".to_string(),
            password_hash: String::new(),
            bio: None,
            role: roles::MEMBER.to_string(),
            tokens: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = AuthService::hash_password("Sup3rSecret").unwrap();
        assert!(AuthService::verify_password("Sup3rSecret", &hash).unwrap());
        assert!(!AuthService::verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_token_roundtrip() {
        let user = user();
        let (token, expires_in) = AuthService::generate_access_token(&user, &jwt()).unwrap();
        assert_eq!(expires_in, 3600);

        let claims = AuthService::verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.role, roles::MEMBER);

        assert!(matches!(
            AuthService::verify_token(&token, "other-secret"),
            Err(AppError::InvalidToken)
        ));
    }
}
