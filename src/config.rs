//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::path::PathBuf;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CURRENCY, DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_FROM_EMAIL,
    DEFAULT_JWT_EXPIRY_HOURS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, DEFAULT_STRIPE_API_BASE, DEFAULT_VOTE_TOKEN_COST,
    DEFAULT_WEBHOOK_TOLERANCE_SECS,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub payments: PaymentConfig,
    pub mail: MailConfig,
    pub storage: StorageConfig,
    pub economy: EconomyConfig,
    pub catalog: TokenCatalog,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub request_timeout_secs: u64,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// JWT authentication configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_hours: i64,
}

/// Payment provider configuration
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub api_base: String,
    pub secret_key: String,
    pub webhook_secret: String,
    /// Accepted clock skew for webhook signature timestamps
    pub webhook_tolerance_secs: i64,
    pub currency: String,
    /// Return URL after a successful checkout (`{CHECKOUT_SESSION_ID}` is substituted by the provider)
    pub success_url: String,
    pub cancel_url: String,
}

/// Outbound mail configuration
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub from_address: String,
    /// HTTP mail API endpoint; messages are only logged when unset
    pub api_url: Option<String>,
    pub api_key: Option<String>,
}

/// File storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub media_path: PathBuf,
}

/// Token economy tunables
#[derive(Debug, Clone)]
pub struct EconomyConfig {
    /// Tokens charged for a paid re-vote
    pub vote_token_cost: i64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            vote_token_cost: DEFAULT_VOTE_TOKEN_COST,
        }
    }
}

/// A purchasable bundle of tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPackage {
    pub tokens: i64,
    pub price_cents: i64,
    pub name: String,
    #[serde(default)]
    pub popular: bool,
}

/// The fixed list of token packages on sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenCatalog {
    packages: Vec<TokenPackage>,
}

impl TokenCatalog {
    pub fn new(packages: Vec<TokenPackage>) -> Self {
        Self { packages }
    }

    /// Find the package whose token count matches exactly
    pub fn find(&self, tokens: i64) -> Option<&TokenPackage> {
        self.packages.iter().find(|p| p.tokens == tokens)
    }

    pub fn packages(&self) -> &[TokenPackage] {
        &self.packages
    }

    /// Parse a catalog from its JSON representation
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let catalog: TokenCatalog = serde_json::from_str(raw)
            .map_err(|_| ConfigError::InvalidValue("TOKEN_PACKAGES".to_string()))?;

        if catalog.packages.is_empty()
            || catalog
                .packages
                .iter()
                .any(|p| p.tokens <= 0 || p.price_cents <= 0)
        {
            return Err(ConfigError::InvalidValue("TOKEN_PACKAGES".to_string()));
        }

        Ok(catalog)
    }
}

impl Default for TokenCatalog {
    fn default() -> Self {
        let package = |tokens, price_cents, name: &str, popular| TokenPackage {
            tokens,
            price_cents,
            name: name.to_string(),
            popular,
        };

        Self::new(vec![
            package(50, 499, "Starter Pack", false),
            package(100, 899, "Popular Pack", true),
            package(250, 1999, "Champion Pack", false),
            package(500, 3499, "Elite Pack", false),
            package(1000, 5999, "Royal Pack", false),
        ])
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            payments: PaymentConfig::from_env()?,
            mail: MailConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            economy: EconomyConfig::from_env()?,
            catalog: match env::var("TOKEN_PACKAGES") {
                Ok(raw) => TokenCatalog::from_json(&raw)?,
                Err(_) => TokenCatalog::default(),
            },
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("REQUEST_TIMEOUT_SECS".to_string()))?,
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DEFAULT_DATABASE_MAX_CONNECTIONS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string()))?,
        })
    }
}

impl RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        })
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET".to_string()))?,
            expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| DEFAULT_JWT_EXPIRY_HOURS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_EXPIRY_HOURS".to_string()))?,
        })
    }
}

impl PaymentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let site_url =
            env::var("SITE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

        Ok(Self {
            api_base: env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| DEFAULT_STRIPE_API_BASE.to_string()),
            secret_key: env::var("STRIPE_SECRET_KEY")
                .map_err(|_| ConfigError::Missing("STRIPE_SECRET_KEY".to_string()))?,
            webhook_secret: env::var("STRIPE_WEBHOOK_SECRET")
                .map_err(|_| ConfigError::Missing("STRIPE_WEBHOOK_SECRET".to_string()))?,
            webhook_tolerance_secs: env::var("STRIPE_WEBHOOK_TOLERANCE_SECS")
                .unwrap_or_else(|_| DEFAULT_WEBHOOK_TOLERANCE_SECS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("STRIPE_WEBHOOK_TOLERANCE_SECS".to_string()))?,
            currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| DEFAULT_CURRENCY.to_string()),
            success_url: format!(
                "{}/api/v1/payments/success?session_id={{CHECKOUT_SESSION_ID}}",
                site_url
            ),
            cancel_url: format!("{}/tokens", site_url),
        })
    }
}

impl MailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            from_address: env::var("DEFAULT_FROM_EMAIL")
                .unwrap_or_else(|_| DEFAULT_FROM_EMAIL.to_string()),
            api_url: env::var("MAIL_API_URL").ok(),
            api_key: env::var("MAIL_API_KEY").ok(),
        })
    }
}

impl StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            media_path: PathBuf::from(
                env::var("MEDIA_PATH").unwrap_or_else(|_| "/data/media".to_string()),
            ),
        })
    }
}

impl EconomyConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let vote_token_cost: i64 = env::var("VOTE_TOKEN_COST")
            .unwrap_or_else(|_| DEFAULT_VOTE_TOKEN_COST.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("VOTE_TOKEN_COST".to_string()))?;

        if vote_token_cost <= 0 {
            return Err(ConfigError::InvalidValue("VOTE_TOKEN_COST".to_string()));
        }

        Ok(Self { vote_token_cost })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
