//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use redis::aio::ConnectionManager;
use sqlx::PgPool;

use crate::{
    config::Config,
    notifications::Notifier,
    services::{CommandDispatcher, PaymentService},
    storage::MediaStorage,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Database connection pool
    db: PgPool,

    /// Redis connection manager, used for rate limiting
    redis: ConnectionManager,

    /// Application configuration
    config: Config,

    /// Command routing to the voting, arena and payment engines
    commands: CommandDispatcher,

    notifier: Arc<Notifier>,

    media: MediaStorage,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        db: PgPool,
        redis: ConnectionManager,
        config: Config,
        payments: Arc<PaymentService>,
        notifier: Arc<Notifier>,
    ) -> Self {
        let commands = CommandDispatcher::new(
            db.clone(),
            payments,
            notifier.clone(),
            config.economy.clone(),
        );
        let media = MediaStorage::new(config.storage.media_path.clone());

        Self {
            inner: Arc::new(AppStateInner {
                db,
                redis,
                config,
                commands,
                notifier,
                media,
            }),
        }
    }

    /// Get a reference to the database pool
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// Get a clone of the Redis connection manager
    pub fn redis(&self) -> ConnectionManager {
        self.inner.redis.clone()
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn commands(&self) -> &CommandDispatcher {
        &self.inner.commands
    }

    pub fn payments(&self) -> &PaymentService {
        self.inner.commands.payments()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    pub fn media(&self) -> &MediaStorage {
        &self.inner.media
    }
}
