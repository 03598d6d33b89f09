//! Database module
//!
//! This module handles database connections, migrations, seeding and repositories.

pub mod connection;
pub mod repositories;

use sqlx::PgPool;

pub use connection::*;

use crate::{error::AppResult, models::DEFAULT_ARENAS};
use repositories::ArenaRepository;

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Create any default arena that does not exist yet
pub async fn seed_default_arenas(pool: &PgPool) -> AppResult<()> {
    for seed in DEFAULT_ARENAS.iter() {
        match ArenaRepository::insert_seed(pool, seed).await? {
            Some(arena) => {
                tracing::info!(arena = %arena.name, tier = %arena.tier, "Created arena");
            }
            None => tracing::debug!(arena = seed.name, "Arena already present"),
        }
    }

    Ok(())
}
