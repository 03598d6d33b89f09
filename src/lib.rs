//! Talents Royale - Token Economy Backend
//!
//! This library provides the core of the Talents Royale platform, where
//! performers enter tiered arenas and the audience votes for them.
//!
//! # Features
//!
//! - Token ledger with an append-only transaction history
//! - One free vote per user and contestant, extra votes paid in tokens
//! - Arena entry with capacity limits and entry fees
//! - Token purchases settled through a hosted checkout and signed webhooks
//! - Standings, finale qualification and user progression
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic, with mutating actions routed as commands
//! - **Repositories**: Database access
//! - **Models**: Domain models and DTOs

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod notifications;
pub mod payments;
pub mod ranking;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
