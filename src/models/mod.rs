//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod arena;
pub mod contestant;
pub mod payment;
pub mod transaction;
pub mod user;
pub mod vote;

pub use arena::*;
pub use contestant::*;
pub use payment::*;
pub use transaction::*;
pub use user::*;
pub use vote::*;
