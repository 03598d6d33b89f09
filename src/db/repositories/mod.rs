//! Database repositories
//!
//! Repositories handle all direct database interactions. Functions that take a
//! `&mut PgConnection` are meant to run inside a caller-owned transaction.

pub mod arena_repo;
pub mod contestant_repo;
pub mod payment_repo;
pub mod transaction_repo;
pub mod user_repo;
pub mod vote_repo;

pub use arena_repo::{ArenaRepository, ArenaWithCount};
pub use contestant_repo::ContestantRepository;
pub use payment_repo::PaymentRepository;
pub use transaction_repo::TransactionRepository;
pub use user_repo::UserRepository;
pub use vote_repo::VoteRepository;
