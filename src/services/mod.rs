//! Business logic services

pub mod arena_service;
pub mod auth_service;
pub mod commands;
pub mod ledger_service;
pub mod payment_service;
pub mod standings_service;
pub mod user_service;
pub mod voting_service;

pub use arena_service::{ArenaService, EntrySubmission};
pub use auth_service::{AuthService, Claims};
pub use commands::{Command, CommandDispatcher, CommandOutcome};
pub use ledger_service::{LedgerPage, LedgerService};
pub use payment_service::{CheckoutStarted, CompletionOutcome, PaymentService, WebhookOutcome};
pub use standings_service::StandingsService;
pub use user_service::{ProfileUpdate, UserService};
pub use voting_service::{VoteReceipt, VotingService};
