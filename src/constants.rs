//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Largest accepted request body; entries carry media paths, not media
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default JWT token expiry in hours
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: u64 = 128;

/// Username minimum length
pub const MIN_USERNAME_LENGTH: u64 = 3;

/// Username maximum length
pub const MAX_USERNAME_LENGTH: u64 = 30;

/// Usernames nobody may register
pub const RESERVED_USERNAMES: &[&str] = &[
    "admin",
    "administrator",
    "root",
    "api",
    "www",
    "mail",
    "email",
    "support",
    "help",
    "contact",
];

/// Maximum bio length
pub const MAX_BIO_LENGTH: u64 = 500;

// =============================================================================
// TOKEN ECONOMY
// =============================================================================

/// Tokens charged for each extra vote after the free one
pub const DEFAULT_VOTE_TOKEN_COST: i64 = 5;

/// Number of top-ranked contestants per arena that qualify for the finale
pub const FINALE_PODIUM_SIZE: usize = 3;

/// Total votes across all entries that earn the crowd favorite badge
pub const CROWD_FAVORITE_VOTES: i64 = 100;

/// Default participant cap for seeded arenas
pub const DEFAULT_ARENA_CAPACITY: i32 = 100;

// =============================================================================
// PAYMENTS
// =============================================================================

/// Default ISO currency for checkout sessions
pub const DEFAULT_CURRENCY: &str = "usd";

/// Default Stripe API base URL
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Maximum age of a webhook signature timestamp in seconds
pub const DEFAULT_WEBHOOK_TOLERANCE_SECS: i64 = 300;

/// Webhook signature header sent by the provider
pub const WEBHOOK_SIGNATURE_HEADER: &str = "stripe-signature";

/// Provider event types the settlement engine reacts to
pub mod webhook_events {
    pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";
    pub const CHECKOUT_EXPIRED: &str = "checkout.session.expired";
    pub const PAYMENT_FAILED: &str = "payment_intent.payment_failed";
    pub const CHARGE_REFUNDED: &str = "charge.refunded";
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

/// Default sender address
pub const DEFAULT_FROM_EMAIL: &str = "noreply@talentsroyale.com";

/// Template names understood by the notifier
pub mod templates {
    pub const ACCOUNT_DELETED: &str = "account_deleted";
    pub const PURCHASE_RECEIPT: &str = "purchase_receipt";
    pub const WELCOME: &str = "welcome";
}

// =============================================================================
// USER ROLES
// =============================================================================

/// User role identifiers
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const MEMBER: &str = "member";

    /// All user roles
    pub const ALL: &[&str] = &[ADMIN, MEMBER];
}

/// Contestant media kinds
pub mod media_kinds {
    pub const VIDEO: &str = "video";
    pub const IMAGE: &str = "image";

    pub const ALL: &[&str] = &[VIDEO, IMAGE];
}

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Rate limiting configuration
pub mod rate_limits {
    /// Auth endpoint - max requests
    pub const AUTH_MAX_REQUESTS: i64 = 5;
    /// Auth endpoint - window in seconds
    pub const AUTH_WINDOW_SECS: i64 = 60;

    /// Vote endpoint - max requests
    pub const VOTE_MAX_REQUESTS: i64 = 30;
    /// Vote endpoint - window in seconds
    pub const VOTE_WINDOW_SECS: i64 = 60;

    /// Checkout endpoint - max requests
    pub const PAYMENT_MAX_REQUESTS: i64 = 10;
    /// Checkout endpoint - window in seconds
    pub const PAYMENT_WINDOW_SECS: i64 = 60;

    /// General API - max requests
    pub const GENERAL_MAX_REQUESTS: i64 = 100;
    /// General API - window in seconds
    pub const GENERAL_WINDOW_SECS: i64 = 60;
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for paginated results
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum page size for paginated results
pub const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum contestant title length
pub const MAX_ENTRY_TITLE_LENGTH: u64 = 200;

/// Maximum contestant description length
pub const MAX_ENTRY_DESCRIPTION_LENGTH: u64 = 2000;

/// Maximum media path length
pub const MAX_MEDIA_PATH_LENGTH: u64 = 512;
