//! Payment provider boundary
//!
//! The settlement engine only talks to the provider through [`PaymentProvider`]:
//! create a checkout session, read a session's status, and accept signed
//! event notifications.

pub mod provider;
pub mod stripe;
pub mod webhook;

pub use provider::{
    CheckoutRequest, CheckoutSession, PaymentProvider, ProviderError, SessionStatus,
};
pub use stripe::StripeProvider;
pub use webhook::{ProviderEvent, SignatureError, WebhookEvent};
