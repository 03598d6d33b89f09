//! Outbound user notifications
//!
//! Notifications are best effort: a delivery failure is logged and reported
//! to the caller as `false`, never turned into an error of the operation that
//! triggered it.

pub mod transport;

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::templates;

pub use transport::{
    transport_from_config, HttpMailTransport, LogTransport, MailTransport, Message,
    TransportError,
};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([a-z_]+)\s*\}\}").expect("placeholder pattern is valid"));

/// Subject and body templates for a template name
fn template(name: &str) -> Option<(&'static str, &'static str)> {
    match name {
        templates::WELCOME => Some((
            "Welcome to Talents Royale",
            "Hello {{username}},\n\nYour Talents Royale account is ready. Join an arena and show the crowd what you can do.\n\nBest regards,\nThe Talents Royale Team",
        )),
        templates::PURCHASE_RECEIPT => Some((
            "Your Talents Royale token purchase",
            "Hello {{username}},\n\nWe received your payment for the {{package_name}} and added {{tokens}} tokens to your account. Your balance is now {{balance}} tokens.\n\nBest regards,\nThe Talents Royale Team",
        )),
        templates::ACCOUNT_DELETED => Some((
            "Account Deleted - Talents Royale",
            "Hello {{username}},\n\nYour Talents Royale account has been successfully deleted.\n\nWe're sorry to see you go! If you change your mind, you're always welcome to create a new account.\n\nBest regards,\nThe Talents Royale Team",
        )),
        _ => None,
    }
}

/// Substitute `{{key}}` placeholders from a JSON object; unknown keys render empty
pub fn render(text: &str, context: &Value) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &regex::Captures<'_>| match context.get(&caps[1]) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        })
        .into_owned()
}

/// Renders templates and hands them to a transport
pub struct Notifier {
    transport: Box<dyn MailTransport>,
    from: String,
}

impl Notifier {
    pub fn new(transport: Box<dyn MailTransport>, from: impl Into<String>) -> Self {
        Self {
            transport,
            from: from.into(),
        }
    }

    /// Build the message for a template, or `None` for an unknown template
    pub fn compose(&self, template_name: &str, to: &str, context: &Value) -> Option<Message> {
        let (subject, body) = template(template_name)?;
        Some(Message {
            from: self.from.clone(),
            to: to.to_string(),
            subject: render(subject, context),
            body: render(body, context),
        })
    }

    /// Render and deliver; returns whether the message went out
    pub async fn notify(&self, template_name: &str, to: &str, context: &Value) -> bool {
        let Some(message) = self.compose(template_name, to, context) else {
            warn!(template = %template_name, "Unknown notification template");
            return false;
        };

        match self.transport.send(&message).await {
            Ok(()) => {
                debug!(template = %template_name, to = %to, "Notification sent");
                true
            }
            Err(e) => {
                warn!(template = %template_name, to = %to, error = %e, "Notification delivery failed");
                false
            }
        }
    }
}
