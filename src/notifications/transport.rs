//! Mail delivery backends

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::config::MailConfig;

/// A rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivery failure
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("mail request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("mail API returned {0}")]
    Rejected(u16),
}

/// Something that can deliver a message
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &Message) -> Result<(), TransportError>;
}

/// Writes messages to the log instead of sending them
#[derive(Debug, Default)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, message: &Message) -> Result<(), TransportError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "Mail delivery disabled, message logged"
        );
        Ok(())
    }
}

/// Posts messages as JSON to an HTTP mail API
pub struct HttpMailTransport {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpMailTransport {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl MailTransport for HttpMailTransport {
    async fn send(&self, message: &Message) -> Result<(), TransportError> {
        let mut request = self.client.post(&self.url).json(message);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(TransportError::Rejected(response.status().as_u16()));
        }

        Ok(())
    }
}

/// Pick the transport the mail configuration asks for
pub fn transport_from_config(config: &MailConfig) -> Box<dyn MailTransport> {
    match &config.api_url {
        Some(url) => Box::new(HttpMailTransport::new(url.clone(), config.api_key.clone())),
        None => Box::new(LogTransport),
    }
}
