//! Stripe Checkout client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::provider::{
    CheckoutRequest, CheckoutSession, PaymentProvider, ProviderError, SessionStatus,
};
use crate::config::PaymentConfig;

const CHECKOUT_SESSIONS_PATH: &str = "/v1/checkout/sessions";

/// Talks to the Stripe REST API with form-encoded requests
pub struct StripeProvider {
    client: Client,
    api_base: String,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
    url: Option<String>,
    payment_status: Option<String>,
    payment_intent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

impl StripeProvider {
    pub fn new(config: &PaymentConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        })
    }

    fn checkout_form(request: &CheckoutRequest) -> Vec<(String, String)> {
        let mut form = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            (
                "line_items[0][price_data][currency]".to_string(),
                request.currency.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                request.amount_cents.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                request.product_name.clone(),
            ),
        ];

        if let Some(email) = &request.customer_email {
            form.push(("customer_email".to_string(), email.clone()));
        }

        if let Some(payment_id) = request.metadata.get("payment_id") {
            form.push(("client_reference_id".to_string(), payment_id.clone()));
        }

        let mut keys: Vec<&String> = request.metadata.keys().collect();
        keys.sort();
        for key in keys {
            let value = &request.metadata[key];
            form.push((format!("metadata[{}]", key), value.clone()));
            form.push((
                format!("payment_intent_data[metadata][{}]", key),
                value.clone(),
            ));
        }

        form
    }

    async fn parse<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| "unknown error".to_string());

            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, ProviderError> {
        let response = self
            .client
            .post(format!("{}{}", self.api_base, CHECKOUT_SESSIONS_PATH))
            .bearer_auth(&self.secret_key)
            .form(&Self::checkout_form(request))
            .send()
            .await?;

        let session: StripeSession = Self::parse(response).await?;
        let url = session
            .url
            .ok_or_else(|| ProviderError::InvalidResponse("checkout session has no url".into()))?;

        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<SessionStatus, ProviderError> {
        let response = self
            .client
            .get(format!(
                "{}{}/{}",
                self.api_base, CHECKOUT_SESSIONS_PATH, session_id
            ))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        let session: StripeSession = Self::parse(response).await?;

        Ok(SessionStatus {
            paid: session.payment_status.as_deref() == Some("paid"),
            payment_intent_id: session.payment_intent,
            id: session.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_checkout_form_encodes_line_item_and_metadata() {
        let mut metadata = HashMap::new();
        metadata.insert("payment_id".to_string(), "pay_1".to_string());
        metadata.insert("user_id".to_string(), "user_1".to_string());

        let form = StripeProvider::checkout_form(&CheckoutRequest {
            amount_cents: 899,
            currency: "usd".to_string(),
            product_name: "Popular Pack - 100 Tokens".to_string(),
            customer_email: Some("fan@example.com".to_string()),
            success_url: "https://example.com/ok".to_string(),
            cancel_url: "https://example.com/cancel".to_string(),
            metadata,
        });

        let get = |key: &str| {
            form.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("mode"), Some("payment"));
        assert_eq!(get("line_items[0][price_data][unit_amount]"), Some("899"));
        assert_eq!(get("client_reference_id"), Some("pay_1"));
        assert_eq!(get("metadata[user_id]"), Some("user_1"));
        assert_eq!(
            get("payment_intent_data[metadata][payment_id]"),
            Some("pay_1")
        );
        assert_eq!(get("customer_email"), Some("fan@example.com"));
    }
}
