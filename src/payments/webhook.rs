//! Signed provider notifications
//!
//! The signature header has the form `t=<unix seconds>,v1=<hex>[,v1=<hex>...]`
//! where each `v1` is HMAC-SHA256 over `"{t}.{raw body}"` keyed with the
//! webhook secret.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use uuid::Uuid;

use crate::constants::webhook_events;

type HmacSha256 = Hmac<Sha256>;

/// Why a signature was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("signature header is malformed")]
    MalformedHeader,

    #[error("signature timestamp is outside the tolerance window")]
    TimestampOutOfTolerance,

    #[error("no signature matches the payload")]
    Mismatch,
}

/// Verify a notification body against its signature header
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<Vec<u8>> = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            return Err(SignatureError::MalformedHeader);
        };
        match key {
            "t" => {
                timestamp = Some(value.parse().map_err(|_| SignatureError::MalformedHeader)?);
            }
            "v1" => {
                if let Ok(bytes) = hex::decode(value) {
                    signatures.push(bytes);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::MalformedHeader)?;
    if signatures.is_empty() {
        return Err(SignatureError::MalformedHeader);
    }

    if (now - timestamp).abs() > tolerance_secs {
        return Err(SignatureError::TimestampOutOfTolerance);
    }

    let mac = signed_payload_mac(payload, secret, timestamp)?;

    if signatures
        .iter()
        .any(|signature| mac.clone().verify_slice(signature).is_ok())
    {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

fn signed_payload_mac(
    payload: &[u8],
    secret: &str,
    timestamp: i64,
) -> Result<HmacSha256, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::Mismatch)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Build a signature header for a payload
pub fn sign(payload: &[u8], secret: &str, timestamp: i64) -> Result<String, SignatureError> {
    let mac = signed_payload_mac(payload, secret, timestamp)?;
    Ok(format!(
        "t={},v1={}",
        timestamp,
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Raw event envelope
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventData {
    pub object: serde_json::Value,
}

/// The events the settlement engine acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    CheckoutCompleted {
        session_id: String,
        payment_intent_id: Option<String>,
        paid: bool,
    },
    CheckoutExpired {
        session_id: String,
    },
    PaymentFailed {
        payment_intent_id: String,
    },
    ChargeRefunded {
        payment_intent_id: String,
    },
    Ignored(String),
}

impl WebhookEvent {
    /// Parse a raw notification body
    pub fn parse(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }

    fn object_str(&self, key: &str) -> Option<String> {
        self.data
            .object
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }

    /// Our payment ID, echoed back through the object's metadata
    pub fn metadata_payment_id(&self) -> Option<Uuid> {
        self.data
            .object
            .get("metadata")
            .and_then(|m| m.get("payment_id"))
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
    }

    /// Map the envelope onto the events we care about
    pub fn classify(&self) -> ProviderEvent {
        match self.event_type.as_str() {
            webhook_events::CHECKOUT_COMPLETED => match self.object_str("id") {
                Some(session_id) => ProviderEvent::CheckoutCompleted {
                    session_id,
                    payment_intent_id: self.object_str("payment_intent"),
                    paid: self.object_str("payment_status").as_deref() == Some("paid"),
                },
                None => ProviderEvent::Ignored(self.event_type.clone()),
            },
            webhook_events::CHECKOUT_EXPIRED => match self.object_str("id") {
                Some(session_id) => ProviderEvent::CheckoutExpired { session_id },
                None => ProviderEvent::Ignored(self.event_type.clone()),
            },
            webhook_events::PAYMENT_FAILED => match self.object_str("id") {
                Some(payment_intent_id) => ProviderEvent::PaymentFailed { payment_intent_id },
                None => ProviderEvent::Ignored(self.event_type.clone()),
            },
            webhook_events::CHARGE_REFUNDED => match self.object_str("payment_intent") {
                Some(payment_intent_id) => ProviderEvent::ChargeRefunded { payment_intent_id },
                None => ProviderEvent::Ignored(self.event_type.clone()),
            },
            other => ProviderEvent::Ignored(other.to_string()),
        }
    }
}
