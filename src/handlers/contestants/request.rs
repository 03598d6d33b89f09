//! Contestant request DTOs

use serde::Deserialize;

/// Vote request; the free vote is used first, then `spend_tokens` buys extra votes
#[derive(Debug, Default, Deserialize)]
pub struct VoteRequest {
    #[serde(default)]
    pub spend_tokens: bool,
}
