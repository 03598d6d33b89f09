//! Token ledger model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Reason for a balance change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Purchase,
    Vote,
    ArenaEntry,
    Refund,
    Bonus,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Purchase => "purchase",
            Self::Vote => "vote",
            Self::ArenaEntry => "arena_entry",
            Self::Refund => "refund",
            Self::Bonus => "bonus",
        };
        f.write_str(s)
    }
}

/// Append-only ledger row
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TokenTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub transaction_type: TransactionType,
    /// Signed amount: negative for debits, positive for credits
    pub amount: i64,
    pub balance_after: i64,
    pub description: String,
    pub contestant_id: Option<Uuid>,
    pub arena_id: Option<Uuid>,
    pub payment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// What a ledger entry refers to
#[derive(Debug, Clone, Default)]
pub struct LedgerContext {
    pub description: String,
    pub contestant_id: Option<Uuid>,
    pub arena_id: Option<Uuid>,
    pub payment_id: Option<Uuid>,
}

impl LedgerContext {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn contestant(mut self, id: Uuid) -> Self {
        self.contestant_id = Some(id);
        self
    }

    pub fn arena(mut self, id: Uuid) -> Self {
        self.arena_id = Some(id);
        self
    }

    pub fn payment(mut self, id: Uuid) -> Self {
        self.payment_id = Some(id);
        self
    }
}
