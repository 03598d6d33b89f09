//! Token request DTOs

use serde::Deserialize;

use crate::{
    constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    models::TransactionType,
};

/// Ledger listing query
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
}

impl TransactionQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}
