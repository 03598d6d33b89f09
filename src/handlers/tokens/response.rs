//! Token response DTOs

use serde::Serialize;

use crate::{config::TokenPackage, models::TokenTransaction};

/// Packages on sale
#[derive(Debug, Serialize)]
pub struct PackagesResponse {
    pub packages: Vec<TokenPackage>,
}

/// Current balance
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub tokens: i64,
}

/// One page of the ledger
#[derive(Debug, Serialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<TokenTransaction>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}
