//! Token handler implementations

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::LedgerService,
    state::AppState,
};

use super::{
    request::TransactionQuery,
    response::{BalanceResponse, PackagesResponse, TransactionListResponse},
};

/// List purchasable token packages
pub async fn list_packages(State(state): State<AppState>) -> Json<PackagesResponse> {
    Json(PackagesResponse {
        packages: state.payments().packages().to_vec(),
    })
}

/// Current user's balance
pub async fn get_balance(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<BalanceResponse>> {
    let tokens = LedgerService::balance(state.db(), &auth_user.id).await?;
    Ok(Json(BalanceResponse { tokens }))
}

/// Current user's ledger, newest first
pub async fn list_transactions(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<TransactionQuery>,
) -> AppResult<Json<TransactionListResponse>> {
    let (page, per_page) = (query.page(), query.per_page());
    let ledger = LedgerService::history(
        state.db(),
        &auth_user.id,
        query.transaction_type,
        page,
        per_page,
    )
    .await?;

    Ok(Json(TransactionListResponse {
        transactions: ledger.transactions,
        total: ledger.total,
        page,
        per_page,
    }))
}
