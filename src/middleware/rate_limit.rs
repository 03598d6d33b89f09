//! Rate limiting middleware
//!
//! Fixed-window counters in Redis, keyed by client IP and endpoint bucket.
//! If Redis is unreachable the request is let through.

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use redis::AsyncCommands;
use std::net::SocketAddr;
use tracing::warn;

use crate::{constants, error::AppError, state::AppState};

/// Rate limit middleware
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let Some(bucket) = path_bucket(&path) else {
        return Ok(next.run(request).await);
    };
    let (limit, window) = rate_limit(bucket);

    let key = format!("rate_limit:{}:{}", addr.ip(), bucket);
    let mut redis = state.redis();

    let count: i64 = match redis.incr(&key, 1).await {
        Ok(count) => count,
        Err(e) => {
            warn!(error = %e, "Rate limiter unavailable, allowing request");
            return Ok(next.run(request).await);
        }
    };

    if count == 1 {
        // Set expiry on first request
        let _: () = redis.expire(&key, window).await.unwrap_or(());
    }

    if count > limit {
        return Err(AppError::TooManyRequests);
    }

    Ok(next.run(request).await)
}

/// Limit and window for a bucket
fn rate_limit(bucket: &str) -> (i64, i64) {
    use constants::rate_limits::*;

    match bucket {
        "auth" => (AUTH_MAX_REQUESTS, AUTH_WINDOW_SECS),
        "votes" => (VOTE_MAX_REQUESTS, VOTE_WINDOW_SECS),
        "payments" => (PAYMENT_MAX_REQUESTS, PAYMENT_WINDOW_SECS),
        _ => (GENERAL_MAX_REQUESTS, GENERAL_WINDOW_SECS),
    }
}

/// Group similar endpoints; `None` for paths that are never limited
fn path_bucket(path: &str) -> Option<&'static str> {
    let rest = path.strip_prefix(constants::API_BASE_PATH).unwrap_or(path);

    if rest == "/payments/webhook" {
        None
    } else if rest.starts_with("/auth") {
        Some("auth")
    } else if rest.starts_with("/contestants/") && rest.ends_with("/vote") {
        Some("votes")
    } else if rest.starts_with("/payments") {
        Some("payments")
    } else {
        Some("general")
    }
}
