use axum::extract::State;
use serde::Serialize;

use crate::app::AppState;
use crate::csrf::{ISSUED_TOKEN_HEADER, TOKEN_HEADER};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub header: &'static str,
    pub max_age_ms: i64,
}

/// GET /csrf/token - Issue a fresh CSRF token
///
/// The token is returned both in the `X-CSRF-Token` response header and in
/// the body, so browser code can pick whichever is convenient:
/// ```json
/// {
///   "success": true,
///   "data": { "token": "<nonce>.<ms>.<hmac>", "header": "X-CSRF-Token", "max_age_ms": 3600000 }
/// }
/// ```
pub async fn issue_token(State(state): State<AppState>) -> ApiResult<IssuedToken> {
    let headers = state.guard.issue_header_map().map_err(|e| {
        tracing::error!("Failed to build CSRF header: {}", e);
        ApiError::internal_server_error("Failed to issue CSRF token")
    })?;

    let token = headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| ApiError::internal_server_error("Failed to issue CSRF token"))?;

    tracing::debug!("Issued CSRF token");

    Ok(ApiResponse::success(IssuedToken {
        token,
        header: ISSUED_TOKEN_HEADER,
        max_age_ms: state.guard.max_age_ms(),
    })
    .with_headers(headers))
}
