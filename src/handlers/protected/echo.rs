use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/echo - Safe method, reachable without a token
pub async fn echo_get() -> ApiResponse<Value> {
    ApiResponse::success(json!({ "method": "GET" }))
}

/// POST /api/echo - Echo a JSON object back once the CSRF check has passed
pub async fn echo_post(Json(body): Json<Value>) -> ApiResult<Value> {
    if !body.is_object() {
        return Err(ApiError::bad_request("Request body must be a JSON object"));
    }

    Ok(ApiResponse::success(json!({ "method": "POST", "echo": body })))
}

/// DELETE /api/echo
pub async fn echo_delete() -> ApiResponse<()> {
    ApiResponse::<()>::no_content()
}
