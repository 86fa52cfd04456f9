use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - Service information
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "CSRF Guard",
            "version": version,
            "description": "Stateless HMAC-signed CSRF tokens for state-changing requests",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "token": "/csrf/token (public - token acquisition)",
                "api": "/api/* (protected - token required for POST, PUT, PATCH, DELETE)",
            }
        }
    }))
}

/// GET /health - Liveness check
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "environment": state.environment,
        }
    }))
}
