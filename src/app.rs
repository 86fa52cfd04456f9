use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, Environment};
use crate::csrf::CsrfGuard;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::csrf_middleware;

/// Shared, read-only request state
#[derive(Debug, Clone)]
pub struct AppState {
    pub guard: CsrfGuard,
    pub environment: Environment,
    pub request_logging: bool,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            guard: config.csrf_guard(),
            environment: config.environment,
            request_logging: config.api.enable_request_logging,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let request_logging = state.request_logging;

    let router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/csrf/token", get(public::issue_token))
        // Protected API
        .merge(protected_routes(state.guard.clone()))
        .fallback(not_found)
        .with_state(state);

    if request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn protected_routes(guard: CsrfGuard) -> Router<AppState> {
    Router::new()
        .route(
            "/api/echo",
            get(protected::echo_get)
                .post(protected::echo_post)
                .delete(protected::echo_delete),
        )
        .route_layer(middleware::from_fn_with_state(guard, csrf_middleware))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    use crate::csrf::{CsrfSecret, TokenCodec};

    fn state() -> AppState {
        AppState {
            guard: CsrfGuard::new(TokenCodec::new(CsrfSecret::new("app-test-secret"))),
            environment: Environment::Development,
            request_logging: false,
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn issued_token_unlocks_protected_route() {
        let app = app(state());

        let issued = app
            .clone()
            .oneshot(Request::builder().uri("/csrf/token").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(issued.status(), StatusCode::OK);

        let header_token = issued
            .headers()
            .get("x-csrf-token")
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        let body = body_json(issued).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["token"], header_token.as_str());
        assert_eq!(body["data"]["header"], "X-CSRF-Token");

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/echo")
                    .header("content-type", "application/json")
                    .header("x-csrf-token", header_token.as_str())
                    .body(Body::from(r#"{"hello":"world"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["echo"]["hello"], "world");
    }

    #[tokio::test]
    async fn delete_without_token_is_forbidden() {
        let response = app(state())
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/api/echo")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn token_from_another_secret_is_forbidden() {
        let foreign = TokenCodec::new(CsrfSecret::new("someone-else")).generate();

        let response = app(state())
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/api/echo")
                    .header("csrf-token", foreign.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["code"], "CSRF_TOKEN_INVALID");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = app(state())
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
