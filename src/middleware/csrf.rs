use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::csrf::CsrfGuard;
use crate::error::ApiError;

/// Rejects state-changing requests that lack a valid CSRF token with a 403.
///
/// Safe methods pass straight through. The guard logs the rejection; the
/// client only sees the fixed message and error code.
pub async fn csrf_middleware(
    State(guard): State<CsrfGuard>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    guard.enforce(request.method(), request.headers())?;
    Ok(next.run(request).await)
}
