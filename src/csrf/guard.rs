use std::collections::HashMap;

use axum::http::{header::InvalidHeaderValue, HeaderMap, HeaderName, HeaderValue, Method, Request};
use thiserror::Error;
use tracing::warn;

use super::token::{TokenCodec, TokenError, DEFAULT_MAX_AGE_MS};

/// Request header checked first.
pub const TOKEN_HEADER: &str = "x-csrf-token";
/// Request header checked when `x-csrf-token` is absent or unreadable.
pub const FALLBACK_TOKEN_HEADER: &str = "csrf-token";
/// Response header a fresh token is issued under.
pub const ISSUED_TOKEN_HEADER: &str = "X-CSRF-Token";

// Monitoring matches on these strings. Keep them exact.
pub const MISSING_TOKEN_MESSAGE: &str = "CSRF token missing in request";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid CSRF token detected";

const SAFE_METHODS: [Method; 3] = [Method::GET, Method::HEAD, Method::OPTIONS];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CsrfRejection {
    #[error("CSRF token missing in request")]
    Missing,

    #[error("Invalid CSRF token detected")]
    Invalid(#[source] TokenError),
}

/// Method policy and header lookup around a [`TokenCodec`].
///
/// The guard looks at the method and headers only. There is deliberately no
/// escape hatch: no header, query parameter or flag skips the check.
#[derive(Debug, Clone)]
pub struct CsrfGuard {
    codec: TokenCodec,
    max_age_ms: i64,
}

impl CsrfGuard {
    pub fn new(codec: TokenCodec) -> Self {
        Self {
            codec,
            max_age_ms: DEFAULT_MAX_AGE_MS,
        }
    }

    pub fn with_max_age_ms(mut self, max_age_ms: i64) -> Self {
        self.max_age_ms = max_age_ms;
        self
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn max_age_ms(&self) -> i64 {
        self.max_age_ms
    }

    /// Everything except GET, HEAD and OPTIONS needs a token.
    pub fn should_enforce(&self, method: &Method) -> bool {
        !SAFE_METHODS.contains(method)
    }

    /// First readable value of `x-csrf-token`, then `csrf-token`. A value
    /// that is not visible ASCII counts as absent, so the fallback is tried.
    pub fn extract_token<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        let readable = move |name: &str| headers.get(name).and_then(|value| value.to_str().ok());
        readable(TOKEN_HEADER).or_else(|| readable(FALLBACK_TOKEN_HEADER))
    }

    /// Policy decision without logging.
    pub fn check(&self, method: &Method, headers: &HeaderMap) -> Result<(), CsrfRejection> {
        if !self.should_enforce(method) {
            return Ok(());
        }

        let token = self.extract_token(headers).ok_or(CsrfRejection::Missing)?;
        self.codec
            .inspect(token, self.max_age_ms)
            .map(|_| ())
            .map_err(CsrfRejection::Invalid)
    }

    /// Like [`check`](Self::check), but emits one warning per rejection.
    pub fn enforce(&self, method: &Method, headers: &HeaderMap) -> Result<(), CsrfRejection> {
        let outcome = self.check(method, headers);
        match &outcome {
            Ok(()) => {}
            Err(CsrfRejection::Missing) => warn!(%method, "{}", MISSING_TOKEN_MESSAGE),
            Err(CsrfRejection::Invalid(reason)) => {
                warn!(%method, %reason, "{}", INVALID_TOKEN_MESSAGE)
            }
        }
        outcome
    }

    pub fn validate(&self, method: &Method, headers: &HeaderMap) -> bool {
        self.enforce(method, headers).is_ok()
    }

    pub fn validate_request<B>(&self, request: &Request<B>) -> bool {
        self.validate(request.method(), request.headers())
    }

    /// A fresh token keyed by `X-CSRF-Token`, ready to merge into a response.
    pub fn issue_headers(&self) -> HashMap<&'static str, String> {
        HashMap::from([(ISSUED_TOKEN_HEADER, self.codec.generate())])
    }

    pub fn issue_header_map(&self) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(TOKEN_HEADER),
            HeaderValue::try_from(self.codec.generate())?,
        );
        Ok(headers)
    }
}
