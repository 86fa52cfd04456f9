use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use super::clock::{Clock, SystemClock};
use super::secret::CsrfSecret;

type HmacSha256 = Hmac<Sha256>;

/// Default token lifetime: one hour.
pub const DEFAULT_MAX_AGE_MS: i64 = 60 * 60 * 1000;

const NONCE_BYTES: usize = 32;
const SEPARATOR: char = '.';

/// Why a token was refused. Callers at the HTTP boundary only see a boolean.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token must have exactly three non-empty dot-separated parts")]
    Malformed,

    #[error("token signature does not match")]
    SignatureMismatch,

    #[error("token timestamp is not a decimal millisecond value")]
    InvalidTimestamp,

    #[error("token expired: age {age_ms}ms exceeds {max_age_ms}ms")]
    Expired { age_ms: i64, max_age_ms: i64 },

    #[error("token issued {ahead_ms}ms in the future")]
    FromFuture { ahead_ms: i64 },
}

/// The three parts of a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParts {
    pub nonce: String,
    pub timestamp_ms: i64,
    pub signature: String,
}

impl TokenParts {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_ms).single()
    }
}

/// Issues and verifies `<nonce>.<timestamp>.<signature>` tokens.
#[derive(Clone)]
pub struct TokenCodec {
    secret: CsrfSecret,
    clock: Arc<dyn Clock>,
    max_future_skew_ms: Option<i64>,
}

impl TokenCodec {
    pub fn new(secret: CsrfSecret) -> Self {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    pub fn with_clock(secret: CsrfSecret, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret,
            clock,
            max_future_skew_ms: None,
        }
    }

    /// Reject tokens stamped more than `skew` ms ahead of the local clock.
    /// `None` accepts any future timestamp.
    pub fn with_max_future_skew_ms(mut self, skew: Option<i64>) -> Self {
        self.max_future_skew_ms = skew;
        self
    }

    /// Generate a fresh token stamped with the current time.
    pub fn generate(&self) -> String {
        let mut nonce = [0u8; NONCE_BYTES];
        OsRng.fill_bytes(&mut nonce);
        self.sign_parts(&hex::encode(nonce), self.clock.now_millis())
    }

    /// Verify against the default one-hour lifetime.
    pub fn verify(&self, token: &str) -> bool {
        self.verify_with_max_age(token, DEFAULT_MAX_AGE_MS)
    }

    pub fn verify_with_max_age(&self, token: &str, max_age_ms: i64) -> bool {
        self.inspect(token, max_age_ms).is_ok()
    }

    /// Full verification, reporting the reason on failure.
    ///
    /// The signature is checked before the timestamp is parsed, so a forged
    /// token never reaches the expiry logic.
    pub fn inspect(&self, token: &str, max_age_ms: i64) -> Result<TokenParts, TokenError> {
        let mut parts = token.split(SEPARATOR);
        let (nonce, timestamp, signature) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(nonce), Some(timestamp), Some(signature), None)
                    if !nonce.is_empty() && !timestamp.is_empty() && !signature.is_empty() =>
                {
                    (nonce, timestamp, signature)
                }
                _ => return Err(TokenError::Malformed),
            };

        let expected = self.sign(&signing_message(nonce, timestamp));
        if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            return Err(TokenError::SignatureMismatch);
        }

        let timestamp_ms = parse_timestamp(timestamp)?;
        let now = self.clock.now_millis();

        let age_ms = now.saturating_sub(timestamp_ms);
        if age_ms > max_age_ms {
            return Err(TokenError::Expired { age_ms, max_age_ms });
        }

        if let Some(skew) = self.max_future_skew_ms {
            let ahead_ms = timestamp_ms.saturating_sub(now);
            if ahead_ms > skew {
                return Err(TokenError::FromFuture { ahead_ms });
            }
        }

        Ok(TokenParts {
            nonce: nonce.to_string(),
            timestamp_ms,
            signature: signature.to_string(),
        })
    }

    pub(crate) fn sign_parts(&self, nonce: &str, timestamp_ms: i64) -> String {
        let message = signing_message(nonce, &timestamp_ms.to_string());
        let signature = self.sign(&message);
        format!("{message}{SEPARATOR}{signature}")
    }

    fn sign(&self, message: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(message.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &self.secret)
            .field("max_future_skew_ms", &self.max_future_skew_ms)
            .finish_non_exhaustive()
    }
}

fn signing_message(nonce: &str, timestamp: &str) -> String {
    format!("{nonce}{SEPARATOR}{timestamp}")
}

// Digits only: `str::parse` would also take a leading '+' or '-'.
fn parse_timestamp(raw: &str) -> Result<i64, TokenError> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TokenError::InvalidTimestamp);
    }
    raw.parse::<i64>().map_err(|_| TokenError::InvalidTimestamp)
}
