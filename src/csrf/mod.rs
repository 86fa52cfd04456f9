//! Stateless anti-forgery tokens.
//!
//! A token is `<nonce>.<timestamp>.<signature>`: 32 random bytes as lowercase
//! hex, milliseconds since the Unix epoch, and the lowercase hex HMAC-SHA256 of
//! `<nonce>.<timestamp>`. Nothing is stored server side; any correctly signed,
//! unexpired token is accepted and may be reused until it expires.

mod clock;
mod guard;
mod secret;
mod token;

pub use clock::{Clock, FixedClock, SystemClock};
pub use guard::{
    CsrfGuard, CsrfRejection, FALLBACK_TOKEN_HEADER, INVALID_TOKEN_MESSAGE, ISSUED_TOKEN_HEADER,
    MISSING_TOKEN_MESSAGE, TOKEN_HEADER,
};
pub use secret::CsrfSecret;
pub use token::{TokenCodec, TokenError, TokenParts, DEFAULT_MAX_AGE_MS};
