use std::fmt;

use chrono::Utc;
use rand::{rngs::OsRng, RngCore};

/// HMAC key used to sign and verify tokens.
///
/// Loaded once at startup and only read afterwards. `Debug` output never
/// contains the key material.
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfSecret {
    key: Vec<u8>,
    ephemeral: bool,
}

impl CsrfSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            key: secret.into().into_bytes(),
            ephemeral: false,
        }
    }

    /// Per-process fallback for local development.
    ///
    /// Tokens signed with it stop verifying as soon as the process restarts.
    /// Never use this outside development.
    pub fn ephemeral() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        let key = format!(
            "dev-{}-{}",
            Utc::now().timestamp_millis(),
            hex::encode(bytes)
        );

        Self {
            key: key.into_bytes(),
            ephemeral: true,
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.key
    }
}

impl fmt::Debug for CsrfSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsrfSecret")
            .field("key", &"<redacted>")
            .field("ephemeral", &self.ephemeral)
            .finish()
    }
}
