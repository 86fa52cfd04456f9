// handlers/public/mod.rs - Public handlers
//
// Security Level: None
// Route Prefix: none (/, /health, /csrf/token)
// Middleware: request tracing only
//
// Clients fetch a token from /csrf/token before issuing state-changing
// requests against the protected tier.

pub mod csrf;
pub mod health;

pub use csrf::issue_token;
pub use health::{health, root};
