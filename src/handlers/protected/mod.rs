// handlers/protected/mod.rs - Protected handlers
//
// Security Level: CSRF token required for every method except GET, HEAD and OPTIONS
// Route Prefix: /api/*
// Middleware: csrf_middleware (route layer)

pub mod echo;

pub use echo::{echo_delete, echo_get, echo_post};
