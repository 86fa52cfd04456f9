pub mod app;
pub mod cli;
pub mod config;
pub mod csrf;
pub mod error;
pub mod handlers;
pub mod middleware;

#[cfg(test)]
pub mod testing;

pub use app::{app, AppState};
