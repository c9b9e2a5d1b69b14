//! AutoPick bot API: library crate for the HTTP server.
//!
//! Re-exports all modules so the binary (`main.rs`) and `ap-e2e-tests`
//! can reach `AppState`, `BotConfig` and `build_router`.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
