//! CLI command implementations.

mod ask;
mod client;
mod config;
mod serve;

pub use ask::run_ask;
pub use client::run_client;
pub use config::run_config;
pub use serve::{router, run_serve, AppState};
