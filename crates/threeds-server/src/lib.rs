//! Merchant back-end for the 3-D Secure 2.x browser flow.
//!
//! Exposes the [`threeds`] orchestrator over HTTP: `/checkout`,
//! `/authenticate`, the two ACS notification callbacks and `/test-cards`,
//! plus `/health` and `/metrics`.

pub mod config;
pub mod cors;
pub mod error;
pub mod headers;
pub mod merchant;
pub mod metrics;
pub mod render;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;
