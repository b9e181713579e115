//! EMV 3-D Secure 2.x browser-flow orchestration.
//!
//! A merchant back-end drives a 3DS authentication through four independent
//! requests that arrive over time from the merchant's front-end and the
//! cardholder's browser. This crate holds the state that ties them together
//! and the rules for each step.
//!
//! # Components
//!
//! - [`TransactionStore`] / [`InMemoryTransactionStore`]: per-transaction
//!   protocol state keyed by `threeDSServerTransID`
//! - [`FlowOrchestrator`]: version lookup, device fingerprinting completion,
//!   authentication and challenge result resolution
//! - [`AuthenticationService`] / [`RavelinClient`]: the remote 3DS server
//!
//! # Quick example
//!
//! ```no_run
//! use std::sync::Arc;
//! use threeds::{FlowOrchestrator, InMemoryTransactionStore, RavelinClient};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let client = RavelinClient::new("https://pci.ravelin.com", "API_KEY");
//! let store = Arc::new(InMemoryTransactionStore::new());
//! let flow = FlowOrchestrator::new(client, store, "https://shop.example");
//!
//! let lookup = flow.version_lookup("4000000000001000").await.unwrap();
//! println!("3DS Method URL: {:?}", lookup.fingerprint_url);
//! # }
//! ```

pub mod color_depth;
pub mod constants;
pub mod error;
pub mod flow;
pub mod notification;
pub mod security;
pub mod status;
pub mod wire;

pub mod orchestrator;
pub mod transaction_store;

pub mod ravelin_client;
pub mod service;

pub use color_depth::normalize_color_depth;
pub use constants::MerchantProfile;
pub use error::ThreeDsError;
pub use flow::*;
pub use orchestrator::FlowOrchestrator;
pub use ravelin_client::RavelinClient;
pub use service::AuthenticationService;
pub use status::{FingerprintStatus, TransStatus};
pub use transaction_store::{InMemoryTransactionStore, TransactionRecord, TransactionStore};
