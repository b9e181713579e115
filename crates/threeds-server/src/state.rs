use std::sync::Arc;

use threeds::{FlowOrchestrator, RavelinClient, TransactionStore};

use crate::config::ServerConfig;
use crate::metrics::MeteredService;

pub type Orchestrator = FlowOrchestrator<MeteredService<RavelinClient>>;

/// Shared application state
pub struct AppState {
    pub flow: Orchestrator,
    /// Bearer token required on /metrics, if set
    pub metrics_token: Option<String>,
}

impl AppState {
    pub fn new(config: &ServerConfig, store: Arc<dyn TransactionStore>) -> Self {
        let client = RavelinClient::new(config.api_url.clone(), config.api_key.clone())
            .with_timeout(config.request_timeout);

        Self {
            flow: FlowOrchestrator::new(
                MeteredService::new(client),
                store,
                config.merchant_url.clone(),
            ),
            metrics_token: config.metrics_token.clone(),
        }
    }
}
