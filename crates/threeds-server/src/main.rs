use std::sync::Arc;
use std::time::Duration;

use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use threeds::transaction_store::spawn_eviction;
use threeds::{InMemoryTransactionStore, TransactionStore};
use threeds_server::{config::ServerConfig, metrics::register_metrics, routes, state::AppState};

const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    let port = config.port;
    let allowed_origins = config.allowed_origins.clone();
    let static_dir = config.static_dir.clone();

    tracing::info!("Starting threeds-server on port {}", port);
    tracing::info!("3DS server: {}", config.api_url);
    tracing::info!("Merchant URL: {}", config.merchant_url);
    tracing::debug!("{:?}", config);

    register_metrics();

    let store: Arc<dyn TransactionStore> = Arc::new(InMemoryTransactionStore::new());
    let _eviction = spawn_eviction(store.clone(), config.transaction_ttl, EVICTION_INTERVAL);

    let state_data = web::Data::new(AppState::new(&config, store));

    let governor_conf = match GovernorConfigBuilder::default()
        .requests_per_minute(config.rate_limit_rpm)
        .finish()
    {
        Some(conf) => conf,
        None => {
            tracing::error!("Invalid rate limiter configuration");
            std::process::exit(1);
        }
    };

    if let Some(ref dir) = static_dir {
        tracing::info!("Serving front-end from: {}", dir);
    }

    HttpServer::new(move || {
        let cors = threeds_server::cors::build_cors(&allowed_origins);

        let mut app = App::new()
            .app_data(state_data.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .wrap(Governor::new(&governor_conf))
            // Outermost, so preflight and rate-limit replies carry them too
            .wrap(threeds_server::headers::security_headers())
            .configure(routes::health::configure)
            .configure(routes::checkout::configure)
            .configure(routes::authenticate::configure)
            .configure(routes::notification::configure)
            .configure(routes::test_cards::configure);

        // Static front-end last (catch-all)
        if let Some(ref dir) = static_dir {
            app = app.service(actix_files::Files::new("/", dir).index_file("index.html"));
        }

        app
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
