//! Chatbot studio API server.
//!
//! Serves the bot registry, chat, analytics and dataset endpoints, with
//! live dashboard updates over WebSocket.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use cb_api::config::ApiConfig;
use cb_api::inference::{DelegatingResolver, IntentResolver, NluClient, RuleBasedMatcher};
use cb_api::state::AppState;
use cb_api::{db, routes, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "cb-api starting");

    let config = ApiConfig::from_env();

    // Connect to PostgreSQL if DATABASE_URL is set, otherwise use in-memory state.
    let state = if let Some(database_url) = &config.database_url {
        tracing::info!("connecting to PostgreSQL");
        let pool = db::connect(database_url).await?;
        if config.seed_sample_bots {
            let created = seed::seed_database(&pool).await?;
            tracing::info!(created, "sample bots seeded");
        }
        AppState::with_pool(pool)
    } else {
        tracing::warn!("DATABASE_URL not set, using in-memory state with sample data");
        AppState::with_sample_data()
    };

    let resolver: Arc<dyn IntentResolver> = if config.nlu.enabled {
        let client = NluClient::new(config.nlu.clone());
        tracing::info!(url = %client.base_url(), "NLU delegation enabled");
        Arc::new(DelegatingResolver::new(
            RuleBasedMatcher::new(),
            Box::new(client),
        ))
    } else {
        tracing::info!("NLU delegation disabled, using local matcher only");
        Arc::new(RuleBasedMatcher::new())
    };

    let state = state
        .with_resolver(resolver)
        .with_upload_dir(config.upload_dir.clone());

    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, upload_dir = %config.upload_dir.display(), "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
