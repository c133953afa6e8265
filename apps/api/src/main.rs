mod auth;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod profile;
mod recommendation;
mod routes;
mod saved;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::token::TokenKeys;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::profile::store::PgUserStore;
use crate::recommendation::engine::Recommender;
use crate::recommendation::links::{LinkPolicy, LinkResolver};
use crate::recommendation::renderer::HttpPageRenderer;
use crate::routes::build_router;
use crate::saved::store::PgSavedScholarshipStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Scholar API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and run migrations
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client; the engine enforces its own deadline, this one bounds the socket
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.openai_model.clone(),
        config.recommendation.generation_timeout,
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    // Apply-link resolution is optional; without it generated links pass through untouched
    let links = if config.links.enabled {
        info!(
            "Link resolution enabled (concurrency {}, page timeout {:?})",
            config.links.concurrency, config.links.page_timeout
        );
        Some(LinkResolver::new(
            Arc::new(HttpPageRenderer::new(
                config.links.page_timeout,
                config.links.max_page_bytes,
            )),
            LinkPolicy::from(&config.links),
            config.links.concurrency,
        ))
    } else {
        info!("Link resolution disabled");
        None
    };

    let recommender = Recommender::new(Arc::new(llm), links, config.recommendation.clone());

    // Build app state
    let state = AppState {
        users: Arc::new(PgUserStore::new(db.clone())),
        saved: Arc::new(PgSavedScholarshipStore::new(db)),
        recommender: Arc::new(recommender),
        tokens: TokenKeys::new(&config.jwt_secret, config.jwt_ttl_secs),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
