use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_matcher::config::Config;
use resume_matcher::embedding_client::build_provider;
use resume_matcher::matching::ResumeMatcher;
use resume_matcher::routes::build_router;
use resume_matcher::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Matcher v{}", env!("CARGO_PKG_VERSION"));

    // Initialize embedding provider
    let embedder = build_provider(&config.provider)?;
    info!("Embedding provider initialized: {:?}", config.provider);

    info!(
        "Match bands: excellent >= {}, good >= {}, moderate >= {}",
        config.thresholds.excellent, config.thresholds.good, config.thresholds.moderate
    );
    let matcher = ResumeMatcher::new(embedder, config.thresholds);

    let state = AppState {
        config: config.clone(),
        matcher,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict allowed origins once the upload form has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
