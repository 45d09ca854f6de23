use crate::config::Config;
use crate::matching::ResumeMatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Holds the embedding provider (`Arc<dyn EmbeddingProvider>`) and band thresholds.
    pub matcher: ResumeMatcher,
}
