//! Embedding Client: the single point of entry for embedding calls.
//!
//! The pipeline only sees `EmbeddingProvider`. Concrete backends:
//! - `OpenAiEmbeddings`: OpenAI-compatible `/v1/embeddings` over HTTP.
//! - `HashingEmbedder`: deterministic, offline bag-of-words vectors.
//!
//! No backend retries. A failed call is surfaced as-is and fails the request;
//! retry policy belongs to whoever calls the pipeline.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::matching::error::MatchError;
use crate::matching::normalizer::NormalizedText;

pub mod hashing;

pub use hashing::HashingEmbedder;

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1/embeddings";
pub const DEFAULT_MODEL: &str = "text-embedding-ada-002";

/// A dense embedding. Dimension is whatever the provider returns.
pub type EmbeddingVector = Vec<f32>;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication rejected (status {status}): {message}")]
    Auth { status: u16, message: String },

    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Provider returned no embedding")]
    EmptyEmbedding,
}

/// Text → fixed-dimension vector capability.
///
/// Carried as `Arc<dyn EmbeddingProvider>` so tests can substitute a stub.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError>;

    /// Short label for logs ("openai", "hashing", ...).
    fn name(&self) -> &str;
}

/// Embeds one normalized text, turning provider failures into `MatchError`.
pub async fn embed(
    provider: &dyn EmbeddingProvider,
    text: &NormalizedText,
) -> Result<EmbeddingVector, MatchError> {
    let vector = provider.embed(text.as_str()).await?;
    if vector.is_empty() {
        return Err(EmbeddingError::EmptyEmbedding.into());
    }
    debug!(
        provider = provider.name(),
        dimension = vector.len(),
        "Embedding received"
    );
    Ok(vector)
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for OpenAI-compatible embedding endpoints.
#[derive(Clone)]
pub struct OpenAiEmbeddings {
    client: Client,
    api_key: String,
    model: String,
    url: String,
}

impl OpenAiEmbeddings {
    pub fn new(
        api_key: String,
        model: String,
        url: String,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            model,
            url,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let request_body = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, body));
        }

        let parsed: EmbeddingResponse = response.json().await?;
        if let Some(usage) = &parsed.usage {
            debug!(
                model = %self.model,
                prompt_tokens = usage.prompt_tokens,
                "Embedding call succeeded"
            );
        }

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(EmbeddingError::EmptyEmbedding)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Maps a non-2xx response onto an error kind, preferring the API's own message.
fn classify_failure(status: StatusCode, body: String) -> EmbeddingError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => EmbeddingError::Auth {
            status: status.as_u16(),
            message,
        },
        StatusCode::TOO_MANY_REQUESTS => EmbeddingError::RateLimited { message },
        _ => EmbeddingError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Instantiates the configured backend.
pub fn build_provider(kind: &ProviderKind) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
    let provider: Arc<dyn EmbeddingProvider> = match kind {
        ProviderKind::OpenAi {
            api_key,
            model,
            url,
            timeout,
        } => Arc::new(OpenAiEmbeddings::new(
            api_key.clone(),
            model.clone(),
            url.clone(),
            *timeout,
        )?),
        ProviderKind::Hashing { dimension } => Arc::new(HashingEmbedder::new(*dimension)),
    };
    Ok(provider)
}

/// Provider selection as read from configuration.
#[derive(Clone)]
pub enum ProviderKind {
    OpenAi {
        api_key: String,
        model: String,
        url: String,
        timeout: Duration,
    },
    Hashing {
        dimension: usize,
    },
}

impl std::fmt::Debug for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenAi { model, url, .. } => f
                .debug_struct("OpenAi")
                .field("model", model)
                .field("url", url)
                .finish_non_exhaustive(),
            ProviderKind::Hashing { dimension } => f
                .debug_struct("Hashing")
                .field("dimension", dimension)
                .finish(),
        }
    }
}
