//! Match pipeline: load → normalize → embed (×2, concurrent) → score → keywords → report.
//!
//! Each call owns its document, texts and vectors; `ResumeMatcher` itself is
//! immutable and cheap to clone, so one instance serves concurrent requests.

use std::sync::Arc;

use tracing::{debug, info};

use crate::embedding_client::{self, EmbeddingProvider};
use crate::matching::error::{InputSide, MatchError};
use crate::matching::keywords::analyze;
use crate::matching::loader::{self, Document};
use crate::matching::normalizer::normalize;
use crate::matching::report::{assemble, BandThresholds, MatchResult};
use crate::matching::similarity::cosine_similarity;

#[derive(Clone)]
pub struct ResumeMatcher {
    embedder: Arc<dyn EmbeddingProvider>,
    thresholds: BandThresholds,
}

impl ResumeMatcher {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, thresholds: BandThresholds) -> Self {
        Self {
            embedder,
            thresholds,
        }
    }

    pub fn thresholds(&self) -> &BandThresholds {
        &self.thresholds
    }

    /// Compares a resume document against job-description text.
    ///
    /// Empty inputs are rejected before any embedding call. Either embedding
    /// failing fails the whole request; nothing is retried.
    pub async fn analyze(
        &self,
        resume: Document,
        jd_text: &str,
    ) -> Result<MatchResult, MatchError> {
        let format = resume.format();

        // Extraction is blocking file/CPU work.
        let resume_text = tokio::task::spawn_blocking(move || loader::load(resume))
            .await??
            .into_string();
        debug!(
            "Loaded {} resume ({} chars)",
            format,
            resume_text.chars().count()
        );

        let resume_clean = normalize(&resume_text);
        let jd_clean = normalize(jd_text);
        if resume_clean.is_empty() {
            return Err(MatchError::EmptyInput {
                input: InputSide::Resume,
            });
        }
        if jd_clean.is_empty() {
            return Err(MatchError::EmptyInput {
                input: InputSide::JobDescription,
            });
        }

        let embedder = self.embedder.as_ref();
        let (resume_vec, jd_vec) = tokio::try_join!(
            embedding_client::embed(embedder, &resume_clean),
            embedding_client::embed(embedder, &jd_clean),
        )?;

        let score = cosine_similarity(&resume_vec, &jd_vec)?;
        let keywords = analyze(&resume_clean, &jd_clean);
        let result = assemble(
            score,
            keywords,
            resume_text,
            jd_text.to_string(),
            &self.thresholds,
        );

        info!(
            provider = self.embedder.name(),
            score = result.similarity_score(),
            band = %result.match_band(),
            matching = result.matching_keywords().len(),
            "Resume match complete"
        );

        Ok(result)
    }
}
