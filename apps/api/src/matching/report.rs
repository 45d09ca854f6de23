//! Match Report Assembler: score + keyword sets → immutable `MatchResult`.

use serde::Serialize;

use crate::matching::error::MatchError;
use crate::matching::keywords::{KeywordAnalysis, TokenSet};

/// Similarity band. Variants are declared in rank order, so `Ord` follows
/// `Low < Moderate < Good < Excellent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    Low,
    Moderate,
    Good,
    Excellent,
}

impl MatchBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchBand::Low => "low",
            MatchBand::Moderate => "moderate",
            MatchBand::Good => "good",
            MatchBand::Excellent => "excellent",
        }
    }

    /// One-line interpretation suitable for display next to the score.
    pub fn summary(&self) -> &'static str {
        match self {
            MatchBand::Excellent => {
                "Excellent match. This resume aligns very well with the job requirements."
            }
            MatchBand::Good => "Good match. The resume shows relevance to the job description.",
            MatchBand::Moderate => "Moderate match. Some alignment but could be improved.",
            MatchBand::Low => {
                "Low match. Significant gaps between resume and job requirements."
            }
        }
    }
}

impl std::fmt::Display for MatchBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds (inclusive) of each band above `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandThresholds {
    pub excellent: f64,
    pub good: f64,
    pub moderate: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            excellent: 0.8,
            good: 0.6,
            moderate: 0.4,
        }
    }
}

impl BandThresholds {
    /// Builds thresholds, rejecting non-finite values or bounds that are not
    /// strictly descending (which would make bands overlap or vanish).
    pub fn new(excellent: f64, good: f64, moderate: f64) -> Result<Self, MatchError> {
        let thresholds = Self {
            excellent,
            good,
            moderate,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if ![self.excellent, self.good, self.moderate]
            .iter()
            .all(|t| t.is_finite())
        {
            return Err(MatchError::InvalidThresholds(
                "thresholds must be finite numbers".to_string(),
            ));
        }
        if !(self.excellent > self.good && self.good > self.moderate) {
            return Err(MatchError::InvalidThresholds(format!(
                "expected excellent > good > moderate, got {} / {} / {}",
                self.excellent, self.good, self.moderate
            )));
        }
        Ok(())
    }

    pub fn band_for(&self, score: f64) -> MatchBand {
        match score {
            s if s >= self.excellent => MatchBand::Excellent,
            s if s >= self.good => MatchBand::Good,
            s if s >= self.moderate => MatchBand::Moderate,
            _ => MatchBand::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeywordCounts {
    pub matching: usize,
    pub resume_only: usize,
    pub jd_only: usize,
}

/// Outcome of one resume vs job description comparison.
///
/// Fields are private; the value cannot change after `assemble` returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    similarity_score: f64,
    match_band: MatchBand,
    matching_keywords: TokenSet,
    resume_only_keywords: TokenSet,
    jd_only_keywords: TokenSet,
    resume_text: String,
    jd_text: String,
}

impl MatchResult {
    pub fn similarity_score(&self) -> f64 {
        self.similarity_score
    }

    pub fn match_band(&self) -> MatchBand {
        self.match_band
    }

    pub fn matching_keywords(&self) -> &TokenSet {
        &self.matching_keywords
    }

    pub fn resume_only_keywords(&self) -> &TokenSet {
        &self.resume_only_keywords
    }

    pub fn jd_only_keywords(&self) -> &TokenSet {
        &self.jd_only_keywords
    }

    /// Resume text as extracted, before normalization.
    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    /// Job description exactly as supplied.
    pub fn jd_text(&self) -> &str {
        &self.jd_text
    }

    pub fn keyword_counts(&self) -> KeywordCounts {
        KeywordCounts {
            matching: self.matching_keywords.len(),
            resume_only: self.resume_only_keywords.len(),
            jd_only: self.jd_only_keywords.len(),
        }
    }

    /// Fraction of job-description tokens that also appear in the resume.
    pub fn jd_coverage(&self) -> f64 {
        let jd_total = self.matching_keywords.len() + self.jd_only_keywords.len();
        if jd_total == 0 {
            return 0.0;
        }
        self.matching_keywords.len() as f64 / jd_total as f64
    }

    /// First `max_chars` characters of the resume, with `...` appended when cut.
    pub fn resume_preview(&self, max_chars: usize) -> String {
        let mut chars = self.resume_text.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

pub fn assemble(
    score: f64,
    keywords: KeywordAnalysis,
    resume_text: String,
    jd_text: String,
    thresholds: &BandThresholds,
) -> MatchResult {
    let KeywordAnalysis {
        matching,
        resume_only,
        jd_only,
    } = keywords;

    MatchResult {
        similarity_score: score,
        match_band: thresholds.band_for(score),
        matching_keywords: matching,
        resume_only_keywords: resume_only,
        jd_only_keywords: jd_only,
        resume_text,
        jd_text,
    }
}
