// Resume vs job-description matching.
// Implements: document loading, normalization, cosine scoring, keyword sets, banded report.
// Everything here except the pipeline's embedding calls is pure and synchronous.

pub mod error;
pub mod handlers;
pub mod keywords;
pub mod loader;
pub mod normalizer;
pub mod pipeline;
pub mod report;
pub mod similarity;

// Re-export the public API consumed by the HTTP layer and library callers.
pub use error::{InputSide, MatchError};
pub use keywords::{KeywordAnalysis, TokenSet};
pub use loader::{Document, DocumentFormat, DocumentSource, ExtractedText};
pub use normalizer::{normalize, NormalizedText};
pub use pipeline::ResumeMatcher;
pub use report::{BandThresholds, KeywordCounts, MatchBand, MatchResult};
