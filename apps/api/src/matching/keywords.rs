//! Keyword Set Analyzer: token overlap between resume and job description.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::matching::normalizer::NormalizedText;

/// De-duplicated tokens in lexicographic order. Serializes as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenSet(BTreeSet<String>);

impl TokenSet {
    pub fn from_text(text: &NormalizedText) -> Self {
        Self(text.tokens().map(str::to_owned).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn intersection(&self, other: &TokenSet) -> TokenSet {
        Self(self.0.intersection(&other.0).cloned().collect())
    }

    pub fn difference(&self, other: &TokenSet) -> TokenSet {
        Self(self.0.difference(&other.0).cloned().collect())
    }

    pub fn union(&self, other: &TokenSet) -> TokenSet {
        Self(self.0.union(&other.0).cloned().collect())
    }

    pub fn is_disjoint(&self, other: &TokenSet) -> bool {
        self.0.is_disjoint(&other.0)
    }
}

impl<S: Into<String>> FromIterator<S> for TokenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Three-way split of the two token sets.
///
/// `matching ∪ resume_only` is the resume vocabulary and
/// `matching ∪ jd_only` is the job-description vocabulary; the parts never overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordAnalysis {
    pub matching: TokenSet,
    pub resume_only: TokenSet,
    pub jd_only: TokenSet,
}

pub fn analyze(resume: &NormalizedText, jd: &NormalizedText) -> KeywordAnalysis {
    let resume_tokens = TokenSet::from_text(resume);
    let jd_tokens = TokenSet::from_text(jd);

    KeywordAnalysis {
        matching: resume_tokens.intersection(&jd_tokens),
        resume_only: resume_tokens.difference(&jd_tokens),
        jd_only: jd_tokens.difference(&resume_tokens),
    }
}
