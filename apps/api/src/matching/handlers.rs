//! Axum route handlers for the Match API.

use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::{Document, DocumentFormat, KeywordCounts, MatchResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub request_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub summary: &'static str,
    pub keyword_counts: KeywordCounts,
    pub jd_coverage: f64,
    pub result: MatchResult,
}

impl MatchResponse {
    fn new(result: MatchResult) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            summary: result.match_band().summary(),
            keyword_counts: result.keyword_counts(),
            jd_coverage: result.jd_coverage(),
            result,
        }
    }
}

/// Fields collected from the multipart body.
#[derive(Default)]
struct MatchForm {
    resume: Option<(String, Bytes)>,
    jd_text: Option<String>,
    jd_file: Option<(String, Bytes)>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
///
/// Multipart form:
/// - `resume`: file part; format is inferred from its file name (.txt/.pdf/.doc/.docx)
/// - `jd_text`: job description as a text part, or
/// - `jd_file`: job description as a UTF-8 `.txt` upload
pub async fn handle_match(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<MatchResponse>, AppError> {
    let form = read_form(multipart).await?;

    let (file_name, resume_bytes) = form
        .resume
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    let jd_text = resolve_jd_text(form.jd_text, form.jd_file)?;

    let document = Document::from_upload(&file_name, resume_bytes)?;
    info!(
        "Matching resume '{}' ({}) against {} chars of JD",
        file_name,
        document.format(),
        jd_text.chars().count()
    );

    let result = state.matcher.analyze(document, &jd_text).await?;
    Ok(Json(MatchResponse::new(result)))
}

async fn read_form(mut multipart: Multipart) -> Result<MatchForm, AppError> {
    let mut form = MatchForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read field '{name}': {e}")))?;

        match name.as_str() {
            "resume" => {
                let file_name = file_name.ok_or_else(|| {
                    AppError::Validation("resume part must carry a file name".to_string())
                })?;
                form.resume = Some((file_name, data));
            }
            "jd_text" => {
                let text = String::from_utf8(data.to_vec()).map_err(|_| {
                    AppError::Validation("jd_text must be valid UTF-8".to_string())
                })?;
                form.jd_text = Some(text);
            }
            "jd_file" => {
                form.jd_file = Some((file_name.unwrap_or_default(), data));
            }
            other => {
                tracing::debug!("Ignoring unknown multipart field '{other}'");
            }
        }
    }

    Ok(form)
}

/// Picks the job description from the text part, falling back to the `.txt` upload.
/// An empty result is passed through; the pipeline reports it as empty input.
fn resolve_jd_text(
    jd_text: Option<String>,
    jd_file: Option<(String, Bytes)>,
) -> Result<String, AppError> {
    if let Some(text) = jd_text.filter(|t| !t.trim().is_empty()) {
        return Ok(text);
    }

    match jd_file {
        Some((file_name, data)) => {
            if DocumentFormat::from_path(&file_name)? != DocumentFormat::PlainText {
                return Err(AppError::Validation(format!(
                    "jd_file must be a .txt file, got '{file_name}'"
                )));
            }
            String::from_utf8(data.to_vec())
                .map_err(|_| AppError::Validation("jd_file must be UTF-8 text".to_string()))
        }
        None => Ok(String::new()),
    }
}
