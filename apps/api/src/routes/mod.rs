pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/match",
            post(handlers::handle_match).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::embedding_client::{HashingEmbedder, ProviderKind};
    use crate::matching::{BandThresholds, ResumeMatcher};

    const BOUNDARY: &str = "----matcher-test-boundary";

    fn test_state() -> AppState {
        let config = Config {
            provider: ProviderKind::Hashing { dimension: 256 },
            thresholds: BandThresholds::default(),
            max_upload_bytes: 1024 * 1024,
            port: 0,
            rust_log: "debug".to_string(),
        };
        AppState {
            matcher: ResumeMatcher::new(Arc::new(HashingEmbedder::new(256)), config.thresholds),
            config,
        }
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, file_name, data) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn post_match(parts: &[Part<'_>]) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/match")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();

        let response = build_router(test_state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = build_router(test_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_match_identical_text_is_excellent() {
        let text = "Python Engineer with 5 years experience";
        let (status, json) = post_match(&[
            Part::File("resume", "resume.txt", text.as_bytes()),
            Part::Text("jd_text", text),
        ])
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"]["match_band"], "excellent");
        assert_eq!(json["result"]["resume_only_keywords"], serde_json::json!([]));
        assert_eq!(json["keyword_counts"]["matching"], 6);
        assert_eq!(json["jd_coverage"], 1.0);
        assert!(json["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_match_jd_from_txt_upload() {
        let (status, json) = post_match(&[
            Part::File("resume", "cv.TXT", b"Rust engineer"),
            Part::File("jd_file", "jd.txt", b"Looking for a Rust engineer"),
        ])
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["result"]["jd_only_keywords"],
            serde_json::json!(["a", "for", "looking"])
        );
    }

    #[tokio::test]
    async fn test_missing_resume_is_400() {
        let (status, json) = post_match(&[Part::Text("jd_text", "Rust engineer")]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_empty_jd_is_422() {
        let (status, json) = post_match(&[
            Part::File("resume", "resume.txt", b"Rust engineer"),
            Part::Text("jd_text", ""),
        ])
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["code"], "EMPTY_INPUT");
    }

    #[tokio::test]
    async fn test_rtf_resume_is_415() {
        let (status, json) = post_match(&[
            Part::File("resume", "resume.rtf", b"{\\rtf1 Rust}"),
            Part::Text("jd_text", "Rust engineer"),
        ])
        .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(json["error"]["code"], "UNSUPPORTED_FORMAT");
    }
}
