pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/tones", get(handlers::handle_tones))
        // Session
        .route("/api/v1/session", get(handlers::handle_get_session))
        .route("/api/v1/session/input", put(handlers::handle_set_input))
        .route("/api/v1/session/context", put(handlers::handle_set_context))
        .route("/api/v1/session/generate", post(handlers::handle_generate))
        .route(
            "/api/v1/session/upload",
            post(handlers::handle_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Assets
        .route(
            "/api/v1/assets/:id",
            patch(handlers::handle_edit_asset).delete(handlers::handle_delete_asset),
        )
        .route("/api/v1/assets/:id/copy", get(handlers::handle_copy_asset))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::extraction::mock::MockExtractor;
    use crate::generation::client::GenerationClient;
    use crate::llm_client::mock::{MockBackend, MockResponse};
    use crate::session::handle::SessionHandle;

    const BOUNDARY: &str = "peel-boundary";

    fn test_config() -> Config {
        Config {
            gemini_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            generation_max_retries: 0,
            generation_retry_base_ms: 1,
            max_upload_bytes: 1024 * 1024,
        }
    }

    fn app(backend: Arc<MockBackend>, extractor: Arc<MockExtractor>) -> Router {
        build_router(AppState {
            session: SessionHandle::new(GenerationClient::new(backend), extractor),
            config: test_config(),
        })
    }

    fn default_app() -> (Router, Arc<MockBackend>) {
        let backend = Arc::new(MockBackend::new(MockResponse::json(json!([
            {
                "type": "LinkedIn Post",
                "content": "Hydration, reinvented.",
                "headline": "Bottles with a conscience",
                "hashtags": ["eco", "#hydration"]
            },
            {"type": "Facebook Ad", "content": "Tired of plastic?"}
        ]))));
        let router = app(backend.clone(), Arc::new(MockExtractor::returning("From the PDF")));
        (router, backend)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn upload_request(content_type: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"file\"; filename=\"pitch.pdf\"\r\n",
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/session/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(router: &Router, request: Request<Body>) -> Response {
        router.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn generate(router: &Router) -> Value {
        let response = send(
            router,
            json_request(
                "POST",
                "/api/v1/session/generate",
                json!({"source_text": "We sell eco-friendly water bottles."}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = default_app();
        let response = send(&router, empty_request("GET", "/health")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_initial_session_snapshot() {
        let (router, _) = default_app();
        let snap = body_json(send(&router, empty_request("GET", "/api/v1/session")).await).await;
        assert_eq!(snap["status"], "idle");
        assert_eq!(snap["panel"], "empty");
        assert_eq!(snap["tone"], "Professional & Engaging");
        assert_eq!(snap["actions_enabled"], true);
        assert!(snap["error"].is_null());
    }

    #[tokio::test]
    async fn test_tones_endpoint() {
        let (router, _) = default_app();
        let body = body_json(send(&router, empty_request("GET", "/api/v1/tones")).await).await;
        assert_eq!(body["presets"].as_array().unwrap().len(), 5);
        assert_eq!(body["default_audience"], "Small business owners");
    }

    #[tokio::test]
    async fn test_generate_flow() {
        let (router, backend) = default_app();

        let response = send(
            &router,
            json_request(
                "PUT",
                "/api/v1/session/context",
                json!({"tone": "Witty & Viral", "target_audience": "Gen Z shoppers"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let snap = generate(&router).await;

        assert_eq!(snap["status"], "idle");
        assert_eq!(snap["panel"], "assets");
        assert_eq!(snap["assets"].as_array().unwrap().len(), 2);
        assert_eq!(snap["assets"][0]["type"], "LinkedIn Post");
        assert_eq!(snap["assets"][0]["hashtags"], json!(["eco", "hydration"]));
        assert_eq!(snap["input_text"], "We sell eco-friendly water bottles.");

        let prompt = &backend.prompts()[0];
        assert!(prompt.contains("Witty & Viral"));
        assert!(prompt.contains("Gen Z shoppers"));
    }

    #[tokio::test]
    async fn test_generate_without_body_uses_stored_input() {
        let (router, backend) = default_app();
        send(
            &router,
            json_request("PUT", "/api/v1/session/input", json!({"text": "Stored pitch"})),
        )
        .await;

        let response = send(&router, empty_request("POST", "/api/v1/session/generate")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(backend.prompts()[0].contains("Stored pitch"));
    }

    /// A rejected generate body must not reach the backend or touch the
    /// session; the stored draft stays as it was.
    async fn assert_generate_body_rejected(request: Request<Body>) {
        let (router, backend) = default_app();
        send(
            &router,
            json_request("PUT", "/api/v1/session/input", json!({"text": "OLD stored draft"})),
        )
        .await;

        let response = send(&router, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(backend.call_count(), 0);

        let snap = body_json(send(&router, empty_request("GET", "/api/v1/session")).await).await;
        assert_eq!(snap["input_text"], "OLD stored draft");
        assert_eq!(snap["status"], "idle");
        assert!(snap["error"].is_null());
    }

    #[tokio::test]
    async fn test_generate_with_mistyped_source_text_is_rejected() {
        assert_generate_body_rejected(json_request(
            "POST",
            "/api/v1/session/generate",
            json!({"source_text": ["NEW text"]}),
        ))
        .await;
    }

    #[tokio::test]
    async fn test_generate_with_malformed_json_is_rejected() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/session/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"source_text": "NEW text""#))
            .unwrap();
        assert_generate_body_rejected(request).await;
    }

    #[tokio::test]
    async fn test_generate_with_plain_text_body_is_rejected() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/session/generate")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("NEW text"))
            .unwrap();
        assert_generate_body_rejected(request).await;
    }

    #[tokio::test]
    async fn test_generate_with_empty_json_object_uses_stored_input() {
        let (router, backend) = default_app();
        send(
            &router,
            json_request("PUT", "/api/v1/session/input", json!({"text": "Stored pitch"})),
        )
        .await;

        let response = send(
            &router,
            json_request("POST", "/api/v1/session/generate", json!({})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(backend.prompts()[0].contains("Stored pitch"));
    }

    #[tokio::test]
    async fn test_generate_blank_is_bad_request() {
        let (router, backend) = default_app();
        let response = send(
            &router,
            json_request("POST", "/api/v1/session/generate", json!({"source_text": "  "})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "INVALID_INPUT");
        assert_eq!(backend.call_count(), 0);

        let snap = body_json(send(&router, empty_request("GET", "/api/v1/session")).await).await;
        assert_eq!(snap["error"]["kind"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_generation_failure_is_bad_gateway_with_fixed_message() {
        let backend = Arc::new(MockBackend::new(MockResponse::Status(500)));
        let router = app(backend, Arc::new(MockExtractor::returning("")));

        let response = send(
            &router,
            json_request("POST", "/api/v1/session/generate", json!({"source_text": "pitch"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "GENERATION_FAILED");
        assert_eq!(
            body["error"]["message"],
            "Failed to generate campaign assets. Please check your source text and try again."
        );
    }

    #[tokio::test]
    async fn test_edit_copy_delete_asset() {
        let (router, _) = default_app();
        let snap = generate(&router).await;
        let id = snap["assets"][0]["id"].as_str().unwrap().to_string();

        let response = send(
            &router,
            json_request("PATCH", &format!("/api/v1/assets/{id}"), json!({"content": "NEW"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let edited = body_json(response).await;
        assert_eq!(edited["content"], "NEW");
        assert_eq!(edited["headline"], "Bottles with a conscience");

        let response = send(&router, empty_request("GET", &format!("/api/v1/assets/{id}/copy"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_text(response).await,
            "Bottles with a conscience\n\nNEW\n\n#eco #hydration"
        );

        let response = send(&router, empty_request("DELETE", &format!("/api/v1/assets/{id}"))).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let snap = body_json(send(&router, empty_request("GET", "/api/v1/session")).await).await;
        assert_eq!(snap["assets"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_asset_is_not_found_and_changes_nothing() {
        let (router, _) = default_app();
        let before = generate(&router).await;

        let response = send(
            &router,
            json_request("PATCH", "/api/v1/assets/asset-404", json!({"content": "X"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&router, empty_request("DELETE", "/api/v1/assets/asset-404")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let after = body_json(send(&router, empty_request("GET", "/api/v1/session")).await).await;
        assert_eq!(after["assets"], before["assets"]);
    }

    #[tokio::test]
    async fn test_upload_pdf_replaces_input() {
        let (router, backend) = default_app();
        let response = send(&router, upload_request("application/pdf", b"%PDF-1.7 ...")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let snap = body_json(response).await;
        assert_eq!(snap["input_text"], "From the PDF");
        assert_eq!(snap["panel"], "empty");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_wrong_type_is_rejected_before_extraction() {
        let extractor = Arc::new(MockExtractor::returning("never"));
        let router = app(
            Arc::new(MockBackend::new(MockResponse::Empty)),
            extractor.clone(),
        );

        let response = send(&router, upload_request("image/png", b"\x89PNG")).await;

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(extractor.call_count(), 0);
        let snap = body_json(send(&router, empty_request("GET", "/api/v1/session")).await).await;
        assert_eq!(snap["input_text"], "");
        assert_eq!(snap["error"]["kind"], "UNSUPPORTED_FILE_TYPE");
    }

    #[tokio::test]
    async fn test_upload_extraction_failure_is_unprocessable() {
        let router = app(
            Arc::new(MockBackend::new(MockResponse::Empty)),
            Arc::new(MockExtractor::failing()),
        );
        let response = send(&router, upload_request("application/pdf", b"%PDF-bad")).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["code"], "EXTRACTION_FAILED");
    }

    #[tokio::test]
    async fn test_upload_without_file_field_changes_nothing() {
        let (router, _) = default_app();
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhi\r\n--{BOUNDARY}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/session/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = send(&router, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let snap = body_json(send(&router, empty_request("GET", "/api/v1/session")).await).await;
        assert!(snap["error"].is_null());
    }
}
