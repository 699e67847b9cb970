use crate::handlers;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use doc_qa::{QaService, Settings};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub fn create_router(service: Arc<QaService>, settings: &Settings) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/upload", post(handlers::upload))
        .route("/ask", post(handlers::ask))
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes))
        .layer(cors_layer(&settings.cors_allowed_origins))
        .with_state(service)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::create_router;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use doc_qa::test_support::build_pdf;
    use doc_qa::{
        ChatMessage, CompletionClient, CompletionError, PromptAssembler, QaService, Role, Settings,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    const BOUNDARY: &str = "doc-qa-test-boundary";

    /// Answers "Paris" when the system prompt mentions Paris, otherwise the fallback sentence.
    #[derive(Default)]
    struct StubCompletion {
        calls: Mutex<Vec<Vec<ChatMessage>>>,
    }

    #[async_trait]
    impl CompletionClient for StubCompletion {
        async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, CompletionError> {
            let answer = if messages[0].content.contains("Paris") {
                "Paris"
            } else {
                "I couldn't find that in the document."
            };
            self.calls.lock().await.push(messages);
            Ok(answer.to_string())
        }
    }

    struct UpstreamDown;

    #[async_trait]
    impl CompletionClient for UpstreamDown {
        async fn complete(&self, _messages: Vec<ChatMessage>) -> Result<String, CompletionError> {
            Err(CompletionError::Upstream {
                status: 502,
                body: "{\"error\":\"provider unavailable\"}".to_string(),
            })
        }
    }

    struct Garbled;

    #[async_trait]
    impl CompletionClient for Garbled {
        async fn complete(&self, _messages: Vec<ChatMessage>) -> Result<String, CompletionError> {
            Err(CompletionError::MalformedResponse("no choices".to_string()))
        }
    }

    fn test_settings() -> Settings {
        Settings::from_lookup(|key| match key {
            "OPENROUTER_API_KEY" => Some("sk-test".to_string()),
            _ => None,
        })
        .expect("settings")
    }

    fn app_with(client: Arc<dyn CompletionClient>) -> Router {
        let service = Arc::new(QaService::new(PromptAssembler::default(), client));
        create_router(service, &test_settings())
    }

    fn upload_request(filename: &str, content_type: &str, body: &[u8]) -> Request<Body> {
        let mut payload = Vec::new();
        payload.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        payload.extend_from_slice(body);
        payload.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(payload))
            .expect("request")
    }

    fn ask_request(body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/ask")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.expect("router response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn health_reports_status() {
        let app = app_with(Arc::new(StubCompletion::default()));
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["status"].is_string());
        assert_eq!(body["documents"], 0);
    }

    #[tokio::test]
    async fn upload_then_ask_answers_from_document() {
        let client = Arc::new(StubCompletion::default());
        let app = app_with(client.clone());

        let (status, body) = send(
            &app,
            upload_request("notes.txt", "text/plain", b"Paris is the capital of France.\n"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["filename"], "notes.txt");
        assert_eq!(body["characters_extracted"], 32);
        assert!(body["message"].is_string());

        let (status, body) = send(
            &app,
            ask_request(json!({
                "filename": "notes.txt",
                "question": "What is the capital of France?",
                "history": []
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "answer": "Paris" }));

        let calls = client.calls.lock().await;
        let last = calls[0].last().expect("question message");
        assert_eq!(last.role, Role::User);
        assert_eq!(last.content, "What is the capital of France?");
    }

    #[tokio::test]
    async fn ask_forwards_history_in_order() {
        let client = Arc::new(StubCompletion::default());
        let app = app_with(client.clone());
        send(&app, upload_request("notes.txt", "text/plain", b"Some notes")).await;

        let (status, _) = send(
            &app,
            ask_request(json!({
                "filename": "notes.txt",
                "question": "And then?",
                "history": [
                    { "role": "user", "content": "First?" },
                    { "role": "assistant", "content": "First answer." }
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let calls = client.calls.lock().await;
        let messages = &calls[0];
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1], ChatMessage::user("First?"));
        assert_eq!(messages[2], ChatMessage::assistant("First answer."));
    }

    #[tokio::test]
    async fn ask_unknown_document_is_404() {
        let client = Arc::new(StubCompletion::default());
        let app = app_with(client.clone());

        for question in ["What is this?", ""] {
            let (status, body) = send(
                &app,
                ask_request(json!({ "filename": "missing.pdf", "question": question, "history": [] })),
            )
            .await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["detail"], "Document not found");
        }
        assert!(client.calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn reupload_overwrites_previous_text() {
        let client = Arc::new(StubCompletion::default());
        let app = app_with(client.clone());

        send(&app, upload_request("notes.txt", "text/plain", b"Paris is the capital of France.")).await;
        send(&app, upload_request("notes.txt", "text/plain", b"Rome is the capital of Italy.")).await;

        let (status, body) = send(
            &app,
            ask_request(json!({ "filename": "notes.txt", "question": "Capital of France?" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "I couldn't find that in the document.");

        let calls = client.calls.lock().await;
        assert!(calls[0][0].content.contains("Rome is the capital of Italy."));
    }

    #[tokio::test]
    async fn unsupported_type_is_400_for_any_filename() {
        let app = app_with(Arc::new(StubCompletion::default()));

        for filename in ["photo.png", "notes.txt", "paper.pdf"] {
            let (status, body) = send(&app, upload_request(filename, "image/png", b"\x89PNG")).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["detail"].as_str().unwrap().contains("Unsupported"));
        }
    }

    #[tokio::test]
    async fn pdf_upload_extracts_pages_in_order() {
        let client = Arc::new(StubCompletion::default());
        let app = app_with(client.clone());
        let pdf = build_pdf(&[Some("Alpha"), None, Some("Omega")]);

        let (status, body) =
            send(&app, upload_request("lecture.pdf", "application/pdf", &pdf)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["filename"], "lecture.pdf");
        assert_eq!(body["characters_extracted"], 14);

        let (status, _) = send(
            &app,
            ask_request(json!({ "filename": "lecture.pdf", "question": "q", "history": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let calls = client.calls.lock().await;
        let system = &calls[0][0].content;
        let alpha = system.find("Alpha").expect("first page text");
        let omega = system.find("Omega").expect("last page text");
        assert!(alpha < omega);
    }

    #[tokio::test]
    async fn corrupt_pdf_is_400() {
        let app = app_with(Arc::new(StubCompletion::default()));

        let (status, body) = send(
            &app,
            upload_request("broken.pdf", "application/octet-stream", b"%PDF-1.4 truncated"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Failed to parse PDF"));
    }

    #[tokio::test]
    async fn empty_extraction_is_400() {
        let app = app_with(Arc::new(StubCompletion::default()));

        let (status, body) = send(&app, upload_request("blank.txt", "text/plain", b" \n\t ")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "No extractable content found in file");
    }

    #[tokio::test]
    async fn upload_without_file_field_is_400() {
        let app = app_with(Arc::new(StubCompletion::default()));
        let payload = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{BOUNDARY}--\r\n"
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(payload))
            .unwrap();

        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "No file uploaded");
    }

    #[tokio::test]
    async fn upstream_error_is_500_with_detail() {
        let app = app_with(Arc::new(UpstreamDown));
        send(&app, upload_request("notes.txt", "text/plain", b"content")).await;

        let (status, body) = send(
            &app,
            ask_request(json!({ "filename": "notes.txt", "question": "q", "history": [] })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("provider unavailable"));
    }

    #[tokio::test]
    async fn malformed_upstream_response_is_generic_500() {
        let app = app_with(Arc::new(Garbled));
        send(&app, upload_request("notes.txt", "text/plain", b"content")).await;

        let (status, body) = send(
            &app,
            ask_request(json!({ "filename": "notes.txt", "question": "q", "history": [] })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Internal server error");
    }

    #[tokio::test]
    async fn unknown_history_role_is_rejected() {
        let client = Arc::new(StubCompletion::default());
        let app = app_with(client.clone());
        send(&app, upload_request("notes.txt", "text/plain", b"content")).await;

        let (status, _) = send(
            &app,
            ask_request(json!({
                "filename": "notes.txt",
                "question": "q",
                "history": [{ "role": "narrator", "content": "once upon a time" }]
            })),
        )
        .await;

        assert!(status.is_client_error());
        assert!(client.calls.lock().await.is_empty());
    }
}
