mod routes;
mod state;
pub mod v1;

pub use routes::create_router;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::routes::create_router;
    use crate::api::state::AppState;
    use crate::config::{Config, DatabaseConfig, OcrConfig, ServerConfig};
    use crate::ocr::OcrDispatcher;

    async fn test_state() -> AppState {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: ":memory:".to_string(),
            },
            ocr: OcrConfig {
                default_language: "eng".to_string(),
                tesseract_cmd: "tesseract".to_string(),
                model_dir: "models/paddle-ocr".to_string(),
                threads: 4,
            },
        };

        let raw_db = crate::db::Database::new(&config.database).await.unwrap();
        let db: std::sync::Arc<dyn crate::db::DatabaseBackend> =
            std::sync::Arc::new(crate::db::LibSqlBackend::new(raw_db));

        // No engines configured: dispatch degrades to the placeholder
        let ocr = OcrDispatcher::new(vec![]);

        AppState::new(config, db, ocr)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(width, height);
        let mut output = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut output),
            image::ImageFormat::Png,
        )
        .unwrap();
        output
    }

    fn upload_request(file_name: &str, bytes: &[u8], language: Option<&str>) -> Request<Body> {
        let boundary = "snaptext-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
        if let Some(lang) = language {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; \
                     name=\"language\"\r\n\r\n{lang}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/extract-text")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok_with_no_engines() {
        let app = create_router(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["database"]["status"], "ok");
    }

    #[tokio::test]
    async fn languages_returns_static_map() {
        let app = create_router(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/languages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["eng"], "English");
        assert_eq!(json["data"]["eng+hin"], "English + Hindi");
    }

    #[tokio::test]
    async fn openapi_json_is_served() {
        let app = create_router(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["info"]["title"], "Snaptext API");
    }

    #[tokio::test]
    async fn tiny_upload_is_rejected_before_dispatch() {
        let app = create_router(test_state().await);

        let response = app
            .clone()
            .oneshot(upload_request("tiny.png", &png_bytes(10, 10), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "invalid_request");

        // Nothing reached the store
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/history")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn missing_file_field_is_rejected() {
        let app = create_router(test_state().await);

        let boundary = "snaptext-test-boundary";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; \
             name=\"language\"\r\n\r\neng\r\n--{boundary}--\r\n"
        );
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/extract-text")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Missing required 'file' field");
    }

    #[tokio::test]
    async fn undecodable_upload_is_rejected_with_format_reason() {
        let app = create_router(test_state().await);

        let response = app
            .oneshot(upload_request("junk.png", &[0u8, 1, 2, 3], None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        let message = json["error"]["message"].as_str().unwrap();
        assert!(message.contains("format"), "unexpected message: {message}");
    }

    #[tokio::test]
    async fn engine_failure_returns_500_and_persists_nothing() {
        use async_trait::async_trait;

        use crate::error::{Result, SnaptextError};
        use crate::ocr::{EngineOutput, OcrEngine};

        struct FailingEngine;

        #[async_trait]
        impl OcrEngine for FailingEngine {
            fn name(&self) -> &'static str {
                "failing"
            }

            async fn is_available(&self) -> bool {
                true
            }

            async fn recognize(&self, _image: &[u8], _language: &str) -> Result<EngineOutput> {
                Err(SnaptextError::Engine("simulated engine crash".to_string()))
            }
        }

        let mut state = test_state().await;
        state.ocr = OcrDispatcher::new(vec![
            std::sync::Arc::new(FailingEngine) as std::sync::Arc<dyn OcrEngine>,
        ]);
        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(upload_request("crash.png", &png_bytes(100, 100), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "internal_error");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("OCR processing failed:"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/history")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn deleting_missing_record_returns_404() {
        let app = create_router(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/v1/history/12345")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn download_of_missing_record_returns_404() {
        let app = create_router(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/download/777")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
