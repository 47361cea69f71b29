//! Shared helpers for image-description-service integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use image_description_service::services::providers::mock::{MockLabelDetector, MockTextGenerator};
use image_description_service::services::ImageAnalyzer;
use image_description_service::startup::{build_router, AppState};
use std::sync::Arc;
use tower::util::ServiceExt;

pub const ANALYZE_ROUTE: &str = "/analyze";

/// "sample image bytes", base64 encoded.
pub const IMAGE_B64: &str = "c2FtcGxlIGltYWdlIGJ5dGVz";

/// Router wired to mock collaborators, plus handles for asserting on calls.
pub struct TestApp {
    pub router: Router,
    pub detector: Arc<MockLabelDetector>,
    pub generator: Arc<MockTextGenerator>,
}

impl TestApp {
    pub fn new(detector: MockLabelDetector, generator: MockTextGenerator) -> Self {
        let detector = Arc::new(detector);
        let generator = Arc::new(generator);
        let analyzer = ImageAnalyzer::new(detector.clone(), generator.clone());
        let router = build_router(AppState::new(analyzer), ANALYZE_ROUTE);

        Self {
            router,
            detector,
            generator,
        }
    }

    pub async fn post_raw(&self, body: impl Into<Body>) -> Response<Body> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(ANALYZE_ROUTE)
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post_json(&self, body: serde_json::Value) -> Response<Body> {
        self.post_raw(body.to_string()).await
    }

    pub async fn options(&self, body: impl Into<Body>) -> Response<Body> {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(ANALYZE_ROUTE)
            .header("origin", "https://example.com")
            .header("access-control-request-method", "POST")
            .body(body.into())
            .unwrap();

        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("response body is not JSON")
}

pub fn assert_cors_headers(response: &Response<Body>) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    assert_eq!(headers["access-control-allow-methods"], "OPTIONS,POST");
}
