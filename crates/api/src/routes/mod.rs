//! HTTP route handlers for the catalog API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                    - Banner (plain text)
//! GET  /ping                - Store connectivity check (plain text)
//!
//! # Products
//! GET  /products            - List all products (JSON)
//! POST /products            - Create a product (multipart, form or JSON)
//!
//! # Static (upload mode only)
//! GET  /uploads/{file}      - Uploaded image bytes
//! ```

pub mod health;
pub mod products;
pub mod submission;

use axum::{Router, extract::DefaultBodyLimit, middleware::from_fn, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::config::ImageMode;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/", get(products::index).post(products::create))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/ping", get(health::ping))
        .nest("/products", product_routes())
}

/// Build the application router with its cross-cutting layers.
///
/// Uploaded images are served from the upload directory only in
/// [`ImageMode::Upload`]. Tracing and Sentry layers are added by the binary.
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    let mut router = routes().layer(DefaultBodyLimit::max(max_body_bytes));

    if state.image_mode() == ImageMode::Upload {
        router = router.nest_service("/uploads", ServeDir::new(state.uploads().dir()));
    }

    router
        .layer(CorsLayer::permissive())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::db::MemoryProductStore;
    use crate::middleware::REQUEST_ID_HEADER;
    use crate::uploads::UploadStore;

    const BOUNDARY: &str = "XNEXTSHOPBOUNDARY";
    const BODY_LIMIT: usize = 1024 * 1024;

    struct TestApp {
        store: Arc<MemoryProductStore>,
        router: Router,
        upload_dir: tempfile::TempDir,
    }

    impl TestApp {
        async fn new(image_mode: ImageMode) -> Self {
            let store = Arc::new(MemoryProductStore::new());
            let upload_dir = tempfile::tempdir().unwrap();
            let uploads = UploadStore::new(upload_dir.path());
            uploads.ensure_dir().await.unwrap();

            let state = AppState::new(store.clone(), uploads, image_mode);
            Self {
                store,
                router: app(state, BODY_LIMIT),
                upload_dir,
            }
        }

        async fn send(&self, request: Request<Body>) -> Response {
            self.router.clone().oneshot(request).await.unwrap()
        }

        async fn get(&self, uri: &str) -> Response {
            self.send(Request::get(uri).body(Body::empty()).unwrap()).await
        }

        async fn post_json(&self, body: Value) -> Response {
            self.send(
                Request::post("/products")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
        }

        async fn post_form(&self, body: &'static str) -> Response {
            self.send(
                Request::post("/products")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
        }

        async fn post_multipart(&self, body: Vec<u8>) -> Response {
            self.send(
                Request::post("/products")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={BOUNDARY}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
        }

        async fn list(&self) -> Vec<Value> {
            let response = self.get("/products").await;
            assert_eq!(response.status(), StatusCode::OK);
            json_body(response).await.as_array().unwrap().clone()
        }
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn json_body(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    async fn text_body(response: Response) -> String {
        String::from_utf8(body_bytes(response).await).unwrap()
    }

    /// Build a multipart body from text fields and an optional `image` file.
    fn multipart(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    // =========================================================================
    // Banner & Ping
    // =========================================================================

    #[tokio::test]
    async fn test_root_banner() {
        let app = TestApp::new(ImageMode::Upload).await;
        let response = app.get("/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text_body(response).await, "NextShop API is running!");
    }

    #[tokio::test]
    async fn test_ping_reports_store_health() {
        let app = TestApp::new(ImageMode::Upload).await;

        let response = app.get("/ping").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text_body(response).await, "Pinged MongoDB successfully!");

        app.store.set_available(false);
        let response = app.get("/ping").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(text_body(response).await, "MongoDB connection failed");
    }

    // =========================================================================
    // List
    // =========================================================================

    #[tokio::test]
    async fn test_list_empty_collection() {
        let app = TestApp::new(ImageMode::Upload).await;

        assert!(app.list().await.is_empty());
        // Listing is side-effect free
        assert!(app.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_store_failure() {
        let app = TestApp::new(ImageMode::Upload).await;
        app.store.set_available(false);

        let response = app.get("/products").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({ "message": "Failed to fetch products" })
        );
    }

    // =========================================================================
    // Create
    // =========================================================================

    #[tokio::test]
    async fn test_create_without_image() {
        let app = TestApp::new(ImageMode::Upload).await;

        let response = app
            .post_json(json!({ "name": "Mug", "price": "9.5", "description": "Ceramic" }))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = json_body(response).await;
        assert_eq!(body["message"], "Product added successfully");
        assert_eq!(body["product"]["name"], "Mug");
        assert_eq!(body["product"]["price"], 9.5);
        assert_eq!(body["product"]["description"], "Ceramic");
        assert!(body["product"]["image"].is_null());
        assert!(body["product"]["createdAt"].is_string());
        assert_eq!(body["productId"], body["product"]["_id"]);

        let products = app.list().await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["_id"], body["productId"]);
        assert_eq!(products[0]["name"], "Mug");
        assert_eq!(products[0]["price"], 9.5);
        assert_eq!(products[0]["description"], "Ceramic");
        assert!(products[0]["image"].is_null());
    }

    #[tokio::test]
    async fn test_create_parses_text_price() {
        let app = TestApp::new(ImageMode::Upload).await;

        let response = app.post_form("name=Lamp&price=19.99").await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let products = app.list().await;
        assert_eq!(products[0]["price"], 19.99);
        assert_eq!(products[0]["description"], "");
    }

    #[tokio::test]
    async fn test_create_requires_name_and_price() {
        let app = TestApp::new(ImageMode::Upload).await;

        for body in [
            json!({ "price": "1" }),
            json!({ "name": "Mug" }),
            json!({ "name": "", "price": "1" }),
            json!({ "name": "Mug", "price": "" }),
            json!({}),
        ] {
            let response = app.post_json(body).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                json_body(response).await,
                json!({ "message": "Name and price are required" })
            );
        }

        assert_eq!(app.store.len().await, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_price() {
        let app = TestApp::new(ImageMode::Upload).await;

        for price in ["abc", "NaN", "inf", "-1"] {
            let response = app.post_json(json!({ "name": "Mug", "price": price })).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                json_body(response).await,
                json!({ "message": "Price must be a non-negative number" })
            );
        }

        assert!(app.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_store_failure() {
        let app = TestApp::new(ImageMode::Upload).await;
        app.store.set_available(false);

        let response = app.post_json(json!({ "name": "Mug", "price": 3 })).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({ "message": "Failed to add product" })
        );
    }

    #[tokio::test]
    async fn test_create_unsupported_content_type() {
        let app = TestApp::new(ImageMode::Upload).await;

        let response = app
            .send(
                Request::post("/products")
                    .header(header::CONTENT_TYPE, "text/plain")
                    .body(Body::from("Mug"))
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(json_body(response).await["message"].is_string());
    }

    #[tokio::test]
    async fn test_create_without_body_requires_fields() {
        let app = TestApp::new(ImageMode::Upload).await;

        let response = app
            .send(Request::post("/products").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "message": "Name and price are required" })
        );
        assert!(app.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_concurrent_creates() {
        let app = TestApp::new(ImageMode::Upload).await;

        let (a, b) = tokio::join!(
            app.post_json(json!({ "name": "Alpha", "price": 1 })),
            app.post_json(json!({ "name": "Beta", "price": 2 })),
        );
        assert_eq!(a.status(), StatusCode::CREATED);
        assert_eq!(b.status(), StatusCode::CREATED);

        let mut names: Vec<String> = app
            .list()
            .await
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect();
        names.sort();
        assert_eq!(names, ["Alpha", "Beta"]);
    }

    // =========================================================================
    // Upload mode
    // =========================================================================

    #[tokio::test]
    async fn test_multipart_upload_is_stored_and_served() {
        let app = TestApp::new(ImageMode::Upload).await;

        let body = multipart(
            &[("name", "Mug"), ("price", "9.5")],
            Some(("mug.png", b"\x89PNG fake image".as_slice())),
        );
        let response = app.post_multipart(body).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let created = json_body(response).await;
        let file_name = created["product"]["image"].as_str().unwrap().to_string();
        assert!(file_name.ends_with("-mug.png"));

        let on_disk = tokio::fs::read(app.upload_dir.path().join(&file_name))
            .await
            .unwrap();
        assert_eq!(on_disk, b"\x89PNG fake image");

        let served = app.get(&format!("/uploads/{file_name}")).await;
        assert_eq!(served.status(), StatusCode::OK);
        assert_eq!(body_bytes(served).await, b"\x89PNG fake image");
    }

    #[tokio::test]
    async fn test_rejected_upload_writes_nothing() {
        let app = TestApp::new(ImageMode::Upload).await;

        let body = multipart(&[("name", "Mug")], Some(("mug.png", b"bytes".as_slice())));
        let response = app.post_multipart(body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let mut entries = tokio::fs::read_dir(app.upload_dir.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_insert_removes_upload() {
        let app = TestApp::new(ImageMode::Upload).await;
        app.store.set_available(false);

        let body = multipart(
            &[("name", "Mug"), ("price", "1")],
            Some(("mug.png", b"bytes".as_slice())),
        );
        let response = app.post_multipart(body).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let mut entries = tokio::fs::read_dir(app.upload_dir.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upload_mode_ignores_image_text() {
        let app = TestApp::new(ImageMode::Upload).await;

        let response = app
            .post_json(json!({ "name": "Mug", "price": 1, "image": "https://cdn.example.com/a.png" }))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(json_body(response).await["product"]["image"].is_null());
    }

    #[tokio::test]
    async fn test_missing_upload_is_not_found() {
        let app = TestApp::new(ImageMode::Upload).await;
        let response = app.get("/uploads/does-not-exist.png").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_body_limit() {
        let app = TestApp::new(ImageMode::Upload).await;

        let oversized = vec![b'x'; BODY_LIMIT + 1];
        let body = multipart(
            &[("name", "Mug"), ("price", "1")],
            Some(("big.png", oversized.as_slice())),
        );
        let response = app.post_multipart(body).await;

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(app.store.is_empty().await);
    }

    // =========================================================================
    // URL mode
    // =========================================================================

    #[tokio::test]
    async fn test_url_mode_stores_url_verbatim() {
        let app = TestApp::new(ImageMode::Url).await;

        let response = app
            .post_json(json!({ "name": "Mug", "price": 1, "image": "https://cdn.example.com/mug.png?v=2" }))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            json_body(response).await["product"]["image"],
            "https://cdn.example.com/mug.png?v=2"
        );
    }

    #[tokio::test]
    async fn test_url_mode_rejects_bad_urls() {
        let app = TestApp::new(ImageMode::Url).await;

        for image in ["ftp://example.com/mug.png", "/images/mug.png", "not a url"] {
            let response = app
                .post_json(json!({ "name": "Mug", "price": 1, "image": image }))
                .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                json_body(response).await,
                json!({ "message": "Image must be an http(s) URL" })
            );
        }
        assert!(app.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_url_mode_rejects_file_parts() {
        let app = TestApp::new(ImageMode::Url).await;

        let body = multipart(
            &[("name", "Mug"), ("price", "1")],
            Some(("mug.png", b"bytes".as_slice())),
        );
        let response = app.post_multipart(body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "message": "Image uploads are not enabled" })
        );
    }

    #[tokio::test]
    async fn test_url_mode_does_not_serve_uploads() {
        let app = TestApp::new(ImageMode::Url).await;
        tokio::fs::write(app.upload_dir.path().join("a.png"), b"bytes")
            .await
            .unwrap();

        let response = app.get("/uploads/a.png").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // =========================================================================
    // Cross-cutting
    // =========================================================================

    #[tokio::test]
    async fn test_request_id_is_echoed_or_generated() {
        let app = TestApp::new(ImageMode::Upload).await;

        let response = app
            .send(
                Request::get("/")
                    .header(REQUEST_ID_HEADER, "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-123");

        let response = app.get("/").await;
        let generated = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert_eq!(generated.len(), 36);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let app = TestApp::new(ImageMode::Upload).await;

        let response = app
            .send(
                Request::get("/products")
                    .header(header::ORIGIN, "https://shop.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_cors_preflight_carries_request_id() {
        let app = TestApp::new(ImageMode::Upload).await;

        let response = app
            .send(
                Request::options("/products")
                    .header(header::ORIGIN, "https://shop.example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(REQUEST_ID_HEADER, "preflight-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "preflight-1");
    }
}
