//! Request ID middleware for request tracing and correlation.
//!
//! Reuses an incoming `x-request-id` (from a proxy or the client) or mints a
//! UUID v4. The ID is written back onto the request so inner layers see it,
//! recorded in the `http_request` span and the Sentry scope, and echoed in
//! the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Ensure every request and response carries a request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let incoming = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .filter(|value| !value.is_empty())
        .cloned();

    let request_id = match incoming {
        Some(value) => value,
        None => {
            let value = HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"));
            request
                .headers_mut()
                .insert(REQUEST_ID_HEADER, value.clone());
            value
        }
    };

    let request_id_str = request_id.to_str().unwrap_or("invalid");
    Span::current().record("request_id", request_id_str);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", request_id_str);
    });

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(REQUEST_ID_HEADER, request_id);
    response
}
