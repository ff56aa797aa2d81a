//! HTTP middleware stack for the API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions) - added in `main`
//! 2. `TraceLayer` (request span with method, URI, status, latency) - added in `main`
//! 3. Request ID (propagate or generate, echo in response)
//! 4. CORS (permissive, answers preflights)
//! 5. Body limit (`MAX_UPLOAD_BYTES`)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
