//! Request body extractor for `POST /products`.
//!
//! Accepts the same fields from three encodings:
//!
//! | Content-Type | `price` | `image` |
//! |---|---|---|
//! | `multipart/form-data` | text part | file part (upload) or text part (URL) |
//! | `application/x-www-form-urlencoded` | text | text (URL) |
//! | `application/json` | number or string | string (URL) |
//!
//! Extraction only collects raw values; validation happens in the handler.

use axum::{
    Form, Json,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::{StatusCode, header::CONTENT_TYPE},
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;

const INVALID_BODY: &str = "Invalid request body";

/// An uploaded image file, held in memory until validation passes.
#[derive(Debug, Clone)]
pub struct ImageFile {
    /// Client-supplied filename, if any.
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// Raw product fields from any supported body encoding.
#[derive(Debug, Clone, Default)]
pub struct ProductSubmission {
    pub name: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    /// Text value of `image`.
    pub image_url: Option<String>,
    /// File part named `image` (multipart only).
    pub image_file: Option<ImageFile>,
}

#[derive(Debug, Deserialize)]
struct FormSubmission {
    name: Option<String>,
    price: Option<String>,
    description: Option<String>,
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JsonSubmission {
    name: Option<String>,
    price: Option<Value>,
    description: Option<String>,
    image: Option<String>,
}

impl From<FormSubmission> for ProductSubmission {
    fn from(form: FormSubmission) -> Self {
        Self {
            name: form.name,
            price: form.price,
            description: form.description,
            image_url: form.image,
            image_file: None,
        }
    }
}

impl From<JsonSubmission> for ProductSubmission {
    fn from(body: JsonSubmission) -> Self {
        // JSON clients may send the price as a number or a string
        let price = body.price.and_then(|value| match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        });

        Self {
            name: body.name,
            price,
            description: body.description,
            image_url: body.image,
            image_file: None,
        }
    }
}

/// Map a body rejection to a client error, keeping 413 distinct.
fn rejected(status: StatusCode, detail: &impl std::fmt::Display) -> AppError {
    tracing::debug!(status = status.as_u16(), error = %detail, "Request body rejected");
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::BadRequest(INVALID_BODY.to_string())
    }
}

impl ProductSubmission {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut submission = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| rejected(e.status(), &e))?
        {
            let Some(field_name) = field.name().map(str::to_owned) else {
                continue;
            };

            if field_name == "image" && field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_owned);
                let bytes = field.bytes().await.map_err(|e| rejected(e.status(), &e))?;

                // Browsers send an empty, unnamed part when no file was picked
                if bytes.is_empty() && file_name.as_deref().is_none_or(str::is_empty) {
                    continue;
                }

                submission.image_file = Some(ImageFile { file_name, bytes });
                continue;
            }

            let slot = match field_name.as_str() {
                "name" => &mut submission.name,
                "price" => &mut submission.price,
                "description" => &mut submission.description,
                "image" => &mut submission.image_url,
                _ => continue,
            };
            *slot = Some(field.text().await.map_err(|e| rejected(e.status(), &e))?);
        }

        Ok(submission)
    }
}

impl<S> FromRequest<S> for ProductSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| rejected(e.status(), &e))?;
            Self::from_multipart(multipart).await
        } else if content_type.starts_with("application/json") {
            let Json(body) = Json::<JsonSubmission>::from_request(req, state)
                .await
                .map_err(|e| rejected(e.status(), &e))?;
            Ok(body.into())
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(form) = Form::<FormSubmission>::from_request(req, state)
                .await
                .map_err(|e| rejected(e.status(), &e))?;
            Ok(form.into())
        } else {
            // A bodyless request carries no fields; let validation reject it
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| rejected(e.status(), &e))?;
            if body.is_empty() {
                return Ok(Self::default());
            }
            Err(AppError::UnsupportedMediaType(
                "Expected multipart/form-data, application/x-www-form-urlencoded or application/json"
                    .to_string(),
            ))
        }
    }
}
