//! Product route handlers.
//!
//! Products are append-only: list everything, or create one. Images follow
//! the deployment's [`ImageMode`].

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use nextshop_core::{NewProduct, Product, ProductId, parse_image_url};

use super::submission::ProductSubmission;
use crate::config::ImageMode;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Body of a successful `POST /products`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    pub message: &'static str,
    pub product_id: ProductId,
    pub product: Product,
}

/// List every product.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state
        .products()
        .list()
        .await
        .map_err(|e| AppError::store("Failed to fetch products", e))?;

    tracing::debug!(count = products.len(), "Listed products");
    Ok(Json(products))
}

/// Create a product.
///
/// Validation runs before anything is written, so a rejected request never
/// leaves an orphaned upload. If the insert fails after an upload was
/// stored, the file is removed again.
#[instrument(skip(state, submission), fields(name = submission.name.as_deref().unwrap_or_default()))]
pub async fn create(
    State(state): State<AppState>,
    submission: ProductSubmission,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let draft = NewProduct::parse(
        submission.name.as_deref(),
        submission.price.as_deref(),
        submission.description.as_deref(),
    )?;

    let (draft, uploaded) = match state.image_mode() {
        ImageMode::Url => {
            if submission.image_file.is_some() {
                return Err(AppError::BadRequest(
                    "Image uploads are not enabled".to_string(),
                ));
            }
            let image = match submission.image_url.as_deref() {
                Some(raw) => parse_image_url(raw)?,
                None => None,
            };
            (draft.with_image(image), None)
        }
        ImageMode::Upload => match submission.image_file {
            Some(file) => {
                let file_name = state
                    .uploads()
                    .save(file.file_name.as_deref(), &file.bytes)
                    .await?;
                (draft.with_image(Some(file_name.clone())), Some(file_name))
            }
            None => (draft, None),
        },
    };

    let product = match state.products().insert(draft).await {
        Ok(product) => product,
        Err(e) => {
            if let Some(file_name) = uploaded {
                if let Err(cleanup) = state.uploads().remove(&file_name).await {
                    tracing::warn!(
                        file_name = %file_name,
                        error = %cleanup,
                        "Failed to remove orphaned upload"
                    );
                }
            }
            return Err(AppError::store("Failed to add product", e));
        }
    };

    tracing::info!(product_id = %product.id, name = %product.name, "Product added");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Product added successfully",
            product_id: product.id.clone(),
            product,
        }),
    ))
}
