//! The product entity and its creation input.
//!
//! Products are append-only: a [`NewProduct`] is validated from raw request
//! fields, inserted once, and read back as a [`Product`] carrying the
//! store-assigned [`ProductId`]. There is no update or delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::id::ProductId;
use super::price::{Price, PriceError};

/// Validation failures for product input.
///
/// The `Display` text is safe to show to API clients.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    /// `name` or `price` was absent or blank.
    #[error("Name and price are required")]
    MissingRequired,
    /// `price` was present but not a finite, non-negative number.
    #[error("Price must be a non-negative number")]
    InvalidPrice(#[source] PriceError),
    /// An image URL was not an absolute http(s) URL.
    #[error("Image must be an http(s) URL")]
    InvalidImageUrl,
}

/// A stored product as returned by the list and create endpoints.
///
/// `price` is a raw `f64` rather than [`Price`] because documents written
/// before validation existed may hold any number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned identifier.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Price amount.
    pub price: f64,
    /// Free-form description, empty when not provided.
    pub description: String,
    /// Stored upload filename or an external image URL.
    pub image: Option<String>,
    /// Insert time; absent on legacy documents.
    pub created_at: Option<DateTime<Utc>>,
}

/// A validated product that has not been inserted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub description: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewProduct {
    /// Validate raw product fields.
    ///
    /// `name` is trimmed and must be non-empty. `price` is parsed with
    /// [`Price::parse`]. A missing `description` becomes the empty string.
    /// The image starts out unset; see [`NewProduct::with_image`].
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::MissingRequired`] when `name` or `price` is
    /// absent or blank, and [`ProductError::InvalidPrice`] when the price
    /// does not parse to a finite, non-negative number.
    ///
    /// # Example
    ///
    /// ```
    /// use nextshop_core::{NewProduct, ProductError};
    ///
    /// let mug = NewProduct::parse(Some("Mug"), Some("9.5"), Some("Ceramic")).unwrap();
    /// assert_eq!(mug.price.amount(), 9.5);
    /// assert_eq!(mug.image, None);
    ///
    /// assert_eq!(
    ///     NewProduct::parse(Some("Mug"), None, None),
    ///     Err(ProductError::MissingRequired)
    /// );
    /// ```
    pub fn parse(
        name: Option<&str>,
        price: Option<&str>,
        description: Option<&str>,
    ) -> Result<Self, ProductError> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        let price = price.map(str::trim).filter(|p| !p.is_empty());

        let (Some(name), Some(price)) = (name, price) else {
            return Err(ProductError::MissingRequired);
        };

        let price = Price::parse(price).map_err(ProductError::InvalidPrice)?;

        Ok(Self {
            name: name.to_owned(),
            price,
            description: description.unwrap_or_default().to_owned(),
            image: None,
            created_at: Utc::now(),
        })
    }

    /// Attach an image reference (upload filename or URL).
    #[must_use]
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    /// Combine with the identifier the store assigned on insert.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price.amount(),
            description: self.description,
            image: self.image,
            created_at: Some(self.created_at),
        }
    }
}

/// Validate a client-supplied image URL.
///
/// Blank input means "no image". Anything else must be an absolute `http`
/// or `https` URL. A valid URL is returned exactly as the client sent it,
/// surrounding whitespace included, never re-serialized.
///
/// The scheme check is stricter than plain pass-through storage: relative
/// paths and other schemes are refused rather than stored.
///
/// # Errors
///
/// Returns [`ProductError::InvalidImageUrl`] for relative paths, other
/// schemes, or unparseable input.
pub fn parse_image_url(raw: &str) -> Result<Option<String>, ProductError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let url = Url::parse(trimmed).map_err(|_| ProductError::InvalidImageUrl)?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ProductError::InvalidImageUrl);
    }

    Ok(Some(raw.to_owned()))
}
