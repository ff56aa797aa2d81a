//! MongoDB-backed product store.
//!
//! Documents are stored with camelCase field names and a driver-generated
//! `ObjectId`. Reads tolerate legacy documents without `description`,
//! `image` or `createdAt`, and prices stored as numeric strings. A document
//! that still cannot be read is logged and left out of listings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, Document, doc, oid::ObjectId};
use mongodb::{Collection, Database};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::instrument;

use nextshop_core::{NewProduct, Product, ProductId};

use super::{PRODUCTS_COLLECTION, ProductStore, StoreError};

/// On-disk shape of a product document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name: String,
    #[serde(deserialize_with = "deserialize_price")]
    price: f64,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    created_at: Option<bson::DateTime>,
}

/// Accept BSON numbers of any width and numeric strings.
fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StoredPrice {
        Number(f64),
        Text(String),
    }

    match StoredPrice::deserialize(deserializer)? {
        StoredPrice::Number(price) => Ok(price),
        StoredPrice::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("non-numeric price {text:?}"))),
    }
}

impl From<&NewProduct> for ProductDocument {
    fn from(product: &NewProduct) -> Self {
        Self {
            id: None,
            name: product.name.clone(),
            price: product.price.amount(),
            description: product.description.clone(),
            image: product.image.clone(),
            created_at: Some(bson::DateTime::from_millis(
                product.created_at.timestamp_millis(),
            )),
        }
    }
}

impl TryFrom<ProductDocument> for Product {
    type Error = StoreError;

    fn try_from(doc: ProductDocument) -> Result<Self, Self::Error> {
        let id = doc
            .id
            .ok_or_else(|| StoreError::DataCorruption("product document without _id".into()))?;

        Ok(Self {
            id: ProductId::new(id.to_hex()),
            name: doc.name,
            price: doc.price,
            description: doc.description,
            image: doc.image,
            created_at: doc.created_at.and_then(to_chrono),
        })
    }
}

/// Decode a raw collection document into a product.
fn decode(document: Document) -> Result<Product, StoreError> {
    let document: ProductDocument = bson::from_document(document)
        .map_err(|e| StoreError::DataCorruption(e.to_string()))?;
    Product::try_from(document)
}

fn to_chrono(value: bson::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value.timestamp_millis())
}

/// Product store over the `products` collection.
#[derive(Debug, Clone)]
pub struct MongoProductStore {
    database: Database,
    products: Collection<ProductDocument>,
}

impl MongoProductStore {
    /// Create a store over an already-connected database.
    #[must_use]
    pub fn new(database: Database) -> Self {
        let products = database.collection(PRODUCTS_COLLECTION);
        Self { database, products }
    }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    async fn ping(&self) -> Result<(), StoreError> {
        super::ping(&self.database).await
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let cursor = self
            .products
            .clone_with_type::<Document>()
            .find(doc! {})
            .await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        let mut products = Vec::with_capacity(documents.len());
        for document in documents {
            let id = document.get_object_id("_id").map(|id| id.to_hex()).ok();
            match decode(document) {
                Ok(product) => products.push(product),
                Err(e) => {
                    tracing::warn!(
                        id = ?id,
                        error = %e,
                        "Skipping unreadable product document"
                    );
                }
            }
        }

        Ok(products)
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let document = ProductDocument::from(&product);
        let result = self.products.insert_one(&document).await?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            StoreError::DataCorruption(format!(
                "insert returned a non-ObjectId _id: {}",
                result.inserted_id
            ))
        })?;

        Ok(product.into_product(ProductId::new(id.to_hex())))
    }
}
