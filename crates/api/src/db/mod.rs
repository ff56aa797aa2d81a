//! Document store access for the product catalog.
//!
//! # Database: `DB_NAME` (default `nextshop`)
//!
//! ## Collections
//!
//! - `products` - Append-only product documents (see [`products`])
//!
//! # Connection
//!
//! One client per process, created eagerly at startup by [`connect`] and
//! verified with a `ping` round-trip. The handle is shared read-only through
//! `AppState`; the driver manages its own pool and reconnects internally.
//!
//! Handlers never talk to the driver directly. They go through the
//! [`ProductStore`] port so tests can swap in [`MemoryProductStore`].

pub mod memory;
pub mod products;

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Database};
use secrecy::ExposeSecret;
use thiserror::Error;

use nextshop_core::{NewProduct, Product};

use crate::config::DatabaseConfig;

pub use memory::MemoryProductStore;
pub use products::MongoProductStore;

/// Name of the collection holding product documents.
pub const PRODUCTS_COLLECTION: &str = "products";

const APP_NAME: &str = "nextshop-api";

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Error reported by the MongoDB driver.
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// The store could not be reached.
    #[error("store unavailable")]
    Unavailable,

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Port for the `products` collection.
///
/// Products are append-only, so the port has no update or delete.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Issue a no-op round-trip to the store.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Fetch every product in the store's natural order.
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    /// Insert one product and return it with its assigned identifier.
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError>;
}

/// Connect to MongoDB and verify the connection with a `ping`.
///
/// The client is pinned to Stable API version 1 with strict mode and
/// deprecation errors enabled.
///
/// # Errors
///
/// Returns `StoreError::Database` if the URI is invalid or the server does
/// not answer the ping.
pub async fn connect(config: &DatabaseConfig) -> Result<Database, StoreError> {
    let mut options = ClientOptions::parse(config.uri.expose_secret()).await?;
    options.app_name = Some(APP_NAME.to_string());
    options.server_api = Some(
        ServerApi::builder()
            .version(ServerApiVersion::V1)
            .strict(true)
            .deprecation_errors(true)
            .build(),
    );

    let client = Client::with_options(options)?;
    let database = client.database(&config.name);

    ping(&database).await?;

    Ok(database)
}

/// Run the `{ ping: 1 }` administrative command.
///
/// # Errors
///
/// Returns `StoreError::Database` if the command fails.
pub async fn ping(database: &Database) -> Result<(), StoreError> {
    database.run_command(doc! { "ping": 1 }).await?;
    Ok(())
}
