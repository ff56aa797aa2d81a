//! In-memory product store.
//!
//! Backs route tests and local experiments without a MongoDB server.
//! Identifiers are random 24-character hex strings so they look like
//! `ObjectId`s to clients. Availability can be toggled to exercise the
//! store-failure paths.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use nextshop_core::{NewProduct, Product, ProductId};

use super::{ProductStore, StoreError};

/// Product store kept in process memory, in insertion order.
#[derive(Debug)]
pub struct MemoryProductStore {
    products: RwLock<Vec<Product>>,
    available: AtomicBool,
}

impl Default for MemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProductStore {
    /// Create an empty, available store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            products: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the store going down (`false`) or coming back (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored products.
    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    /// Whether no products are stored.
    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }
}

fn generate_id() -> ProductId {
    let hex = Uuid::new_v4().simple().to_string();
    ProductId::new(hex.get(..24).unwrap_or(&hex))
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        self.check_available()?;
        Ok(self.products.read().await.clone())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        self.check_available()?;

        let product = product.into_product(generate_id());
        self.products.write().await.push(product.clone());
        Ok(product)
    }
}
