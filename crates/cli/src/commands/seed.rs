//! Seed the catalog with products from a YAML file.
//!
//! ```yaml
//! - name: Ceramic Mug
//!   price: 12.5
//!   description: Holds coffee
//!   image: https://cdn.example.com/mug.png
//! - name: Tote Bag
//!   price: "8"
//! ```
//!
//! Every entry is validated with the same rules as `POST /products` before
//! the database is contacted. One bad entry means nothing is inserted.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use nextshop_api::config::DatabaseConfig;
use nextshop_api::db::{self, MongoProductStore, ProductStore};
use nextshop_core::{NewProduct, parse_image_url};

use super::CommandError;

/// YAML prices may be written as numbers or strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SeedPrice {
    Number(f64),
    Text(String),
}

impl SeedPrice {
    fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// One product entry in a seed file.
#[derive(Debug, Clone, Deserialize)]
struct SeedProduct {
    name: Option<String>,
    price: Option<SeedPrice>,
    description: Option<String>,
    image: Option<String>,
}

/// Validate every entry, collecting one message per failure.
///
/// Messages are prefixed with the entry's 1-based position.
fn validate(entries: Vec<SeedProduct>) -> Result<Vec<NewProduct>, Vec<String>> {
    let mut products = Vec::with_capacity(entries.len());
    let mut errors = Vec::new();

    for (index, entry) in entries.into_iter().enumerate() {
        let price = entry.price.as_ref().map(SeedPrice::as_text);
        let parsed = NewProduct::parse(
            entry.name.as_deref(),
            price.as_deref(),
            entry.description.as_deref(),
        )
        .and_then(|draft| {
            let image = match entry.image.as_deref() {
                Some(raw) => parse_image_url(raw)?,
                None => None,
            };
            Ok(draft.with_image(image))
        });

        match parsed {
            Ok(product) => products.push(product),
            Err(e) => errors.push(format!("entry {}: {e}", index + 1)),
        }
    }

    if errors.is_empty() {
        Ok(products)
    } else {
        Err(errors)
    }
}

/// Parse and validate a seed file without touching the database.
fn load(content: &str) -> Result<Vec<NewProduct>, CommandError> {
    let entries: Vec<SeedProduct> = serde_yaml::from_str(content)?;
    info!(entries = entries.len(), "Parsed seed file");

    validate(entries).map_err(|errors| {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        CommandError::Invalid(errors.len())
    })
}

/// Insert every product from `file_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any entry is
/// invalid, configuration is missing, or an insert fails.
pub async fn run(file_path: &Path) -> Result<(), CommandError> {
    // Load environment variables
    dotenvy::dotenv().ok();

    info!(path = %file_path.display(), "Loading products from file");

    // Read and validate before connecting to database
    let content = tokio::fs::read_to_string(file_path)
        .await
        .map_err(|source| CommandError::Read {
            path: file_path.display().to_string(),
            source,
        })?;
    let products = load(&content)?;

    info!("Seed file validated successfully");

    let config = DatabaseConfig::from_env()?;
    let store = MongoProductStore::new(db::connect(&config).await?);
    info!(database = %config.name, "Connected to database");

    let total = products.len();
    for draft in products {
        let product = store.insert(draft).await?;
        info!(product_id = %product.id, name = %product.name, "Inserted product");
    }

    info!("Seeding complete! Inserted {total} products");
    Ok(())
}
