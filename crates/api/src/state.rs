//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ImageMode;
use crate::db::ProductStore;
use crate::uploads::UploadStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It is built once in `main`
/// after the store connection is established and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    products: Arc<dyn ProductStore>,
    uploads: UploadStore,
    image_mode: ImageMode,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `products` - Connected product store
    /// * `uploads` - Upload directory (only written in [`ImageMode::Upload`])
    /// * `image_mode` - How product images are accepted
    #[must_use]
    pub fn new(
        products: Arc<dyn ProductStore>,
        uploads: UploadStore,
        image_mode: ImageMode,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                products,
                uploads,
                image_mode,
            }),
        }
    }

    /// Get a reference to the product store.
    #[must_use]
    pub fn products(&self) -> &dyn ProductStore {
        self.inner.products.as_ref()
    }

    /// Get a reference to the upload store.
    #[must_use]
    pub fn uploads(&self) -> &UploadStore {
        &self.inner.uploads
    }

    /// The configured image input policy.
    #[must_use]
    pub fn image_mode(&self) -> ImageMode {
        self.inner.image_mode
    }
}
