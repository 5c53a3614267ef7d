//! In-memory product catalog.

use std::collections::BTreeMap;
use std::sync::Arc;

use common::ProductId;
use domain::Product;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors returned by catalog writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A write referenced a product the catalog does not hold.
    #[error("Product not found: {0}")]
    UnknownProduct(ProductId),
}

/// Product records keyed by ID, shared across handlers.
///
/// Listing returns products in ID order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Arc<RwLock<BTreeMap<ProductId, Product>>>,
}

impl InMemoryCatalog {
    /// Creates a catalog holding the given products.
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: Arc::new(RwLock::new(
                products.into_iter().map(|p| (p.id, p)).collect(),
            )),
        }
    }

    /// Returns every product in ID order.
    pub async fn products(&self) -> Vec<Product> {
        self.products.read().await.values().cloned().collect()
    }

    pub async fn get(&self, id: ProductId) -> Option<Product> {
        self.products.read().await.get(&id).cloned()
    }

    /// Overwrites the inventory count of each given product.
    ///
    /// Every ID is checked before anything is written, so an unknown ID
    /// leaves the catalog untouched. Only `inventory_count` is taken from the
    /// incoming records.
    pub async fn apply_inventory(&self, updates: &[Product]) -> Result<(), CatalogError> {
        let mut products = self.products.write().await;

        if let Some(unknown) = updates.iter().find(|u| !products.contains_key(&u.id)) {
            return Err(CatalogError::UnknownProduct(unknown.id));
        }

        for update in updates {
            if let Some(product) = products.get_mut(&update.id) {
                product.inventory_count = update.inventory_count;
            }
        }
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}
