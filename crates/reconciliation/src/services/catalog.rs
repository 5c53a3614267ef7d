//! Catalog client trait and in-memory implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{Money, ProductId};
use domain::Product;
use tokio::sync::{Barrier, RwLock};

use crate::error::PlacementError;

/// Access to the remote product catalog.
///
/// Implementations never retry; a failed call is reported once and the
/// caller decides what to do.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetches the full catalog.
    ///
    /// Fails with [`PlacementError::CatalogUnavailable`].
    async fn fetch_catalog(&self) -> Result<Vec<Product>, PlacementError>;

    /// Overwrites the inventory count of each given product.
    ///
    /// The records carry absolute counts, not deltas. Fails with
    /// [`PlacementError::CatalogUpdateFailed`].
    async fn apply_inventory(&self, products: Vec<Product>) -> Result<(), PlacementError>;
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    products: BTreeMap<ProductId, Product>,
    fail_on_fetch: bool,
    fail_on_apply: bool,
    fetch_count: usize,
    apply_count: usize,
    fetch_barrier: Option<Arc<Barrier>>,
}

/// In-memory catalog for tests and local runs.
///
/// Supports failure injection and a fetch barrier that holds every fetch
/// until a given number of callers have read their snapshot, which makes
/// check-then-act races reproducible.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogClient {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryCatalogClient {
    /// Creates a catalog holding the given products.
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        let state = InMemoryCatalogState {
            products: products.into_iter().map(|p| (p.id, p)).collect(),
            ..Default::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Configures the service to fail every fetch.
    pub async fn set_fail_on_fetch(&self, fail: bool) {
        self.state.write().await.fail_on_fetch = fail;
    }

    /// Configures the service to fail every inventory write.
    pub async fn set_fail_on_apply(&self, fail: bool) {
        self.state.write().await.fail_on_apply = fail;
    }

    /// Makes fetches wait until `parties` fetches are in flight.
    pub async fn set_fetch_barrier(&self, parties: usize) {
        self.state.write().await.fetch_barrier = Some(Arc::new(Barrier::new(parties)));
    }

    /// Changes a product's price, as a catalog owner would.
    pub async fn set_price(&self, id: ProductId, price: Money) {
        if let Some(product) = self.state.write().await.products.get_mut(&id) {
            product.price = price;
        }
    }

    /// Returns a product by ID.
    pub async fn product(&self, id: ProductId) -> Option<Product> {
        self.state.read().await.products.get(&id).cloned()
    }

    /// Returns a product's current inventory count.
    pub async fn inventory(&self, id: ProductId) -> Option<u32> {
        self.state
            .read()
            .await
            .products
            .get(&id)
            .map(|p| p.inventory_count)
    }

    /// Returns how many fetches were served.
    pub async fn fetch_count(&self) -> usize {
        self.state.read().await.fetch_count
    }

    /// Returns how many inventory writes were accepted.
    pub async fn apply_count(&self) -> usize {
        self.state.read().await.apply_count
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalogClient {
    async fn fetch_catalog(&self) -> Result<Vec<Product>, PlacementError> {
        let (snapshot, barrier) = {
            let mut state = self.state.write().await;
            if state.fail_on_fetch {
                return Err(PlacementError::CatalogUnavailable(
                    "product service unreachable".to_string(),
                ));
            }
            state.fetch_count += 1;
            let snapshot: Vec<Product> = state.products.values().cloned().collect();
            (snapshot, state.fetch_barrier.clone())
        };

        if let Some(barrier) = barrier {
            barrier.wait().await;
        }
        Ok(snapshot)
    }

    async fn apply_inventory(&self, products: Vec<Product>) -> Result<(), PlacementError> {
        let mut state = self.state.write().await;

        if state.fail_on_apply {
            return Err(PlacementError::CatalogUpdateFailed(
                "update product request failed with status: 503 Service Unavailable".to_string(),
            ));
        }

        if let Some(missing) = products
            .iter()
            .find(|p| !state.products.contains_key(&p.id))
        {
            return Err(PlacementError::CatalogUpdateFailed(format!(
                "Product not found: {}",
                missing.id
            )));
        }

        for update in products {
            if let Some(product) = state.products.get_mut(&update.id) {
                product.inventory_count = update.inventory_count;
            }
        }
        state.apply_count += 1;
        Ok(())
    }
}
