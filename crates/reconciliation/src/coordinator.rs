//! Reconciliation coordinator for order placement and status updates.

use chrono::Utc;
use common::OrderId;
use domain::{
    CatalogSnapshot, Order, OrderStatus, PlaceOrder, PricedOrder, PricingError, Product,
    StatusChange, UpdateOrder, price_order,
};
use tokio::sync::Mutex;

use crate::error::PlacementError;
use crate::services::catalog::CatalogClient;
use crate::store::OrderStore;

/// Behaviour switches for the coordinator.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinatorOptions {
    /// Return a cancelled order's units to the catalog before persisting the
    /// cancellation.
    pub restock_on_cancel: bool,
}

/// Orchestrates order placement against the remote catalog.
///
/// Placement reads a catalog snapshot, prices the order, commits the new
/// inventory counts remotely and only then persists the order locally. If
/// the remote commit fails nothing is persisted. The snapshot is not locked
/// across the commit, so two concurrent placements may both pass the stock
/// check against the same counts; the later write wins.
pub struct ReconciliationCoordinator<C>
where
    C: CatalogClient,
{
    catalog: C,
    store: OrderStore,
    options: CoordinatorOptions,
    update_lock: Mutex<()>,
}

impl<C> ReconciliationCoordinator<C>
where
    C: CatalogClient,
{
    /// Creates a new coordinator with default options.
    pub fn new(catalog: C, store: OrderStore) -> Self {
        Self::with_options(catalog, store, CoordinatorOptions::default())
    }

    /// Creates a new coordinator.
    pub fn with_options(catalog: C, store: OrderStore, options: CoordinatorOptions) -> Self {
        Self {
            catalog,
            store,
            options,
            update_lock: Mutex::new(()),
        }
    }

    /// Returns the order store.
    pub fn store(&self) -> &OrderStore {
        &self.store
    }

    /// Returns the catalog client.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Returns the configured options.
    pub fn options(&self) -> CoordinatorOptions {
        self.options
    }

    /// Places an order.
    #[tracing::instrument(skip(self, cmd), fields(lines = cmd.items.len()))]
    pub async fn place_order(&self, cmd: PlaceOrder) -> Result<Order, PlacementError> {
        let start = std::time::Instant::now();
        let result = self.reconcile_and_place(cmd).await;
        metrics::histogram!("order_placement_duration_seconds")
            .record(start.elapsed().as_secs_f64());

        match &result {
            Ok(order) => {
                metrics::counter!("orders_placed_total").increment(1);
                tracing::info!(
                    order_id = %order.id(),
                    value = %order.value(),
                    discount = order.discount(),
                    "order placed"
                );
            }
            Err(err) => {
                metrics::counter!("order_placement_failures_total", "reason" => err.reason())
                    .increment(1);
                match err {
                    PlacementError::Pricing(_) | PlacementError::Order(_) => {
                        tracing::warn!(error = %err, "order rejected");
                    }
                    _ => tracing::error!(error = %err, "order placement failed"),
                }
            }
        }
        result
    }

    async fn reconcile_and_place(&self, cmd: PlaceOrder) -> Result<Order, PlacementError> {
        // 1. Snapshot the catalog
        let snapshot = CatalogSnapshot::new(self.catalog.fetch_catalog().await?);

        // 2. Validate and price against the snapshot
        let priced = price_order(&cmd.items, &snapshot)?;

        // 3. Compute absolute inventory counts
        let updates = decremented_inventory(&priced, &snapshot)?;

        // 4. Commit remotely; nothing is stored locally if this fails
        if !updates.is_empty() {
            self.catalog.apply_inventory(updates).await?;
        }

        // 5. Persist
        let placed_at = Utc::now();
        let order = self
            .store
            .create(|id| Order::place(id, priced, placed_at))
            .await;
        Ok(order)
    }

    /// Applies a status update to an existing order.
    ///
    /// Updates are serialized so a cancellation restocks at most once.
    #[tracing::instrument(skip(self), fields(order_id = %cmd.order_id))]
    pub async fn update_order(&self, cmd: UpdateOrder) -> Result<Order, PlacementError> {
        let _guard = self.update_lock.lock().await;

        let mut order = self
            .store
            .get(cmd.order_id)
            .await
            .ok_or(PlacementError::OrderNotFound(cmd.order_id))?;

        let change = order.apply_update(&cmd, Utc::now())?;

        if change.entered(OrderStatus::Cancelled) && self.options.restock_on_cancel {
            self.restock(&order).await?;
        }

        self.store.save(order.clone()).await;

        if let StatusChange::Moved { from, to } = change {
            metrics::counter!("order_status_updates_total", "status" => to.as_str())
                .increment(1);
            tracing::info!(%from, %to, "order status changed");
        }
        Ok(order)
    }

    /// Returns an order by ID.
    pub async fn get_order(&self, id: OrderId) -> Result<Order, PlacementError> {
        self.store
            .get(id)
            .await
            .ok_or(PlacementError::OrderNotFound(id))
    }

    /// Returns every order.
    pub async fn list_orders(&self) -> Vec<Order> {
        self.store.list().await
    }

    /// Returns a cancelled order's units to the catalog.
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id()))]
    async fn restock(&self, order: &Order) -> Result<(), PlacementError> {
        let snapshot = CatalogSnapshot::new(self.catalog.fetch_catalog().await?);

        let mut updates = Vec::new();
        for (product_id, quantity) in order.quantities_by_product() {
            match snapshot.get(product_id) {
                Some(product) => updates.push(
                    product.with_inventory(product.inventory_count.saturating_add(quantity)),
                ),
                None => {
                    tracing::warn!(%product_id, quantity, "product no longer in catalog, not restocked");
                }
            }
        }

        if !updates.is_empty() {
            self.catalog.apply_inventory(updates).await?;
        }
        tracing::info!("cancelled order restocked");
        Ok(())
    }
}

/// Computes the inventory records to write back for a priced order.
///
/// Fails with [`PlacementError::InvariantViolation`] if any count would go
/// negative.
fn decremented_inventory(
    priced: &PricedOrder,
    snapshot: &CatalogSnapshot,
) -> Result<Vec<Product>, PlacementError> {
    priced
        .quantities_by_product()
        .into_iter()
        .map(|(product_id, requested)| -> Result<Product, PlacementError> {
            let product = snapshot
                .get(product_id)
                .ok_or(PricingError::UnknownProduct(product_id))?;
            let remaining = product.inventory_count.checked_sub(requested).ok_or(
                PlacementError::InvariantViolation {
                    product_id,
                    requested,
                    available: product.inventory_count,
                },
            )?;
            Ok(product.with_inventory(remaining))
        })
        .collect()
}
