use std::collections::HashMap;
use std::sync::Arc;

use common::OrderId;
use domain::Order;
use tokio::sync::RwLock;

#[derive(Debug)]
struct StoreState {
    orders: HashMap<OrderId, Order>,
    next_id: OrderId,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            orders: HashMap::new(),
            next_id: OrderId::FIRST,
        }
    }
}

/// In-memory order store.
///
/// The identifier counter and the order map sit behind a single lock, so
/// concurrent creations always receive distinct identifiers. Identifiers
/// are never reused.
#[derive(Debug, Clone, Default)]
pub struct OrderStore {
    state: Arc<RwLock<StoreState>>,
}

impl OrderStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next identifier, builds the order with it, and stores it.
    pub async fn create<F>(&self, build: F) -> Order
    where
        F: FnOnce(OrderId) -> Order,
    {
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id = id.next();

        let order = build(id);
        debug_assert_eq!(order.id(), id);
        state.orders.insert(id, order.clone());
        order
    }

    /// Returns a copy of the order with the given ID.
    pub async fn get(&self, id: OrderId) -> Option<Order> {
        self.state.read().await.orders.get(&id).cloned()
    }

    /// Returns every order, in identifier order.
    pub async fn list(&self) -> Vec<Order> {
        let state = self.state.read().await;
        let mut orders: Vec<Order> = state.orders.values().cloned().collect();
        orders.sort_by_key(Order::id);
        orders
    }

    /// Overwrites the stored order with the same ID.
    pub async fn save(&self, order: Order) {
        self.state.write().await.orders.insert(order.id(), order);
    }

    /// Returns the number of stored orders.
    pub async fn len(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Returns true if no orders are stored.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.orders.is_empty()
    }
}
