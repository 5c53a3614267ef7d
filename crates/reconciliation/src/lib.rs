//! Order placement across the order/catalog service boundary.
//!
//! There is no distributed transaction between the order store and the
//! product catalog. Placing an order follows a fixed protocol:
//! 1. Fetch a catalog snapshot
//! 2. Price the order and check stock against the snapshot
//! 3. Compute the new absolute inventory counts
//! 4. Write the counts back to the catalog
//! 5. Persist the order locally
//!
//! A failure before step 5 leaves no local order behind. A crash between
//! steps 4 and 5 leaves inventory decremented with no order recorded.

pub mod coordinator;
pub mod error;
pub mod services;
pub mod store;

pub use coordinator::{CoordinatorOptions, ReconciliationCoordinator};
pub use error::{PlacementError, Result};
pub use services::{CatalogClient, HttpCatalogClient, InMemoryCatalogClient};
pub use store::OrderStore;
