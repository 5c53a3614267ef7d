//! Catalog client trait and its implementations.

pub mod catalog;
pub mod http;

pub use catalog::{CatalogClient, InMemoryCatalogClient};
pub use http::HttpCatalogClient;
