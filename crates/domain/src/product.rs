//! Catalog products as seen by the order side.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::{Money, ProductId};
use serde::{Deserialize, Deserializer, Serialize};

/// Product category tag.
///
/// The set of categories is open; only [`Category::PREMIUM`] carries
/// pricing meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub const PREMIUM: &'static str = "Premium";
    pub const REGULAR: &'static str = "Regular";
    pub const BUDGET: &'static str = "Budget";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if products in this category count towards the premium discount.
    pub fn is_premium(&self) -> bool {
        self.0 == Self::PREMIUM
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A catalog product record, exactly as exchanged with the product service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(deserialize_with = "non_negative_price")]
    pub price: Money,
    pub inventory_count: u32,
    pub category: Category,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        inventory_count: u32,
        category: impl Into<Category>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            inventory_count,
            category: category.into(),
            created_at,
        }
    }

    /// Returns a copy of this record carrying a different inventory count.
    pub fn with_inventory(&self, inventory_count: u32) -> Self {
        Self {
            inventory_count,
            ..self.clone()
        }
    }
}

fn non_negative_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
    let price = Money::deserialize(deserializer)?;
    if price.is_negative() {
        return Err(serde::de::Error::custom(format!(
            "product price must not be negative, got {price}"
        )));
    }
    Ok(price)
}

/// Body of `GET /products`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    pub products: Vec<Product>,
}

/// Point-in-time view of the catalog, keyed by product ID.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    products: HashMap<ProductId, Product>,
}

impl CatalogSnapshot {
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// The catalog the product service starts with.
pub fn seed_catalog(created_at: DateTime<Utc>) -> Vec<Product> {
    vec![
        Product::new(1u64, "Product 1", Money::from_cents(1050), 5, Category::PREMIUM, created_at),
        Product::new(2u64, "Product 2", Money::from_cents(550), 7, Category::REGULAR, created_at),
        Product::new(3u64, "Product 3", Money::from_cents(250), 11, Category::BUDGET, created_at),
        Product::new(4u64, "Product 4", Money::from_cents(1250), 9, Category::PREMIUM, created_at),
        Product::new(5u64, "Product 5", Money::from_cents(750), 10, Category::REGULAR, created_at),
        Product::new(6u64, "Product 6", Money::from_cents(950), 14, Category::PREMIUM, created_at),
    ]
}
