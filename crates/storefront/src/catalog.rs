//! Catalog provider.
//!
//! The catalog is generated deterministically in memory: product `n` lands in
//! category `(n - 1) % 6` with a price and rating derived from its id, so every
//! process (API server or in-memory client) sees the same products in the same
//! order. The catalog is immutable after construction and shared behind an
//! `Arc` by its users.

use bazaar_core::{Category, CategoryFilter, Price, Product, ProductId, Rating};
use rust_decimal::Decimal;

use crate::filter::{ProductQuery, filter_products};

/// Number of products the default catalog holds.
pub const DEFAULT_CATALOG_SIZE: usize = 520;

/// An ordered, immutable list of products.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::generate(DEFAULT_CATALOG_SIZE)
    }
}

impl Catalog {
    /// Build a catalog from existing products, keeping their order.
    #[must_use]
    pub const fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Generate `size` products with ids `1..=size`.
    #[must_use]
    pub fn generate(size: usize) -> Self {
        let products = (1..=size)
            .map_while(|n| i32::try_from(n).ok())
            .map(generate_product)
            .collect();
        Self { products }
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Products matching `query`, in catalog order.
    #[must_use]
    pub fn search(&self, query: &ProductQuery) -> Vec<Product> {
        filter_products(&self.products, query)
    }

    /// Up to `limit` products for a free-text request.
    ///
    /// Products whose name or description contains the text come first; when
    /// nothing matches, the cheapest products are offered instead.
    #[must_use]
    pub fn recommend(&self, text: &str, limit: usize) -> Vec<Product> {
        let limit = limit.max(1);
        let matched = self.search(&ProductQuery::new(text, CategoryFilter::All));
        if !matched.is_empty() {
            return matched.into_iter().take(limit).collect();
        }

        let mut cheapest = self.products.clone();
        cheapest.sort_by_key(|product| product.price);
        cheapest.truncate(limit);
        cheapest
    }
}

fn generate_product(id: i32) -> Product {
    let n = id.unsigned_abs();
    let category = Category::ALL
        .get((n as usize).saturating_sub(1) % Category::ALL.len())
        .copied()
        .unwrap_or(Category::Electronics);
    let price = 299 + (n % 18) * 175 + (n / 8) * 12;
    let rating = Decimal::from(3 + n % 3) + Decimal::new(i64::from(n % 10) * 5, 2);

    Product {
        id: ProductId::new(id),
        name: format!("{category} Product {id}"),
        category,
        description: format!(
            "Premium {} item designed for daily use and value shopping.",
            category.as_str().to_lowercase()
        ),
        price: Price::from_rupees(price),
        rating: Rating::new(rating),
    }
}
