//! Filter engine for product listings.
//!
//! A product is visible when its category passes the [`CategoryFilter`] AND
//! the search term is a case-insensitive substring of its name OR its
//! description. An empty term matches everything. Filtering is stable and
//! never mutates its input.

use bazaar_core::{CategoryFilter, Product};
use serde::{Deserialize, Serialize};

/// Search term plus category selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: CategoryFilter,
}

impl ProductQuery {
    /// Create a query.
    #[must_use]
    pub fn new(search: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }

    /// Whether `product` passes this query.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.category.matches(product.category) && matches_search(product, &self.needle())
    }

    /// Normalized search term: trimmed and lower-cased.
    fn needle(&self) -> String {
        self.search.trim().to_lowercase()
    }
}

/// Products passing `query`, in catalog order.
#[must_use]
pub fn filter_products(products: &[Product], query: &ProductQuery) -> Vec<Product> {
    let needle = query.needle();
    products
        .iter()
        .filter(|product| query.category.matches(product.category))
        .filter(|product| matches_search(product, &needle))
        .cloned()
        .collect()
}

fn matches_search(product: &Product, needle: &str) -> bool {
    needle.is_empty()
        || product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use bazaar_core::{Category, Price, ProductId, Rating};

    use super::*;
    use crate::catalog::Catalog;

    fn product(id: i32, name: &str, category: Category, description: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            category,
            description: description.to_string(),
            price: Price::from_rupees(100),
            rating: Rating::default(),
        }
    }

    #[test]
    fn test_category_only_keeps_catalog_order() {
        let catalog = Catalog::generate(24);
        let query = ProductQuery::new("", CategoryFilter::Only(Category::Electronics));

        let result = filter_products(catalog.products(), &query);

        let expected: Vec<Product> = catalog
            .products()
            .iter()
            .filter(|p| p.category == Category::Electronics)
            .cloned()
            .collect();
        assert_eq!(result, expected);
        assert_eq!(
            result.iter().map(|p| p.id.as_i32()).collect::<Vec<_>>(),
            vec![1, 7, 13, 19]
        );
    }

    #[test]
    fn test_search_matches_description_case_insensitively() {
        let products = vec![
            product(1, "Pocket Gadget", Category::Electronics, "Works with any Phone."),
            product(2, "Desk Lamp", Category::Home, "Warm light."),
        ];

        let result = filter_products(&products, &ProductQuery::new("phone", CategoryFilter::All));

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, ProductId::new(1));
    }

    #[test]
    fn test_search_and_category_are_combined() {
        let products = vec![
            product(1, "Running Shoes", Category::Sports, "Light shoes."),
            product(2, "Dress Shoes", Category::Fashion, "Leather shoes."),
        ];
        let query = ProductQuery::new("shoes", CategoryFilter::Only(Category::Fashion));

        let result = filter_products(&products, &query);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Dress Shoes");
        assert!(query.matches(&products[1]));
        assert!(!query.matches(&products[0]));
    }

    #[test]
    fn test_empty_and_blank_search_match_all() {
        let catalog = Catalog::generate(10);
        assert_eq!(
            filter_products(catalog.products(), &ProductQuery::default()).len(),
            10
        );
        assert_eq!(
            filter_products(catalog.products(), &ProductQuery::new("   ", CategoryFilter::All)).len(),
            10
        );
    }

    #[test]
    fn test_input_is_untouched() {
        let catalog = Catalog::generate(6);
        let before = catalog.products().to_vec();
        let _ = filter_products(catalog.products(), &ProductQuery::new("books", CategoryFilter::All));
        assert_eq!(catalog.products(), before.as_slice());
    }

    #[test]
    fn test_no_match() {
        let catalog = Catalog::generate(6);
        let result = filter_products(
            catalog.products(),
            &ProductQuery::new("telescope", CategoryFilter::All),
        );
        assert!(result.is_empty());
    }
}
