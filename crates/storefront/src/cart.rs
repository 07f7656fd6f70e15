//! Cart and wishlist store.
//!
//! The cart holds at most one line per product; adding a product that is
//! already present bumps its quantity. The wishlist is a set of products kept
//! in insertion order. Neither type knows about budgets; the shop controller
//! re-evaluates the budget guard after every mutation.

use bazaar_core::{Price, Product, ProductId};
use serde::{Deserialize, Serialize};

/// A product snapshot plus a positive quantity.
///
/// On the wire the product fields are flattened next to `qty`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub qty: u32,
}

impl CartLine {
    /// Price of the whole line.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.product.price.times(self.qty)
    }
}

/// Shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Rebuild a cart from lines fetched elsewhere (e.g. a remote API).
    ///
    /// Duplicate product ids are merged and zero-quantity lines dropped so the
    /// one-line-per-product invariant holds.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.add_quantity(&line.product, line.qty);
        }
        cart
    }

    /// Add one unit of `product`, returning the updated line.
    pub fn add(&mut self, product: &Product) -> CartLine {
        self.add_quantity(product, 1)
    }

    /// Add `qty` units of `product`, merging into an existing line.
    ///
    /// A zero quantity is treated as one.
    pub fn add_quantity(&mut self, product: &Product, qty: u32) -> CartLine {
        let qty = qty.max(1);
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product.id == product.id)
        {
            line.qty = line.qty.saturating_add(qty);
            return line.clone();
        }

        let line = CartLine {
            product: product.clone(),
            qty,
        };
        self.lines.push(line.clone());
        line
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product.id != product_id);
        self.lines.len() != before
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Total number of units.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.qty).sum()
    }

    /// Quantity of `product_id`, zero if absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.lines
            .iter()
            .find(|line| line.product.id == product_id)
            .map_or(0, |line| line.qty)
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Saved-for-later products with set semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wishlist {
    items: Vec<Product>,
}

impl Wishlist {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild a wishlist from fetched products, dropping duplicates.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = Product>) -> Self {
        let mut wishlist = Self::new();
        for product in items {
            wishlist.add(&product);
        }
        wishlist
    }

    /// Insert `product` unless already present. Returns whether it was inserted.
    pub fn add(&mut self, product: &Product) -> bool {
        if self.contains(product.id) {
            return false;
        }
        self.items.push(product.clone());
        true
    }

    /// Remove `product_id`. Returns whether it was present.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|product| product.id != product_id);
        self.items.len() != before
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|product| product.id == product_id)
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
