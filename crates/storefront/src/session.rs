//! Per-session shop state: cart, wishlist, and order book.
//!
//! The API server keeps one of these per session id; the in-memory backend
//! owns exactly one. Product ids are resolved against a [`Catalog`] so every
//! line holds a snapshot of the current product record.

use bazaar_core::{PaymentMethod, Product, ProductId};

use crate::budget::BudgetGuard;
use crate::cart::{Cart, CartLine, Wishlist};
use crate::catalog::Catalog;
use crate::error::ShopError;
use crate::orders::{Order, OrderBook, Tracking};

#[derive(Debug, Clone, Default)]
pub struct ShopSession {
    cart: Cart,
    wishlist: Wishlist,
    orders: OrderBook,
}

impl ShopSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    #[must_use]
    pub const fn orders(&self) -> &OrderBook {
        &self.orders
    }

    /// Add `qty` units of a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::NotFound` if the product is not in the catalog.
    pub fn add_to_cart(
        &mut self,
        catalog: &Catalog,
        product_id: ProductId,
        qty: u32,
    ) -> Result<CartLine, ShopError> {
        let product = lookup(catalog, product_id)?;
        Ok(self.cart.add_quantity(product, qty))
    }

    /// Remove a cart line. Removing an absent line is not an error.
    pub fn remove_from_cart(&mut self, product_id: ProductId) {
        self.cart.remove(product_id);
    }

    /// Save a catalog product to the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::NotFound` if the product is not in the catalog.
    pub fn add_to_wishlist(
        &mut self,
        catalog: &Catalog,
        product_id: ProductId,
    ) -> Result<Product, ShopError> {
        let product = lookup(catalog, product_id)?;
        self.wishlist.add(product);
        Ok(product.clone())
    }

    pub fn remove_from_wishlist(&mut self, product_id: ProductId) {
        self.wishlist.remove(product_id);
    }

    /// Turn the cart into an order.
    ///
    /// # Errors
    ///
    /// See [`OrderBook::checkout`].
    pub fn place_order(
        &mut self,
        payment_method: PaymentMethod,
        budget: &BudgetGuard,
    ) -> Result<Order, ShopError> {
        self.orders.checkout(&mut self.cart, payment_method, budget)
    }

    /// Look up an order's delivery status.
    ///
    /// # Errors
    ///
    /// See [`OrderBook::track`].
    pub fn track(&self, order_id: &str) -> Result<Tracking, ShopError> {
        self.orders.track(order_id)
    }

    /// Move an order one delivery stage forward.
    ///
    /// # Errors
    ///
    /// See [`OrderBook::advance`].
    pub fn advance_order(&mut self, order_id: &str) -> Result<Order, ShopError> {
        self.orders.advance(order_id)?;
        self.orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| ShopError::NotFound(format!("Order {order_id}")))
    }
}

fn lookup(catalog: &Catalog, product_id: ProductId) -> Result<&Product, ShopError> {
    catalog
        .get(product_id)
        .ok_or_else(|| ShopError::NotFound(format!("Product {product_id}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::{OrderStatus, Price};

    use super::*;

    #[test]
    fn test_add_merges_quantity() {
        let catalog = Catalog::generate(5);
        let mut session = ShopSession::new();

        session.add_to_cart(&catalog, ProductId::new(2), 1).unwrap();
        let line = session.add_to_cart(&catalog, ProductId::new(2), 2).unwrap();

        assert_eq!(line.qty, 3);
        assert_eq!(session.cart().lines().len(), 1);
    }

    #[test]
    fn test_unknown_product_is_not_found() {
        let catalog = Catalog::generate(5);
        let mut session = ShopSession::new();

        let err = session
            .add_to_cart(&catalog, ProductId::new(99), 1)
            .unwrap_err();
        assert_eq!(err.to_string(), "Not found: Product 99");
        assert!(session.cart().is_empty());

        assert!(matches!(
            session.add_to_wishlist(&catalog, ProductId::new(99)),
            Err(ShopError::NotFound(_))
        ));
    }

    #[test]
    fn test_wishlist_roundtrip() {
        let catalog = Catalog::generate(5);
        let mut session = ShopSession::new();

        session.add_to_wishlist(&catalog, ProductId::new(1)).unwrap();
        session.add_to_wishlist(&catalog, ProductId::new(1)).unwrap();
        assert_eq!(session.wishlist().len(), 1);

        session.remove_from_wishlist(ProductId::new(1));
        session.remove_from_wishlist(ProductId::new(1));
        assert!(session.wishlist().is_empty());
    }

    #[test]
    fn test_place_order_and_advance() {
        let catalog = Catalog::generate(5);
        let mut session = ShopSession::new();
        session.add_to_cart(&catalog, ProductId::new(1), 2).unwrap();

        let order = session
            .place_order(PaymentMethod::Upi, &BudgetGuard::unlimited())
            .unwrap();
        assert_eq!(order.total, Price::from_rupees(474).times(2));
        assert!(session.cart().is_empty());

        let advanced = session.advance_order(order.id.as_str()).unwrap();
        assert_eq!(advanced.status, OrderStatus::Packed);
        assert_eq!(
            session.track(order.id.as_str()).unwrap().status(),
            Some(OrderStatus::Packed)
        );
    }
}
