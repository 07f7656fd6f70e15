//! In-memory backend over a generated catalog.

use std::sync::Arc;

use bazaar_core::{PaymentMethod, Price, Product, ProductId};

use super::ShopBackend;
use crate::assistant::{self, ChatContext};
use crate::budget::{BudgetGuard, BudgetPolicy};
use crate::cart::CartLine;
use crate::catalog::Catalog;
use crate::error::ShopError;
use crate::filter::ProductQuery;
use crate::orders::{Order, Tracking};
use crate::session::ShopSession;

/// Backend that keeps one session's state in process.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    catalog: Arc<Catalog>,
    session: ShopSession,
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self::new(Arc::new(Catalog::default()))
    }
}

impl LocalBackend {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            session: ShopSession::new(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

pub(crate) fn guard_for(budget_limit: Option<Price>) -> BudgetGuard {
    budget_limit.map_or_else(BudgetGuard::unlimited, |limit| {
        BudgetGuard::new(BudgetPolicy {
            limit,
            ..BudgetPolicy::default()
        })
    })
}

impl ShopBackend for LocalBackend {
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ShopError> {
        Ok(self.catalog.search(query))
    }

    async fn cart(&self) -> Result<Vec<CartLine>, ShopError> {
        Ok(self.session.cart().lines().to_vec())
    }

    async fn add_cart_item(
        &mut self,
        product_id: ProductId,
        qty: u32,
    ) -> Result<CartLine, ShopError> {
        self.session.add_to_cart(&self.catalog, product_id, qty)
    }

    async fn remove_cart_item(&mut self, product_id: ProductId) -> Result<(), ShopError> {
        self.session.remove_from_cart(product_id);
        Ok(())
    }

    async fn wishlist(&self) -> Result<Vec<Product>, ShopError> {
        Ok(self.session.wishlist().items().to_vec())
    }

    async fn add_wishlist_item(&mut self, product_id: ProductId) -> Result<Product, ShopError> {
        self.session.add_to_wishlist(&self.catalog, product_id)
    }

    async fn remove_wishlist_item(&mut self, product_id: ProductId) -> Result<(), ShopError> {
        self.session.remove_from_wishlist(product_id);
        Ok(())
    }

    async fn orders(&self) -> Result<Vec<Order>, ShopError> {
        Ok(self.session.orders().orders().to_vec())
    }

    async fn place_order(
        &mut self,
        payment_method: PaymentMethod,
        budget_limit: Option<Price>,
    ) -> Result<Order, ShopError> {
        self.session
            .place_order(payment_method, &guard_for(budget_limit))
    }

    async fn track(&self, order_id: &str) -> Result<Tracking, ShopError> {
        self.session.track(order_id)
    }

    async fn advance_order(&mut self, order_id: &str) -> Result<Order, ShopError> {
        self.session.advance_order(order_id)
    }

    async fn chat(&self, message: &str, context: ChatContext<'_>) -> Result<String, ShopError> {
        assistant::reply(message, &context.with_products(self.catalog.products()))
            .ok_or_else(|| ShopError::Validation("Type a message first.".to_string()))
    }
}
