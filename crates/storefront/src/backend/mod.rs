//! Catalog and persistence backends.
//!
//! [`ShopBackend`] is the boundary between the shop controller and wherever
//! products, carts, wishlists, orders, and the assistant live:
//!
//! - [`LocalBackend`] keeps everything in memory over a generated catalog.
//! - [`RemoteBackend`] talks to the JSON API served by `bazaar-storefront`.
//!
//! Both are scoped to one shopper session.

mod local;
mod remote;

pub(crate) use local::guard_for;
pub use local::LocalBackend;
pub use remote::RemoteBackend;

use bazaar_core::{PaymentMethod, Price, Product, ProductId};

use crate::assistant::ChatContext;
use crate::cart::CartLine;
use crate::error::ShopError;
use crate::filter::ProductQuery;
use crate::orders::{Order, Tracking};

/// Storage and catalog operations for one session.
#[allow(async_fn_in_trait)]
pub trait ShopBackend {
    /// Products matching `query`, in catalog order.
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ShopError>;

    async fn cart(&self) -> Result<Vec<CartLine>, ShopError>;

    /// Add `qty` units, merging into an existing line.
    async fn add_cart_item(&mut self, product_id: ProductId, qty: u32)
    -> Result<CartLine, ShopError>;

    /// Remove a line. Removing an absent line succeeds.
    async fn remove_cart_item(&mut self, product_id: ProductId) -> Result<(), ShopError>;

    async fn wishlist(&self) -> Result<Vec<Product>, ShopError>;

    async fn add_wishlist_item(&mut self, product_id: ProductId) -> Result<Product, ShopError>;

    async fn remove_wishlist_item(&mut self, product_id: ProductId) -> Result<(), ShopError>;

    /// Orders, newest first.
    async fn orders(&self) -> Result<Vec<Order>, ShopError>;

    /// Turn the stored cart into an order.
    ///
    /// With `budget_limit` set, carts above it are refused with
    /// `ShopError::BudgetExceeded`.
    async fn place_order(
        &mut self,
        payment_method: PaymentMethod,
        budget_limit: Option<Price>,
    ) -> Result<Order, ShopError>;

    async fn track(&self, order_id: &str) -> Result<Tracking, ShopError>;

    /// Move an order one delivery stage forward.
    ///
    /// Unknown orders are `ShopError::NotFound`; delivered ones are
    /// `ShopError::Validation`.
    async fn advance_order(&mut self, order_id: &str) -> Result<Order, ShopError>;

    /// Ask the assistant, which recommends from the whole catalog.
    ///
    /// `message` must not be blank.
    async fn chat(&self, message: &str, context: ChatContext<'_>) -> Result<String, ShopError>;
}
