//! Order lifecycle controller.
//!
//! Checkout turns the cart into an [`Order`] atomically: every check runs
//! before anything is mutated, so a failed checkout leaves both the cart and
//! the order book exactly as they were.
//!
//! Status only moves through [`OrderBook::advance`]; tracking is read-only.

use bazaar_core::{OrderId, OrderStatus, PaymentMethod, Price, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::budget::BudgetGuard;
use crate::cart::{Cart, CartLine};
use crate::error::ShopError;

const NOT_FOUND_MESSAGE: &str = "Order not found. Please check order ID from your recent orders.";
const EMPTY_TRACKING_MESSAGE: &str = "Enter an order ID to track delivery.";

/// Snapshot of a cart line at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub qty: u32,
}

impl From<&CartLine> for LineItem {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.product.id,
            name: line.product.name.clone(),
            price: line.product.price,
            qty: line.qty,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<LineItem>,
    pub total: Price,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Number of units across all items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.qty).sum()
    }
}

/// Result of a tracking lookup. An unknown id is an answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tracking {
    Found { order_id: OrderId, status: OrderStatus },
    NotFound { order_id: OrderId },
}

impl Tracking {
    /// Message shown in the delivery panel.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Found { order_id, status } => {
                format!("Order {order_id}: {status} and currently in transit.")
            }
            Self::NotFound { .. } => NOT_FOUND_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        match self {
            Self::Found { order_id, .. } | Self::NotFound { order_id } => order_id,
        }
    }

    #[must_use]
    pub const fn status(&self) -> Option<OrderStatus> {
        match self {
            Self::Found { status, .. } => Some(*status),
            Self::NotFound { .. } => None,
        }
    }
}

/// Orders placed in one session, newest first.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    #[must_use]
    pub const fn new() -> Self {
        Self { orders: Vec::new() }
    }

    /// Place an order for everything in `cart`.
    ///
    /// On success the cart is cleared and the order is returned.
    ///
    /// # Errors
    ///
    /// - `ShopError::EmptyCart` if the cart has no lines
    /// - `ShopError::BudgetExceeded` if the cart total is above the budget limit
    pub fn checkout(
        &mut self,
        cart: &mut Cart,
        payment_method: PaymentMethod,
        budget: &BudgetGuard,
    ) -> Result<Order, ShopError> {
        if cart.is_empty() {
            return Err(ShopError::EmptyCart);
        }
        let total = cart.total();
        budget.ensure_within(total)?;

        let now = Utc::now();
        let order = Order {
            id: self.allocate_id(now),
            items: cart.lines().iter().map(LineItem::from).collect(),
            total,
            payment_method,
            status: OrderStatus::Confirmed,
            created_at: now,
        };

        self.orders.insert(0, order.clone());
        cart.clear();

        tracing::info!(
            order_id = %order.id,
            total = %order.total,
            payment_method = %order.payment_method,
            "Order placed"
        );
        Ok(order)
    }

    /// Look up an order by user-entered id (trimmed, case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Validation` for blank input.
    pub fn track(&self, input: &str) -> Result<Tracking, ShopError> {
        if input.trim().is_empty() {
            return Err(ShopError::Validation(EMPTY_TRACKING_MESSAGE.to_string()));
        }

        Ok(self.get(input).map_or_else(
            || Tracking::NotFound {
                order_id: OrderId::normalize(input),
            },
            |order| Tracking::Found {
                order_id: order.id.clone(),
                status: order.status,
            },
        ))
    }

    /// Move an order one stage forward.
    ///
    /// # Errors
    ///
    /// - `ShopError::NotFound` for an unknown id
    /// - `ShopError::Validation` if the order is already delivered
    pub fn advance(&mut self, input: &str) -> Result<OrderStatus, ShopError> {
        let order = self
            .orders
            .iter_mut()
            .find(|order| order.id.matches(input))
            .ok_or_else(|| ShopError::NotFound(format!("Order {}", OrderId::normalize(input))))?;

        let next = order.status.next().ok_or_else(|| {
            ShopError::Validation(format!("Order {} is already delivered.", order.id))
        })?;
        order.status = next;

        tracing::info!(order_id = %order.id, status = %next, "Order advanced");
        Ok(next)
    }

    #[must_use]
    pub fn get(&self, input: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.id.matches(input))
    }

    /// All orders, newest first.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Most recently placed order.
    #[must_use]
    pub fn latest(&self) -> Option<&Order> {
        self.orders.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// `ORD` + the last seven digits of the clock, bumped past collisions.
    fn allocate_id(&self, now: DateTime<Utc>) -> OrderId {
        let mut sequence = now.timestamp_millis().unsigned_abs();
        loop {
            let id = OrderId::from_sequence(sequence);
            if self.get(id.as_str()).is_none() {
                return id;
            }
            sequence = sequence.wrapping_add(1);
        }
    }
}
