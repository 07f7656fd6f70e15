//! JSON wire types shared by the API server routes and the REST backend.
//!
//! Field names are camelCase on the wire. Products, cart lines, and orders
//! reuse the domain types directly ([`Product`], [`CartLine`], [`Order`]).
//!
//! [`Product`]: bazaar_core::Product
//! [`CartLine`]: crate::cart::CartLine
//! [`Order`]: crate::orders::Order

use bazaar_core::{BudgetPeriod, OrderId, OrderStatus, Price, ProductId};
use serde::{Deserialize, Serialize};

use crate::orders::Tracking;

/// `status` value of a tracking response for an unknown order.
pub const TRACK_NOT_FOUND: &str = "NOT_FOUND";

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `?sessionId=` query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuery {
    pub session_id: Option<String>,
}

/// `GET /api/products` query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    pub session_id: String,
    pub product_id: ProductId,
    #[serde(default = "default_qty")]
    pub qty: u32,
}

const fn default_qty() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWishlistItemRequest {
    pub session_id: String,
    pub product_id: ProductId,
}

/// `POST /api/orders` body.
///
/// `paymentMethod` is a label such as `"UPI"` or `"Net Banking"`. When
/// `budgetLimit` is present the server refuses carts above it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub session_id: String,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_limit: Option<Price>,
}

/// `GET /api/orders/track/{orderId}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackResponse {
    pub order_id: String,
    pub status: String,
    pub message: String,
}

impl From<&Tracking> for TrackResponse {
    fn from(tracking: &Tracking) -> Self {
        Self {
            order_id: tracking.order_id().to_string(),
            status: tracking
                .status()
                .map_or_else(|| TRACK_NOT_FOUND.to_string(), |status| status.to_string()),
            message: tracking.message(),
        }
    }
}

impl TrackResponse {
    /// Convert back into a [`Tracking`]. Unknown status strings count as not found.
    #[must_use]
    pub fn into_tracking(self) -> Tracking {
        let order_id = OrderId::normalize(&self.order_id);
        match self.status.parse::<OrderStatus>() {
            Ok(status) => Tracking::Found { order_id, status },
            Err(_) => Tracking::NotFound { order_id },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// The shopper's budget; the server default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_limit: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_period: Option<BudgetPeriod>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}
