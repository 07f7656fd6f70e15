//! REST backend talking to the storefront JSON API.
//!
//! Every call carries the client's session id. Non-success responses become
//! [`TransportError::Status`] with the server's `{ "error": ... }` message, or
//! `Request failed: {status}` when the body has none.

use std::time::Duration;

use bazaar_core::{PaymentMethod, Price, Product, ProductId, SessionId};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::ShopBackend;
use crate::api::{
    AddCartItemRequest, AddWishlistItemRequest, ChatRequest, ChatResponse, ErrorBody,
    PlaceOrderRequest, TrackResponse,
};
use crate::assistant::ChatContext;
use crate::cart::CartLine;
use crate::error::{ShopError, TransportError};
use crate::filter::ProductQuery;
use crate::orders::{Order, Tracking};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for one session on a remote storefront API.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: reqwest::Client,
    base_url: Url,
    session_id: SessionId,
}

impl RemoteBackend {
    /// Create a backend rooted at `base_url` (which should end with `/`).
    #[must_use]
    pub fn new(base_url: Url, session_id: SessionId) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            session_id,
        }
    }

    #[must_use]
    pub const fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL, optionally tagged with `?sessionId=`.
    fn url(&self, path: &str, with_session: bool) -> Result<Url, TransportError> {
        let mut url = self.base_url.join(path)?;
        if with_session {
            url.query_pairs_mut()
                .append_pair("sessionId", self.session_id.as_str());
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .timeout(REQUEST_TIMEOUT)
    }

    /// Send and decode a JSON body.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TransportError> {
        let text = Self::send(request).await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse storefront API response"
            );
            TransportError::Parse(e)
        })
    }

    /// Send and return the raw body, mapping non-success statuses to errors.
    async fn send(request: RequestBuilder) -> Result<String, TransportError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("Request failed: {}", status.as_u16()));
            tracing::warn!(status = %status, error = %message, "Storefront API returned non-success status");
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(text)
    }

    fn item_path(collection: &str, product_id: ProductId) -> String {
        format!("api/{collection}/items/{product_id}")
    }
}

impl ShopBackend for RemoteBackend {
    #[instrument(skip(self))]
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ShopError> {
        let mut url = self.url("api/products", false)?;
        url.query_pairs_mut()
            .append_pair("search", query.search.trim())
            .append_pair("category", query.category.as_str());
        Ok(self.fetch(self.request(Method::GET, url)).await?)
    }

    #[instrument(skip(self))]
    async fn cart(&self) -> Result<Vec<CartLine>, ShopError> {
        let url = self.url("api/cart", true)?;
        Ok(self.fetch(self.request(Method::GET, url)).await?)
    }

    #[instrument(skip(self))]
    async fn add_cart_item(
        &mut self,
        product_id: ProductId,
        qty: u32,
    ) -> Result<CartLine, ShopError> {
        let url = self.url("api/cart/items", false)?;
        let body = AddCartItemRequest {
            session_id: self.session_id.to_string(),
            product_id,
            qty,
        };
        Ok(self
            .fetch(self.request(Method::POST, url).json(&body))
            .await?)
    }

    #[instrument(skip(self))]
    async fn remove_cart_item(&mut self, product_id: ProductId) -> Result<(), ShopError> {
        let url = self.url(&Self::item_path("cart", product_id), true)?;
        Self::send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn wishlist(&self) -> Result<Vec<Product>, ShopError> {
        let url = self.url("api/wishlist", true)?;
        Ok(self.fetch(self.request(Method::GET, url)).await?)
    }

    #[instrument(skip(self))]
    async fn add_wishlist_item(&mut self, product_id: ProductId) -> Result<Product, ShopError> {
        let url = self.url("api/wishlist/items", false)?;
        let body = AddWishlistItemRequest {
            session_id: self.session_id.to_string(),
            product_id,
        };
        Ok(self
            .fetch(self.request(Method::POST, url).json(&body))
            .await?)
    }

    #[instrument(skip(self))]
    async fn remove_wishlist_item(&mut self, product_id: ProductId) -> Result<(), ShopError> {
        let url = self.url(&Self::item_path("wishlist", product_id), true)?;
        Self::send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn orders(&self) -> Result<Vec<Order>, ShopError> {
        let url = self.url("api/orders", true)?;
        Ok(self.fetch(self.request(Method::GET, url)).await?)
    }

    #[instrument(skip(self))]
    async fn place_order(
        &mut self,
        payment_method: PaymentMethod,
        budget_limit: Option<Price>,
    ) -> Result<Order, ShopError> {
        let url = self.url("api/orders", false)?;
        let body = PlaceOrderRequest {
            session_id: self.session_id.to_string(),
            payment_method: payment_method.label().to_string(),
            budget_limit,
        };
        Ok(self
            .fetch(self.request(Method::POST, url).json(&body))
            .await?)
    }

    #[instrument(skip(self))]
    async fn track(&self, order_id: &str) -> Result<Tracking, ShopError> {
        let order_id = order_id.trim();
        if order_id.is_empty() {
            return Err(ShopError::Validation(
                "Enter an order ID to track delivery.".to_string(),
            ));
        }
        let path = format!("api/orders/track/{}", urlencoding::encode(order_id));
        let url = self.url(&path, true)?;
        let response: TrackResponse = self.fetch(self.request(Method::GET, url)).await?;
        Ok(response.into_tracking())
    }

    #[instrument(skip(self))]
    async fn advance_order(&mut self, order_id: &str) -> Result<Order, ShopError> {
        let path = format!("api/orders/{}/advance", urlencoding::encode(order_id.trim()));
        let url = self.url(&path, true)?;
        Ok(self.fetch(self.request(Method::POST, url)).await?)
    }

    #[instrument(skip(self, context))]
    async fn chat(&self, message: &str, context: ChatContext<'_>) -> Result<String, ShopError> {
        let url = self.url("api/chat", false)?;
        let body = ChatRequest {
            message: message.to_string(),
            session_id: Some(self.session_id.to_string()),
            budget_limit: Some(context.budget.limit),
            budget_period: Some(context.budget.period),
        };
        let response: ChatResponse = self
            .fetch(self.request(Method::POST, url).json(&body))
            .await?;
        Ok(response.reply)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::parse_base_url;

    fn backend() -> RemoteBackend {
        RemoteBackend::new(
            parse_base_url("http://localhost:3000/shop").unwrap(),
            SessionId::parse("abc 123").unwrap(),
        )
    }

    #[test]
    fn test_url_keeps_prefix_and_encodes_session() {
        let url = backend().url("api/cart", true).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/shop/api/cart?sessionId=abc+123"
        );
    }

    #[test]
    fn test_item_path() {
        assert_eq!(
            RemoteBackend::item_path("wishlist", ProductId::new(12)),
            "api/wishlist/items/12"
        );
    }

    #[tokio::test]
    async fn test_blank_tracking_id_is_rejected_without_request() {
        let err = backend().track("  ").await.unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let backend = RemoteBackend::new(
            parse_base_url("http://127.0.0.1:1").unwrap(),
            SessionId::generate(),
        );
        let err = backend.cart().await.unwrap_err();
        assert!(matches!(err, ShopError::Transport(TransportError::Http(_))));
    }
}
