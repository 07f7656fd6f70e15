//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                   - Health check
//!
//! # Products
//! GET    /api/products?search=&category=           - Filtered product listing
//!
//! # Cart
//! GET    /api/cart?sessionId=                      - Cart lines
//! POST   /api/cart/items                           - Add (or merge) a line
//! DELETE /api/cart/items/{productId}?sessionId=    - Remove a line
//!
//! # Wishlist
//! GET    /api/wishlist?sessionId=                  - Wishlist products
//! POST   /api/wishlist/items                       - Save a product
//! DELETE /api/wishlist/items/{productId}?sessionId= - Remove a product
//!
//! # Orders
//! GET    /api/orders?sessionId=                    - Orders, newest first
//! POST   /api/orders                               - Checkout
//! GET    /api/orders/track/{orderId}?sessionId=    - Delivery status
//! POST   /api/orders/{orderId}/advance?sessionId=  - Move one stage forward
//!
//! # Assistant
//! POST   /api/chat                                 - Keyword assistant reply
//! ```

pub mod cart;
pub mod chat;
pub mod orders;
pub mod products;
pub mod wishlist;

use axum::{
    Json, Router,
    extract::{Request, rejection::JsonRejection},
    middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add))
        .route("/items/{product_id}", delete(cart::remove))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/items", post(wishlist::add))
        .route("/items/{product_id}", delete(wishlist::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/track/{order_id}", get(orders::track))
        .route("/{order_id}/advance", post(orders::advance))
}

/// Create all `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/orders", order_routes())
        .route("/chat", post(chat::reply))
}

/// Build the complete application with middleware applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Unwrap a JSON body, turning extractor rejections into JSON 400 errors.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::test_support::{app, send};
    use crate::middleware::REQUEST_ID_HEADER;

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_request_id_generated_and_echoed() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let response = app()
            .oneshot(
                Request::get("/health")
                    .header(REQUEST_ID_HEADER, "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");
    }

    #[tokio::test]
    async fn test_malformed_json_is_json_400() {
        let app = app();
        let request = Request::post("/api/cart/items")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
