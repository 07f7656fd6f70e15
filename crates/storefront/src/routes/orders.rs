//! Checkout, order history, and delivery tracking handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use bazaar_core::PaymentMethod;
use tracing::instrument;

use super::json_body;
use crate::api::{PlaceOrderRequest, SessionQuery, TrackResponse};
use crate::backend::guard_for;
use crate::error::{AppError, Result};
use crate::orders::Order;
use crate::state::AppState;

/// Orders for a session, newest first.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Vec<Order>>> {
    let session = state.session(query.session_id.as_deref()).await?;
    let orders = session.lock().await.orders().orders().to_vec();
    Ok(Json(orders))
}

/// Place an order for the session's cart.
///
/// The cart is only cleared when the order is created.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>)> {
    let request = json_body(payload)?;
    let payment_method = parse_payment_method(&request.payment_method)?;
    let guard = guard_for(request.budget_limit);

    let session = state.session(Some(&request.session_id)).await?;
    let order = session.lock().await.place_order(payment_method, &guard)?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// Delivery status of an order. Unknown ids answer `200` with
/// status `NOT_FOUND`.
#[instrument(skip(state))]
pub async fn track(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<TrackResponse>> {
    let session = state.session(query.session_id.as_deref()).await?;
    let tracking = session.lock().await.track(&order_id)?;
    Ok(Json(TrackResponse::from(&tracking)))
}

/// Move an order one delivery stage forward.
#[instrument(skip(state))]
pub async fn advance(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Order>> {
    let session = state.session(query.session_id.as_deref()).await?;
    let order = session.lock().await.advance_order(&order_id)?;
    Ok(Json(order))
}

fn parse_payment_method(raw: &str) -> Result<PaymentMethod> {
    if raw.trim().is_empty() {
        return Err(AppError::BadRequest("paymentMethod is required".to_string()));
    }
    raw.parse().map_err(AppError::BadRequest)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, http::StatusCode};
    use serde_json::{Value, json};

    use crate::routes::test_support::{app, send};

    async fn add_item(app: &Router, session: &str, product_id: i32) {
        let (status, _) = send(
            app,
            "POST",
            "/api/cart/items",
            Some(json!({"sessionId": session, "productId": product_id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    async fn checkout(app: &Router, body: Value) -> (StatusCode, Value) {
        send(app, "POST", "/api/orders", Some(body)).await
    }

    #[tokio::test]
    async fn test_checkout_creates_order_and_clears_cart() {
        let app = app();
        add_item(&app, "o1", 1).await;
        add_item(&app, "o1", 1).await;

        let (status, order) =
            checkout(&app, json!({"sessionId": "o1", "paymentMethod": "Net Banking"})).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(order["total"], 948.0);
        assert_eq!(order["paymentMethod"], "Net Banking");
        assert_eq!(order["status"], "Order Confirmed");
        assert_eq!(order["items"][0]["qty"], 2);
        assert!(order["id"].as_str().unwrap().starts_with("ORD"));

        let (_, cart) = send(&app, "GET", "/api/cart?sessionId=o1", None).await;
        assert!(cart.as_array().unwrap().is_empty());

        let (_, orders) = send(&app, "GET", "/api/orders?sessionId=o1", None).await;
        assert_eq!(orders.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_rejections_keep_cart() {
        let app = app();

        let (status, body) = checkout(&app, json!({"sessionId": "o2", "paymentMethod": "UPI"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Your cart is empty. Add items before placing an order."
        );

        add_item(&app, "o2", 1).await;
        let (status, body) = checkout(
            &app,
            json!({"sessionId": "o2", "paymentMethod": "UPI", "budgetLimit": 100}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Order blocked because cart total Rs 474 exceeds your budget limit of Rs 100."
        );

        let (status, body) = checkout(&app, json!({"sessionId": "o2", "paymentMethod": " "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "paymentMethod is required");

        let (status, _) = checkout(&app, json!({"sessionId": "o2", "paymentMethod": "gold"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, cart) = send(&app, "GET", "/api/cart?sessionId=o2", None).await;
        assert_eq!(cart.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_track_and_advance() {
        let app = app();
        add_item(&app, "o3", 4).await;
        let (_, order) = checkout(&app, json!({"sessionId": "o3", "paymentMethod": "UPI"})).await;
        let id = order["id"].as_str().unwrap().to_string();

        let uri = format!("/api/orders/track/{}?sessionId=o3", id.to_lowercase());
        let (status, tracking) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tracking["orderId"], id.as_str());
        assert_eq!(tracking["status"], "Order Confirmed");

        let uri = format!("/api/orders/{id}/advance?sessionId=o3");
        let (status, advanced) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(advanced["status"], "Packed");

        for _ in 0..3 {
            send(&app, "POST", &uri, None).await;
        }
        let (status, body) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], format!("Order {id} is already delivered."));
    }

    #[tokio::test]
    async fn test_track_unknown_order() {
        let app = app();
        let (status, tracking) =
            send(&app, "GET", "/api/orders/track/ord0000001?sessionId=o4", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tracking["orderId"], "ORD0000001");
        assert_eq!(tracking["status"], "NOT_FOUND");

        let (status, _) =
            send(&app, "POST", "/api/orders/ORD0000001/advance?sessionId=o4", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
