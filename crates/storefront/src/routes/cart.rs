//! Cart route handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use bazaar_core::ProductId;
use tracing::instrument;

use super::json_body;
use crate::api::{AddCartItemRequest, SessionQuery};
use crate::cart::CartLine;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Cart lines for a session, ordered by product id.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Vec<CartLine>>> {
    let session = state.session(query.session_id.as_deref()).await?;
    let mut lines = session.lock().await.cart().lines().to_vec();
    lines.sort_by_key(|line| line.product.id);
    Ok(Json(lines))
}

/// Add `qty` units of a product, merging into an existing line.
#[instrument(skip(state, payload))]
pub async fn add(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AddCartItemRequest>, JsonRejection>,
) -> Result<Json<CartLine>> {
    let request = json_body(payload)?;
    if request.qty == 0 {
        return Err(AppError::BadRequest("qty must be at least 1".to_string()));
    }

    let session = state.session(Some(&request.session_id)).await?;
    let line = session
        .lock()
        .await
        .add_to_cart(state.catalog(), request.product_id, request.qty)?;

    tracing::debug!(product_id = %request.product_id, qty = line.qty, "Cart line updated");
    Ok(Json(line))
}

/// Remove a product's line. Removing an absent line still succeeds.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Query(query): Query<SessionQuery>,
) -> Result<StatusCode> {
    let session = state.session(query.session_id.as_deref()).await?;
    session.lock().await.remove_from_cart(product_id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{app, send};

    #[tokio::test]
    async fn test_add_merges_and_lists() {
        let app = app();
        let body = json!({"sessionId": "s1", "productId": 1, "qty": 1});

        let (status, line) = send(&app, "POST", "/api/cart/items", Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(line["qty"], 1);

        let (_, line) = send(&app, "POST", "/api/cart/items", Some(body)).await;
        assert_eq!(line["qty"], 2);
        assert_eq!(line["name"], "Electronics Product 1");

        let (status, cart) = send(&app, "GET", "/api/cart?sessionId=s1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cart.as_array().unwrap().len(), 1);

        let (_, other) = send(&app, "GET", "/api/cart?sessionId=s2", None).await;
        assert!(other.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lines_listed_by_product_id() {
        let app = app();
        for id in [12, 3, 7] {
            send(
                &app,
                "POST",
                "/api/cart/items",
                Some(json!({"sessionId": "s1", "productId": id})),
            )
            .await;
        }

        let (_, cart) = send(&app, "GET", "/api/cart?sessionId=s1", None).await;
        let ids: Vec<i64> = cart
            .as_array()
            .unwrap()
            .iter()
            .map(|line| line["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![3, 7, 12]);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let app = app();
        send(
            &app,
            "POST",
            "/api/cart/items",
            Some(json!({"sessionId": "s1", "productId": 3})),
        )
        .await;

        for _ in 0..2 {
            let (status, _) = send(&app, "DELETE", "/api/cart/items/3?sessionId=s1", None).await;
            assert_eq!(status, StatusCode::NO_CONTENT);
        }
        let (_, cart) = send(&app, "GET", "/api/cart?sessionId=s1", None).await;
        assert!(cart.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_errors() {
        let app = app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/cart/items",
            Some(json!({"sessionId": "s1", "productId": 999})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found: Product 999");

        let (status, body) = send(&app, "GET", "/api/cart", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "sessionId is required");

        let (status, _) = send(
            &app,
            "POST",
            "/api/cart/items",
            Some(json!({"sessionId": "s1", "productId": 1, "qty": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
