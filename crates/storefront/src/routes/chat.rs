//! Keyword assistant handler.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use bazaar_core::Price;
use tracing::instrument;

use super::json_body;
use crate::api::{ChatRequest, ChatResponse};
use crate::assistant::{self, ShopSnapshot};
use crate::budget::BudgetPolicy;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Answer a chat message.
///
/// With a known `sessionId` the reply sees that session's cart total and
/// latest order; otherwise it answers from the catalog alone. Budget fields
/// left out of the request fall back to the default policy.
#[instrument(skip(state, payload))]
pub async fn reply(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let request = json_body(payload)?;
    if request.message.trim().is_empty() {
        return Err(AppError::BadRequest("message is required".to_string()));
    }

    let session = state.existing_session(request.session_id.as_deref()).await;
    let guard = match &session {
        Some(session) => Some(session.lock().await),
        None => None,
    };

    let cart_total = guard
        .as_ref()
        .map_or(Price::ZERO, |session| session.cart().total());
    let latest_order = guard
        .as_ref()
        .and_then(|session| session.orders().latest())
        .map(|order| &order.id);

    let defaults = BudgetPolicy::default();
    let snapshot = ShopSnapshot {
        products: state.catalog().products(),
        budget: BudgetPolicy {
            period: request.budget_period.unwrap_or(defaults.period),
            limit: request.budget_limit.unwrap_or(defaults.limit),
        },
        cart_total,
        latest_order,
    };

    let reply = assistant::reply(&request.message, &snapshot)
        .ok_or_else(|| AppError::BadRequest("message is required".to_string()))?;
    Ok(Json(ChatResponse { reply }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::assistant::WELCOME;
    use crate::routes::test_support::{app, send};

    #[tokio::test]
    async fn test_reply_uses_catalog() {
        let (status, body) = send(
            &app(),
            "POST",
            "/api/chat",
            Some(json!({"message": "Any good books?"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let reply = body["reply"].as_str().unwrap();
        assert!(reply.starts_with("Popular in Books: Books Product 5"));
        assert_ne!(reply, WELCOME);
    }

    #[tokio::test]
    async fn test_reply_sees_session_cart() {
        let app = app();
        send(
            &app,
            "POST",
            "/api/cart/items",
            Some(json!({"sessionId": "c1", "productId": 1})),
        )
        .await;

        let (_, body) = send(
            &app,
            "POST",
            "/api/chat",
            Some(json!({"message": "what is my budget", "sessionId": "c1"})),
        )
        .await;
        assert_eq!(
            body["reply"],
            "Your monthly budget is Rs 30,000. Current cart total is Rs 474."
        );
    }

    #[tokio::test]
    async fn test_reply_uses_request_budget() {
        let (_, body) = send(
            &app(),
            "POST",
            "/api/chat",
            Some(json!({"message": "budget", "budgetLimit": 5000, "budgetPeriod": "yearly"})),
        )
        .await;
        assert_eq!(
            body["reply"],
            "Your yearly budget is Rs 5,000. Current cart total is Rs 0."
        );
    }

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let (status, body) =
            send(&app(), "POST", "/api/chat", Some(json!({"message": "   "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "message is required");
    }
}
