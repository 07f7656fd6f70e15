//! Raw HTTP checks against a served storefront router.

#![allow(clippy::unwrap_used)]

use bazaar_integration_tests::TestServer;
use serde_json::{Value, json};

async fn json_body(response: reqwest::Response) -> Value {
    response.json().await.unwrap()
}

#[tokio::test]
async fn test_health_and_request_id() {
    let server = TestServer::start().await;
    let response = reqwest::get(server.url("health")).await.unwrap();

    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_missing_session_is_json_400() {
    let server = TestServer::start().await;
    let response = reqwest::get(server.url("api/cart")).await.unwrap();

    assert_eq!(response.status(), 400);
    assert_eq!(
        json_body(response).await,
        json!({"error": "sessionId is required"})
    );
}

#[tokio::test]
async fn test_products_query_and_unknown_category() {
    let server = TestServer::start().await;

    let response = reqwest::get(server.url("api/products?category=Home&search=product"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let products = json_body(response).await;
    let ids: Vec<i64> = products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 9, 15, 21, 27]);

    let response = reqwest::get(server.url("api/products?category=garden"))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_unknown_order_tracks_as_not_found() {
    let server = TestServer::start().await;
    let response = reqwest::get(server.url("api/orders/track/ORD0000001?sessionId=t1"))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body = json_body(response).await;
    assert_eq!(body["status"], "NOT_FOUND");
    assert_eq!(
        body["message"],
        "Order not found. Please check order ID from your recent orders."
    );
}

#[tokio::test]
async fn test_chat_without_session() {
    let server = TestServer::start().await;
    let response = reqwest::Client::new()
        .post(server.url("api/chat"))
        .json(&json!({"message": "Please recommend something"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let reply = json_body(response).await["reply"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(reply.starts_with("Top picks under Rs 1,500: Electronics Product 1 (Rs 474)"));
}
