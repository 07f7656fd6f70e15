//! Wishlist route handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use bazaar_core::{Product, ProductId};
use tracing::instrument;

use super::json_body;
use crate::api::{AddWishlistItemRequest, SessionQuery};
use crate::error::Result;
use crate::state::AppState;

/// Wishlist products for a session.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Vec<Product>>> {
    let session = state.session(query.session_id.as_deref()).await?;
    let items = session.lock().await.wishlist().items().to_vec();
    Ok(Json(items))
}

/// Save a product. Saving it twice keeps one entry.
#[instrument(skip(state, payload))]
pub async fn add(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AddWishlistItemRequest>, JsonRejection>,
) -> Result<Json<Product>> {
    let request = json_body(payload)?;
    let session = state.session(Some(&request.session_id)).await?;
    let product = session
        .lock()
        .await
        .add_to_wishlist(state.catalog(), request.product_id)?;
    Ok(Json(product))
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Query(query): Query<SessionQuery>,
) -> Result<StatusCode> {
    let session = state.session(query.session_id.as_deref()).await?;
    session.lock().await.remove_from_wishlist(product_id);
    Ok(StatusCode::NO_CONTENT)
}
