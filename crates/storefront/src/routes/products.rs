//! Product listing handler.

use axum::{
    Json,
    extract::{Query, State},
};
use bazaar_core::{CategoryFilter, Product};
use tracing::instrument;

use crate::api::ProductsQuery;
use crate::error::{AppError, Result};
use crate::filter::ProductQuery;
use crate::state::AppState;

/// List products matching `search` and `category` (both optional).
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<Product>>> {
    let category = query
        .category
        .as_deref()
        .unwrap_or_default()
        .parse::<CategoryFilter>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let query = ProductQuery::new(query.search.unwrap_or_default(), category);
    Ok(Json(state.catalog().search(&query)))
}
