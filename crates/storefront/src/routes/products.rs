//! Product route handlers.

use alforja_core::{Catalog, Product, ProductId};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Catalog filter query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    /// Case-insensitive product name search
    pub q: Option<String>,
    /// Product kind tag, e.g. `cafe` or `metodo`
    pub kind: Option<String>,
}

/// List the catalog by category, optionally filtered.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Json<Catalog> {
    let catalog = state.catalog();

    let filtered = match query.kind.as_deref() {
        Some(kind) => catalog.by_kind(kind),
        None => catalog.clone(),
    };

    Json(match query.q.as_deref() {
        Some(term) => filtered.search(term),
        None => filtered,
    })
}

/// Display a single product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Product>> {
    state
        .catalog()
        .product(ProductId::new(id))
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}
