//! Cart route handlers.
//!
//! Carts live in the [`CartStore`](crate::services::cart::CartStore). Every
//! changing handler holds the visitor's cart lock while it applies one cart
//! operation, and answers with the updated [`CartView`]. Operations naming a
//! product that is not in the cart leave it unchanged and still answer 200.

use alforja_core::{
    Cart, LineItem, OptionError, Price, Product, ProductId, SelectedOption, merge_selection,
};
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, CATALOG_PATH, Result, add_breadcrumb};
use crate::services::checkout::snapshot_cart;
use crate::state::AppState;

/// Where the cart sends the visitor once a snapshot is taken.
pub const CHECKOUT_PATH: &str = "/checkout";

// =============================================================================
// Views
// =============================================================================

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct LineView {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub subtotal: Price,
    pub options: Vec<SelectedOption>,
    pub options_label: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl From<&LineItem> for LineView {
    fn from(line: &LineItem) -> Self {
        Self {
            product_id: line.id,
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: line.price,
            subtotal: line.subtotal(),
            options: line.options.clone(),
            options_label: line.options_label(),
            kind: line.kind.clone(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<LineView>,
    pub total_item_count: u32,
    pub unique_line_count: usize,
    pub total_price: Price,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(LineView::from).collect(),
            total_item_count: cart.total_item_count(),
            unique_line_count: cart.unique_line_count(),
            total_price: cart.total_price(),
        }
    }
}

/// Cart count badge data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCount {
    pub count: u32,
}

// =============================================================================
// Requests
// =============================================================================

/// An option chosen by the visitor. Surcharges always come from the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionRequest {
    pub name: String,
    pub value: String,
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub options: Vec<OptionRequest>,
}

/// Request naming a single cart line.
#[derive(Debug, Deserialize)]
pub struct LineRequest {
    pub product_id: ProductId,
}

/// Replace a line's options.
#[derive(Debug, Deserialize)]
pub struct UpdateOptionsRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub options: Vec<OptionRequest>,
}

/// Resolve requested options against the product's option groups.
///
/// A later choice for the same group replaces an earlier one.
fn resolve_selection(
    product: &Product,
    requested: &[OptionRequest],
) -> std::result::Result<Vec<SelectedOption>, OptionError> {
    let mut selection = Vec::with_capacity(requested.len());
    for option in requested {
        merge_selection(&mut selection, product.choose(&option.name, &option.value)?);
    }
    Ok(selection)
}

fn find_product(state: &AppState, id: ProductId) -> Result<&Product> {
    state
        .catalog()
        .product(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = state.carts().read(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Get the cart count badge.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<Json<CartCount>> {
    let cart = state.carts().read(&session).await?;
    Ok(Json(CartCount {
        count: cart.total_item_count(),
    }))
}

/// Add a catalog product to the cart.
///
/// Adding a product already in the cart bumps its quantity and keeps the
/// options it was first added with.
#[instrument(skip(state, session), fields(product_id = %request.product_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = find_product(&state, request.product_id)?;
    let selection = resolve_selection(product, &request.options)?;

    let mut cart = state.carts().open(&session).await?;
    let quantity = cart.add_item(product.candidate(selection));

    add_breadcrumb(
        "cart",
        "Added to cart",
        &[
            ("product_id", request.product_id.to_string()),
            ("quantity", quantity.to_string()),
        ],
    );

    Ok(Json(CartView::from(&*cart)))
}

/// Increment a line's quantity.
#[instrument(skip(state, session), fields(product_id = %request.product_id))]
pub async fn increase(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LineRequest>,
) -> Result<Json<CartView>> {
    mutate(&state, &session, "Increased quantity", request.product_id, |cart| {
        cart.increase_quantity(request.product_id)
    })
    .await
}

/// Decrement a line's quantity, removing it at zero.
#[instrument(skip(state, session), fields(product_id = %request.product_id))]
pub async fn decrease(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LineRequest>,
) -> Result<Json<CartView>> {
    mutate(&state, &session, "Decreased quantity", request.product_id, |cart| {
        cart.decrease_quantity(request.product_id)
    })
    .await
}

/// Remove a line.
#[instrument(skip(state, session), fields(product_id = %request.product_id))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LineRequest>,
) -> Result<Json<CartView>> {
    mutate(&state, &session, "Removed from cart", request.product_id, |cart| {
        cart.remove_item(request.product_id)
    })
    .await
}

/// Replace a line's options; its price is recomputed from the catalog price.
#[instrument(skip(state, session), fields(product_id = %request.product_id))]
pub async fn update_options(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<UpdateOptionsRequest>,
) -> Result<Json<CartView>> {
    let mut cart = state.carts().open(&session).await?;
    if cart.get(request.product_id).is_none() {
        return Ok(Json(CartView::from(&*cart)));
    }

    let product = find_product(&state, request.product_id)?;
    let selection = resolve_selection(product, &request.options)?;

    cart.update_options(request.product_id, selection);

    add_breadcrumb(
        "cart",
        "Updated options",
        &[("product_id", request.product_id.to_string())],
    );

    Ok(Json(CartView::from(&*cart)))
}

/// Freeze the cart for checkout and send the visitor to the checkout page.
///
/// An empty cart has nothing to check out and goes back to the catalog.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cart = state.carts().read(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to(CATALOG_PATH).into_response());
    }

    let snapshot = snapshot_cart(&session, &cart).await?;

    add_breadcrumb(
        "checkout",
        "Checkout started",
        &[("total", snapshot.total_price().to_string())],
    );

    Ok(Redirect::to(CHECKOUT_PATH).into_response())
}

/// Apply one change to the visitor's cart while holding its lock.
async fn mutate(
    state: &AppState,
    session: &Session,
    action: &str,
    product_id: ProductId,
    apply: impl FnOnce(&mut Cart) -> bool,
) -> Result<Json<CartView>> {
    let mut cart = state.carts().open(session).await?;

    if apply(&mut *cart) {
        add_breadcrumb("cart", action, &[("product_id", product_id.to_string())]);
    } else {
        tracing::debug!(%product_id, "Cart has no such line, nothing to do");
    }

    Ok(Json(CartView::from(&*cart)))
}
