//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (catalog loaded)
//!
//! # Products
//! GET  /products               - Catalog by category (?q= search, ?kind= filter)
//! GET  /products/{id}          - Product detail
//!
//! # Cart (JSON in, cart view out)
//! GET  /cart                   - Cart view
//! GET  /cart/count             - Cart count badge
//! POST /cart/add               - Add a product with its options
//! POST /cart/increase          - Increment a line
//! POST /cart/decrease          - Decrement a line (removed at zero)
//! POST /cart/remove            - Remove a line
//! POST /cart/options           - Replace a line's options
//! POST /cart/checkout          - Snapshot the cart, redirect to /checkout
//!
//! # Checkout
//! GET  /checkout               - Order summary from the snapshot
//! POST /checkout               - Submit order form, redirect to hand-off link
//! ```

pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/increase", post(cart::increase))
        .route("/decrease", post(cart::decrease))
        .route("/remove", post(cart::remove))
        .route("/options", post(cart::update_options))
        .route("/checkout", post(cart::checkout))
}

/// Create all storefront routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show).post(checkout::submit))
}
