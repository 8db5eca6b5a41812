//! Checkout route handlers.
//!
//! The checkout page never reads the live cart. It works from the snapshot
//! the cart left in the transfer slot, so edits made to the cart in another
//! tab after checkout started do not change the order.

use alforja_core::{CartSnapshot, OrderForm, Price};
use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::routes::cart::LineView;
use crate::services::checkout::{load_snapshot, submit_order};
use crate::state::AppState;

/// Order summary shown next to the order form.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutView {
    pub items: Vec<LineView>,
    pub item_count: u32,
    pub total_price: Price,
    pub taken_at: DateTime<Utc>,
}

impl From<&CartSnapshot> for CheckoutView {
    fn from(snapshot: &CartSnapshot) -> Self {
        Self {
            items: snapshot.items().iter().map(LineView::from).collect(),
            item_count: snapshot.item_count(),
            total_price: snapshot.total_price(),
            taken_at: snapshot.taken_at(),
        }
    }
}

/// Display the order summary.
///
/// Without an active order the visitor is redirected to the catalog.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CheckoutView>> {
    let snapshot = load_snapshot(&session).await?;
    Ok(Json(CheckoutView::from(&snapshot)))
}

/// Submit the order form and hand the order off to the chat channel.
///
/// On success the visitor is redirected to the hand-off link with the order
/// message pre-filled. A form missing a required field answers 400 and keeps
/// the snapshot so the visitor can correct it.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<OrderForm>,
) -> Result<Response> {
    let snapshot = load_snapshot(&session).await?;
    let submission = submit_order(&session, &snapshot, &form, state.handoff()).await?;

    add_breadcrumb(
        "checkout",
        "Order handed off",
        &[
            ("total", snapshot.total_price().to_string()),
            ("payment_method", form.payment_method.to_string()),
        ],
    );

    Ok(Redirect::to(&submission.handoff_url).into_response())
}
