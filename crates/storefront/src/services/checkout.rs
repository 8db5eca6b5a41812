//! Checkout flow over a transfer slot.
//!
//! The cart page and the checkout page share nothing but a transfer slot: a
//! string-valued key/value store that survives the navigation between them.
//! At checkout intent the cart is frozen into a [`CartSnapshot`] and written
//! to the slot under [`TRANSFER_KEY`]; the checkout page reads it back; a
//! successful submission deletes it.
//!
//! In production the slot is the visitor's session. [`MemorySlot`] is a
//! process-local slot for tests and tools.
//!
//! The slot is single-writer then single-reader. Two tabs of the same visitor
//! see the same snapshot.

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;

use alforja_core::{Cart, CartSnapshot, HandoffChannel, OrderForm, OrderFormError, compose_message};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tower_sessions::Session;
use tracing::instrument;

/// Slot key holding the serialized snapshot.
pub const TRANSFER_KEY: &str = "cart_data";

/// Errors in the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The transfer slot holds no snapshot; the visitor must go back to the catalog.
    #[error("no active order")]
    NoActiveOrder,

    /// The order form is missing a required field.
    #[error("invalid order form: {0}")]
    InvalidForm(#[from] OrderFormError),

    /// The snapshot could not be serialized.
    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// The transfer slot backend failed.
    #[error("transfer slot error: {0}")]
    Slot(String),
}

/// A durable, keyed, string-valued store that bridges the cart and checkout flows.
pub trait TransferSlot: Send + Sync {
    /// Backend error.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: String) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Read the value under `key`.
    fn read(&self, key: &str) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

    /// Delete the value under `key`. Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl TransferSlot for Session {
    type Error = tower_sessions::session::Error;

    async fn write(&self, key: &str, value: String) -> Result<(), Self::Error> {
        self.insert(key, value).await
    }

    async fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.get::<String>(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), Self::Error> {
        self.remove::<String>(key).await.map(|_| ())
    }
}

/// In-process transfer slot.
#[derive(Debug, Default)]
pub struct MemorySlot {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransferSlot for MemorySlot {
    type Error = Infallible;

    async fn write(&self, key: &str, value: String) -> Result<(), Self::Error> {
        self.values.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), Self::Error> {
        self.values.lock().await.remove(key);
        Ok(())
    }
}

fn slot_error(err: &impl std::error::Error) -> CheckoutError {
    CheckoutError::Slot(err.to_string())
}

/// Result of a submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSubmission {
    /// The composed order text.
    pub message: String,
    /// Link that opens the chat channel with the message pre-filled.
    pub handoff_url: String,
}

/// Freeze the cart into the transfer slot, overwriting any previous snapshot.
///
/// # Errors
///
/// Returns [`CheckoutError::Encode`] or [`CheckoutError::Slot`] if the
/// snapshot cannot be written.
#[instrument(skip_all, fields(lines = cart.unique_line_count()))]
pub async fn snapshot_cart<S: TransferSlot>(
    slot: &S,
    cart: &Cart,
) -> Result<CartSnapshot, CheckoutError> {
    let snapshot = CartSnapshot::capture(cart);
    let json = snapshot.to_json()?;
    slot.write(TRANSFER_KEY, json)
        .await
        .map_err(|e| slot_error(&e))?;

    tracing::info!(
        total = %snapshot.total_price(),
        items = snapshot.item_count(),
        "Cart snapshot written"
    );
    Ok(snapshot)
}

/// Read the snapshot left by [`snapshot_cart`].
///
/// A value that does not parse as a snapshot is deleted and treated as absent.
///
/// # Errors
///
/// Returns [`CheckoutError::NoActiveOrder`] when there is no usable snapshot,
/// or [`CheckoutError::Slot`] if the slot cannot be read.
#[instrument(skip_all)]
pub async fn load_snapshot<S: TransferSlot>(slot: &S) -> Result<CartSnapshot, CheckoutError> {
    let Some(json) = slot.read(TRANSFER_KEY).await.map_err(|e| slot_error(&e))? else {
        return Err(CheckoutError::NoActiveOrder);
    };

    match CartSnapshot::from_json(&json) {
        Ok(snapshot) => Ok(snapshot),
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable cart snapshot");
            slot.delete(TRANSFER_KEY)
                .await
                .map_err(|e| slot_error(&e))?;
            Err(CheckoutError::NoActiveOrder)
        }
    }
}

/// Compose the order, build the hand-off link, then clear the transfer slot.
///
/// The slot is only cleared once the message has been composed; a form that
/// fails validation leaves the snapshot in place so the visitor can retry.
///
/// # Errors
///
/// Returns [`CheckoutError::InvalidForm`] if a required field is blank, or
/// [`CheckoutError::Slot`] if the slot cannot be cleared.
#[instrument(skip_all, fields(items = snapshot.item_count()))]
pub async fn submit_order<S: TransferSlot>(
    slot: &S,
    snapshot: &CartSnapshot,
    form: &OrderForm,
    channel: &HandoffChannel,
) -> Result<OrderSubmission, CheckoutError> {
    form.validate()?;

    let message = compose_message(snapshot, form);
    let handoff_url = channel.link(&message);

    slot.delete(TRANSFER_KEY)
        .await
        .map_err(|e| slot_error(&e))?;

    tracing::info!(
        total = %snapshot.total_price(),
        payment_method = ?form.payment_method,
        "Order handed off"
    );

    Ok(OrderSubmission {
        message,
        handoff_url,
    })
}
