//! Frozen copy of the cart taken at checkout intent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, LineItem};
use crate::types::Price;

/// An immutable copy of the cart's lines and total.
///
/// The JSON form of this struct is what gets written to the transfer slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    items: Vec<LineItem>,
    total_price: Price,
    taken_at: DateTime<Utc>,
}

impl CartSnapshot {
    /// Freeze the current state of a cart.
    #[must_use]
    pub fn capture(cart: &Cart) -> Self {
        Self::capture_at(cart, Utc::now())
    }

    /// Freeze a cart with an explicit timestamp.
    #[must_use]
    pub fn capture_at(cart: &Cart, taken_at: DateTime<Utc>) -> Self {
        Self {
            items: cart.items().to_vec(),
            total_price: cart.total_price(),
            taken_at,
        }
    }

    /// Lines as they were when the snapshot was taken.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Cart total at snapshot time.
    #[must_use]
    pub const fn total_price(&self) -> Price {
        self.total_price
    }

    /// When the snapshot was taken.
    #[must_use]
    pub const fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |count, item| count.saturating_add(item.quantity))
    }

    /// Serialize for the transfer slot.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Read a snapshot back from its transfer-slot form.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the value is not a snapshot.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
