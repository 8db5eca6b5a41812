//! Session keys.
//!
//! The session holds the id of the visitor's live cart and, separately, the
//! checkout transfer slot, so that checkout never reads live cart state. The
//! slot key is [`TRANSFER_KEY`](crate::services::checkout::TRANSFER_KEY).

/// Session keys used by the storefront.
pub mod keys {
    /// Key for the id of the visitor's live cart in the cart store.
    pub const CART_ID: &str = "cart_id";
}
