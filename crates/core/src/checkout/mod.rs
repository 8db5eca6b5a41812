//! Checkout composer.
//!
//! Turns a [`CartSnapshot`] plus a customer's [`OrderForm`] into the order
//! message that is handed off to the store's chat channel.
//!
//! The flow has three steps, and only the pure parts live here:
//!
//! 1. At checkout intent the live cart is frozen into a [`CartSnapshot`].
//!    The snapshot travels through a transfer slot, so checkout never reads
//!    live cart state.
//! 2. The customer fills in an [`OrderForm`].
//! 3. [`compose_message`] renders the order text and a [`HandoffChannel`]
//!    wraps it into the outbound link.

mod form;
mod handoff;
mod message;
mod snapshot;

pub use form::{OrderForm, OrderFormError, PaymentMethod};
pub use handoff::HandoffChannel;
pub use message::{STORE_NAME, compose_message};
pub use snapshot::CartSnapshot;
