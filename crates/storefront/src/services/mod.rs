//! Business services for the storefront.
//!
//! - [`cart`] - Server-side cart store with one lock per cart
//! - [`checkout`] - Transfer slot and the snapshot / load / submit flow

pub mod cart;
pub mod checkout;
