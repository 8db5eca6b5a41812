//! Alforja Core - Cart and checkout domain library.
//!
//! This crate holds the storefront's business rules, shared by:
//! - `storefront` - Public-facing web service (catalog, cart, checkout)
//! - `cli` - Operator tooling for catalogs and offline order composition
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP,
//! no session storage. The transfer slot that carries a cart snapshot across
//! the checkout boundary lives with the storefront; this crate only defines
//! the snapshot and how it is turned into an order message.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs and prices
//! - [`catalog`] - Products, option groups, and catalog lookups
//! - [`cart`] - The cart store and its line items
//! - [`checkout`] - Cart snapshots, the order form, message composition, hand-off links

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod types;

pub use cart::{Cart, LineItem, NewLineItem, SelectedOption, merge_selection};
pub use catalog::{
    Catalog, Category, OptionChoice, OptionError, OptionGroup, Product, SkippedProduct,
};
pub use checkout::{
    CartSnapshot, HandoffChannel, OrderForm, OrderFormError, PaymentMethod, compose_message,
};
pub use types::*;
