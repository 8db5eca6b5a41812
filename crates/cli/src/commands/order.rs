//! Order preview command.
//!
//! Renders the message a customer would send for a given cart snapshot and
//! order form, without going through the storefront.
//!
//! # Usage
//!
//! ```bash
//! alforja-cli order compose --snapshot snapshot.json --form form.json
//!
//! # Also print the hand-off link
//! alforja-cli order compose --snapshot snapshot.json --form form.json \
//!     --recipient 573001234567
//! ```
//!
//! The snapshot file holds a cart snapshot as stored in the transfer slot. The
//! form file holds the order form fields as a JSON object.

use std::path::{Path, PathBuf};

use alforja_core::{CartSnapshot, HandoffChannel, OrderForm, OrderFormError, compose_message};
use thiserror::Error;

/// Errors that can occur while composing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// An input file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file is not valid JSON for its type.
    #[error("Invalid {what} in {path}: {source}")]
    Parse {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The order form is missing a required field.
    #[error(transparent)]
    InvalidForm(#[from] OrderFormError),
}

fn read(path: &Path) -> Result<String, OrderError> {
    std::fs::read_to_string(path).map_err(|source| OrderError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the order message, and the hand-off link when a channel is given.
///
/// # Errors
///
/// Returns `OrderError::InvalidForm` if a required field is blank.
pub fn compose(
    snapshot: &CartSnapshot,
    form: &OrderForm,
    channel: Option<&HandoffChannel>,
) -> Result<(String, Option<String>), OrderError> {
    form.validate()?;
    let message = compose_message(snapshot, form);
    let link = channel.map(|channel| channel.link(&message));
    Ok((message, link))
}

/// Read the inputs, then print the message and optional link.
///
/// # Errors
///
/// Returns `OrderError` if an input cannot be read or the form is incomplete.
#[allow(clippy::print_stdout)]
pub fn run(
    snapshot_path: &Path,
    form_path: &Path,
    channel: Option<&HandoffChannel>,
) -> Result<(), OrderError> {
    let snapshot =
        CartSnapshot::from_json(&read(snapshot_path)?).map_err(|source| OrderError::Parse {
            what: "cart snapshot",
            path: snapshot_path.to_path_buf(),
            source,
        })?;
    let form: OrderForm =
        serde_json::from_str(&read(form_path)?).map_err(|source| OrderError::Parse {
            what: "order form",
            path: form_path.to_path_buf(),
            source,
        })?;

    let (message, link) = compose(&snapshot, &form, channel)?;

    println!("{message}");
    if let Some(link) = link {
        println!();
        println!("{link}");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use alforja_core::{Cart, NewLineItem, PaymentMethod, Price, ProductId};
    use chrono::{TimeZone, Utc};

    fn snapshot() -> CartSnapshot {
        let mut cart = Cart::new();
        cart.add_item(NewLineItem {
            id: ProductId::new(101),
            name: "Método V60".to_string(),
            base_price: Price::from_cents(1599),
            price: Price::from_cents(1599),
            options: Vec::new(),
            kind: Some("metodo".to_string()),
        });
        CartSnapshot::capture_at(&cart, Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap())
    }

    fn form() -> OrderForm {
        serde_json::from_str(
            r#"{
                "customer_name": "Luis Pérez",
                "customer_email": "luis@example.com",
                "customer_phone": "3109876543",
                "shipping_address": "Carrera 7 # 45-10",
                "shipping_city": "Bogotá",
                "payment_method": "transferencia"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_form_file_accepts_payment_alias() {
        assert_eq!(form().payment_method, PaymentMethod::BankTransfer);
    }

    #[test]
    fn test_compose_without_channel() {
        let (message, link) = compose(&snapshot(), &form(), None).unwrap();
        assert!(message.contains("1. Método V60 x1"));
        assert!(message.contains("*💰 TOTAL DEL PEDIDO: $15.99*"));
        assert!(link.is_none());
    }

    #[test]
    fn test_compose_with_channel() {
        let channel = HandoffChannel::whatsapp("573001234567");
        let (message, link) = compose(&snapshot(), &form(), Some(&channel)).unwrap();
        assert_eq!(link.unwrap(), channel.link(&message));
    }

    #[test]
    fn test_compose_rejects_incomplete_form() {
        let mut form = form();
        form.customer_email = "  ".to_string();
        assert!(matches!(
            compose(&snapshot(), &form, None),
            Err(OrderError::InvalidForm(OrderFormError::Missing("customer_email")))
        ));
    }
}
