//! Customer-entered checkout form.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors validating an [`OrderForm`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum OrderFormError {
    /// A required field is empty or only whitespace.
    #[error("{0} is required")]
    Missing(&'static str),
}

/// How the customer will pay. Settled outside this system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    #[default]
    #[serde(alias = "efectivo")]
    Cash,
    #[serde(alias = "transferencia")]
    BankTransfer,
}

impl PaymentMethod {
    /// Text shown to the store in the order message.
    #[must_use]
    pub const fn display_text(self) -> &'static str {
        match self {
            Self::Cash => "Efectivo",
            Self::BankTransfer => "Transferencia Bancaria",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

/// Contact, shipping, and payment details for one order.
///
/// Only presence is checked; nothing here is persisted beyond the single
/// submission. Absent fields deserialize as blank so that [`validate`]
/// reports them.
///
/// [`validate`]: OrderForm::validate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderForm {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_zip_code: String,
    pub payment_method: PaymentMethod,
    pub additional_notes: String,
}

impl OrderForm {
    /// Check that every required field is filled in.
    ///
    /// Zip code and notes are optional.
    ///
    /// # Errors
    ///
    /// Returns [`OrderFormError::Missing`] naming the first blank required field.
    pub fn validate(&self) -> Result<(), OrderFormError> {
        let required = [
            ("customer_name", &self.customer_name),
            ("customer_email", &self.customer_email),
            ("customer_phone", &self.customer_phone),
            ("shipping_address", &self.shipping_address),
            ("shipping_city", &self.shipping_city),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(OrderFormError::Missing(*field)),
            None => Ok(()),
        }
    }

    /// Notes as entered, or `None` when blank.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        let trimmed = self.additional_notes.trim();
        (!trimmed.is_empty()).then_some(self.additional_notes.as_str())
    }
}
