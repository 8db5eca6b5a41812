//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use alforja_core::OptionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::services::checkout::CheckoutError;

/// Where visitors are sent when there is nothing to check out.
pub const CATALOG_PATH: &str = "/products";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Checkout flow failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<OptionError> for AppError {
    fn from(err: OptionError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl AppError {
    /// Whether this error is the server's fault and should be reported.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Session(_) | Self::Internal(_) => true,
            Self::Checkout(err) => matches!(
                err,
                CheckoutError::Slot(_) | CheckoutError::Encode(_)
            ),
            Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Missing snapshot is not an error for the visitor: send them back
        // to the catalog without a message.
        if matches!(self, Self::Checkout(CheckoutError::NoActiveOrder)) {
            tracing::debug!("No active order, redirecting to catalog");
            return Redirect::to(CATALOG_PATH).into_response();
        }

        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Checkout(err) => match err {
                CheckoutError::InvalidForm(_) => StatusCode::BAD_REQUEST,
                CheckoutError::NoActiveOrder => StatusCode::SEE_OTHER,
                CheckoutError::Slot(_) | CheckoutError::Encode(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Checkout(CheckoutError::InvalidForm(err)) => err.to_string(),
            Self::Checkout(_) => "Checkout unavailable, please try again".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for cart and checkout actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of visitor
/// actions leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, String)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb
            .data
            .insert((*key).to_string(), serde_json::Value::String(value.clone()));
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use alforja_core::{OrderFormError, ProductId};

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::InvalidForm(
                OrderFormError::Missing("customer_name")
            ))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_option_error_is_bad_request() {
        let err: AppError = OptionError::UnknownGroup {
            product: ProductId::new(1),
            group: "Tamaño".to_string(),
        }
        .into();
        assert_eq!(get_status(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_no_active_order_redirects_to_catalog() {
        let response = AppError::Checkout(CheckoutError::NoActiveOrder).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            CATALOG_PATH
        );
    }
}
