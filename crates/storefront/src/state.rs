//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use alforja_core::{Catalog, HandoffChannel};

use crate::config::StorefrontConfig;
use crate::middleware::session::SESSION_EXPIRY_SECONDS;
use crate::services::cart::CartStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The catalog is read-only after
/// startup. Carts live in the cart store; the session holds each visitor's
/// cart id and transfer slot.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    handoff: HandoffChannel,
    carts: CartStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        let handoff = config.handoff.channel();
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                handoff,
                carts: CartStore::new(Duration::from_secs(
                    SESSION_EXPIRY_SECONDS.unsigned_abs(),
                )),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the order hand-off channel.
    #[must_use]
    pub fn handoff(&self) -> &HandoffChannel {
        &self.inner.handoff
    }

    /// Get a reference to the visitor cart store.
    #[must_use]
    pub fn carts(&self) -> &CartStore {
        &self.inner.carts
    }
}
