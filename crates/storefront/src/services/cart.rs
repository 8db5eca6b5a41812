//! Server-side cart storage.
//!
//! The visitor's session holds only a cart id under
//! [`session_keys::CART_ID`]; the [`Cart`] itself lives in the [`CartStore`].
//! Each cart sits behind its own lock, so overlapping requests from one
//! visitor apply their changes one after another instead of overwriting each
//! other. The id never changes once written, so the session layer's
//! end-of-request save cannot roll a cart back.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use alforja_core::Cart;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tower_sessions::Session;
use uuid::Uuid;

use crate::models::session_keys;

/// Identifier of a stored cart.
pub type CartId = Uuid;

/// Exclusive access to one visitor's cart, held until dropped.
pub type CartGuard = OwnedMutexGuard<Cart>;

struct CartEntry {
    cart: Arc<Mutex<Cart>>,
    touched: Instant,
}

/// In-memory store of visitor carts keyed by [`CartId`].
pub struct CartStore {
    carts: Mutex<HashMap<CartId, CartEntry>>,
    max_idle: Duration,
}

impl CartStore {
    /// Create an empty store. Carts untouched for `max_idle` are dropped.
    #[must_use]
    pub fn new(max_idle: Duration) -> Self {
        Self {
            carts: Mutex::new(HashMap::new()),
            max_idle,
        }
    }

    /// Lock the visitor's cart for a change, creating it if they have none.
    ///
    /// # Errors
    ///
    /// Returns the session error if the cart id cannot be read or written.
    pub async fn open(
        &self,
        session: &Session,
    ) -> Result<CartGuard, tower_sessions::session::Error> {
        let known = session.get::<CartId>(session_keys::CART_ID).await?;

        let cart = {
            let mut carts = self.carts.lock().await;
            match known.and_then(|id| carts.get_mut(&id)) {
                Some(entry) => {
                    entry.touched = Instant::now();
                    Arc::clone(&entry.cart)
                }
                None => {
                    self.evict_idle(&mut carts);
                    let id = Uuid::new_v4();
                    let cart = Arc::new(Mutex::new(Cart::new()));
                    carts.insert(
                        id,
                        CartEntry {
                            cart: Arc::clone(&cart),
                            touched: Instant::now(),
                        },
                    );
                    session.insert(session_keys::CART_ID, id).await?;
                    tracing::debug!(cart_id = %id, "Created cart");
                    cart
                }
            }
        };

        Ok(cart.lock_owned().await)
    }

    /// A copy of the visitor's cart, or an empty one if they have none.
    ///
    /// Never creates a cart, so reading does not start a session.
    ///
    /// # Errors
    ///
    /// Returns the session error if the cart id cannot be read.
    pub async fn read(&self, session: &Session) -> Result<Cart, tower_sessions::session::Error> {
        let Some(id) = session.get::<CartId>(session_keys::CART_ID).await? else {
            return Ok(Cart::new());
        };

        let cart = self
            .carts
            .lock()
            .await
            .get(&id)
            .map(|entry| Arc::clone(&entry.cart));

        match cart {
            Some(cart) => Ok(cart.lock().await.clone()),
            None => Ok(Cart::new()),
        }
    }

    /// Number of carts held.
    pub async fn len(&self) -> usize {
        self.carts.lock().await.len()
    }

    /// Whether the store holds no carts.
    pub async fn is_empty(&self) -> bool {
        self.carts.lock().await.is_empty()
    }

    /// Drop carts nobody has touched for `max_idle` and nobody holds.
    fn evict_idle(&self, carts: &mut HashMap<CartId, CartEntry>) {
        let before = carts.len();
        carts.retain(|_, entry| {
            entry.touched.elapsed() < self.max_idle || Arc::strong_count(&entry.cart) > 1
        });
        let evicted = before - carts.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted idle carts");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use alforja_core::{Price, Product, ProductId};
    use tower_sessions::MemoryStore;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    async fn add(store: &CartStore, session: &Session, id: i32) {
        store
            .open(session)
            .await
            .unwrap()
            .add_item(product(id).candidate(Vec::new()));
    }

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Producto {id}"),
            description: String::new(),
            price: Price::from_cents(1000),
            kind: None,
            image: None,
            option_groups: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_read_without_cart_is_empty_and_creates_nothing() {
        let store = CartStore::new(DAY);
        let session = session();

        assert!(store.read(&session).await.unwrap().is_empty());
        assert!(store.is_empty().await);
        assert!(session.is_empty().await);
    }

    #[tokio::test]
    async fn test_open_creates_one_cart_per_session() {
        let store = CartStore::new(DAY);
        let session = session();

        add(&store, &session, 1).await;
        add(&store, &session, 1).await;

        assert_eq!(store.len().await, 1);
        assert_eq!(store.read(&session).await.unwrap().total_item_count(), 2);
    }

    #[tokio::test]
    async fn test_sessions_get_separate_carts() {
        let store = CartStore::new(DAY);
        let (alice, bob) = (session(), session());

        add(&store, &alice, 1).await;

        assert_eq!(store.len().await, 1);
        assert!(store.read(&bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_waits_for_holder() {
        let store = Arc::new(CartStore::new(DAY));
        let session = session();

        let mut held = store.open(&session).await.unwrap();

        let waiter = {
            let store = Arc::clone(&store);
            let session = session.clone();
            tokio::spawn(async move {
                let mut cart = store.open(&session).await.unwrap();
                cart.add_item(product(1).candidate(Vec::new()));
                cart.total_item_count()
            })
        };

        tokio::task::yield_now().await;
        held.add_item(product(1).candidate(Vec::new()));
        drop(held);

        // The waiter sees the holder's change
        assert_eq!(waiter.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_idle_carts_are_evicted_when_a_new_cart_is_made() {
        let store = CartStore::new(Duration::ZERO);
        let (alice, bob) = (session(), session());

        drop(store.open(&alice).await.unwrap());
        drop(store.open(&bob).await.unwrap());

        // Alice's cart was idle past the limit when Bob's was created
        assert_eq!(store.len().await, 1);
        assert!(store.read(&alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_held_carts_are_not_evicted() {
        let store = CartStore::new(Duration::ZERO);
        let (alice, bob) = (session(), session());

        let held = store.open(&alice).await.unwrap();
        drop(store.open(&bob).await.unwrap());

        assert_eq!(store.len().await, 2);
        drop(held);
    }
}
