//! The cart store.
//!
//! Owns the current [`Cart`], validates every mutation against the stock
//! service, writes the snapshot and only then publishes the new cart.
//!
//! # Concurrency
//!
//! Mutations are serialized by an async lock held across the remote reads and
//! the commit, so two quick `add_product` calls for the same product cannot
//! both see the old quantity. Readers never take that lock: they get the last
//! committed `Arc<Cart>` from a `watch` channel.

use std::sync::Arc;

use rocketshoes_core::{Cart, ProductId};
use tokio::sync::{Mutex, broadcast, watch};
use tracing::{debug, error, info, instrument, warn};

use crate::api::{ProductCatalog, StockService};
use crate::error::{CartError, Operation};
use crate::notification::Notification;
use crate::snapshot;
use crate::storage::SnapshotStorage;

const NOTIFICATION_CAPACITY: usize = 32;

/// Request to set a product's quantity.
///
/// `amount` is signed so that callers computing `current - 1` can pass the
/// result straight through; anything below 1 is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

impl UpdateProductAmount {
    #[must_use]
    pub const fn new(product_id: ProductId, amount: i64) -> Self {
        Self { product_id, amount }
    }
}

/// Shopping cart state container.
///
/// Cheap to clone; clones share the same cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    stock: Arc<dyn StockService>,
    catalog: Arc<dyn ProductCatalog>,
    storage: Arc<dyn SnapshotStorage>,
    state: watch::Sender<Arc<Cart>>,
    notifications: broadcast::Sender<Notification>,
    op_lock: Mutex<()>,
}

impl CartStore {
    /// Create a store seeded from the snapshot in `storage`.
    ///
    /// A missing or unreadable snapshot starts an empty cart.
    pub fn new(
        stock: Arc<dyn StockService>,
        catalog: Arc<dyn ProductCatalog>,
        storage: Arc<dyn SnapshotStorage>,
    ) -> Self {
        let cart = snapshot::load(storage.as_ref());
        info!(items = cart.len(), "Cart store initialized");

        let (state, _) = watch::channel(Arc::new(cart));
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        Self {
            inner: Arc::new(CartStoreInner {
                stock,
                catalog,
                storage,
                state,
                notifications,
                op_lock: Mutex::new(()),
            }),
        }
    }

    /// The current cart.
    #[must_use]
    pub fn cart(&self) -> Arc<Cart> {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every committed cart.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
        self.inner.state.subscribe()
    }

    /// Receiver for shopper notifications.
    #[must_use]
    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.inner.notifications.subscribe()
    }

    /// Add one unit of a product.
    ///
    /// # Errors
    ///
    /// Returns [`Notification::OutOfStock`] if the cart already holds all
    /// available stock, or [`Notification::AddFailed`] on any other failure.
    /// The cart is unchanged in both cases.
    #[instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<(), Notification> {
        let _guard = self.inner.op_lock.lock().await;
        let result = self.try_add(product_id).await;
        self.settle(Operation::Add, result)
    }

    /// Remove a product's line item.
    ///
    /// # Errors
    ///
    /// Returns [`Notification::RemoveFailed`] if the product is not in the
    /// cart or the snapshot cannot be written.
    #[instrument(skip(self))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<(), Notification> {
        let _guard = self.inner.op_lock.lock().await;
        let result = self.try_remove(product_id);
        self.settle(Operation::Remove, result)
    }

    /// Set a product's quantity to exactly `request.amount`.
    ///
    /// Amounts below 1 are ignored without any notification.
    ///
    /// # Errors
    ///
    /// Returns [`Notification::OutOfStock`] if the stock is lower than the
    /// requested amount, or [`Notification::UpdateFailed`] if the product is
    /// not in the cart or a remote call or write fails.
    #[instrument(skip(self))]
    pub async fn update_product_amount(
        &self,
        request: UpdateProductAmount,
    ) -> Result<(), Notification> {
        if request.amount < 1 {
            debug!("Ignoring non-positive amount");
            return Ok(());
        }

        let _guard = self.inner.op_lock.lock().await;
        let result = self.try_update(request).await;
        self.settle(Operation::Update, result)
    }

    async fn try_add(&self, product_id: ProductId) -> Result<(), CartError> {
        let stock = self.inner.stock.stock(product_id).await?;
        let current = self.cart().amount_of(product_id);

        if stock.amount <= current {
            return Err(CartError::StockInsufficient {
                product_id,
                requested: i64::from(current) + 1,
                available: stock.amount,
            });
        }

        let product = self.inner.catalog.product(product_id).await?;
        let next = self.cart().with_added(product);
        self.commit(next)
    }

    fn try_remove(&self, product_id: ProductId) -> Result<(), CartError> {
        let next = self
            .cart()
            .without(product_id)
            .ok_or(CartError::NotFound(product_id))?;
        self.commit(next)
    }

    async fn try_update(&self, request: UpdateProductAmount) -> Result<(), CartError> {
        let UpdateProductAmount { product_id, amount } = request;

        if !self.cart().contains(product_id) {
            return Err(CartError::NotFound(product_id));
        }

        let stock = self.inner.stock.stock(product_id).await?;
        let insufficient = || CartError::StockInsufficient {
            product_id,
            requested: amount,
            available: stock.amount,
        };

        if i64::from(stock.amount) < amount {
            return Err(insufficient());
        }
        let amount = u32::try_from(amount).map_err(|_| insufficient())?;

        let next = self
            .cart()
            .with_amount(product_id, amount)
            .ok_or(CartError::NotFound(product_id))?;
        self.commit(next)
    }

    /// Persist `next`, then publish it.
    fn commit(&self, next: Cart) -> Result<(), CartError> {
        snapshot::save(self.inner.storage.as_ref(), &next)?;
        info!(items = next.len(), total = %next.total(), "Cart updated");
        self.inner.state.send_replace(Arc::new(next));
        Ok(())
    }

    /// Log a failed operation and turn it into a notification.
    fn settle(
        &self,
        operation: Operation,
        result: Result<(), CartError>,
    ) -> Result<(), Notification> {
        let Err(err) = result else {
            return Ok(());
        };

        match &err {
            CartError::StockInsufficient { .. } | CartError::NotFound(_) => {
                warn!(error = %err, ?operation, "Cart operation rejected");
            }
            CartError::Api(_) | CartError::Storage(_) => {
                error!(error = %err, ?operation, "Cart operation failed");
            }
        }

        let notification = err.notification(operation);
        // No subscribers is fine; the caller still gets the notification.
        let _ = self.inner.notifications.send(notification);
        Err(notification)
    }
}
