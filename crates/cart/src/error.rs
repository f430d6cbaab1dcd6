//! Errors raised inside cart operations.
//!
//! These never leave the store: [`CartStore`] logs them and reports a
//! [`Notification`] instead.
//!
//! [`CartStore`]: crate::CartStore

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::api::ApiError;
use crate::notification::Notification;
use crate::storage::StorageError;

/// Why a cart operation was rejected or failed.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity is more than the stock service has.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    StockInsufficient {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },

    /// Stock service or catalog failed.
    #[error("Store API error: {0}")]
    Api(#[from] ApiError),

    /// Product is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotFound(ProductId),

    /// Snapshot could not be written.
    #[error("Snapshot error: {0}")]
    Storage(#[from] StorageError),
}

/// Which operation an error came from, to pick the matching failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    Update,
}

impl CartError {
    /// The notification shown for this error during `operation`.
    #[must_use]
    pub const fn notification(&self, operation: Operation) -> Notification {
        match (self, operation) {
            (Self::StockInsufficient { .. }, _) => Notification::OutOfStock,
            (_, Operation::Add) => Notification::AddFailed,
            (_, Operation::Remove) => Notification::RemoveFailed,
            (_, Operation::Update) => Notification::UpdateFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_errors_always_notify_out_of_stock() {
        let err = CartError::StockInsufficient {
            product_id: ProductId::new(1),
            requested: 6,
            available: 5,
        };
        assert_eq!(err.notification(Operation::Add), Notification::OutOfStock);
        assert_eq!(err.notification(Operation::Update), Notification::OutOfStock);
    }

    #[test]
    fn test_other_errors_notify_per_operation() {
        let err = CartError::NotFound(ProductId::new(3));
        assert_eq!(err.notification(Operation::Add), Notification::AddFailed);
        assert_eq!(err.notification(Operation::Remove), Notification::RemoveFailed);
        assert_eq!(err.notification(Operation::Update), Notification::UpdateFailed);
    }

    #[test]
    fn test_error_display() {
        let err = CartError::StockInsufficient {
            product_id: ProductId::new(1),
            requested: 6,
            available: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 1: requested 6, available 5"
        );
    }
}
