//! User-facing notifications emitted by the cart store.
//!
//! Every rejected or failed cart operation resolves to exactly one of these.
//! The display text is the storefront copy shown to the shopper.

use thiserror::Error;

/// A message for the shopper about an operation that did not go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Notification {
    /// Requested quantity exceeds available stock.
    #[error("Quantidade solicitada fora de estoque")]
    OutOfStock,

    /// Adding a product failed for any reason other than stock.
    #[error("Erro na adição do produto")]
    AddFailed,

    /// Removing a product failed.
    #[error("Erro na remoção do produto")]
    RemoveFailed,

    /// Changing a product's quantity failed for any reason other than stock.
    #[error("Erro na alteração de quantidade do produto")]
    UpdateFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_shopper_copy() {
        assert_eq!(
            Notification::OutOfStock.to_string(),
            "Quantidade solicitada fora de estoque"
        );
        assert_eq!(
            Notification::RemoveFailed.to_string(),
            "Erro na remoção do produto"
        );
    }
}
