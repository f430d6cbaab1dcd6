//! Catalog products and cart line items.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// Product metadata as served by the catalog.
///
/// Title and image are display data; the cart never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
}

/// A product held in the cart together with its quantity.
///
/// Serialized flat, so a line item reads as the catalog product with an extra
/// `amount` field. `amount` is at least 1 for every item inside a [`Cart`].
///
/// [`Cart`]: super::Cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

impl CartLineItem {
    /// Start a new line item with a quantity of one.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self { product, amount: 1 }
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Price of the product times its quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.product.price * self.amount
    }
}
