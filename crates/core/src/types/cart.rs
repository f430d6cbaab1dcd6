//! The cart: an ordered, duplicate-free list of line items.
//!
//! A [`Cart`] is an immutable value. Every transition (`with_added`,
//! `without`, `with_amount`) builds a new cart and leaves `self` untouched, so
//! a cart handed to a reader never changes under it.

use std::collections::{BTreeMap, HashSet};

use serde::{Serialize, Serializer};

use super::{CartLineItem, Price, Product, ProductId};

/// Violations detected when building a cart from untrusted items.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartInvariantError {
    /// Two line items share a product id.
    #[error("product {0} appears more than once")]
    DuplicateProduct(ProductId),
    /// A line item has a quantity below one.
    #[error("product {0} has an amount of zero")]
    ZeroAmount(ProductId),
}

/// Ordered sequence of cart line items, unique by product id.
///
/// Serializes as a bare JSON array of line items. Reading one back goes
/// through [`Cart::from_items`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from items read from outside, checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if a product id repeats or an amount is zero.
    pub fn from_items(items: Vec<CartLineItem>) -> Result<Self, CartInvariantError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.amount == 0 {
                return Err(CartInvariantError::ZeroAmount(item.id()));
            }
            if !seen.insert(item.id()) {
                return Err(CartInvariantError::DuplicateProduct(item.id()));
            }
        }
        Ok(Self { items })
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Quantity of `id` in the cart, or 0 if absent.
    #[must_use]
    pub fn amount_of(&self, id: ProductId) -> u32 {
        self.get(id).map_or(0, |item| item.amount)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of every line subtotal.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartLineItem::subtotal).sum()
    }

    /// Quantity per product, for listings that show how many of each
    /// product are already in the cart.
    #[must_use]
    pub fn amounts(&self) -> BTreeMap<ProductId, u32> {
        self.items
            .iter()
            .map(|item| (item.id(), item.amount))
            .collect()
    }

    /// Add one unit of `product`.
    ///
    /// Appends a new line item with amount 1 when the product is absent.
    /// Otherwise increments the existing item and keeps its stored metadata.
    #[must_use]
    pub fn with_added(&self, product: Product) -> Self {
        if self.contains(product.id) {
            let items = self
                .items
                .iter()
                .map(|item| {
                    if item.id() == product.id {
                        CartLineItem {
                            product: item.product.clone(),
                            amount: item.amount.saturating_add(1),
                        }
                    } else {
                        item.clone()
                    }
                })
                .collect();
            Self { items }
        } else {
            let mut items = self.items.clone();
            items.push(CartLineItem::new(product));
            Self { items }
        }
    }

    /// Remove the line item for `id`, keeping the order of the rest.
    ///
    /// Returns `None` if the product is not in the cart.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .filter(|item| item.id() != id)
            .cloned()
            .collect();
        Some(Self { items })
    }

    /// Set the quantity of `id` to exactly `amount`.
    ///
    /// Returns `None` if the product is not in the cart or `amount` is zero.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Option<Self> {
        if amount == 0 || !self.contains(id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id() == id {
                    CartLineItem {
                        product: item.product.clone(),
                        amount,
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Some(Self { items })
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLineItem;
    type IntoIter = std::slice::Iter<'a, CartLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: u32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Tênis {id}"),
            price: Price::from_cents(10_000 + i64::from(id)),
            image: format!("https://example.com/{id}.jpg"),
        }
    }

    fn item(id: u32, amount: u32) -> CartLineItem {
        CartLineItem {
            product: product(id),
            amount,
        }
    }

    fn cart(items: &[(u32, u32)]) -> Cart {
        Cart::from_items(items.iter().map(|&(id, amount)| item(id, amount)).collect()).unwrap()
    }

    #[test]
    fn test_with_added_appends_new_product_with_amount_one() {
        let before = cart(&[(1, 2)]);
        let after = before.with_added(product(2));

        assert_eq!(after.len(), 2);
        assert_eq!(after.items()[0], item(1, 2));
        assert_eq!(after.items()[1], item(2, 1));
        assert_eq!(before, cart(&[(1, 2)]));
    }

    #[test]
    fn test_with_added_increments_existing_and_keeps_metadata() {
        let before = cart(&[(1, 2), (2, 1)]);
        let mut fresher = product(1);
        fresher.title = "Renamed in catalog".to_string();

        let after = before.with_added(fresher);

        assert_eq!(after.amount_of(ProductId::new(1)), 3);
        assert_eq!(after.get(ProductId::new(1)).unwrap().product, product(1));
        assert_eq!(after.items()[1], item(2, 1));
    }

    #[test]
    fn test_without_preserves_order() {
        let before = cart(&[(1, 1), (2, 1), (3, 4)]);
        let after = before.without(ProductId::new(2)).unwrap();

        let ids: Vec<_> = after.items().iter().map(CartLineItem::id).collect();
        assert_eq!(ids, vec![ProductId::new(1), ProductId::new(3)]);
        assert_eq!(before.len(), 3);
    }

    #[test]
    fn test_without_absent_product() {
        assert!(cart(&[(2, 1)]).without(ProductId::new(3)).is_none());
    }

    #[test]
    fn test_with_amount_sets_absolute_value() {
        let before = cart(&[(1, 2), (2, 1)]);
        let after = before.with_amount(ProductId::new(1), 5).unwrap();

        assert_eq!(after.amount_of(ProductId::new(1)), 5);
        assert_eq!(after.amount_of(ProductId::new(2)), 1);
    }

    #[test]
    fn test_with_amount_rejects_zero_and_absent() {
        let before = cart(&[(1, 2)]);
        assert!(before.with_amount(ProductId::new(1), 0).is_none());
        assert!(before.with_amount(ProductId::new(9), 1).is_none());
    }

    #[test]
    fn test_from_items_rejects_duplicates() {
        let err = Cart::from_items(vec![item(1, 1), item(1, 2)]).unwrap_err();
        assert_eq!(err, CartInvariantError::DuplicateProduct(ProductId::new(1)));
    }

    #[test]
    fn test_from_items_rejects_zero_amount() {
        let err = Cart::from_items(vec![item(4, 0)]).unwrap_err();
        assert_eq!(err, CartInvariantError::ZeroAmount(ProductId::new(4)));
    }

    #[test]
    fn test_totals_and_amounts() {
        let c = cart(&[(1, 2), (2, 3)]);
        assert_eq!(c.total(), Price::from_cents(2 * 10_001 + 3 * 10_002));
        assert_eq!(c.amounts().get(&ProductId::new(2)), Some(&3));
        assert_eq!(c.amount_of(ProductId::new(7)), 0);
    }

    #[test]
    fn test_serializes_as_array() {
        let json = serde_json::to_value(cart(&[(1, 2)])).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["amount"], 2);
    }
}
