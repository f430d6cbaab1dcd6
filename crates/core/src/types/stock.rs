//! Stock availability as reported by the stock service.

use serde::{Deserialize, Serialize};

use super::ProductId;

/// Quantity of a product available from supply.
///
/// Always fetched fresh; the cart never caches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    pub id: ProductId,
    pub amount: u32,
}
