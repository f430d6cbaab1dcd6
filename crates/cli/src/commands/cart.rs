//! Cart commands: show, add, remove, update.

use rocketshoes_cart::{Notification, UpdateProductAmount};
use rocketshoes_core::ProductId;
use tracing::info;

use super::Session;

/// Print every line item with its subtotal, then the cart total.
pub fn show(session: &Session) {
    let cart = session.store.cart();

    if cart.is_empty() {
        info!("Cart is empty");
        return;
    }

    for item in cart.items() {
        info!(
            "#{:<4} {:>3} x {} | {} | subtotal {}",
            item.id(),
            item.amount,
            item.product.title,
            item.product.price,
            item.subtotal()
        );
    }
    info!("{} product(s), total {}", cart.len(), cart.total());
}

/// Add one unit of `id`.
///
/// # Errors
///
/// Returns the store's notification if the product could not be added.
pub async fn add(session: &Session, id: ProductId) -> Result<(), Notification> {
    session.store.add_product(id).await?;
    info!(
        "Product {id} added ({} in cart)",
        session.store.cart().amount_of(id)
    );
    Ok(())
}

/// Remove `id` from the cart.
///
/// # Errors
///
/// Returns the store's notification if the product is not in the cart.
pub async fn remove(session: &Session, id: ProductId) -> Result<(), Notification> {
    session.store.remove_product(id).await?;
    info!("Product {id} removed");
    Ok(())
}

/// Set the quantity of `id` to `amount`.
///
/// # Errors
///
/// Returns the store's notification if the quantity could not be changed.
pub async fn update(session: &Session, id: ProductId, amount: i64) -> Result<(), Notification> {
    if amount < 1 {
        info!("Quantity must be at least 1; cart unchanged");
        return Ok(());
    }
    session
        .store
        .update_product_amount(UpdateProductAmount::new(id, amount))
        .await?;
    info!("Product {id} set to {amount}");
    Ok(())
}
