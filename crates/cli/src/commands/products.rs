//! Catalog listing.

use rocketshoes_cart::{ApiError, ProductCatalog};
use tracing::info;

use super::Session;

/// Print the catalog, marking how many of each product are in the cart.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn list(session: &Session) -> Result<(), ApiError> {
    let products = session.client.products().await?;
    let in_cart = session.store.cart().amounts();

    for product in &products {
        let amount = in_cart.get(&product.id).copied().unwrap_or(0);
        info!(
            "#{:<4} {} | {} | {} in cart",
            product.id, product.title, product.price, amount
        );
    }
    info!("{} product(s)", products.len());
    Ok(())
}
