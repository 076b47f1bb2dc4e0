mod domain;
mod clients;
mod messages;
mod error;
mod store;

mod app_system;

#[cfg(test)]
mod mock_framework;

mod actor_framework;
mod actors;
mod product_actor;

use rust_decimal_macros::dec;
use tracing::{info, warn, Instrument};

use crate::app_system::{setup_tracing, MarketSystem, SystemConfig};
use crate::domain::{ProductCreate, ProductPatch};

/// Demo user; the request layer would supply an authenticated id.
const DEMO_USER: u64 = 7;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = SystemConfig::from_env()?;
    setup_tracing(&config.log_filter);

    info!("Starting marketplace cart demo");

    let system = MarketSystem::new(&config);

    let product_id = system
        .product_client
        .create_product(ProductCreate::new("Enamel mug", "350 ml, dishwasher safe", dec!(5.00), 10))
        .await?;
    info!(product_id, "Product listed");
    let teapot_id = system
        .product_client
        .create_product(ProductCreate::new("Teapot", "Cast iron, 1 l", dec!(32.00), 2))
        .await?;

    let matches = system.product_client.search_products("mug").await?;
    info!(query = "mug", hits = matches.len(), "Catalog search");

    let repriced = system
        .product_client
        .update_product(
            teapot_id,
            ProductPatch {
                price: Some(dec!(29.50)),
                ..ProductPatch::default()
            },
        )
        .await?;
    info!(product_id = teapot_id, price = %repriced.price, "Product repriced");

    let span = tracing::info_span!("cart", user_id = DEMO_USER);
    let cart = &system.cart_client;
    async {
        let first = cart.add_to_cart(DEMO_USER, product_id, 3).await?;
        let item = cart.add_to_cart(DEMO_USER, product_id, 2).await?;
        info!(item_id = item.id, quantity = item.quantity, "Quantities accumulate on one item");

        let view = cart.view_cart(DEMO_USER).await?;
        info!(
            total_cost = %view.total_cost,
            mugs = view.quantity_of(product_id),
            "Cart contents"
        );

        let teapot = cart.add_to_cart(DEMO_USER, teapot_id, 1).await?;
        system.product_client.delete_product(teapot_id).await?;
        let view = cart.view_cart(DEMO_USER).await?;
        warn!(unavailable = view.unavailable.len(), "Teapot was delisted while in the cart");
        cart.remove_from_cart(DEMO_USER, teapot.id).await?;

        if let Err(e) = cart.add_to_cart(DEMO_USER, product_id, 50).await {
            warn!(error = %e, "Oversized request refused");
        }

        cart.remove_from_cart(DEMO_USER, first.id).await?;
        let stock = system.product_client.check_stock(product_id).await?;
        info!(stock, empty = cart.view_cart(DEMO_USER).await?.is_empty(), "Stock restored after removal");

        cart.add_to_cart(DEMO_USER, product_id, 4).await?;
        let order = cart.checkout(DEMO_USER).await?;
        info!(order_id = order.id, status = %order.status, "Checked out");

        let history = cart.list_orders(DEMO_USER).await?;
        info!(order_count = history.len(), "Order history");

        let catalog = system.product_client.list_products().await?;
        info!(product_count = catalog.len(), "Catalog at close");
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .instrument(span)
    .await?;

    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
