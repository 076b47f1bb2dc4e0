use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use super::SystemConfig;
use crate::actor_framework::ResourceActor;
use crate::actors::CartService;
use crate::clients::{CartClient, ProductClient};
use crate::domain::Product;
use crate::store::{MemoryOrderStore, OrderStore};

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Service task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
    #[error("Shutdown request failed: {0}")]
    Shutdown(String),
}

/// Starts the catalog and cart services, wires them together, and stops them.
///
/// **Startup Order:** the catalog actor first, then the cart service with a
/// catalog client injected. **Shutdown Order:** the cart service first (it
/// holds a catalog client), then the catalog once its last client is gone.
pub struct MarketSystem {
    pub cart_client: CartClient,
    pub product_client: ProductClient,
    handles: Vec<JoinHandle<()>>,
}

impl Default for MarketSystem {
    fn default() -> Self {
        Self::new(&SystemConfig::default())
    }
}

impl MarketSystem {
    pub fn new(config: &SystemConfig) -> Self {
        Self::with_store(config, Box::new(MemoryOrderStore::new()))
    }

    /// Start the system on top of an explicitly provided order store.
    #[instrument(name = "market_system", skip(config, store), fields(channel_buffer = config.channel_buffer))]
    pub fn with_store(config: &SystemConfig, store: Box<dyn OrderStore>) -> Self {
        info!("Starting market system");

        // 1. Catalog (no dependencies)
        let product_id_counter = Arc::new(AtomicU64::new(1));
        let next_product_id = move || product_id_counter.fetch_add(1, Ordering::SeqCst);

        let (product_actor, product_resource_client) = ResourceActor::<Product>::new(config.channel_buffer, next_product_id);
        let product_client = ProductClient::new(product_resource_client);
        let product_handle = tokio::spawn(product_actor.run());

        // 2. Cart service with the catalog client injected
        let (cart_service, cart_client) = CartService::new(config.channel_buffer, product_client.clone(), store);
        let cart_handle = tokio::spawn(cart_service.run());

        info!("Market system started");

        Self {
            cart_client,
            product_client,
            handles: vec![cart_handle, product_handle],
        }
    }

    /// Stops both services and waits for them. Any other clones of the
    /// clients must be dropped first or the catalog keeps running.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down market system");

        self.cart_client
            .shutdown()
            .await
            .map_err(|e| SystemError::Shutdown(e.to_string()))?;
        drop(self.cart_client);
        drop(self.product_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Service shutdown error");
                return Err(e.into());
            }
        }

        info!("Market system shutdown complete");
        Ok(())
    }
}
