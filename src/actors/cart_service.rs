use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::clients::{CartClient, ProductClient};
use crate::domain::{CartLine, CartView, Order, OrderItem, OrderItemId, OrderStatus, ProductId, UserId};
use crate::error::CartError;
use crate::messages::CartRequest;
use crate::product_actor::ProductError;
use crate::store::OrderStore;

/// Root actor that owns every user's cart.
///
/// Requests are handled one at a time, which makes each cart operation a
/// single linearized unit: two concurrent first adds for one user can never
/// both create a pending order. Stock lives in the catalog actor and is only
/// changed through its conditional reserve/release actions. When a later step
/// of an operation fails, the earlier steps are compensated before replying.
pub struct CartService {
    receiver: mpsc::Receiver<CartRequest>,
    product_client: ProductClient,
    store: Box<dyn OrderStore>,
}

impl CartService {
    pub fn new(buffer_size: usize, product_client: ProductClient, store: Box<dyn OrderStore>) -> (Self, CartClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            product_client,
            store,
        };
        let client = CartClient::new(sender);
        (service, client)
    }

    #[instrument(name = "cart_service", skip(self))]
    pub async fn run(mut self) {
        info!("CartService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::AddToCart {
                    user_id,
                    product_id,
                    quantity,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_add_to_cart(user_id, product_id, quantity).await);
                }
                CartRequest::RemoveFromCart {
                    user_id,
                    item_id,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_remove_from_cart(user_id, item_id).await);
                }
                CartRequest::ViewCart { user_id, respond_to } => {
                    let _ = respond_to.send(self.handle_view_cart(user_id).await);
                }
                CartRequest::Checkout { user_id, respond_to } => {
                    let _ = respond_to.send(self.handle_checkout(user_id).await);
                }
                CartRequest::ListOrders { user_id, respond_to } => {
                    let _ = respond_to.send(self.handle_list_orders(user_id));
                }
                CartRequest::Shutdown => {
                    info!("CartService shutting down");
                    break;
                }
            }
        }

        info!("CartService stopped");
    }

    /// Reserve first, then record. The reservation is the conditional stock
    /// update; if it is refused nothing else has been touched.
    #[instrument(skip(self))]
    async fn handle_add_to_cart(
        &mut self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<OrderItem, CartError> {
        debug!("Processing add_to_cart request");

        let units = match u32::try_from(quantity) {
            Ok(units) if units > 0 => units,
            _ => {
                warn!("Quantity must be positive");
                return Err(CartError::InvalidQuantity(quantity));
            }
        };

        // Step 1: Reserve stock via the catalog actor
        let remaining = self
            .product_client
            .reserve_stock(product_id, units)
            .await
            .map_err(|e| {
                warn!(error = %e, "Stock reservation failed");
                CartError::from(e)
            })?;
        debug!(remaining_stock = remaining, "Stock reserved");

        // Step 2: Record it in the pending order, or give the units back
        match self.record_reservation(user_id, product_id, units) {
            Ok(item) => {
                info!(
                    order_id = item.order_id,
                    item_id = item.id,
                    item_quantity = item.quantity,
                    remaining_stock = remaining,
                    "Added to cart"
                );
                Ok(item)
            }
            Err(e) => {
                error!(error = %e, "Recording reservation failed, releasing stock");
                if let Err(release_err) = self.product_client.release_stock(product_id, units).await {
                    error!(error = %release_err, "Stock release failed");
                }
                Err(e)
            }
        }
    }

    /// Upserts the item into the pending order, creating the order with it.
    /// A freshly created order is removed again if the item cannot be stored.
    fn record_reservation(
        &mut self,
        user_id: UserId,
        product_id: ProductId,
        units: u32,
    ) -> Result<OrderItem, CartError> {
        let (order, created) = match self.store.pending_order(user_id)? {
            Some(order) => (order, false),
            None => (self.store.create_order(user_id, Utc::now())?, true),
        };

        let result = self.upsert_item(&order, product_id, units);
        if result.is_err() && created {
            if let Err(e) = self.store.delete_order(order.id) {
                error!(order_id = order.id, error = %e, "Removing empty order failed");
            }
        } else if created {
            info!(order_id = order.id, "Opened pending order");
        }
        result
    }

    fn upsert_item(&mut self, order: &Order, product_id: ProductId, units: u32) -> Result<OrderItem, CartError> {
        match self.store.find_item(order.id, product_id)? {
            Some(item) => {
                let total = item
                    .quantity
                    .checked_add(units)
                    .ok_or(CartError::InvalidQuantity(i64::from(units)))?;
                Ok(self.store.set_item_quantity(item.id, total)?)
            }
            None => Ok(self.store.insert_item(order.id, product_id, units)?),
        }
    }

    /// Only items of the pending order can be removed; items of a placed order
    /// report `ItemNotFound`.
    ///
    /// Release first, then delete. If the delete fails the units are taken
    /// back out of stock. An item whose product has left the catalog is
    /// deleted without a release.
    #[instrument(skip(self))]
    async fn handle_remove_from_cart(&mut self, user_id: UserId, item_id: OrderItemId) -> Result<(), CartError> {
        debug!("Processing remove_from_cart request");

        let item = self.store.get_item(item_id)?.ok_or(CartError::ItemNotFound(item_id))?;
        let order = self
            .store
            .get_order(item.order_id)?
            .ok_or(CartError::ItemNotFound(item_id))?;

        if order.user_id != user_id {
            warn!(owner_id = order.user_id, "Cart item belongs to another user");
            return Err(CartError::Forbidden { user_id, item_id });
        }
        if order.status != OrderStatus::Pending {
            warn!(status = %order.status, "Item is no longer in a cart");
            return Err(CartError::ItemNotFound(item_id));
        }

        let restored = match self.product_client.release_stock(item.product_id, item.quantity).await {
            Ok(stock) => Some(stock),
            Err(ProductError::NotFound(product_id)) => {
                warn!(product_id, "Product no longer listed, nothing to restore");
                None
            }
            Err(e) => {
                error!(error = %e, "Stock release failed");
                return Err(e.into());
            }
        };

        if let Err(e) = self.store.delete_item(item.id) {
            error!(error = %e, "Deleting cart item failed");
            if restored.is_some() {
                if let Err(reserve_err) = self.product_client.reserve_stock(item.product_id, item.quantity).await {
                    error!(error = %reserve_err, "Stock re-reservation failed");
                }
            }
            return Err(e.into());
        }

        info!(product_id = item.product_id, restored_stock = ?restored, "Removed from cart");
        Ok(())
    }

    /// Prices every line at the product's current price. Items whose product
    /// is gone are listed as unavailable instead of failing the view.
    #[instrument(skip(self))]
    async fn handle_view_cart(&self, user_id: UserId) -> Result<CartView, CartError> {
        debug!("Processing view_cart request");

        let Some(order) = self.store.pending_order(user_id)? else {
            debug!("No pending order");
            return Ok(CartView::default());
        };

        let items = self.store.items_for_order(order.id)?;
        let mut lines = Vec::with_capacity(items.len());
        let mut unavailable = Vec::new();
        let mut total_cost = Decimal::ZERO;

        for item in items {
            let Some(product) = self.product_client.get_product(item.product_id).await? else {
                warn!(product_id = item.product_id, item_id = item.id, "Cart item refers to a delisted product");
                unavailable.push(item);
                continue;
            };
            let line_cost = product.price * Decimal::from(item.quantity);
            total_cost += line_cost;
            lines.push(CartLine {
                item,
                product_name: product.name,
                unit_price: product.price,
                line_cost,
            });
        }

        info!(order_id = order.id, line_count = lines.len(), total_cost = %total_cost, "Cart viewed");
        Ok(CartView {
            order_id: Some(order.id),
            lines,
            unavailable,
            total_cost,
        })
    }

    /// Stock was already taken at add time, so checkout does not re-validate
    /// quantities. It does refuse a cart holding a delisted product.
    #[instrument(skip(self))]
    async fn handle_checkout(&mut self, user_id: UserId) -> Result<Order, CartError> {
        debug!("Processing checkout request");

        let order = self.store.pending_order(user_id)?.ok_or_else(|| {
            warn!("No pending order");
            CartError::EmptyCart
        })?;
        let items = self.store.items_for_order(order.id)?;
        if items.is_empty() {
            warn!(order_id = order.id, "Pending order has no items");
            return Err(CartError::EmptyCart);
        }
        for item in &items {
            if self.product_client.get_product(item.product_id).await?.is_none() {
                warn!(product_id = item.product_id, "Cart holds a delisted product");
                return Err(CartError::ProductNotFound(item.product_id));
            }
        }

        let order = self.store.set_order_status(order.id, OrderStatus::Processing)?;
        info!(order_id = order.id, status = %order.status, "Order placed");
        Ok(order)
    }

    #[instrument(skip(self))]
    fn handle_list_orders(&self, user_id: UserId) -> Result<Vec<Order>, CartError> {
        debug!("Processing list_orders request");
        let orders = self.store.orders_for_user(user_id)?;
        info!(order_count = orders.len(), "Listed orders");
        Ok(orders)
    }
}
