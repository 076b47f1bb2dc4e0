use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::{CartView, Order, OrderItem, OrderItemId, ProductId, UserId};
use crate::error::CartError;
use crate::messages::CartRequest;

/// Handle to the cart service. This is the surface the request layer calls;
/// every method takes the authenticated user id explicitly.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>) -> Self {
        Self { sender }
    }

    /// Manual methods for special cases (no response needed)
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CartError> {
        debug!("Sending shutdown request");
        self.sender
            .send(CartRequest::Shutdown)
            .await
            .map_err(|e| CartError::ActorCommunicationError(e.to_string()))
    }
}

client_method!(CartClient => fn add_to_cart(user_id: UserId, product_id: ProductId, quantity: i64) -> OrderItem as CartRequest::AddToCart, Error = CartError);
client_method!(CartClient => fn remove_from_cart(user_id: UserId, item_id: OrderItemId) -> () as CartRequest::RemoveFromCart, Error = CartError);
client_method!(CartClient => fn view_cart(user_id: UserId) -> CartView as CartRequest::ViewCart, Error = CartError);
client_method!(CartClient => fn checkout(user_id: UserId) -> Order as CartRequest::Checkout, Error = CartError);
client_method!(CartClient => fn list_orders(user_id: UserId) -> Vec<Order> as CartRequest::ListOrders, Error = CartError);
