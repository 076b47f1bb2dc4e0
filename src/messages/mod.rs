use tokio::sync::oneshot;

use crate::domain::{CartView, Order, OrderItem, OrderItemId, ProductId, UserId};
use crate::error::CartError;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Requests handled by the cart service. Each variant carries the caller's
/// user id and a oneshot channel for the reply.
#[derive(Debug)]
pub enum CartRequest {
    AddToCart {
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
        respond_to: ServiceResponse<OrderItem, CartError>,
    },
    RemoveFromCart {
        user_id: UserId,
        item_id: OrderItemId,
        respond_to: ServiceResponse<(), CartError>,
    },
    ViewCart {
        user_id: UserId,
        respond_to: ServiceResponse<CartView, CartError>,
    },
    Checkout {
        user_id: UserId,
        respond_to: ServiceResponse<Order, CartError>,
    },
    ListOrders {
        user_id: UserId,
        respond_to: ServiceResponse<Vec<Order>, CartError>,
    },
    Shutdown,
}
