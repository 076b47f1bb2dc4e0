use thiserror::Error;

use crate::domain::{OrderItemId, ProductId, UserId};
use crate::product_actor::ProductError;
use crate::store::StoreError;

/// Failures of cart operations. Every variant is recoverable by the caller.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },
    #[error("Cart item not found: {0}")]
    ItemNotFound(OrderItemId),
    #[error("Cart item {item_id} does not belong to user {user_id}")]
    Forbidden { user_id: UserId, item_id: OrderItemId },
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Order store error: {0}")]
    Store(#[from] StoreError),
    #[error("Catalog error: {0}")]
    Catalog(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<ProductError> for CartError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => CartError::ProductNotFound(id),
            ProductError::InsufficientStock { requested, available } => {
                CartError::InsufficientStock { requested, available }
            }
            ProductError::InvalidQuantity(quantity) => CartError::InvalidQuantity(i64::from(quantity)),
            ProductError::ActorCommunicationError(msg) => CartError::ActorCommunicationError(msg),
            other @ ProductError::ValidationError(_) => CartError::Catalog(other.to_string()),
        }
    }
}
