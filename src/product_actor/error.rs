use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::{Product, ProductId};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Product validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError<Product>> for ProductError {
    fn from(err: FrameworkError<Product>) -> Self {
        match err {
            FrameworkError::NotFound(id) => ProductError::NotFound(id),
            FrameworkError::Rejected(e) => e,
            other => ProductError::ActorCommunicationError(other.to_string()),
        }
    }
}
