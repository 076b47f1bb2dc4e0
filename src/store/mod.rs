//! Order storage used by the cart service.
//!
//! The cart actor is the only caller and runs one request at a time, so
//! implementations only need to make each method atomic on its own.

mod memory;

pub use memory::MemoryOrderStore;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{Order, OrderId, OrderItem, OrderItemId, OrderStatus, ProductId, UserId};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Constraint violated: {0}")]
    Constraint(String),
    /// Backend could not be reached. Never raised by the memory store.
    #[allow(dead_code)]
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Orders and order items, keyed by surrogate id.
pub trait OrderStore: Send + Sync + 'static {
    /// The user's order with status `Pending`, if any.
    fn pending_order(&self, user_id: UserId) -> Result<Option<Order>, StoreError>;
    fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;
    /// Inserts a `Pending` order. Fails if the user already has one.
    fn create_order(&mut self, user_id: UserId, created_at: DateTime<Utc>) -> Result<Order, StoreError>;
    fn set_order_status(&mut self, id: OrderId, status: OrderStatus) -> Result<Order, StoreError>;
    /// Removes an order that has no items left.
    fn delete_order(&mut self, id: OrderId) -> Result<(), StoreError>;
    /// All orders of a user, oldest first.
    fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError>;

    fn get_item(&self, id: OrderItemId) -> Result<Option<OrderItem>, StoreError>;
    fn find_item(&self, order_id: OrderId, product_id: ProductId) -> Result<Option<OrderItem>, StoreError>;
    /// Fails if the order is missing or already holds an item for the product.
    fn insert_item(
        &mut self,
        order_id: OrderId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<OrderItem, StoreError>;
    fn set_item_quantity(&mut self, id: OrderItemId, quantity: u32) -> Result<OrderItem, StoreError>;
    fn delete_item(&mut self, id: OrderItemId) -> Result<OrderItem, StoreError>;
    /// Items of an order, in insertion order.
    fn items_for_order(&self, order_id: OrderId) -> Result<Vec<OrderItem>, StoreError>;
}
