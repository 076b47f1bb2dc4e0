//! In-memory order store.
//!
//! Enforces the constraints a relational schema would carry: one pending order
//! per user, one item per (order, product), positive quantities, forward-only
//! status changes, and no order deleted while it still has items.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::{OrderStore, StoreError};
use crate::domain::{Order, OrderId, OrderItem, OrderItemId, OrderStatus, ProductId, UserId};

#[derive(Debug)]
pub struct MemoryOrderStore {
    orders: BTreeMap<OrderId, Order>,
    items: BTreeMap<OrderItemId, OrderItem>,
    next_order_id: OrderId,
    next_item_id: OrderItemId,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self {
            orders: BTreeMap::new(),
            items: BTreeMap::new(),
            next_order_id: 1,
            next_item_id: 1,
        }
    }
}

impl Default for MemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

fn positive(quantity: u32) -> Result<(), StoreError> {
    if quantity == 0 {
        return Err(StoreError::Constraint("item quantity must be positive".to_string()));
    }
    Ok(())
}

impl OrderStore for MemoryOrderStore {
    fn pending_order(&self, user_id: UserId) -> Result<Option<Order>, StoreError> {
        Ok(self
            .orders
            .values()
            .find(|o| o.user_id == user_id && o.status == OrderStatus::Pending)
            .cloned())
    }

    fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.get(&id).cloned())
    }

    fn create_order(&mut self, user_id: UserId, created_at: DateTime<Utc>) -> Result<Order, StoreError> {
        if self.pending_order(user_id)?.is_some() {
            return Err(StoreError::Constraint(format!("user {} already has a pending order", user_id)));
        }
        let order = Order {
            id: self.next_order_id,
            user_id,
            status: OrderStatus::Pending,
            created_at,
        };
        self.next_order_id += 1;
        self.orders.insert(order.id, order.clone());
        Ok(order)
    }

    fn set_order_status(&mut self, id: OrderId, status: OrderStatus) -> Result<Order, StoreError> {
        let order = self
            .orders
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("order {}", id)))?;
        if !order.status.can_transition_to(status) {
            return Err(StoreError::Constraint(format!(
                "order {} cannot move from {} to {}",
                id, order.status, status
            )));
        }
        order.status = status;
        Ok(order.clone())
    }

    fn delete_order(&mut self, id: OrderId) -> Result<(), StoreError> {
        if self.items.values().any(|i| i.order_id == id) {
            return Err(StoreError::Constraint(format!("order {} still has items", id)));
        }
        self.orders
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("order {}", id)))
    }

    fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError> {
        Ok(self.orders.values().filter(|o| o.user_id == user_id).cloned().collect())
    }

    fn get_item(&self, id: OrderItemId) -> Result<Option<OrderItem>, StoreError> {
        Ok(self.items.get(&id).cloned())
    }

    fn find_item(&self, order_id: OrderId, product_id: ProductId) -> Result<Option<OrderItem>, StoreError> {
        Ok(self
            .items
            .values()
            .find(|i| i.order_id == order_id && i.product_id == product_id)
            .cloned())
    }

    fn insert_item(
        &mut self,
        order_id: OrderId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<OrderItem, StoreError> {
        positive(quantity)?;
        if !self.orders.contains_key(&order_id) {
            return Err(StoreError::NotFound(format!("order {}", order_id)));
        }
        if self.find_item(order_id, product_id)?.is_some() {
            return Err(StoreError::Constraint(format!(
                "order {} already holds product {}",
                order_id, product_id
            )));
        }
        let item = OrderItem {
            id: self.next_item_id,
            order_id,
            product_id,
            quantity,
        };
        self.next_item_id += 1;
        self.items.insert(item.id, item.clone());
        Ok(item)
    }

    fn set_item_quantity(&mut self, id: OrderItemId, quantity: u32) -> Result<OrderItem, StoreError> {
        positive(quantity)?;
        let item = self
            .items
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("order item {}", id)))?;
        item.quantity = quantity;
        Ok(item.clone())
    }

    fn delete_item(&mut self, id: OrderItemId) -> Result<OrderItem, StoreError> {
        self.items
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound(format!("order item {}", id)))
    }

    fn items_for_order(&self, order_id: OrderId) -> Result<Vec<OrderItem>, StoreError> {
        Ok(self.items.values().filter(|i| i.order_id == order_id).cloned().collect())
    }
}
