use rust_decimal::Decimal;

use super::{OrderId, OrderItem, ProductId};

/// A cart item priced at the product's current price.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item: OrderItem,
    pub product_name: String,
    pub unit_price: Decimal,
    pub line_cost: Decimal,
}

/// Read-only snapshot of a user's pending order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartView {
    pub order_id: Option<OrderId>,
    pub lines: Vec<CartLine>,
    /// Items whose product has been removed from the catalog. They carry no
    /// price and are left out of `total_cost`.
    pub unavailable: Vec<OrderItem>,
    pub total_cost: Decimal,
}

impl CartView {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.unavailable.is_empty()
    }

    /// Units of `product_id` currently in the cart.
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.lines
            .iter()
            .filter(|line| line.item.product_id == product_id)
            .map(|line| line.item.quantity)
            .sum()
    }
}
