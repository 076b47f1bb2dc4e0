use rust_decimal::Decimal;

use super::ProductId;

/// A catalog entry. `stock` is the number of units not yet reserved by any cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: u32,
}

/// Payload for listing a new product.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: u32,
}

/// Payload for editing an existing product.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
}

impl ProductCreate {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: Decimal, stock: u32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            stock,
        }
    }
}

impl Product {
    /// Substring match on name or description, case-sensitive.
    pub fn matches(&self, query: &str) -> bool {
        self.name.contains(query) || self.description.contains(query)
    }
}
