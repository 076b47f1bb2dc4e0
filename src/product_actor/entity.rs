use rust_decimal::Decimal;

use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;
use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductId, ProductPatch};

fn validate_name(name: &str) -> Result<(), ProductError> {
    if name.trim().is_empty() {
        return Err(ProductError::ValidationError("name required".to_string()));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> Result<(), ProductError> {
    if price < Decimal::ZERO {
        return Err(ProductError::ValidationError(format!("negative price {}", price)));
    }
    Ok(())
}

impl Entity for Product {
    const KIND: &'static str = "product";

    type Id = ProductId;
    type CreateParams = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Error = ProductError;

    /// Creates a new Product from creation parameters.
    ///
    /// # Errors
    /// Rejects an empty name or a negative price.
    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, ProductError> {
        validate_name(&params.name)?;
        validate_price(params.price)?;
        Ok(Self {
            id,
            name: params.name,
            description: params.description,
            price: params.price,
            stock: params.stock,
        })
    }

    /// Applies catalog edits. Setting `stock` overwrites the unreserved count.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), ProductError> {
        if let Some(name) = patch.name {
            validate_name(&name)?;
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            validate_price(price)?;
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        Ok(())
    }

    /// Handles product-specific actions.
    ///
    /// # Actions
    /// - `CheckStock`: Returns the current stock level
    /// - `ReserveStock(amount)`: Decrements stock if at least `amount` is available
    /// - `ReleaseStock(amount)`: Increments stock
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.stock)),
            ProductAction::ReserveStock(0) | ProductAction::ReleaseStock(0) => {
                Err(ProductError::InvalidQuantity(0))
            }
            ProductAction::ReserveStock(amount) => {
                if self.stock < amount {
                    return Err(ProductError::InsufficientStock {
                        requested: amount,
                        available: self.stock,
                    });
                }
                self.stock -= amount;
                Ok(ProductActionResult::ReserveStock(self.stock))
            }
            ProductAction::ReleaseStock(amount) => {
                self.stock = self.stock.checked_add(amount).ok_or_else(|| {
                    ProductError::ValidationError(format!("stock overflow releasing {}", amount))
                })?;
                Ok(ProductActionResult::ReleaseStock(self.stock))
            }
        }
    }
}
