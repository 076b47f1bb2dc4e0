pub mod cart;
pub mod order;
pub mod product;

pub use cart::*;
pub use order::*;
pub use product::*;

/// Authenticated user id, resolved by the request layer.
pub type UserId = u64;
pub type ProductId = u64;
pub type OrderId = u64;
pub type OrderItemId = u64;
