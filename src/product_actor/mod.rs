//! Catalog records, including the stock reservation actions that keep stock non-negative.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
