/// Custom actions for Product records.
///
/// Each action runs inside the catalog actor, so the stock check and the stock
/// write of a reservation happen as one step.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductAction {
    /// Reads the current stock level without modifying it.
    CheckStock,
    /// Takes units out of stock for a cart.
    ///
    /// # Errors
    /// Fails without touching stock if the amount is zero or exceeds available stock.
    ReserveStock(u32),
    /// Puts units previously reserved back into stock.
    ReleaseStock(u32),
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    /// Current stock level
    CheckStock(u32),
    /// Stock left after the reservation
    ReserveStock(u32),
    /// Stock after the release
    ReleaseStock(u32),
}
