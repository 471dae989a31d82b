//! Cart errors.

use thiserror::Error;

use crate::{cart::snapshot::SnapshotError, products::ProductId, storage::StorageError};

/// Errors returned by cart mutations.
///
/// Every error leaves the cart exactly as it was before the call.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity must be a positive number of units that fits the line counter.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Adding the quantity would overflow the line counter.
    #[error("quantity for product {0} would overflow")]
    QuantityOverflow(ProductId),

    /// The product is priced in a different currency from the cart (product currency, cart currency).
    #[error("product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// The identifier does not resolve in the catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// The snapshot could not be encoded.
    #[error("failed to encode cart snapshot")]
    Snapshot(#[from] SnapshotError),

    /// The snapshot could not be written.
    #[error("failed to persist cart")]
    Storage(#[from] StorageError),
}
