//! Cart snapshots
//!
//! The persisted form of a cart is a versioned list of product identifiers and
//! quantities. Products are re-resolved against the catalog on load.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::CartState,
    catalog::Catalog,
    products::ProductId,
};

/// Snapshot format version written by this crate.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors encoding or decoding a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The document is not valid snapshot JSON.
    #[error("malformed cart snapshot")]
    Json(#[from] serde_json::Error),

    /// The document was written by an incompatible version.
    #[error("unsupported cart snapshot version {0}")]
    UnsupportedVersion(u32),
}

/// One persisted cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLine {
    /// Product identifier
    pub product_id: ProductId,

    /// Number of units
    pub quantity: u32,
}

/// Serialized cart contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    version: u32,
    lines: Vec<SnapshotLine>,
}

impl CartSnapshot {
    /// Persisted lines, in cart order.
    pub fn lines(&self) -> &[SnapshotLine] {
        &self.lines
    }

    /// Encode as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] if serialization fails.
    pub fn encode(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON.
    ///
    /// # Errors
    ///
    /// - [`SnapshotError::Json`]: the document is malformed.
    /// - [`SnapshotError::UnsupportedVersion`]: the version is not [`SNAPSHOT_VERSION`].
    pub fn decode(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: CartSnapshot = serde_json::from_str(json)?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }

        Ok(snapshot)
    }

    /// Rebuild cart state against the catalog.
    ///
    /// Lines whose product no longer resolves, or whose quantity is zero, are
    /// dropped. Repeated identifiers are merged by adding their quantities.
    pub fn restore(&self, catalog: &Catalog) -> CartState {
        let mut state = CartState::new(catalog.currency());

        for line in &self.lines {
            let Some(product) = catalog.get(line.product_id.as_str()) else {
                debug!(product_id = %line.product_id, "dropping stale cart line");
                continue;
            };

            if let Err(error) = state.add(product, i64::from(line.quantity)) {
                debug!(product_id = %line.product_id, %error, "dropping invalid cart line");
            }
        }

        state
    }
}

impl From<&CartState> for CartSnapshot {
    fn from(state: &CartState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            lines: state
                .lines()
                .iter()
                .map(|line| SnapshotLine {
                    product_id: line.product_id().clone(),
                    quantity: line.quantity(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use testresult::TestResult;

    use crate::{
        cart::CartLine,
        test_support::{catalog, product},
    };

    use super::*;

    #[test]
    fn encodes_ids_and_quantities_in_order() -> TestResult {
        let catalog = catalog([product("b", 100), product("a", 200)])?;
        let mut state = CartState::new(catalog.currency());

        for id in ["b", "a"] {
            state.add(catalog.get(id).ok_or("missing product")?, 2)?;
        }

        let json = CartSnapshot::from(&state).encode()?;

        assert_eq!(
            json,
            r#"{"version":1,"lines":[{"product_id":"b","quantity":2},{"product_id":"a","quantity":2}]}"#
        );

        Ok(())
    }

    #[test]
    fn decode_rejects_unknown_version() {
        let result = CartSnapshot::decode(r#"{"version":2,"lines":[]}"#);

        assert!(matches!(result, Err(SnapshotError::UnsupportedVersion(2))));
    }

    #[test]
    fn decode_rejects_negative_quantities() {
        let result = CartSnapshot::decode(
            r#"{"version":1,"lines":[{"product_id":"a","quantity":-1}]}"#,
        );

        assert!(matches!(result, Err(SnapshotError::Json(_))));
    }

    #[test]
    fn restore_drops_stale_and_zero_lines() -> TestResult {
        let catalog = catalog([product("a", 100), product("b", 100)])?;
        let snapshot = CartSnapshot::decode(
            r#"{"version":1,"lines":[
                {"product_id":"gone","quantity":3},
                {"product_id":"b","quantity":0},
                {"product_id":"a","quantity":2}
            ]}"#,
        )?;

        let state = snapshot.restore(&catalog);

        assert_eq!(state.len(), 1);
        assert_eq!(state.line("a").map(CartLine::quantity), Some(2));

        Ok(())
    }

    #[test]
    fn restore_merges_repeated_ids() -> TestResult {
        let catalog = catalog([product("a", 100)])?;
        let snapshot = CartSnapshot::decode(
            r#"{"version":1,"lines":[
                {"product_id":"a","quantity":2},
                {"product_id":"a","quantity":3}
            ]}"#,
        )?;

        let state = snapshot.restore(&catalog);

        assert_eq!(state.len(), 1);
        assert_eq!(state.count(), 5);

        Ok(())
    }

    #[test]
    fn restore_shares_catalog_products() -> TestResult {
        let catalog = catalog([product("a", 100)])?;
        let snapshot = CartSnapshot::decode(r#"{"version":1,"lines":[{"product_id":"a","quantity":1}]}"#)?;

        let state = snapshot.restore(&catalog);
        let restored = state.line("a").map(CartLine::product).ok_or("missing line")?;

        assert!(Arc::ptr_eq(restored, catalog.get("a").ok_or("missing product")?));

        Ok(())
    }
}
