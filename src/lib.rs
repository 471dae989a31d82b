//! Storefront
//!
//! Storefront is the cart state manager behind an electronics shop: a product
//! catalog, a session cart with one line per product, snapshot persistence
//! so the cart survives restarts, and checkout order capture.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use storefront::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Arc::new(Catalog::from_path("fixtures/catalog/demo.yml")?);
//! let mut cart = CartStore::open(catalog, FileStorage::open(".storefront")?);
//!
//! cart.add_by_id("nova-x1", 1)?;
//!
//! println!("{} items, {}", cart.cart_count(), cart.cart_total()?);
//! # Ok(())
//! # }
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod observability;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod render;
pub mod storage;
pub mod uuids;

#[cfg(test)]
mod test_support;
