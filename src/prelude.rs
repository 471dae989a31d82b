//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        CART_STORAGE_KEY, CartError, CartLine, CartSnapshot, CartState, CartStore, SnapshotError,
        SubscriptionKey,
    },
    catalog::{Catalog, CatalogError, ProductFilter},
    checkout::{
        CheckoutError, CheckoutField, CustomerDetails, DeliveryStatus, Order, OrderUuid,
        PaymentMethod, PaymentStatus,
    },
    pricing::TotalPriceError,
    products::{Brand, Category, Product, ProductId, Rating},
    storage::{FileStorage, MemoryStorage, SnapshotStorage, StorageError},
};
