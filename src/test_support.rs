//! Shared test helpers.

use std::{
    io,
    num::NonZeroU32,
    sync::{Arc, Mutex},
};

use rusty_money::{Money, iso::KES};

use crate::{
    cart::CartLine,
    catalog::{Catalog, CatalogError},
    checkout::CustomerDetails,
    products::{Brand, Category, Product, ProductId, Rating},
};

pub(crate) const DEMO_CATALOG_YAML: &str = include_str!("../fixtures/catalog/demo.yml");

pub(crate) fn product(id: &str, price_minor: i64) -> Product {
    Product {
        id: ProductId::from(id),
        name: id.to_string(),
        description: String::new(),
        price: Money::from_minor(price_minor, KES),
        category: Category::Audio,
        brand: Brand::Sonic,
        stock: 10,
        images: Vec::new(),
        rating: Rating::new(4).unwrap_or(Rating::MIN),
        featured: false,
        new_arrival: false,
    }
}

pub(crate) fn line(product: &Arc<Product>, quantity: u32) -> CartLine {
    CartLine::new(
        Arc::clone(product),
        NonZeroU32::new(quantity).unwrap_or(NonZeroU32::MIN),
    )
}

pub(crate) fn catalog(
    products: impl IntoIterator<Item = Product>,
) -> Result<Arc<Catalog>, CatalogError> {
    Catalog::new(products, KES).map(Arc::new)
}

pub(crate) fn customer() -> CustomerDetails {
    CustomerDetails {
        name: "Wanjiku Kamau".to_string(),
        email: "wanjiku@example.co.ke".to_string(),
        phone: "0712345678".to_string(),
        address: "12 Moi Avenue".to_string(),
        city: "Nairobi".to_string(),
        zip: "00100".to_string(),
    }
}

/// Log sink for asserting on emitted `tracing` events.
#[derive(Debug, Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Run `f` with a debug-level subscriber writing into this sink.
    pub(crate) fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let sink = self.clone();

        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, f)
    }

    pub(crate) fn contents(&self) -> String {
        self.0
            .lock()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self
            .0
            .lock()
            .map_err(|err| io::Error::other(err.to_string()))?;

        bytes.extend_from_slice(buf);

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
