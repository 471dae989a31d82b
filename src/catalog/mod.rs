//! Catalog
//!
//! The read-only product list the cart resolves identifiers against.

use std::{fs, path::Path, sync::Arc};

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::products::{Brand, Category, Product, ProductId};

pub mod filter;
pub mod fixture;

pub use filter::ProductFilter;

/// Errors raised while building or loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading a catalog file
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A product is priced in a different currency from the catalog (product currency, catalog currency).
    #[error("product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// Two products share an identifier.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// A product has a negative price.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),

    /// A product rating is outside 1..=5.
    #[error("product {0} has rating {1}, expected 1 to 5")]
    InvalidRating(ProductId, u8),

    /// Neither a catalog currency nor any product was given.
    #[error("catalog currency could not be determined")]
    MissingCurrency,
}

/// Read-only, ordered product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Arc<Product>>,
    index: FxHashMap<ProductId, usize>,
    currency: &'static Currency,
}

impl Catalog {
    /// Build a catalog from products in shelf order.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::DuplicateProduct`]: two products share an id.
    /// - [`CatalogError::NegativePrice`]: a product price is below zero.
    /// - [`CatalogError::CurrencyMismatch`]: a product is not priced in `currency`.
    pub fn new(
        products: impl IntoIterator<Item = Product>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Catalog {
            products: Vec::new(),
            index: FxHashMap::default(),
            currency,
        };

        for product in products {
            catalog.push(product)?;
        }

        Ok(catalog)
    }

    /// Parse a YAML catalog fixture.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the YAML is malformed, a product fails
    /// validation, or no currency can be determined.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: fixture::CatalogFixture = serde_norway::from_str(yaml)?;

        let products = fixture
            .products
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let currency = match fixture.currency.as_deref() {
            Some(code) => fixture::parse_currency(code)?,
            None => products
                .first()
                .map(|product| product.price.currency())
                .ok_or(CatalogError::MissingCurrency)?,
        };

        Self::new(products, currency)
    }

    /// Read and parse a YAML catalog fixture from disk.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    fn push(&mut self, product: Product) -> Result<(), CatalogError> {
        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                product.id,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if product.price.to_minor_units() < 0 {
            return Err(CatalogError::NegativePrice(product.id));
        }

        if self.index.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }

        self.index.insert(product.id.clone(), self.products.len());
        self.products.push(Arc::new(product));

        Ok(())
    }

    /// Look up a product by identifier.
    pub fn get(&self, id: &str) -> Option<&Arc<Product>> {
        self.index
            .get(id)
            .and_then(|&position| self.products.get(position))
    }

    /// Whether the identifier resolves to a product.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Products in shelf order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Product>> {
        self.products.iter()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Currency every product is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Products flagged as featured.
    pub fn featured(&self) -> impl Iterator<Item = &Arc<Product>> {
        self.iter().filter(|product| product.featured)
    }

    /// Products flagged as new arrivals.
    pub fn new_arrivals(&self) -> impl Iterator<Item = &Arc<Product>> {
        self.iter().filter(|product| product.new_arrival)
    }

    /// Up to `limit` other products in the same category, in shelf order.
    pub fn related<'c>(
        &'c self,
        product: &'c Product,
        limit: usize,
    ) -> impl Iterator<Item = &'c Arc<Product>> {
        self.iter()
            .filter(move |other| other.category == product.category && other.id != product.id)
            .take(limit)
    }

    /// Distinct categories, in order of first appearance.
    pub fn categories(&self) -> Vec<Category> {
        let mut categories = Vec::new();

        for product in &self.products {
            if !categories.contains(&product.category) {
                categories.push(product.category);
            }
        }

        categories
    }

    /// Distinct brands, in order of first appearance.
    pub fn brands(&self) -> Vec<Brand> {
        let mut brands = Vec::new();

        for product in &self.products {
            if !brands.contains(&product.brand) {
                brands.push(product.brand);
            }
        }

        brands
    }

    /// Highest unit price, or zero for an empty catalog.
    pub fn max_price(&self) -> Money<'static, Currency> {
        self.products
            .iter()
            .map(|product| product.price)
            .max_by_key(Money::to_minor_units)
            .unwrap_or_else(|| Money::from_minor(0, self.currency))
    }

    /// Products passing the filter, in shelf order.
    pub fn filter<'c>(
        &'c self,
        filter: &'c ProductFilter,
    ) -> impl Iterator<Item = &'c Arc<Product>> {
        self.iter().filter(move |product| filter.matches(product))
    }
}
