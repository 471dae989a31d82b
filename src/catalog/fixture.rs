//! Catalog Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, KES, USD},
};
use serde::Deserialize;

use crate::{
    catalog::CatalogError,
    products::{Brand, Category, Product, ProductId, Rating},
};

/// Wrapper for a catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Catalog currency code (e.g., "KES"). Taken from the first product when omitted.
    #[serde(default)]
    pub currency: Option<String>,

    /// Products, in shelf order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Product price (e.g., "2999.00 KES")
    pub price: String,

    /// Product category
    pub category: Category,

    /// Product brand
    pub brand: Brand,

    /// Units in stock
    #[serde(default)]
    pub stock: u32,

    /// Image references
    #[serde(default)]
    pub images: Vec<String>,

    /// Star rating, 1 to 5
    pub rating: u8,

    /// Featured flag
    #[serde(default)]
    pub featured: bool,

    /// New arrival flag
    #[serde(default)]
    pub new_arrival: bool,
}

impl TryFrom<ProductFixture> for Product {
    type Error = CatalogError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;
        let id = ProductId::new(fixture.id);

        let rating = Rating::new(fixture.rating)
            .ok_or_else(|| CatalogError::InvalidRating(id.clone(), fixture.rating))?;

        Ok(Product {
            id,
            name: fixture.name,
            description: fixture.description,
            price: Money::from_minor(minor_units, currency),
            category: fixture.category,
            brand: fixture.brand,
            stock: fixture.stock,
            images: fixture.images,
            rating,
            featured: fixture.featured,
            new_arrival: fixture.new_arrival,
        })
    }
}

/// Parse price string (e.g., "2.99 KES") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), CatalogError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CatalogError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = parse_currency(code)?;

    let minor_units = amount
        .parse::<Decimal>()
        .ok()
        .and_then(to_minor_units)
        .ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Convert a major-unit amount to minor units, rounding half to even.
///
/// Every supported currency has two decimal places. Returns `None` if the
/// result does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
}

/// Resolve a supported ISO currency code.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownCurrency`] for codes the storefront does not trade in.
pub fn parse_currency(code: &str) -> Result<&'static Currency, CatalogError> {
    match code.trim() {
        "KES" => Ok(KES),
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(CatalogError::UnknownCurrency(other.to_string())),
    }
}
