//! Terminal rendering
//!
//! Tables for the product shelf, the cart and placed orders.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{CartLine, CartState},
    catalog::Catalog,
    checkout::Order,
    pricing::TotalPriceError,
    products::{Brand, Category, Product},
};

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing to the output failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A line or cart total could not be computed.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// An order record could not be serialized.
    #[error("failed to serialize order: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write a product listing.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the output cannot be written.
pub fn write_products<'p>(
    mut out: impl io::Write,
    products: impl IntoIterator<Item = &'p Product>,
) -> Result<(), RenderError> {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Name", "Category", "Brand", "Rating", "Stock", "Price"]);

    for product in products {
        let stock = if product.in_stock() {
            product.stock.to_string()
        } else {
            "out of stock".to_string()
        };

        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.category.to_string(),
            product.brand.to_string(),
            "★".repeat(usize::from(product.rating.stars())),
            stock,
            product.price.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(5..7), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

/// Write a product's details, followed by related products if there are any.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the output cannot be written.
pub fn write_product<'p>(
    mut out: impl io::Write,
    product: &Product,
    related: impl IntoIterator<Item = &'p Product>,
) -> Result<(), RenderError> {
    let stock = if product.in_stock() {
        format!("{} in stock", product.stock)
    } else {
        "out of stock".to_string()
    };

    writeln!(out, "\x1b[1m{}\x1b[0m", product.name)?;
    writeln!(out, " {} / {}", product.brand, product.category)?;
    writeln!(out, " {}  {}", "★".repeat(usize::from(product.rating.stars())), stock)?;
    writeln!(out, " {}", product.price)?;

    if !product.description.is_empty() {
        writeln!(out, "\n {}", product.description)?;
    }

    let mut related = related.into_iter().peekable();

    if related.peek().is_some() {
        writeln!(out, "\nRelated products")?;
        write_products(&mut out, related)?;
    }

    Ok(())
}

/// Write the shop facets: categories, brands and the price ceiling.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the output cannot be written.
pub fn write_facets(mut out: impl io::Write, catalog: &Catalog) -> Result<(), RenderError> {
    let categories: Vec<_> = catalog.categories().into_iter().map(Category::name).collect();
    let brands: Vec<_> = catalog.brands().into_iter().map(Brand::name).collect();

    writeln!(out, " Categories: {}", categories.join(", "))?;
    writeln!(out, " Brands: {}", brands.join(", "))?;
    writeln!(out, " Prices up to {}", catalog.max_price())?;

    Ok(())
}

/// Write the cart lines followed by the item count and total.
///
/// # Errors
///
/// Returns a [`RenderError`] if a total overflows or the output cannot be written.
pub fn write_cart(mut out: impl io::Write, cart: &CartState) -> Result<(), RenderError> {
    if cart.is_empty() {
        writeln!(out, "Your cart is empty.")?;

        return Ok(());
    }

    write_lines(&mut out, cart.lines())?;

    writeln!(out, " Items: {}", cart.count())?;
    writeln!(out, " \x1b[1mTotal: {}\x1b[0m", cart.total()?)?;

    Ok(())
}

/// Write an order confirmation.
///
/// # Errors
///
/// Returns a [`RenderError`] if a line total overflows or the output cannot be written.
pub fn write_order(mut out: impl io::Write, order: &Order) -> Result<(), RenderError> {
    writeln!(out, "Order {} placed by {}", order.uuid, order.customer.name)?;

    write_lines(&mut out, &order.lines)?;

    writeln!(out, " Items: {}", order.item_count())?;
    writeln!(out, " \x1b[1mTotal: {}\x1b[0m", order.total)?;
    writeln!(
        out,
        " Payment: {} ({:?}), delivery {:?}",
        order.payment_method, order.payment_status, order.delivery_status
    )?;

    Ok(())
}

/// Write an order as pretty-printed JSON.
///
/// # Errors
///
/// Returns a [`RenderError`] if a line total overflows, serialization fails,
/// or the output cannot be written.
pub fn write_order_json(mut out: impl io::Write, order: &Order) -> Result<(), RenderError> {
    serde_json::to_writer_pretty(&mut out, &order.record()?)?;
    writeln!(out)?;

    Ok(())
}

fn write_lines(out: &mut impl io::Write, lines: &[CartLine]) -> Result<(), RenderError> {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Qty", "Unit Price", "Line Total"]);

    for line in lines {
        builder.push_record([
            line.product().name.clone(),
            line.quantity().to_string(),
            line.unit_price().to_string(),
            line.total()?.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(1..4), Alignment::right());

    writeln!(out, "\n{table}")?;

    Ok(())
}
