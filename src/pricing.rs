//! Prices

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::cart::CartLine;

/// Errors that can occur while calculating line or cart totals.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// Price multiplied by quantity does not fit in minor units.
    #[error("line total overflows for {0} units")]
    Overflow(u32),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates unit price multiplied by quantity.
///
/// # Errors
///
/// Returns [`TotalPriceError::Overflow`] if the result does not fit in minor units.
pub fn line_total(
    price: &Money<'static, Currency>,
    quantity: u32,
) -> Result<Money<'static, Currency>, TotalPriceError> {
    let minor = price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(TotalPriceError::Overflow(quantity))?;

    Ok(Money::from_minor(minor, price.currency()))
}

/// Calculates the total price of a list of cart lines.
///
/// An empty list totals to zero in the given currency.
///
/// # Errors
///
/// - [`TotalPriceError::Overflow`]: a line total does not fit in minor units.
/// - [`TotalPriceError::Money`]: wrapped money arithmetic or currency mismatch error.
pub fn total_price<'l>(
    lines: impl IntoIterator<Item = &'l CartLine>,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, TotalPriceError> {
    lines
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, line| {
            Ok(acc.add(line.total()?)?)
        })
}
