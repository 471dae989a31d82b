//! Cart
//!
//! Ordered cart lines, at most one per product, plus the store that owns
//! them for a session.

use std::{num::NonZeroU32, sync::Arc};

use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::{TotalPriceError, line_total, total_price},
    products::{Product, ProductId},
};

pub mod errors;
pub mod snapshot;
pub mod store;
mod subscribers;

pub use errors::CartError;
pub use snapshot::{CartSnapshot, SnapshotError, SnapshotLine};
pub use store::{CART_STORAGE_KEY, CartStore};
pub use subscribers::SubscriptionKey;

/// One product and the number of units of it in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    product: Arc<Product>,
    quantity: NonZeroU32,
}

impl CartLine {
    pub(crate) fn new(product: Arc<Product>, quantity: NonZeroU32) -> Self {
        Self { product, quantity }
    }

    /// The product on this line.
    pub fn product(&self) -> &Arc<Product> {
        &self.product
    }

    /// Identifier of the product on this line.
    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Number of units, always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Price of a single unit.
    pub fn unit_price(&self) -> Money<'static, Currency> {
        self.product.price
    }

    /// Unit price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// Returns [`TotalPriceError::Overflow`] if the total does not fit in minor units.
    pub fn total(&self) -> Result<Money<'static, Currency>, TotalPriceError> {
        line_total(&self.product.price, self.quantity.get())
    }
}

/// Cart contents in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct CartState {
    lines: Vec<CartLine>,
    currency: &'static Currency,
}

impl CartState {
    /// Create an empty cart priced in `currency`.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency,
        }
    }

    /// Lines in the order their products were first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for a product, if present.
    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines
            .iter()
            .find(|line| line.product_id().as_str() == product_id)
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    pub fn count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity()))
            .sum()
    }

    /// Sum of every line total, zero for an empty cart.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if a line total overflows or money arithmetic fails.
    pub fn total(&self) -> Result<Money<'static, Currency>, TotalPriceError> {
        total_price(&self.lines, self.currency)
    }

    /// Currency the cart is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product_id().as_str() == product_id)
    }

    /// Increment the product's line, appending a new line if it has none.
    pub(crate) fn add(&mut self, product: &Arc<Product>, quantity: i64) -> Result<(), CartError> {
        let quantity = positive_quantity(quantity)?;
        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                product.id.clone(),
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product.id == product.id)
        {
            line.quantity = line
                .quantity
                .checked_add(quantity.get())
                .ok_or_else(|| CartError::QuantityOverflow(product.id.clone()))?;

            return Ok(());
        }

        self.lines.push(CartLine::new(Arc::clone(product), quantity));

        Ok(())
    }

    /// Set the quantity of an existing line; zero or below removes it.
    ///
    /// Returns whether a line was present.
    pub(crate) fn set_quantity(
        &mut self,
        product_id: &str,
        quantity: i64,
    ) -> Result<bool, CartError> {
        let Some(position) = self.position(product_id) else {
            return Ok(false);
        };

        if quantity <= 0 {
            self.lines.remove(position);

            return Ok(true);
        }

        let quantity = positive_quantity(quantity)?;

        if let Some(line) = self.lines.get_mut(position) {
            line.quantity = quantity;
        }

        Ok(true)
    }

    /// Remove the product's line, returning whether one was present.
    pub(crate) fn remove(&mut self, product_id: &str) -> bool {
        let Some(position) = self.position(product_id) else {
            return false;
        };

        self.lines.remove(position);

        true
    }

    pub(crate) fn clear(&mut self) {
        self.lines.clear();
    }
}

fn positive_quantity(quantity: i64) -> Result<NonZeroU32, CartError> {
    u32::try_from(quantity)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or(CartError::InvalidQuantity(quantity))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{KES, USD};
    use testresult::TestResult;

    use crate::test_support::product;

    use super::*;

    fn ids(state: &CartState) -> Vec<&str> {
        state
            .lines()
            .iter()
            .map(|line| line.product_id().as_str())
            .collect()
    }

    #[test]
    fn add_appends_in_insertion_order() -> TestResult {
        let mut state = CartState::new(KES);

        state.add(&Arc::new(product("b", 100)), 1)?;
        state.add(&Arc::new(product("a", 100)), 1)?;

        assert_eq!(ids(&state), ["b", "a"]);

        Ok(())
    }

    #[test]
    fn add_existing_increments_without_moving() -> TestResult {
        let a = Arc::new(product("a", 100));
        let b = Arc::new(product("b", 100));
        let mut state = CartState::new(KES);

        state.add(&a, 1)?;
        state.add(&b, 1)?;
        state.add(&a, 4)?;

        assert_eq!(ids(&state), ["a", "b"]);
        assert_eq!(state.line("a").map(CartLine::quantity), Some(5));

        Ok(())
    }

    #[test]
    fn add_rejects_non_positive_quantities() {
        let a = Arc::new(product("a", 100));
        let mut state = CartState::new(KES);

        assert!(matches!(state.add(&a, 0), Err(CartError::InvalidQuantity(0))));
        assert!(matches!(state.add(&a, -3), Err(CartError::InvalidQuantity(-3))));
        assert!(state.is_empty());
    }

    #[test]
    fn add_rejects_quantity_beyond_counter() {
        let a = Arc::new(product("a", 100));
        let mut state = CartState::new(KES);
        let too_many = i64::from(u32::MAX) + 1;

        let result = state.add(&a, too_many);

        assert!(matches!(result, Err(CartError::InvalidQuantity(q)) if q == too_many));
    }

    #[test]
    fn add_overflow_leaves_line_unchanged() -> TestResult {
        let a = Arc::new(product("a", 1));
        let mut state = CartState::new(KES);

        state.add(&a, i64::from(u32::MAX))?;

        let result = state.add(&a, 1);

        assert!(matches!(result, Err(CartError::QuantityOverflow(_))));
        assert_eq!(state.line("a").map(CartLine::quantity), Some(u32::MAX));

        Ok(())
    }

    #[test]
    fn add_rejects_other_currency() {
        let mut dollars = product("a", 100);
        dollars.price = Money::from_minor(100, USD);
        let mut state = CartState::new(KES);

        let result = state.add(&Arc::new(dollars), 1);

        assert!(
            matches!(result, Err(CartError::CurrencyMismatch(_, "USD", "KES"))),
            "expected CurrencyMismatch"
        );
        assert!(state.is_empty());
    }

    #[test]
    fn set_quantity_replaces_rather_than_increments() -> TestResult {
        let mut state = CartState::new(KES);
        state.add(&Arc::new(product("a", 100)), 3)?;

        assert!(state.set_quantity("a", 7)?);
        assert_eq!(state.line("a").map(CartLine::quantity), Some(7));

        Ok(())
    }

    #[test]
    fn set_quantity_on_absent_line_is_noop() -> TestResult {
        let mut state = CartState::new(KES);
        state.add(&Arc::new(product("a", 100)), 3)?;
        let before = state.clone();

        assert!(!state.set_quantity("missing", 2)?);
        assert!(!state.set_quantity("missing", -2)?);
        assert_eq!(state, before);

        Ok(())
    }

    #[test]
    fn count_and_total_are_derived_from_lines() -> TestResult {
        let mut state = CartState::new(KES);
        state.add(&Arc::new(product("a", 150)), 2)?;
        state.add(&Arc::new(product("b", 1_000)), 3)?;

        assert_eq!(state.count(), 5);
        assert_eq!(state.total()?, Money::from_minor(3_300, KES));

        Ok(())
    }

    #[test]
    fn line_total_multiplies_unit_price() -> TestResult {
        let line = CartLine::new(
            Arc::new(product("a", 250)),
            NonZeroU32::new(4).ok_or("zero")?,
        );

        assert_eq!(line.unit_price(), Money::from_minor(250, KES));
        assert_eq!(line.total()?, Money::from_minor(1_000, KES));

        Ok(())
    }
}
