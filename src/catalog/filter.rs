//! Shop filtering

use rustc_hash::FxHashSet;

use crate::products::{Brand, Category, Product};

/// Shop-page product filter.
///
/// Every criterion left unset matches all products. Category and brand sets
/// match when the product's value is one of the selected values.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    search: Option<String>,
    min_price_minor: Option<i64>,
    max_price_minor: Option<i64>,
    categories: FxHashSet<Category>,
    brands: FxHashSet<Brand>,
}

impl ProductFilter {
    /// Filter that matches every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match on product name.
    #[must_use]
    pub fn with_search(mut self, term: &str) -> Self {
        let term = term.trim();

        self.search = (!term.is_empty()).then(|| term.to_lowercase());

        self
    }

    /// Inclusive price range in minor units.
    #[must_use]
    pub fn with_price_range(mut self, min_minor: Option<i64>, max_minor: Option<i64>) -> Self {
        self.min_price_minor = min_minor;
        self.max_price_minor = max_minor;

        self
    }

    /// Add a category to the selected set.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.insert(category);

        self
    }

    /// Add a brand to the selected set.
    #[must_use]
    pub fn with_brand(mut self, brand: Brand) -> Self {
        self.brands.insert(brand);

        self
    }

    /// Whether the product passes every criterion.
    pub fn matches(&self, product: &Product) -> bool {
        let price = product.price.to_minor_units();

        let matches_search = self
            .search
            .as_deref()
            .is_none_or(|term| product.name.to_lowercase().contains(term));

        let matches_price = self.min_price_minor.is_none_or(|min| price >= min)
            && self.max_price_minor.is_none_or(|max| price <= max);

        let matches_category =
            self.categories.is_empty() || self.categories.contains(&product.category);

        let matches_brand = self.brands.is_empty() || self.brands.contains(&product.brand);

        matches_search && matches_price && matches_category && matches_brand
    }
}
