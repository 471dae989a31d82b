//! Products

use std::{
    borrow::Borrow,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Product identifier, unique within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Returned when a category or brand name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariantError {
    kind: &'static str,
    value: String,
}

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Phones
    Smartphones,

    /// Laptops
    Laptops,

    /// Headphones, speakers and other audio gear
    Audio,

    /// Watches and fitness bands
    Wearables,

    /// Cameras
    Cameras,

    /// Drones
    Drones,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 6] = [
        Category::Smartphones,
        Category::Laptops,
        Category::Audio,
        Category::Wearables,
        Category::Cameras,
        Category::Drones,
    ];

    /// Display name of the category.
    pub const fn name(self) -> &'static str {
        match self {
            Category::Smartphones => "Smartphones",
            Category::Laptops => "Laptops",
            Category::Audio => "Audio",
            Category::Wearables => "Wearables",
            Category::Cameras => "Cameras",
            Category::Drones => "Drones",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariantError {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// Product brand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Brand {
    /// Nova
    Nova,

    /// Electro
    Electro,

    /// Sonic
    Sonic,

    /// Connect
    Connect,
}

impl Brand {
    /// Every brand, in display order.
    pub const ALL: [Brand; 4] = [Brand::Nova, Brand::Electro, Brand::Sonic, Brand::Connect];

    /// Display name of the brand.
    pub const fn name(self) -> &'static str {
        match self {
            Brand::Nova => "Nova",
            Brand::Electro => "Electro",
            Brand::Sonic => "Sonic",
            Brand::Connect => "Connect",
        }
    }
}

impl Display for Brand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Brand {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Brand::ALL
            .into_iter()
            .find(|brand| brand.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariantError {
                kind: "brand",
                value: s.to_string(),
            })
    }
}

/// Star rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    /// Lowest rating.
    pub const MIN: Rating = Rating(1);

    /// Highest rating.
    pub const MAX: Rating = Rating(5);

    /// Create a rating, returning `None` outside of 1..=5.
    pub const fn new(stars: u8) -> Option<Self> {
        if stars >= Self::MIN.0 && stars <= Self::MAX.0 {
            Some(Self(stars))
        } else {
            None
        }
    }

    /// Number of stars.
    pub const fn stars(self) -> u8 {
        self.0
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Long description
    pub description: String,

    /// Unit price
    pub price: Money<'static, Currency>,

    /// Category
    pub category: Category,

    /// Brand
    pub brand: Brand,

    /// Units available
    pub stock: u32,

    /// Image references
    pub images: Vec<String>,

    /// Rating
    pub rating: Rating,

    /// Shown on the featured shelf
    pub featured: bool,

    /// Shown on the new arrivals shelf
    pub new_arrival: bool,
}

impl Product {
    /// Whether any units are available.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_accepts_one_to_five() {
        assert_eq!(Rating::new(1), Some(Rating::MIN));
        assert_eq!(Rating::new(5), Some(Rating::MAX));
        assert_eq!(Rating::new(3).map(Rating::stars), Some(3));
    }

    #[test]
    fn rating_rejects_out_of_range() {
        assert_eq!(Rating::new(0), None);
        assert_eq!(Rating::new(6), None);
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("audio".parse::<Category>(), Ok(Category::Audio));
        assert_eq!(" Drones ".parse::<Category>(), Ok(Category::Drones));
    }

    #[test]
    fn unknown_brand_is_rejected() {
        let result = "Acme".parse::<Brand>();

        assert!(
            matches!(&result, Err(error) if error.to_string() == "unknown brand: Acme"),
            "expected unknown brand error, got {result:?}"
        );
    }

    #[test]
    fn product_id_borrows_as_str() {
        let id = ProductId::from("nova-x1");
        let borrowed: &str = id.borrow();

        assert_eq!(borrowed, "nova-x1");
        assert_eq!(id.to_string(), "nova-x1");
    }
}
