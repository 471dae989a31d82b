//! Checkout errors.

use std::fmt::{self, Display, Formatter};

use thiserror::Error;

use crate::{cart::CartError, pricing::TotalPriceError};

/// Customer detail fields collected at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutField {
    /// Full name
    Name,

    /// Email address
    Email,

    /// Phone number
    Phone,

    /// Street address
    Address,

    /// City
    City,

    /// Postal code
    Zip,
}

impl Display for CheckoutField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckoutField::Name => "name",
            CheckoutField::Email => "email",
            CheckoutField::Phone => "phone",
            CheckoutField::Address => "address",
            CheckoutField::City => "city",
            CheckoutField::Zip => "zip",
        })
    }
}

/// Errors raised while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// A customer detail failed validation.
    #[error("invalid {0}")]
    InvalidDetails(CheckoutField),

    /// The payment method name is not recognised.
    #[error("unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    /// The order total could not be computed.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// Clearing the cart after the order was captured failed.
    #[error(transparent)]
    Cart(#[from] CartError),
}
