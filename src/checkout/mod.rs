//! Checkout
//!
//! Customer detail validation and order capture. Payment is handled by a
//! third party; an [`Order`] only records what the customer asked for.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use serde::Serialize;

use crate::{
    cart::{CartLine, CartState},
    pricing::TotalPriceError,
    products::ProductId,
    uuids::TypedUuid,
};

mod errors;

pub use errors::{CheckoutError, CheckoutField};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Debit or credit card
    Card,

    /// M-Pesa mobile money
    Mpesa,

    /// `PayPal`
    Paypal,
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentMethod::Card => "Card",
            PaymentMethod::Mpesa => "M-Pesa",
            PaymentMethod::Paypal => "PayPal",
        })
    }
}

impl FromStr for PaymentMethod {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(PaymentMethod::Card),
            "mpesa" | "m-pesa" => Ok(PaymentMethod::Mpesa),
            "paypal" => Ok(PaymentMethod::Paypal),
            _ => Err(CheckoutError::UnknownPaymentMethod(s.to_string())),
        }
    }
}

/// Payment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentStatus {
    /// Payment confirmed
    Paid,

    /// Awaiting payment
    Unpaid,
}

/// Fulfilment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeliveryStatus {
    /// Being prepared
    Processing,

    /// Handed to the courier
    Shipped,

    /// Received by the customer
    Delivered,
}

/// Shipping and contact details entered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerDetails {
    /// Full name
    pub name: String,

    /// Email address
    pub email: String,

    /// Phone number
    pub phone: String,

    /// Street address
    pub address: String,

    /// City
    pub city: String,

    /// Postal code
    pub zip: String,
}

impl CustomerDetails {
    /// Check every field, reporting the first invalid one.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidDetails`] naming the offending field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let checks = [
            (CheckoutField::Name, min_chars(&self.name, 2)),
            (CheckoutField::Email, is_email(&self.email)),
            (CheckoutField::Phone, min_chars(&self.phone, 10)),
            (CheckoutField::Address, min_chars(&self.address, 5)),
            (CheckoutField::City, min_chars(&self.city, 2)),
            (CheckoutField::Zip, min_chars(&self.zip, 4)),
        ];

        match checks.into_iter().find(|(_, valid)| !valid) {
            Some((field, _)) => Err(CheckoutError::InvalidDetails(field)),
            None => Ok(()),
        }
    }
}

fn min_chars(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

fn is_email(value: &str) -> bool {
    let value = value.trim();

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !value.chars().any(char::is_whitespace)
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, _)| !host.is_empty())
        && !domain.ends_with('.')
}

/// A placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Order identifier
    pub uuid: OrderUuid,

    /// Who placed it
    pub customer: CustomerDetails,

    /// Cart lines at the time of checkout
    pub lines: Vec<CartLine>,

    /// Amount due
    pub total: Money<'static, Currency>,

    /// Chosen payment method
    pub payment_method: PaymentMethod,

    /// Payment state
    pub payment_status: PaymentStatus,

    /// Fulfilment state
    pub delivery_status: DeliveryStatus,

    /// When the order was placed
    pub created_at: Timestamp,
}

impl Order {
    /// Capture an unpaid, processing order from the cart contents.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: there is nothing to order.
    /// - [`CheckoutError::InvalidDetails`]: a customer field failed validation.
    /// - [`CheckoutError::TotalPrice`]: the cart total could not be computed.
    pub fn place(
        state: &CartState,
        customer: CustomerDetails,
        payment_method: PaymentMethod,
    ) -> Result<Self, CheckoutError> {
        if state.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        customer.validate()?;

        Ok(Self {
            uuid: OrderUuid::now_v7(),
            customer,
            lines: state.lines().to_vec(),
            total: state.total()?,
            payment_method,
            payment_status: PaymentStatus::Unpaid,
            delivery_status: DeliveryStatus::Processing,
            created_at: Timestamp::now(),
        })
    }

    /// Total number of units ordered.
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity()))
            .sum()
    }

    /// Flatten into a serializable record, with amounts in minor units.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if a line total overflows.
    pub fn record(&self) -> Result<OrderRecord, TotalPriceError> {
        let lines = self
            .lines
            .iter()
            .map(|line| {
                Ok(OrderLineRecord {
                    product_id: line.product_id().clone(),
                    name: line.product().name.clone(),
                    quantity: line.quantity(),
                    unit_price_minor: line.unit_price().to_minor_units(),
                    line_total_minor: line.total()?.to_minor_units(),
                })
            })
            .collect::<Result<Vec<_>, TotalPriceError>>()?;

        Ok(OrderRecord {
            uuid: self.uuid,
            customer: self.customer.clone(),
            lines,
            currency: self.total.currency().iso_alpha_code,
            total_minor: self.total.to_minor_units(),
            payment_method: self.payment_method,
            payment_status: self.payment_status,
            delivery_status: self.delivery_status,
            created_at: self.created_at,
        })
    }
}

/// Serialized form of an [`Order`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    /// Order identifier
    pub uuid: OrderUuid,

    /// Who placed it
    pub customer: CustomerDetails,

    /// Ordered lines
    pub lines: Vec<OrderLineRecord>,

    /// ISO currency code
    pub currency: &'static str,

    /// Amount due in minor units
    pub total_minor: i64,

    /// Chosen payment method
    pub payment_method: PaymentMethod,

    /// Payment state
    pub payment_status: PaymentStatus,

    /// Fulfilment state
    pub delivery_status: DeliveryStatus,

    /// When the order was placed
    pub created_at: Timestamp,
}

/// One line of an [`OrderRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLineRecord {
    /// Product identifier
    pub product_id: ProductId,

    /// Product name at the time of ordering
    pub name: String,

    /// Units ordered
    pub quantity: u32,

    /// Unit price in minor units
    pub unit_price_minor: i64,

    /// Unit price times quantity in minor units
    pub line_total_minor: i64,
}
