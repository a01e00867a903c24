//! Checkout: order summary and mocked order placement.
//!
//! Payment is not processed. Placing an order validates the session and the
//! cart, assigns an order number, empties the cart and reports success.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use bookhub_core::{Price, UserId};

use crate::cart::{CartEntry, CartManager};
use crate::notify::{Notification, Notifier};
use crate::rentals::Clock;
use crate::store::CollectionStore;

/// Goods and services tax applied to the subtotal (18%).
pub const GST_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Please log in to place an order")]
    NotAuthenticated,

    #[error("Your cart is empty")]
    EmptyCart,
}

/// Delivery speed chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
    Overnight,
}

impl ShippingMethod {
    pub const ALL: [Self; 3] = [Self::Standard, Self::Express, Self::Overnight];

    /// Shipping charge.
    #[must_use]
    pub fn cost(self) -> Price {
        match self {
            Self::Standard => Price::ZERO,
            Self::Express => Price::from_rupees(99),
            Self::Overnight => Price::from_rupees(199),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::Overnight => "overnight",
        }
    }

    /// Expected delivery window.
    #[must_use]
    pub const fn delivery_estimate(self) -> &'static str {
        match self {
            Self::Standard => "5-7 business days",
            Self::Express => "2-3 business days",
            Self::Overnight => "Next business day",
        }
    }
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShippingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            "overnight" => Ok(Self::Overnight),
            other => Err(format!("unknown shipping method: {other}")),
        }
    }
}

/// Price breakdown shown before payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Summary for a cart whose goods cost `subtotal`.
    #[must_use]
    pub fn new(subtotal: Price, shipping: ShippingMethod) -> Self {
        let shipping = shipping.cost();
        let tax = subtotal.scaled(GST_RATE);
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    /// Summary for the current contents of `cart`.
    #[must_use]
    pub fn for_cart<S: CollectionStore, N: Notifier>(
        cart: &CartManager<S, N>,
        shipping: ShippingMethod,
    ) -> Self {
        Self::new(cart.total(), shipping)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    /// `BH-` followed by the placement time in base 36.
    pub number: String,
    pub user_id: UserId,
    pub items: Vec<CartEntry>,
    pub shipping: ShippingMethod,
    pub summary: OrderSummary,
    pub placed_at: DateTime<Utc>,
}

/// Order number for an order placed at `at`.
#[must_use]
pub fn order_number(at: DateTime<Utc>) -> String {
    let millis = u64::try_from(at.timestamp_millis()).unwrap_or(0);
    format!("BH-{}", to_base36(millis))
}

fn to_base36(mut n: u64) -> String {
    let mut digits = Vec::new();
    loop {
        let digit = u32::try_from(n % 36).unwrap_or_default();
        digits.extend(char::from_digit(digit, 36).map(|c| c.to_ascii_uppercase()));
        n /= 36;
        if n == 0 {
            break;
        }
    }
    digits.iter().rev().collect()
}

/// Place an order for everything in `cart`.
///
/// On success the cart is emptied and "Order Placed Successfully!" is sent
/// through the cart's notifier.
///
/// # Errors
///
/// - `CheckoutError::NotAuthenticated` if `user` is `None`
/// - `CheckoutError::EmptyCart` if the cart has no entries
#[instrument(skip(cart, clock))]
pub fn place_order<S: CollectionStore, N: Notifier>(
    user: Option<&UserId>,
    cart: &mut CartManager<S, N>,
    shipping: ShippingMethod,
    clock: &impl Clock,
) -> Result<Order, CheckoutError> {
    let user = user.ok_or(CheckoutError::NotAuthenticated)?;
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let placed_at = clock.now();
    let order = Order {
        number: order_number(placed_at),
        user_id: user.clone(),
        items: cart.entries().to_vec(),
        shipping,
        summary: OrderSummary::for_cart(cart, shipping),
        placed_at,
    };

    cart.clear();
    cart.notifier().notify(Notification::info(
        "Order Placed Successfully!",
        format!("Your order #{} has been confirmed.", order.number),
    ));

    tracing::info!(
        order = %order.number,
        total = %order.summary.total,
        items = order.items.len(),
        "Order placed"
    );
    Ok(order)
}
