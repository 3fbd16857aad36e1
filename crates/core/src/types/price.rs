//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices arrive as JSON numbers (e.g. `9.99`). They are held as
//! [`Decimal`] so that `quantity x price` and the cart total stay exact, and
//! are only rounded when formatted for display.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::Quantity;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the default currency.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// A zero amount in the default currency.
    #[must_use]
    pub const fn zero() -> Self {
        Self::usd(Decimal::ZERO)
    }

    /// Price of `quantity` units at this unit price.
    ///
    /// Saturates at the representable bounds instead of overflowing.
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Self {
        let amount = self
            .amount
            .checked_mul(Decimal::from(quantity.get()))
            .unwrap_or_else(|| saturated(self.amount));
        Self::new(amount, self.currency_code)
    }

    /// Format for display with exactly two decimals (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{}{rounded:.2}", self.currency_code.symbol())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Add for Price {
    type Output = Self;

    /// Adds two amounts. The left-hand currency is kept; a cart only ever
    /// holds prices from one catalog, so mixed currencies do not occur.
    fn add(self, rhs: Self) -> Self {
        let amount = self
            .amount
            .checked_add(rhs.amount)
            .unwrap_or_else(|| saturated(rhs.amount));
        Self::new(amount, self.currency_code)
    }
}

/// The bound an overflowing operation with an operand of this sign ran into.
fn saturated(operand: Decimal) -> Decimal {
    if operand.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, price| {
            if acc.amount.is_zero() && acc.currency_code != price.currency_code {
                Self::new(price.amount, price.currency_code)
            } else {
                acc + price
            }
        })
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}
