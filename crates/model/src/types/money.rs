// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Represents an amount of money in a specified currency denomination.
//!
//! The amount is an exact decimal. Arithmetic between two `Money` values
//! requires currency equality; the checked variants surface a
//! [`CurrencyMismatch`] error while the operator impls panic, mirroring the
//! `new_checked` / `new` convention used across the value types.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};

use marlin_core::correctness::FAILED;
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thousands::Separable;

use crate::types::Currency;

/// The error produced when `Money` arithmetic is attempted across denominations.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Currency mismatch: cannot operate on {lhs} and {rhs}")]
pub struct CurrencyMismatch {
    /// The currency on the left-hand side of the operation.
    pub lhs: Currency,
    /// The currency on the right-hand side of the operation.
    pub rhs: Currency,
}

/// Represents an amount of money in a specified currency denomination.
#[repr(C)]
#[derive(Clone, Copy, Eq)]
pub struct Money {
    /// The monetary amount as an exact decimal.
    pub amount: Decimal,
    /// The currency denomination associated with the monetary amount.
    pub currency: Currency,
}

impl Money {
    /// Creates a new [`Money`] instance.
    #[must_use]
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a new [`Money`] instance with a value of zero with the given [`Currency`].
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Returns `true` if the value of this instance is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns the value of this instance as a `Decimal`.
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        self.amount
    }

    /// Returns the value of this instance as an `f64`.
    ///
    /// # Panics
    ///
    /// Panics if the amount exceeds the representable range of `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.amount.to_f64().expect("Invalid `Decimal` for `f64`")
    }

    /// Adds the given money value, checking currency equality.
    ///
    /// # Errors
    ///
    /// Returns a [`CurrencyMismatch`] error if `rhs` is a different currency.
    pub fn checked_add(self, rhs: Self) -> Result<Self, CurrencyMismatch> {
        self.check_currency(rhs)?;
        Ok(Self::new(self.amount + rhs.amount, self.currency))
    }

    /// Subtracts the given money value, checking currency equality.
    ///
    /// # Errors
    ///
    /// Returns a [`CurrencyMismatch`] error if `rhs` is a different currency.
    pub fn checked_sub(self, rhs: Self) -> Result<Self, CurrencyMismatch> {
        self.check_currency(rhs)?;
        Ok(Self::new(self.amount - rhs.amount, self.currency))
    }

    /// Returns a formatted string representation with thousands separation.
    #[must_use]
    pub fn to_formatted_string(&self) -> String {
        let amount_str = format!("{:.*}", self.currency.precision as usize, self.amount)
            .separate_with_underscores();
        format!("{} {}", amount_str, self.currency.code)
    }

    fn check_currency(&self, rhs: Self) -> Result<(), CurrencyMismatch> {
        if self.currency == rhs.currency {
            Ok(())
        } else {
            Err(CurrencyMismatch {
                lhs: self.currency,
                rhs: rhs.currency,
            })
        }
    }
}

impl FromStr for Money {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = value.split_whitespace().collect();
        if parts.len() != 2 {
            return Err(format!(
                "Error invalid input format '{value}'. Expected '<amount> <currency>'"
            ));
        }

        let amount = Decimal::from_str(&parts[0].replace('_', ""))
            .map_err(|e| format!("Error parsing amount '{}' as `Decimal`: {e}", parts[0]))?;
        let currency = Currency::from_str(parts[1]).map_err(|e| e.to_string())?;
        Ok(Self::new(amount, currency))
    }
}

impl From<&str> for Money {
    /// Creates a [`Money`] from a `"<amount> <currency>"` string slice.
    ///
    /// # Panics
    ///
    /// Panics if the `value` string is not valid.
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl Hash for Money {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.amount.hash(state);
        self.currency.hash(state);
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.amount == other.amount && self.currency == other.currency
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        assert_eq!(self.currency, other.currency);
        self.amount.cmp(&other.amount)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.amount, self.currency)
    }
}

impl Add for Money {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if `rhs` is a different currency.
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs).expect(FAILED)
    }
}

impl Sub for Money {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if `rhs` is a different currency.
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs).expect(FAILED)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = self.checked_add(other).expect(FAILED);
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        *self = self.checked_sub(other).expect(FAILED);
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self::new(self.amount * rhs, self.currency)
    }
}

impl Div<Decimal> for Money {
    type Output = Self;

    fn div(self, rhs: Decimal) -> Self::Output {
        Self::new(self.amount / rhs, self.currency)
    }
}

impl Debug for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({self})", stringify!(Money))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.*} {}",
            self.currency.precision as usize,
            self.amount,
            self.currency.code,
        )
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let money_str = String::deserialize(deserializer)?;
        money_str.parse().map_err(serde::de::Error::custom)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;

    #[rstest]
    fn test_as_f64() {
        let money = Money::from("1000.00 USD");
        assert!(approx_eq!(f64, money.as_f64(), 1000.0, epsilon = 0.001));
    }

    #[rstest]
    fn test_new_usd() {
        let money = Money::new(dec!(1000), Currency::USD());
        assert_eq!(money.currency.code.as_str(), "USD");
        assert_eq!(money.as_decimal(), dec!(1000));
        assert_eq!(money.to_string(), "1000.00 USD");
    }

    #[rstest]
    fn test_zero() {
        let money = Money::zero(Currency::USD());
        assert!(money.is_zero());
        assert_eq!(money.to_string(), "0.00 USD");
    }

    #[rstest]
    fn test_add_same_currency() {
        let a = Money::from("100.50 USD");
        let b = Money::from("0.50 USD");
        assert_eq!(a + b, Money::from("101 USD"));
    }

    #[rstest]
    fn test_checked_add_currency_mismatch() {
        let usd = Money::from("1000 USD");
        let btc = Money::from("1 BTC");
        let result = usd.checked_add(btc);
        assert_eq!(
            result,
            Err(CurrencyMismatch {
                lhs: Currency::USD(),
                rhs: Currency::BTC(),
            })
        );
    }

    #[rstest]
    #[should_panic(expected = "Condition failed")]
    fn test_add_currency_mismatch_panics() {
        let _ = Money::from("1000 USD") + Money::from("1 BTC");
    }

    #[rstest]
    fn test_checked_sub() {
        let a = Money::from("2.5 USD");
        let b = Money::from("1.0 USD");
        assert_eq!(a.checked_sub(b).unwrap(), Money::from("1.5 USD"));
    }

    #[rstest]
    fn test_negation() {
        let money = -Money::from("100 USD");
        assert_eq!(money.as_decimal(), dec!(-100));
        assert_eq!(money.currency, Currency::USD());
    }

    #[rstest]
    fn test_mul_div_decimal() {
        let money = Money::from("10 USD");
        assert_eq!((money * dec!(2.5)).as_decimal(), dec!(25));
        assert_eq!((money / dec!(4)).as_decimal(), dec!(2.5));
    }

    #[rstest]
    fn test_exact_decimal_amounts() {
        // 0.1 + 0.2 must be exactly 0.3
        let a = Money::from("0.1 USD");
        let b = Money::from("0.2 USD");
        assert_eq!((a + b).as_decimal(), dec!(0.3));
    }

    #[rstest]
    fn test_display_at_currency_precision() {
        let money = Money::new(dec!(10.3), Currency::BTC());
        assert_eq!(money.to_string(), "10.30000000 BTC");
    }

    #[rstest]
    fn test_to_formatted_string() {
        let money = Money::from("1000000 USD");
        assert_eq!(money.to_formatted_string(), "1_000_000.00 USD");
    }

    #[rstest]
    fn test_from_str_invalid_format() {
        assert!(Money::from_str("100USD").is_err());
        assert!(Money::from_str("100 ZZZ").is_err());
    }

    #[rstest]
    fn test_serde_round_trip() {
        let money = Money::from("123.45 USD");
        let json = serde_json::to_string(&money).unwrap();
        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, money);
    }
}
