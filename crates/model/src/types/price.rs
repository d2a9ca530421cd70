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

//! Represents a price in a market with a specified decimal precision.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use marlin_core::{
    correctness::{check_in_range_inclusive_f64, FAILED},
    parsing::precision_from_str,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thousands::Separable;

use crate::types::fixed::{
    check_fixed_precision, f64_to_fixed_i64, fixed_i64_to_f64, FIXED_PRECISION,
};

/// The maximum valid price value which can be represented.
pub const PRICE_MAX: f64 = 9_223_372_036.0;

/// The minimum valid price value which can be represented.
pub const PRICE_MIN: f64 = -9_223_372_036.0;

/// Represents a price in a market with a specified decimal precision.
///
/// The raw value is stored fixed-point scaled to [`FIXED_PRECISION`] decimal
/// places, with `precision` defining the number of significant decimal places.
#[repr(C)]
#[derive(Clone, Copy, Default, Eq)]
pub struct Price {
    /// The raw fixed-point price value.
    pub raw: i64,
    /// The price decimal precision.
    pub precision: u8,
}

impl Price {
    /// Creates a new [`Price`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `value` is invalid outside the representable range [`PRICE_MIN`, `PRICE_MAX`].
    /// - `precision` exceeds the maximum fixed precision.
    pub fn new_checked(value: f64, precision: u8) -> anyhow::Result<Self> {
        check_in_range_inclusive_f64(value, PRICE_MIN, PRICE_MAX, "value")?;
        check_fixed_precision(precision)?;
        Ok(Self {
            raw: f64_to_fixed_i64(value, precision),
            precision,
        })
    }

    /// Creates a new [`Price`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails. See [`Price::new_checked`] for more details.
    #[must_use]
    pub fn new(value: f64, precision: u8) -> Self {
        Self::new_checked(value, precision).expect(FAILED)
    }

    /// Creates a new [`Price`] instance from the given `raw` fixed-point value.
    #[must_use]
    pub fn from_raw(raw: i64, precision: u8) -> Self {
        Self { raw, precision }
    }

    /// Creates a new [`Price`] instance with a value of zero.
    #[must_use]
    pub fn zero(precision: u8) -> Self {
        Self { raw: 0, precision }
    }

    /// Returns `true` if the value of this instance is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Returns the value of this instance as an `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        fixed_i64_to_f64(self.raw)
    }

    /// Returns the value of this instance as a `Decimal`.
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        // Scale down the raw value to match the precision
        let rescaled_raw = self.raw / i64::pow(10, u32::from(FIXED_PRECISION - self.precision));
        Decimal::from_i128_with_scale(i128::from(rescaled_raw), u32::from(self.precision))
    }

    /// Returns a formatted string representation with thousands separation.
    #[must_use]
    pub fn to_formatted_string(&self) -> String {
        format!("{self}").separate_with_underscores()
    }
}

impl FromStr for Price {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let value = input
            .parse::<f64>()
            .map_err(|e| format!("Cannot parse `input` string '{input}' as f64: {e}"))?;
        Self::new_checked(value, precision_from_str(input)).map_err(|e| e.to_string())
    }
}

impl From<&str> for Price {
    /// Creates a [`Price`] from a string slice, inferring the precision.
    ///
    /// # Panics
    ///
    /// Panics if the `value` string is not a valid decimal.
    fn from(value: &str) -> Self {
        value.parse().unwrap_or_else(|e| panic!("{e}"))
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.as_f64()
    }
}

impl Hash for Price {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl Neg for Price {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            raw: -self.raw,
            precision: self.precision,
        }
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            raw: self
                .raw
                .checked_add(rhs.raw)
                .expect("Overflow occurred when adding `Price`"),
            precision: self.precision,
        }
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            raw: self
                .raw
                .checked_sub(rhs.raw)
                .expect("Underflow occurred when subtracting `Price`"),
            precision: self.precision,
        }
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, other: Self) {
        self.raw = self
            .raw
            .checked_add(other.raw)
            .expect("Overflow occurred when adding `Price`");
    }
}

impl SubAssign for Price {
    fn sub_assign(&mut self, other: Self) {
        self.raw = self
            .raw
            .checked_sub(other.raw)
            .expect("Underflow occurred when subtracting `Price`");
    }
}

impl Debug for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({:.*})",
            stringify!(Price),
            self.precision as usize,
            self.as_f64(),
        )
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.*}", self.precision as usize, self.as_f64())
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let price_str = String::deserialize(deserializer)?;
        price_str.parse().map_err(serde::de::Error::custom)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;

    #[rstest]
    fn test_new() {
        let price = Price::new(1.00001, 5);
        assert_eq!(price.raw, 1_000_010_000);
        assert_eq!(price.precision, 5);
        assert_eq!(price.as_f64(), 1.00001);
        assert_eq!(price.as_decimal(), dec!(1.00001));
    }

    #[rstest]
    fn test_new_checked_out_of_range() {
        assert!(Price::new_checked(PRICE_MAX * 2.0, 0).is_err());
        assert!(Price::new_checked(f64::NAN, 0).is_err());
    }

    #[rstest]
    fn test_from_str_infers_precision() {
        let price = Price::from("1.0005");
        assert_eq!(price.precision, 4);
        assert_eq!(price.as_decimal(), dec!(1.0005));
    }

    #[rstest]
    fn test_negative_price() {
        let price = Price::from("-0.050");
        assert_eq!(price.precision, 3);
        assert_eq!(price.as_decimal(), dec!(-0.050));
        assert_eq!((-price).as_decimal(), dec!(0.050));
    }

    #[rstest]
    fn test_zero() {
        let price = Price::zero(2);
        assert!(price.is_zero());
        assert_eq!(price.to_string(), "0.00");
    }

    #[rstest]
    fn test_ordering() {
        assert!(Price::from("1.0001") > Price::from("1.0000"));
        assert!(Price::from("0.9") <= Price::from("0.90"));
    }

    #[rstest]
    fn test_add_sub() {
        let a = Price::from("1.000");
        let b = Price::from("0.500");
        assert_eq!((a + b).as_decimal(), dec!(1.500));
        assert_eq!((a - b).as_decimal(), dec!(0.500));
    }

    #[rstest]
    fn test_display() {
        let price = Price::from("44.12");
        assert_eq!(format!("{price}"), "44.12");
        assert_eq!(format!("{price:?}"), "Price(44.12)");
    }

    #[rstest]
    fn test_serde_round_trip() {
        let price = Price::from("1.00001");
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"1.00001\"");
        let deserialized: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, price);
    }
}
