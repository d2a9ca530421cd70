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

//! Represents a quantity with a non-negative value and specified decimal precision.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    ops::{Add, AddAssign, Sub, SubAssign},
    str::FromStr,
};

use marlin_core::{
    correctness::{check_in_range_inclusive_f64, FAILED},
    parsing::precision_from_str,
};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thousands::Separable;

use crate::types::fixed::{
    check_fixed_precision, f64_to_fixed_u64, fixed_u64_to_f64, FIXED_PRECISION,
};

/// The maximum valid quantity value which can be represented.
pub const QUANTITY_MAX: f64 = 18_446_744_073.0;

/// The minimum valid quantity value which can be represented.
pub const QUANTITY_MIN: f64 = 0.0;

/// Represents a quantity with a non-negative value and specified decimal precision.
///
/// The raw value is stored fixed-point scaled to [`FIXED_PRECISION`] decimal
/// places, with `precision` defining the number of significant decimal places.
#[repr(C)]
#[derive(Clone, Copy, Default, Eq)]
pub struct Quantity {
    /// The raw fixed-point quantity value.
    pub raw: u64,
    /// The quantity decimal precision.
    pub precision: u8,
}

impl Quantity {
    /// Creates a new [`Quantity`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `value` is negative or outside the representable range [0, `QUANTITY_MAX`].
    /// - `precision` exceeds the maximum fixed precision.
    pub fn new_checked(value: f64, precision: u8) -> anyhow::Result<Self> {
        check_in_range_inclusive_f64(value, QUANTITY_MIN, QUANTITY_MAX, "value")?;
        check_fixed_precision(precision)?;
        Ok(Self {
            raw: f64_to_fixed_u64(value, precision),
            precision,
        })
    }

    /// Creates a new [`Quantity`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails. See [`Quantity::new_checked`] for more details.
    #[must_use]
    pub fn new(value: f64, precision: u8) -> Self {
        Self::new_checked(value, precision).expect(FAILED)
    }

    /// Creates a new [`Quantity`] instance from the given `raw` fixed-point value.
    #[must_use]
    pub fn from_raw(raw: u64, precision: u8) -> Self {
        Self { raw, precision }
    }

    /// Creates a new [`Quantity`] instance from the given `Decimal` value.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `value` is negative or cannot be represented at the fixed precision.
    /// - `precision` exceeds the maximum fixed precision.
    pub fn from_decimal_checked(value: Decimal, precision: u8) -> anyhow::Result<Self> {
        check_fixed_precision(precision)?;
        let scaled = value * Decimal::from(10_u64.pow(u32::from(FIXED_PRECISION)));
        let raw = scaled
            .round()
            .to_u64()
            .ok_or_else(|| anyhow::anyhow!("invalid `Decimal` for `Quantity`, was {value}"))?;
        Ok(Self { raw, precision })
    }

    /// Creates a new [`Quantity`] instance from the given `Decimal` value.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails. See [`Quantity::from_decimal_checked`] for more details.
    #[must_use]
    pub fn from_decimal(value: Decimal, precision: u8) -> Self {
        Self::from_decimal_checked(value, precision).expect(FAILED)
    }

    /// Creates a new [`Quantity`] instance with a value of zero.
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
        fixed_u64_to_f64(self.raw)
    }

    /// Returns the value of this instance as a `Decimal`.
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        // Scale down the raw value to match the precision
        let rescaled_raw = self.raw / u64::pow(10, u32::from(FIXED_PRECISION - self.precision));
        Decimal::from_i128_with_scale(i128::from(rescaled_raw), u32::from(self.precision))
    }

    /// Returns a formatted string representation with thousands separation.
    #[must_use]
    pub fn to_formatted_string(&self) -> String {
        format!("{self}").separate_with_underscores()
    }
}

impl FromStr for Quantity {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let value = input
            .parse::<f64>()
            .map_err(|e| format!("Cannot parse `input` string '{input}' as f64: {e}"))?;
        Self::new_checked(value, precision_from_str(input)).map_err(|e| e.to_string())
    }
}

impl From<&str> for Quantity {
    /// Creates a [`Quantity`] from a string slice, inferring the precision.
    ///
    /// # Panics
    ///
    /// Panics if the `value` string is not a valid non-negative decimal.
    fn from(value: &str) -> Self {
        value.parse().unwrap_or_else(|e| panic!("{e}"))
    }
}

impl From<u64> for Quantity {
    /// Creates a [`Quantity`] from an integer value with zero precision.
    fn from(value: u64) -> Self {
        Self::new(value as f64, 0)
    }
}

impl From<Quantity> for f64 {
    fn from(quantity: Quantity) -> Self {
        quantity.as_f64()
    }
}

impl Hash for Quantity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            raw: self
                .raw
                .checked_add(rhs.raw)
                .expect("Overflow occurred when adding `Quantity`"),
            precision: self.precision,
        }
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            raw: self
                .raw
                .checked_sub(rhs.raw)
                .expect("Underflow occurred when subtracting `Quantity`"),
            precision: self.precision,
        }
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, other: Self) {
        self.raw = self
            .raw
            .checked_add(other.raw)
            .expect("Overflow occurred when adding `Quantity`");
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, other: Self) {
        self.raw = self
            .raw
            .checked_sub(other.raw)
            .expect("Underflow occurred when subtracting `Quantity`");
    }
}

impl Debug for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({:.*})",
            stringify!(Quantity),
            self.precision as usize,
            self.as_f64(),
        )
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.*}", self.precision as usize, self.as_f64())
    }
}

impl Serialize for Quantity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let quantity_str = String::deserialize(deserializer)?;
        quantity_str.parse().map_err(serde::de::Error::custom)
    }
}
