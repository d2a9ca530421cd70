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

//! A `TradeTick` data type representing a single trade in a market.

use std::fmt::Display;

use marlin_core::{
    correctness::{check_predicate_true, FAILED},
    UnixNanos,
};
use serde::{Deserialize, Serialize};

use crate::{
    enums::AggressorSide,
    identifiers::{ExecutionId, InstrumentId},
    types::{Price, Quantity},
};

/// Represents a trade tick in a market.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct TradeTick {
    /// The trade instrument ID.
    pub instrument_id: InstrumentId,
    /// The traded price.
    pub price: Price,
    /// The traded size.
    pub size: Quantity,
    /// The trade aggressor side.
    pub aggressor_side: AggressorSide,
    /// The trade match ID (assigned by the venue).
    pub match_id: ExecutionId,
    /// UNIX timestamp (nanoseconds) when the trade event occurred.
    pub ts_ns: UnixNanos,
}

impl TradeTick {
    /// Creates a new [`TradeTick`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is zero.
    pub fn new_checked(
        instrument_id: InstrumentId,
        price: Price,
        size: Quantity,
        aggressor_side: AggressorSide,
        match_id: ExecutionId,
        ts_ns: UnixNanos,
    ) -> anyhow::Result<Self> {
        check_predicate_true(!size.is_zero(), "`size` was zero")?;
        Ok(Self {
            instrument_id,
            price,
            size,
            aggressor_side,
            match_id,
            ts_ns,
        })
    }

    /// Creates a new [`TradeTick`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn new(
        instrument_id: InstrumentId,
        price: Price,
        size: Quantity,
        aggressor_side: AggressorSide,
        match_id: ExecutionId,
        ts_ns: UnixNanos,
    ) -> Self {
        Self::new_checked(instrument_id, price, size, aggressor_side, match_id, ts_ns)
            .expect(FAILED)
    }
}

impl Display for TradeTick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{}",
            self.instrument_id,
            self.price,
            self.size,
            self.aggressor_side,
            self.match_id,
            self.ts_ns,
        )
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::data::Tick;

    fn create_test_trade() -> TradeTick {
        TradeTick::new(
            InstrumentId::from("ETHUSDT.BINANCE"),
            Price::from("1500.50"),
            Quantity::from("0.25000000"),
            AggressorSide::Buyer,
            ExecutionId::new("123456789"),
            UnixNanos::from(1_000_000_000),
        )
    }

    #[rstest]
    fn test_new() {
        let trade = create_test_trade();
        assert_eq!(trade.price, Price::from("1500.50"));
        assert_eq!(trade.aggressor_side, AggressorSide::Buyer);
        assert_eq!(trade.ts_ns, 1_000_000_000);
    }

    #[rstest]
    fn test_new_checked_zero_size_errors() {
        let result = TradeTick::new_checked(
            InstrumentId::from("ETHUSDT.BINANCE"),
            Price::from("1500.50"),
            Quantity::zero(0),
            AggressorSide::Buyer,
            ExecutionId::new("123456789"),
            UnixNanos::from(0),
        );
        assert!(result.is_err());
    }

    #[rstest]
    fn test_display() {
        let trade = create_test_trade();
        assert_eq!(
            format!("{trade}"),
            "ETHUSDT.BINANCE,1500.50,0.25000000,BUYER,123456789,1000000000"
        );
    }

    #[rstest]
    fn test_tick_accessors() {
        let trade = create_test_trade();
        let tick = Tick::from(trade);
        assert!(tick.is_trade());
        assert!(!tick.is_quote());
        assert_eq!(tick.instrument_id(), trade.instrument_id);
        assert_eq!(tick.ts_ns(), trade.ts_ns);
    }

    #[rstest]
    fn test_serde_round_trip() {
        let trade = create_test_trade();
        let json = serde_json::to_string(&trade).unwrap();
        let deserialized: TradeTick = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, trade);
    }
}
