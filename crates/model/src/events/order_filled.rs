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

//! An `OrderFilled` event, generated when an order is executed at a trading venue.

use std::fmt::Display;

use marlin_core::UnixNanos;
use serde::{Deserialize, Serialize};

use crate::{
    enums::OrderSide,
    identifiers::{
        AccountId, ClientOrderId, ExecutionId, InstrumentId, OrderId, PositionId, StrategyId,
    },
    types::{Currency, Money, Price, Quantity},
};

/// Represents an event where an order has been filled at the exchange.
///
/// The fill timestamps applied to a single position are assumed to be
/// monotonically non-decreasing; this is a caller-side precondition and is not
/// enforced here.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct OrderFilled {
    /// The account ID associated with the event.
    pub account_id: AccountId,
    /// The client order ID associated with the event.
    pub client_order_id: ClientOrderId,
    /// The order ID (assigned by the venue).
    pub order_id: OrderId,
    /// The execution/match ID (assigned by the venue).
    pub execution_id: ExecutionId,
    /// The position ID associated with the event.
    pub position_id: PositionId,
    /// The strategy ID associated with the event.
    pub strategy_id: StrategyId,
    /// The instrument ID associated with the event.
    pub instrument_id: InstrumentId,
    /// The order side.
    pub order_side: OrderSide,
    /// The fill quantity for this execution.
    pub last_qty: Quantity,
    /// The fill price for this execution.
    pub last_px: Price,
    /// The quote currency of the instrument.
    pub currency: Currency,
    /// If P&L for the instrument is denominated in the base asset with reciprocal prices.
    pub is_inverse: bool,
    /// The commission generated from this execution.
    pub commission: Money,
    /// UNIX timestamp (nanoseconds) when the order was filled.
    pub ts_filled_ns: UnixNanos,
}

impl OrderFilled {
    /// Creates a new [`OrderFilled`] instance.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        account_id: AccountId,
        client_order_id: ClientOrderId,
        order_id: OrderId,
        execution_id: ExecutionId,
        position_id: PositionId,
        strategy_id: StrategyId,
        instrument_id: InstrumentId,
        order_side: OrderSide,
        last_qty: Quantity,
        last_px: Price,
        currency: Currency,
        is_inverse: bool,
        commission: Money,
        ts_filled_ns: UnixNanos,
    ) -> Self {
        Self {
            account_id,
            client_order_id,
            order_id,
            execution_id,
            position_id,
            strategy_id,
            instrument_id,
            order_side,
            last_qty,
            last_px,
            currency,
            is_inverse,
            commission,
            ts_filled_ns,
        }
    }

    /// Returns `true` if the fill was for a BUY order.
    #[must_use]
    pub fn is_buy(&self) -> bool {
        self.order_side == OrderSide::Buy
    }

    /// Returns `true` if the fill was for a SELL order.
    #[must_use]
    pub fn is_sell(&self) -> bool {
        self.order_side == OrderSide::Sell
    }
}

impl Display for OrderFilled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(\
            instrument_id={}, \
            client_order_id={}, \
            order_id={}, \
            execution_id={}, \
            position_id={}, \
            strategy_id={}, \
            order_side={}, \
            last_qty={}, \
            last_px={}, \
            commission={}, \
            ts_filled_ns={})",
            stringify!(OrderFilled),
            self.instrument_id,
            self.client_order_id,
            self.order_id,
            self.execution_id,
            self.position_id,
            self.strategy_id,
            self.order_side,
            self.last_qty.to_formatted_string(),
            self.last_px.to_formatted_string(),
            self.commission,
            self.ts_filled_ns,
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
    use crate::stubs::test_fill;

    #[rstest]
    fn test_is_buy_is_sell() {
        let fill = test_fill(OrderSide::Buy, 100_000, "1.00001", "E-1", 0);
        assert!(fill.is_buy());
        assert!(!fill.is_sell());
    }

    #[rstest]
    fn test_display() {
        let fill = test_fill(OrderSide::Buy, 100_000, "1.00001", "E-1", 0);
        let display = format!("{fill}");
        assert!(display.starts_with("OrderFilled("));
        assert!(display.contains("instrument_id=AUD/USD.SIM"));
        assert!(display.contains("order_side=BUY"));
        assert!(display.contains("last_qty=100_000"));
    }

    #[rstest]
    fn test_serde_round_trip() {
        let fill = test_fill(OrderSide::Sell, 50_000, "1.0005", "E-2", 1_000);
        let json = serde_json::to_string(&fill).unwrap();
        let deserialized: OrderFilled = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, fill);
    }
}
