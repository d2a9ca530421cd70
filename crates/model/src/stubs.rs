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

//! Test stubs for the trading domain model.

use marlin_core::UnixNanos;

use crate::{
    data::{QuoteTick, TradeTick},
    enums::{AggressorSide, OrderSide},
    events::OrderFilled,
    identifiers::{
        AccountId, ClientOrderId, ExecutionId, InstrumentId, OrderId, PositionId, StrategyId,
    },
    types::{Currency, Money, Price, Quantity},
};

/// Returns a stub AUD/USD instrument ID for the SIM venue.
#[must_use]
pub fn audusd_sim_id() -> InstrumentId {
    InstrumentId::from("AUD/USD.SIM")
}

/// Returns a stub ETHUSDT instrument ID for the BINANCE venue.
#[must_use]
pub fn ethusdt_binance_id() -> InstrumentId {
    InstrumentId::from("ETHUSDT.BINANCE")
}

/// Returns a stub fill for AUD/USD.SIM with zero commission.
#[must_use]
pub fn test_fill(
    order_side: OrderSide,
    last_qty: u64,
    last_px: &str,
    execution_id: &str,
    ts_filled_ns: i64,
) -> OrderFilled {
    test_fill_with_commission(
        order_side,
        last_qty,
        last_px,
        execution_id,
        ts_filled_ns,
        Money::zero(Currency::USD()),
    )
}

/// Returns a stub fill for AUD/USD.SIM with the given commission.
#[must_use]
pub fn test_fill_with_commission(
    order_side: OrderSide,
    last_qty: u64,
    last_px: &str,
    execution_id: &str,
    ts_filled_ns: i64,
    commission: Money,
) -> OrderFilled {
    OrderFilled::new(
        AccountId::new("SIM-001"),
        ClientOrderId::new("O-19700101-000000-001-001-1"),
        OrderId::new("1"),
        ExecutionId::new(execution_id),
        PositionId::new("P-123456"),
        StrategyId::new("S-001"),
        audusd_sim_id(),
        order_side,
        Quantity::from(last_qty),
        Price::from(last_px),
        Currency::USD(),
        false,
        commission,
        UnixNanos::from(ts_filled_ns),
    )
}

/// Returns a stub fill for an inverse instrument with zero commission.
#[must_use]
pub fn test_fill_inverse(
    order_side: OrderSide,
    last_qty: u64,
    last_px: &str,
    execution_id: &str,
    ts_filled_ns: i64,
) -> OrderFilled {
    OrderFilled::new(
        AccountId::new("SIM-001"),
        ClientOrderId::new("O-19700101-000000-001-001-1"),
        OrderId::new("1"),
        ExecutionId::new(execution_id),
        PositionId::new("P-123456"),
        StrategyId::new("S-001"),
        InstrumentId::from("XBT/USD.BITMEX"),
        order_side,
        Quantity::from(last_qty),
        Price::from(last_px),
        Currency::USD(),
        true,
        Money::zero(Currency::USD()),
        UnixNanos::from(ts_filled_ns),
    )
}

/// Returns a stub quote tick for the given instrument.
#[must_use]
pub fn test_quote(instrument_id: InstrumentId, bid: &str, ask: &str, ts_ns: i64) -> QuoteTick {
    QuoteTick::new(
        instrument_id,
        Price::from(bid),
        Price::from(ask),
        Quantity::from(100_000),
        Quantity::from(100_000),
        UnixNanos::from(ts_ns),
    )
}

/// Returns a stub trade tick for the given instrument.
#[must_use]
pub fn test_trade(
    instrument_id: InstrumentId,
    price: &str,
    match_id: &str,
    ts_ns: i64,
) -> TradeTick {
    TradeTick::new(
        instrument_id,
        Price::from(price),
        Quantity::from(10_000),
        AggressorSide::Buyer,
        ExecutionId::new(match_id),
        UnixNanos::from(ts_ns),
    )
}
