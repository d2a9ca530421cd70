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

//! Represents a position in a financial market.
//!
//! All P&L arithmetic is carried out on exact decimals; binary floating point
//! never enters the accounting.

use std::{
    collections::HashSet,
    fmt::Display,
    hash::{Hash, Hasher},
};

use indexmap::IndexMap;
use marlin_core::{DurationNanos, UnixNanos};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    enums::{OrderSide, PositionSide},
    events::OrderFilled,
    identifiers::{
        AccountId, ClientOrderId, ExecutionId, InstrumentId, OrderId, PositionId, StrategyId,
        Symbol, Venue,
    },
    types::{Currency, CurrencyMismatch, Money, Price, Quantity},
};

/// Errors produced when constructing or updating a [`Position`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    /// A required identifier was the `NULL` sentinel.
    #[error("Required identifier '{0}' was the `NULL` sentinel")]
    NullIdentifier(&'static str),
    /// An order side which cannot open or close a position.
    #[error("Invalid `OrderSide`, was {0}")]
    InvalidOrderSide(OrderSide),
    /// The execution ID has already been applied to the position.
    #[error("Duplicate execution ID, {0} already applied")]
    DuplicateExecution(ExecutionId),
    /// Money arithmetic was attempted across currency denominations.
    #[error(transparent)]
    CurrencyMismatch(#[from] CurrencyMismatch),
}

/// Represents a position in a financial market.
///
/// The position state evolves by folding in [`OrderFilled`] events via
/// [`Position::apply`]; the event history is append-only and each execution ID
/// is accepted at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// The applied order fill events, in application order.
    pub events: Vec<OrderFilled>,
    /// The execution IDs of the applied fills, in application order.
    pub execution_ids: Vec<ExecutionId>,
    /// The position ID.
    pub id: PositionId,
    /// The account ID associated with the position.
    pub account_id: AccountId,
    /// The strategy ID associated with the position.
    pub strategy_id: StrategyId,
    /// The instrument ID for the position.
    pub instrument_id: InstrumentId,
    /// The client order ID for the order which opened the position.
    pub opening_order_id: ClientOrderId,
    /// The entry direction from the opening order side.
    pub entry: OrderSide,
    /// The current position side.
    pub side: PositionSide,
    /// The current signed relative quantity (positive for LONG, negative for SHORT).
    pub relative_qty: Decimal,
    /// The current open quantity.
    pub quantity: Quantity,
    /// The peak directional quantity reached by the position.
    pub peak_qty: Quantity,
    /// The position quantity decimal precision.
    pub size_precision: u8,
    /// The total quantity bought.
    pub buy_qty: Decimal,
    /// The total quantity sold.
    pub sell_qty: Decimal,
    /// The quote currency for the instrument.
    pub quote_currency: Currency,
    /// If P&L for the instrument is denominated in the base asset with reciprocal prices.
    pub is_inverse: bool,
    /// UNIX timestamp (nanoseconds) when the position was opened.
    pub ts_opened: UnixNanos,
    /// UNIX timestamp (nanoseconds) when the position was closed (zero until flat).
    pub ts_closed: UnixNanos,
    /// The total open duration (nanoseconds, zero until flat).
    pub duration_ns: DurationNanos,
    /// The average open price.
    pub avg_px_open: Decimal,
    /// The average close price (`None` until the first closing fill).
    pub avg_px_close: Option<Decimal>,
    /// The realized price-movement P&L per unit for the closed portion.
    pub realized_points: Decimal,
    /// The realized return for the closed portion.
    pub realized_return: Decimal,
    /// The realized P&L (including commissions in the quote currency).
    pub realized_pnl: Money,
    /// The cumulative commission in the quote currency.
    pub commission: Money,
    /// The cumulative commissions per currency.
    pub commissions: IndexMap<Currency, Money>,
}

impl Position {
    /// Creates a new [`Position`] instance from its opening fill.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `fill.position_id` or `fill.strategy_id` is the `NULL` sentinel.
    /// - `fill.order_side` is `UNDEFINED`.
    pub fn new(fill: OrderFilled) -> Result<Self, PositionError> {
        if fill.position_id.is_null() {
            return Err(PositionError::NullIdentifier("position_id"));
        }
        if fill.strategy_id.is_null() {
            return Err(PositionError::NullIdentifier("strategy_id"));
        }
        Self::side_from_order_side(fill.order_side)?;

        let mut position = Self {
            events: Vec::new(),
            execution_ids: Vec::new(),
            id: fill.position_id,
            account_id: fill.account_id,
            strategy_id: fill.strategy_id,
            instrument_id: fill.instrument_id,
            opening_order_id: fill.client_order_id,
            entry: fill.order_side,
            side: PositionSide::Flat,
            relative_qty: Decimal::ZERO,
            quantity: Quantity::zero(fill.last_qty.precision),
            peak_qty: Quantity::zero(fill.last_qty.precision),
            size_precision: fill.last_qty.precision,
            buy_qty: Decimal::ZERO,
            sell_qty: Decimal::ZERO,
            quote_currency: fill.currency,
            is_inverse: fill.is_inverse,
            ts_opened: fill.ts_filled_ns,
            ts_closed: UnixNanos::default(),
            duration_ns: 0,
            avg_px_open: fill.last_px.as_decimal(),
            avg_px_close: None,
            realized_points: Decimal::ZERO,
            realized_return: Decimal::ZERO,
            realized_pnl: Money::zero(fill.currency),
            commission: Money::zero(fill.currency),
            commissions: IndexMap::new(),
        };
        position.apply(&fill)?;
        Ok(position)
    }

    /// Returns the position side for the given opening `order_side`.
    ///
    /// # Errors
    ///
    /// Returns an error if `order_side` is `UNDEFINED`.
    pub fn side_from_order_side(order_side: OrderSide) -> Result<PositionSide, PositionError> {
        match order_side {
            OrderSide::Buy => Ok(PositionSide::Long),
            OrderSide::Sell => Ok(PositionSide::Short),
            OrderSide::Undefined => Err(PositionError::InvalidOrderSide(order_side)),
        }
    }

    /// Folds the given `fill` into the position state.
    ///
    /// The update is all-or-nothing: a rejected fill leaves the position state
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `fill.execution_id` has already been applied.
    /// - `fill.order_side` is `UNDEFINED`.
    pub fn apply(&mut self, fill: &OrderFilled) -> Result<(), PositionError> {
        if self.execution_ids.contains(&fill.execution_id) {
            return Err(PositionError::DuplicateExecution(fill.execution_id));
        }
        if fill.order_side == OrderSide::Undefined {
            return Err(PositionError::InvalidOrderSide(fill.order_side));
        }

        self.events.push(*fill);
        self.execution_ids.push(fill.execution_id);

        // Calculate cumulative commissions
        let commission = fill.commission;
        let cum_commission = self
            .commissions
            .get(&commission.currency)
            .copied()
            .unwrap_or_else(|| Money::zero(commission.currency))
            .checked_add(commission)?;
        self.commissions.insert(commission.currency, cum_commission);
        if commission.currency == self.quote_currency {
            self.commission = self.commission.checked_add(commission)?;
        }

        // Calculate avg prices, points, return, PnL
        match fill.order_side {
            OrderSide::Buy => self.handle_buy_order_fill(fill),
            OrderSide::Sell => self.handle_sell_order_fill(fill),
            OrderSide::Undefined => unreachable!("order side validated above"),
        }

        // Set quantities
        self.quantity = Quantity::from_decimal(self.relative_qty.abs(), self.size_precision);
        if self.quantity > self.peak_qty {
            self.peak_qty = self.quantity;
        }

        // Set state
        if self.relative_qty > Decimal::ZERO {
            self.side = PositionSide::Long;
        } else if self.relative_qty < Decimal::ZERO {
            self.side = PositionSide::Short;
        } else {
            self.side = PositionSide::Flat;
            self.ts_closed = fill.ts_filled_ns;
            self.duration_ns = (self.ts_closed - self.ts_opened).as_u64();
            log::debug!("Closed {self}");
        }

        Ok(())
    }

    fn handle_buy_order_fill(&mut self, fill: &OrderFilled) {
        let last_px = fill.last_px.as_decimal();
        let last_qty = fill.last_qty.as_decimal();

        let mut delta_pnl = if fill.commission.currency == self.quote_currency {
            -fill.commission.as_decimal()
        } else {
            Decimal::ZERO
        };

        if self.relative_qty > Decimal::ZERO {
            // Adding to LONG
            self.avg_px_open = self.calculate_avg_px_open_px(last_px, last_qty);
        } else if self.relative_qty < Decimal::ZERO {
            // Reducing SHORT
            let avg_px_close = self.calculate_avg_px_close_px(last_px, last_qty);
            self.avg_px_close = Some(avg_px_close);
            self.realized_points = self.calculate_points(self.avg_px_open, avg_px_close);
            self.realized_return = self.calculate_return(self.avg_px_open, avg_px_close);
            delta_pnl += self.calculate_pnl_raw(self.avg_px_open, last_px, last_qty);
        } else {
            // Opening fill from FLAT
            self.avg_px_open = last_px;
        }

        self.realized_pnl = Money::new(
            self.realized_pnl.as_decimal() + delta_pnl,
            self.quote_currency,
        );
        self.buy_qty += last_qty;
        self.relative_qty += last_qty;
    }

    fn handle_sell_order_fill(&mut self, fill: &OrderFilled) {
        let last_px = fill.last_px.as_decimal();
        let last_qty = fill.last_qty.as_decimal();

        let mut delta_pnl = if fill.commission.currency == self.quote_currency {
            -fill.commission.as_decimal()
        } else {
            Decimal::ZERO
        };

        if self.relative_qty < Decimal::ZERO {
            // Adding to SHORT
            self.avg_px_open = self.calculate_avg_px_open_px(last_px, last_qty);
        } else if self.relative_qty > Decimal::ZERO {
            // Reducing LONG
            let avg_px_close = self.calculate_avg_px_close_px(last_px, last_qty);
            self.avg_px_close = Some(avg_px_close);
            self.realized_points = self.calculate_points(self.avg_px_open, avg_px_close);
            self.realized_return = self.calculate_return(self.avg_px_open, avg_px_close);
            delta_pnl += self.calculate_pnl_raw(self.avg_px_open, last_px, last_qty);
        } else {
            // Opening fill from FLAT
            self.avg_px_open = last_px;
        }

        self.realized_pnl = Money::new(
            self.realized_pnl.as_decimal() + delta_pnl,
            self.quote_currency,
        );
        self.sell_qty += last_qty;
        self.relative_qty -= last_qty;
    }

    fn calculate_avg_px(avg_px: Decimal, qty: Decimal, last_px: Decimal, last_qty: Decimal) -> Decimal {
        let start_cost = avg_px * qty;
        let event_cost = last_px * last_qty;
        (start_cost + event_cost) / (qty + last_qty)
    }

    fn calculate_avg_px_open_px(&self, last_px: Decimal, last_qty: Decimal) -> Decimal {
        Self::calculate_avg_px(self.avg_px_open, self.quantity.as_decimal(), last_px, last_qty)
    }

    fn calculate_avg_px_close_px(&self, last_px: Decimal, last_qty: Decimal) -> Decimal {
        let Some(avg_px_close) = self.avg_px_close else {
            return last_px;
        };
        // Longs close via sells, shorts close via buys
        let closing_qty = if self.side == PositionSide::Long {
            self.sell_qty
        } else {
            self.buy_qty
        };
        Self::calculate_avg_px(avg_px_close, closing_qty, last_px, last_qty)
    }

    /// Returns the price-movement P&L per unit between the given prices for the
    /// current position side.
    #[must_use]
    pub fn calculate_points(&self, avg_px_open: Decimal, avg_px_close: Decimal) -> Decimal {
        match self.side {
            PositionSide::Long => avg_px_close - avg_px_open,
            PositionSide::Short => avg_px_open - avg_px_close,
            PositionSide::Flat => Decimal::ZERO,
        }
    }

    /// Returns the reciprocal price-movement P&L per unit between the given
    /// prices for the current position side.
    #[must_use]
    pub fn calculate_points_inverse(&self, avg_px_open: Decimal, avg_px_close: Decimal) -> Decimal {
        let inverse_open = Decimal::ONE / avg_px_open;
        let inverse_close = Decimal::ONE / avg_px_close;
        match self.side {
            PositionSide::Long => inverse_open - inverse_close,
            PositionSide::Short => inverse_close - inverse_open,
            PositionSide::Flat => Decimal::ZERO,
        }
    }

    /// Returns the return between the given prices for the current position side.
    #[must_use]
    pub fn calculate_return(&self, avg_px_open: Decimal, avg_px_close: Decimal) -> Decimal {
        self.calculate_points(avg_px_open, avg_px_close) / avg_px_open
    }

    fn calculate_pnl_raw(
        &self,
        avg_px_open: Decimal,
        avg_px_close: Decimal,
        quantity: Decimal,
    ) -> Decimal {
        let quantity = quantity.min(self.relative_qty.abs());
        if self.is_inverse {
            // Inverse P&L is the return scaled by the quantity of contracts
            self.calculate_return(avg_px_open, avg_px_close) * quantity
        } else {
            self.calculate_points(avg_px_open, avg_px_close) * quantity
        }
    }

    /// Returns the P&L between the given prices for the given `quantity`,
    /// in the quote currency.
    #[must_use]
    pub fn calculate_pnl(
        &self,
        avg_px_open: Decimal,
        avg_px_close: Decimal,
        quantity: Quantity,
    ) -> Money {
        let pnl_raw = self.calculate_pnl_raw(avg_px_open, avg_px_close, quantity.as_decimal());
        Money::new(pnl_raw, self.quote_currency)
    }

    /// Returns the notional value of the position at the given market price,
    /// in the quote currency.
    #[must_use]
    pub fn notional_value(&self, last: Price) -> Money {
        if self.is_inverse {
            Money::new(self.quantity.as_decimal(), self.quote_currency)
        } else {
            Money::new(
                self.quantity.as_decimal() * last.as_decimal(),
                self.quote_currency,
            )
        }
    }

    /// Returns the unrealized P&L of the position at the given market price.
    ///
    /// Returns exactly zero in the quote currency when the position is FLAT.
    #[must_use]
    pub fn unrealized_pnl(&self, last: Price) -> Money {
        if self.side == PositionSide::Flat {
            Money::zero(self.quote_currency)
        } else {
            let pnl = self.calculate_pnl_raw(
                self.avg_px_open,
                last.as_decimal(),
                self.quantity.as_decimal(),
            );
            Money::new(pnl, self.quote_currency)
        }
    }

    /// Returns the total (realized + unrealized) P&L of the position at the
    /// given market price.
    #[must_use]
    pub fn total_pnl(&self, last: Price) -> Money {
        Money::new(
            self.realized_pnl.as_decimal() + self.unrealized_pnl(last).as_decimal(),
            self.quote_currency,
        )
    }

    /// Returns a snapshot of the cumulative commissions per currency.
    #[must_use]
    pub fn commissions(&self) -> Vec<Money> {
        self.commissions.values().copied().collect()
    }

    /// Returns `true` if the given `side` is opposite the entry side.
    #[must_use]
    pub fn is_opposite_side(&self, side: OrderSide) -> bool {
        self.entry != side
    }

    #[must_use]
    pub fn symbol(&self) -> Symbol {
        self.instrument_id.symbol
    }

    #[must_use]
    pub fn venue(&self) -> Venue {
        self.instrument_id.venue
    }

    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Returns the deduplicated client order IDs for the applied fills, sorted.
    #[must_use]
    pub fn client_order_ids(&self) -> Vec<ClientOrderId> {
        let mut result = self
            .events
            .iter()
            .map(|event| event.client_order_id)
            .collect::<HashSet<ClientOrderId>>()
            .into_iter()
            .collect::<Vec<ClientOrderId>>();
        result.sort_unstable();
        result
    }

    /// Returns the deduplicated venue order IDs for the applied fills, sorted.
    #[must_use]
    pub fn order_ids(&self) -> Vec<OrderId> {
        let mut result = self
            .events
            .iter()
            .map(|event| event.order_id)
            .collect::<HashSet<OrderId>>()
            .into_iter()
            .collect::<Vec<OrderId>>();
        result.sort_unstable();
        result
    }

    /// Returns the execution IDs for the applied fills, in fill order.
    #[must_use]
    pub fn execution_ids(&self) -> Vec<ExecutionId> {
        self.execution_ids.clone()
    }

    /// Returns the last applied fill event.
    ///
    /// # Panics
    ///
    /// Panics if the position has no applied events (impossible through the
    /// public API).
    #[must_use]
    pub fn last_event(&self) -> OrderFilled {
        // SAFETY: Position invariant guarantees at least one event
        *self.events.last().unwrap()
    }

    /// Returns the last applied execution ID.
    #[must_use]
    pub fn last_execution_id(&self) -> Option<ExecutionId> {
        self.execution_ids.last().copied()
    }

    #[must_use]
    pub fn is_long(&self) -> bool {
        self.side == PositionSide::Long
    }

    #[must_use]
    pub fn is_short(&self) -> bool {
        self.side == PositionSide::Short
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.side != PositionSide::Flat
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.side == PositionSide::Flat
    }

    /// Returns a human-readable status string for the position.
    #[must_use]
    pub fn status_string(&self) -> String {
        let quantity_str = if self.quantity.is_zero() {
            String::new()
        } else {
            self.quantity.to_formatted_string() + " "
        };
        format!("{} {}{}", self.side, quantity_str, self.instrument_id)
    }
}

impl PartialEq<Self> for Position {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Position({}, id={})", self.status_string(), self.id)
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
    use crate::stubs::{test_fill, test_fill_inverse, test_fill_with_commission};

    #[rstest]
    fn test_new_with_null_position_id_errors() {
        let mut fill = test_fill(OrderSide::Buy, 100_000, "1.00001", "E-1", 0);
        fill.position_id = PositionId::null();
        assert_eq!(
            Position::new(fill),
            Err(PositionError::NullIdentifier("position_id"))
        );
    }

    #[rstest]
    fn test_new_with_null_strategy_id_errors() {
        let mut fill = test_fill(OrderSide::Buy, 100_000, "1.00001", "E-1", 0);
        fill.strategy_id = StrategyId::null();
        assert_eq!(
            Position::new(fill),
            Err(PositionError::NullIdentifier("strategy_id"))
        );
    }

    #[rstest]
    fn test_new_with_undefined_order_side_errors() {
        let fill = test_fill(OrderSide::Undefined, 100_000, "1.00001", "E-1", 0);
        assert_eq!(
            Position::new(fill),
            Err(PositionError::InvalidOrderSide(OrderSide::Undefined))
        );
    }

    #[rstest]
    #[case(OrderSide::Buy, PositionSide::Long)]
    #[case(OrderSide::Sell, PositionSide::Short)]
    fn test_side_from_order_side(#[case] order_side: OrderSide, #[case] expected: PositionSide) {
        assert_eq!(Position::side_from_order_side(order_side), Ok(expected));
    }

    #[rstest]
    fn test_side_from_order_side_undefined_errors() {
        assert_eq!(
            Position::side_from_order_side(OrderSide::Undefined),
            Err(PositionError::InvalidOrderSide(OrderSide::Undefined))
        );
    }

    #[rstest]
    fn test_position_opened_with_buy_order() {
        let fill = test_fill(OrderSide::Buy, 100_000, "1.00001", "E-1", 0);
        let position = Position::new(fill).unwrap();

        assert_eq!(position.side, PositionSide::Long);
        assert_eq!(position.entry, OrderSide::Buy);
        assert_eq!(position.relative_qty, dec!(100_000));
        assert_eq!(position.quantity, Quantity::from(100_000));
        assert_eq!(position.peak_qty, Quantity::from(100_000));
        assert_eq!(position.avg_px_open, dec!(1.00001));
        assert_eq!(position.avg_px_close, None);
        assert_eq!(position.event_count(), 1);
        assert_eq!(position.ts_opened, 0);
        assert_eq!(position.ts_closed, 0);
        assert_eq!(position.duration_ns, 0);
        assert!(position.is_long());
        assert!(!position.is_short());
        assert!(position.is_open());
        assert!(!position.is_closed());
        assert!(!position.is_opposite_side(OrderSide::Buy));
        assert!(position.is_opposite_side(OrderSide::Sell));
        assert_eq!(position.realized_pnl, Money::from("0 USD"));
    }

    #[rstest]
    fn test_position_opened_with_sell_order() {
        let fill = test_fill(OrderSide::Sell, 100_000, "1.00001", "E-1", 0);
        let position = Position::new(fill).unwrap();

        assert_eq!(position.side, PositionSide::Short);
        assert_eq!(position.entry, OrderSide::Sell);
        assert_eq!(position.relative_qty, dec!(-100_000));
        assert_eq!(position.quantity, Quantity::from(100_000));
        assert!(position.is_short());
        assert!(!position.is_long());
        assert!(position.is_open());
    }

    #[rstest]
    fn test_quantity_equals_absolute_relative_qty_after_each_fill() {
        let mut position =
            Position::new(test_fill(OrderSide::Buy, 100, "1.00", "E-1", 0)).unwrap();
        assert_eq!(position.quantity.as_decimal(), position.relative_qty.abs());

        position
            .apply(&test_fill(OrderSide::Sell, 30, "1.01", "E-2", 1_000))
            .unwrap();
        assert_eq!(position.quantity.as_decimal(), position.relative_qty.abs());

        position
            .apply(&test_fill(OrderSide::Sell, 90, "1.02", "E-3", 2_000))
            .unwrap();
        assert_eq!(position.quantity.as_decimal(), position.relative_qty.abs());
        assert_eq!(position.side, PositionSide::Short);
        assert_eq!(position.relative_qty, dec!(-20));

        position
            .apply(&test_fill(OrderSide::Buy, 20, "1.03", "E-4", 3_000))
            .unwrap();
        assert_eq!(position.quantity.as_decimal(), position.relative_qty.abs());
        assert_eq!(position.side, PositionSide::Flat);
    }

    #[rstest]
    fn test_long_round_trip_realized_pnl() {
        // Open BUY 100 @ 1.0000, close SELL 100 @ 1.0010, zero commission
        let fill1 = test_fill(OrderSide::Buy, 100, "1.0000", "E-1", 1_000_000_000);
        let fill2 = test_fill(OrderSide::Sell, 100, "1.0010", "E-2", 2_000_000_000);
        let mut position = Position::new(fill1).unwrap();
        position.apply(&fill2).unwrap();

        assert_eq!(position.side, PositionSide::Flat);
        assert_eq!(position.realized_pnl, Money::from("0.10 USD"));
        assert_eq!(position.realized_points, dec!(0.0010));
        assert_eq!(position.realized_return, dec!(0.0010));
        assert_eq!(position.peak_qty, Quantity::from(100));
        assert_eq!(position.avg_px_open, dec!(1.0000));
        assert_eq!(position.avg_px_close, Some(dec!(1.0010)));
        assert_eq!(position.ts_closed, 2_000_000_000);
        assert_eq!(position.duration_ns, 1_000_000_000);
        assert!(position.is_closed());
    }

    #[rstest]
    fn test_short_round_trip_realized_pnl_negated() {
        let fill1 = test_fill(OrderSide::Sell, 100, "1.0000", "E-1", 1_000_000_000);
        let fill2 = test_fill(OrderSide::Buy, 100, "1.0010", "E-2", 2_000_000_000);
        let mut position = Position::new(fill1).unwrap();
        position.apply(&fill2).unwrap();

        assert_eq!(position.side, PositionSide::Flat);
        assert_eq!(position.realized_pnl, Money::from("-0.10 USD"));
        assert_eq!(position.realized_points, dec!(-0.0010));
        assert_eq!(position.ts_closed, 2_000_000_000);
    }

    #[rstest]
    fn test_scale_in_then_scale_out() {
        // BUY 50 @ 1.00, BUY 50 @ 1.10, SELL 50 @ 1.20, SELL 50 @ 1.30
        let mut position = Position::new(test_fill(OrderSide::Buy, 50, "1.00", "E-1", 0)).unwrap();
        position
            .apply(&test_fill(OrderSide::Buy, 50, "1.10", "E-2", 1_000))
            .unwrap();
        assert_eq!(position.avg_px_open, dec!(1.05));
        assert_eq!(position.quantity, Quantity::from(100));

        position
            .apply(&test_fill(OrderSide::Sell, 50, "1.20", "E-3", 2_000))
            .unwrap();
        assert_eq!(position.avg_px_close, Some(dec!(1.20)));
        assert_eq!(position.realized_pnl, Money::from("7.50 USD"));

        position
            .apply(&test_fill(OrderSide::Sell, 50, "1.30", "E-4", 3_000))
            .unwrap();
        assert_eq!(position.avg_px_open, dec!(1.05));
        assert_eq!(position.avg_px_close, Some(dec!(1.25)));
        assert_eq!(position.realized_pnl, Money::from("20.00 USD"));
        assert_eq!(position.side, PositionSide::Flat);
        assert_eq!(position.peak_qty, Quantity::from(100));
    }

    #[rstest]
    fn test_duplicate_execution_rejected_and_state_unchanged() {
        let fill = test_fill(OrderSide::Buy, 100, "1.00", "E-1", 0);
        let mut position = Position::new(fill).unwrap();
        let snapshot = position.clone();

        let result = position.apply(&fill);
        assert_eq!(result, Err(PositionError::DuplicateExecution(fill.execution_id)));
        assert_eq!(position.event_count(), 1);
        assert_eq!(position.relative_qty, snapshot.relative_qty);
        assert_eq!(position.realized_pnl, snapshot.realized_pnl);
        assert_eq!(position.commissions(), snapshot.commissions());
        assert_eq!(position.execution_ids(), snapshot.execution_ids());
    }

    #[rstest]
    fn test_inverse_long_round_trip() {
        // LONG inverse, open BUY 1000 @ 10.00, close SELL 1000 @ 20.00
        let fill1 = test_fill_inverse(OrderSide::Buy, 1000, "10.00", "E-1", 0);
        let fill2 = test_fill_inverse(OrderSide::Sell, 1000, "20.00", "E-2", 1_000);
        let mut position = Position::new(fill1).unwrap();
        assert!(position.is_inverse);

        position.apply(&fill2).unwrap();
        assert_eq!(position.realized_return, dec!(1.0));
        assert_eq!(position.realized_pnl, Money::new(dec!(1000), Currency::USD()));
        assert_eq!(position.side, PositionSide::Flat);
    }

    #[rstest]
    fn test_calculate_points_inverse_available() {
        let position =
            Position::new(test_fill_inverse(OrderSide::Buy, 1000, "10.00", "E-1", 0)).unwrap();
        assert_eq!(
            position.calculate_points_inverse(dec!(10), dec!(20)),
            dec!(0.05)
        );
    }

    #[rstest]
    fn test_commissions_accumulate_per_currency() {
        let fill1 = test_fill_with_commission(
            OrderSide::Buy,
            100,
            "1.00",
            "E-1",
            0,
            Money::from("2.00 USD"),
        );
        let fill2 = test_fill_with_commission(
            OrderSide::Buy,
            100,
            "1.00",
            "E-2",
            1_000,
            Money::from("0.00100000 BTC"),
        );
        let fill3 = test_fill_with_commission(
            OrderSide::Sell,
            50,
            "1.01",
            "E-3",
            2_000,
            Money::from("1.50 USD"),
        );
        let mut position = Position::new(fill1).unwrap();
        position.apply(&fill2).unwrap();
        position.apply(&fill3).unwrap();

        assert_eq!(position.commission, Money::from("3.50 USD"));
        assert_eq!(
            position.commissions(),
            vec![Money::from("3.50 USD"), Money::from("0.001 BTC")]
        );
    }

    #[rstest]
    fn test_commission_in_quote_currency_reduces_realized_pnl() {
        let fill = test_fill_with_commission(
            OrderSide::Buy,
            100,
            "1.00",
            "E-1",
            0,
            Money::from("2.00 USD"),
        );
        let position = Position::new(fill).unwrap();
        assert_eq!(position.realized_pnl, Money::from("-2.00 USD"));
    }

    #[rstest]
    fn test_unrealized_pnl_long() {
        let position = Position::new(test_fill(OrderSide::Buy, 100, "1.00", "E-1", 0)).unwrap();
        assert_eq!(
            position.unrealized_pnl(Price::from("1.05")),
            Money::from("5.00 USD")
        );
        assert_eq!(
            position.total_pnl(Price::from("1.05")),
            Money::from("5.00 USD")
        );
    }

    #[rstest]
    fn test_unrealized_pnl_short() {
        let position = Position::new(test_fill(OrderSide::Sell, 100, "1.00", "E-1", 0)).unwrap();
        assert_eq!(
            position.unrealized_pnl(Price::from("1.05")),
            Money::from("-5.00 USD")
        );
    }

    #[rstest]
    fn test_unrealized_pnl_when_flat_is_exactly_zero() {
        let mut position = Position::new(test_fill(OrderSide::Buy, 100, "1.00", "E-1", 0)).unwrap();
        position
            .apply(&test_fill(OrderSide::Sell, 100, "1.10", "E-2", 1_000))
            .unwrap();

        let unrealized = position.unrealized_pnl(Price::from("2.00"));
        assert!(unrealized.is_zero());
        assert_eq!(unrealized.currency, Currency::USD());
    }

    #[rstest]
    fn test_notional_value() {
        let position = Position::new(test_fill(OrderSide::Buy, 100, "1.50", "E-1", 0)).unwrap();
        assert_eq!(
            position.notional_value(Price::from("2.00")),
            Money::from("200.00 USD")
        );
    }

    #[rstest]
    fn test_notional_value_inverse_is_quantity() {
        let position =
            Position::new(test_fill_inverse(OrderSide::Buy, 1000, "10.00", "E-1", 0)).unwrap();
        assert_eq!(
            position.notional_value(Price::from("20.00")),
            Money::new(dec!(1000), Currency::USD())
        );
    }

    #[rstest]
    fn test_partial_close_then_full_close() {
        let mut position = Position::new(test_fill(OrderSide::Buy, 100, "1.00", "E-1", 0)).unwrap();
        position
            .apply(&test_fill(OrderSide::Sell, 40, "1.10", "E-2", 1_000))
            .unwrap();

        assert_eq!(position.side, PositionSide::Long);
        assert_eq!(position.quantity, Quantity::from(60));
        assert_eq!(position.realized_pnl, Money::from("4.00 USD"));
        assert_eq!(position.ts_closed, 0);

        position
            .apply(&test_fill(OrderSide::Sell, 60, "1.20", "E-3", 2_000))
            .unwrap();
        assert_eq!(position.side, PositionSide::Flat);
        // avg close = (1.10 * 40 + 1.20 * 60) / 100 = 1.16
        assert_eq!(position.avg_px_close, Some(dec!(1.16)));
        assert_eq!(position.realized_pnl, Money::from("16.00 USD"));
    }

    #[rstest]
    fn test_direction_flip_in_single_fill() {
        // LONG 100 then SELL 200 flips to SHORT 100
        let mut position = Position::new(test_fill(OrderSide::Buy, 100, "1.00", "E-1", 0)).unwrap();
        position
            .apply(&test_fill(OrderSide::Sell, 200, "1.10", "E-2", 1_000))
            .unwrap();

        assert_eq!(position.side, PositionSide::Short);
        assert_eq!(position.relative_qty, dec!(-100));
        assert_eq!(position.quantity, Quantity::from(100));
        // Realized P&L capped at the closeable quantity
        assert_eq!(position.realized_pnl, Money::from("10.00 USD"));
    }

    #[rstest]
    fn test_reopened_position_keeps_stale_ts_closed() {
        // Flip to flat sets `ts_closed`; a reopening fill does not clear it
        let mut position =
            Position::new(test_fill(OrderSide::Buy, 100, "1.00", "E-1", 1_000)).unwrap();
        position
            .apply(&test_fill(OrderSide::Sell, 100, "1.10", "E-2", 2_000))
            .unwrap();
        assert_eq!(position.ts_closed, 2_000);
        assert_eq!(position.duration_ns, 1_000);

        position
            .apply(&test_fill(OrderSide::Buy, 50, "1.20", "E-3", 3_000))
            .unwrap();
        assert_eq!(position.side, PositionSide::Long);
        assert_eq!(position.avg_px_open, dec!(1.20));
        assert!(position.is_open());
        // Stale values from the previous close remain observable
        assert_eq!(position.ts_closed, 2_000);
        assert_eq!(position.duration_ns, 1_000);
        assert_eq!(position.event_count(), 3);
    }

    #[rstest]
    fn test_id_queries() {
        let mut fill1 = test_fill(OrderSide::Buy, 100, "1.00", "E-1", 0);
        fill1.client_order_id = ClientOrderId::new("O-1");
        fill1.order_id = OrderId::new("V-1");
        let mut fill2 = test_fill(OrderSide::Sell, 100, "1.10", "E-2", 1_000);
        fill2.client_order_id = ClientOrderId::new("O-1");
        fill2.order_id = OrderId::new("V-2");

        let mut position = Position::new(fill1).unwrap();
        position.apply(&fill2).unwrap();

        assert_eq!(position.client_order_ids(), vec![ClientOrderId::new("O-1")]);
        assert_eq!(
            position.order_ids(),
            vec![OrderId::new("V-1"), OrderId::new("V-2")]
        );
        assert_eq!(
            position.execution_ids(),
            vec![ExecutionId::new("E-1"), ExecutionId::new("E-2")]
        );
        assert_eq!(position.last_execution_id(), Some(ExecutionId::new("E-2")));
        assert_eq!(position.last_event(), fill2);
        assert_eq!(position.symbol(), Symbol::new("AUD/USD"));
        assert_eq!(position.venue(), Venue::new("SIM"));
    }

    #[rstest]
    fn test_status_string_and_display() {
        let mut position =
            Position::new(test_fill(OrderSide::Buy, 100_000, "1.00", "E-1", 0)).unwrap();
        assert_eq!(position.status_string(), "LONG 100_000 AUD/USD.SIM");
        assert_eq!(
            format!("{position}"),
            "Position(LONG 100_000 AUD/USD.SIM, id=P-123456)"
        );

        position
            .apply(&test_fill(OrderSide::Sell, 100_000, "1.00", "E-2", 1_000))
            .unwrap();
        assert_eq!(position.status_string(), "FLAT AUD/USD.SIM");
        assert_eq!(
            format!("{position}"),
            "Position(FLAT AUD/USD.SIM, id=P-123456)"
        );
    }

    #[rstest]
    fn test_equality_and_hash_by_id() {
        let position1 = Position::new(test_fill(OrderSide::Buy, 100, "1.00", "E-1", 0)).unwrap();
        let mut position2 =
            Position::new(test_fill(OrderSide::Buy, 50, "2.00", "E-2", 0)).unwrap();
        assert_eq!(position1, position2);

        position2.id = PositionId::new("P-999");
        assert_ne!(position1, position2);
    }
}
