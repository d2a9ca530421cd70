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

//! A read-only columnar container for historical market data.

use indexmap::IndexMap;
use marlin_core::UnixNanos;
use marlin_model::{
    data::{QuoteTick, TradeTick},
    enums::AggressorSide,
    identifiers::{ExecutionId, InstrumentId},
    types::{Price, Quantity},
};

/// Per-instrument quote tick columns, co-indexed and sorted by timestamp ascending.
#[derive(Clone, Debug, Default)]
pub struct QuoteTickColumns {
    /// The top-of-book bid prices.
    pub bid_prices: Vec<Price>,
    /// The top-of-book ask prices.
    pub ask_prices: Vec<Price>,
    /// The top-of-book bid sizes.
    pub bid_sizes: Vec<Quantity>,
    /// The top-of-book ask sizes.
    pub ask_sizes: Vec<Quantity>,
    /// The UNIX timestamps (nanoseconds) for each row.
    pub ts_ns: Vec<UnixNanos>,
}

impl QuoteTickColumns {
    /// Creates a new [`QuoteTickColumns`] from the given quote ticks.
    #[must_use]
    pub fn from_ticks(ticks: &[QuoteTick]) -> Self {
        let mut columns = Self::default();
        for tick in ticks {
            columns.bid_prices.push(tick.bid_price);
            columns.ask_prices.push(tick.ask_price);
            columns.bid_sizes.push(tick.bid_size);
            columns.ask_sizes.push(tick.ask_size);
            columns.ts_ns.push(tick.ts_ns);
        }
        columns
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ts_ns.len()
    }

    /// Returns `true` if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ts_ns.is_empty()
    }
}

/// Per-instrument trade tick columns, co-indexed and sorted by timestamp ascending.
#[derive(Clone, Debug, Default)]
pub struct TradeTickColumns {
    /// The traded prices.
    pub prices: Vec<Price>,
    /// The traded sizes.
    pub sizes: Vec<Quantity>,
    /// The trade aggressor sides.
    pub aggressor_sides: Vec<AggressorSide>,
    /// The trade match IDs.
    pub match_ids: Vec<ExecutionId>,
    /// The UNIX timestamps (nanoseconds) for each row.
    pub ts_ns: Vec<UnixNanos>,
}

impl TradeTickColumns {
    /// Creates a new [`TradeTickColumns`] from the given trade ticks.
    #[must_use]
    pub fn from_ticks(ticks: &[TradeTick]) -> Self {
        let mut columns = Self::default();
        for tick in ticks {
            columns.prices.push(tick.price);
            columns.sizes.push(tick.size);
            columns.aggressor_sides.push(tick.aggressor_side);
            columns.match_ids.push(tick.match_id);
            columns.ts_ns.push(tick.ts_ns);
        }
        columns
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ts_ns.len()
    }

    /// Returns `true` if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ts_ns.is_empty()
    }
}

/// A read-only columnar container of historical market data for backtesting.
///
/// Holds per-instrument quote and trade tick column groups, and assigns each
/// instrument a dense small integer index used by the merged producer runs.
#[derive(Clone, Debug, Default)]
pub struct BacktestDataContainer {
    instrument_indexes: IndexMap<InstrumentId, u32>,
    quotes: IndexMap<InstrumentId, QuoteTickColumns>,
    trades: IndexMap<InstrumentId, TradeTickColumns>,
}

impl BacktestDataContainer {
    /// Creates a new empty [`BacktestDataContainer`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the quote tick columns for the given instrument.
    pub fn add_quote_ticks(&mut self, instrument_id: InstrumentId, columns: QuoteTickColumns) {
        self.register_instrument(instrument_id);
        self.quotes.insert(instrument_id, columns);
    }

    /// Adds (or replaces) the trade tick columns for the given instrument.
    pub fn add_trade_ticks(&mut self, instrument_id: InstrumentId, columns: TradeTickColumns) {
        self.register_instrument(instrument_id);
        self.trades.insert(instrument_id, columns);
    }

    fn register_instrument(&mut self, instrument_id: InstrumentId) -> u32 {
        let next_index = self.instrument_indexes.len() as u32;
        *self
            .instrument_indexes
            .entry(instrument_id)
            .or_insert(next_index)
    }

    /// Returns the instrument catalog, in registration order.
    #[must_use]
    pub fn instruments(&self) -> Vec<InstrumentId> {
        self.instrument_indexes.keys().copied().collect()
    }

    /// Returns the dense index for the given instrument.
    #[must_use]
    pub fn instrument_index(&self, instrument_id: &InstrumentId) -> Option<u32> {
        self.instrument_indexes.get(instrument_id).copied()
    }

    /// Returns the quote tick columns for the given instrument.
    #[must_use]
    pub fn quote_columns(&self, instrument_id: &InstrumentId) -> Option<&QuoteTickColumns> {
        self.quotes.get(instrument_id)
    }

    /// Returns the trade tick columns for the given instrument.
    #[must_use]
    pub fn trade_columns(&self, instrument_id: &InstrumentId) -> Option<&TradeTickColumns> {
        self.trades.get(instrument_id)
    }

    /// Returns `true` if the container holds any quote ticks.
    #[must_use]
    pub fn has_quotes(&self) -> bool {
        self.quotes.values().any(|columns| !columns.is_empty())
    }

    /// Returns `true` if the container holds any trade ticks.
    #[must_use]
    pub fn has_trades(&self) -> bool {
        self.trades.values().any(|columns| !columns.is_empty())
    }

    /// Returns `true` if the container holds no tick data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_quotes() && !self.has_trades()
    }

    /// Returns the total quote tick count across all instruments.
    #[must_use]
    pub fn total_quote_count(&self) -> usize {
        self.quotes.values().map(QuoteTickColumns::len).sum()
    }

    /// Returns the total trade tick count across all instruments.
    #[must_use]
    pub fn total_trade_count(&self) -> usize {
        self.trades.values().map(TradeTickColumns::len).sum()
    }

    /// Returns the minimum timestamp across all columns.
    ///
    /// Relies on the per-instrument sort invariant (first row is the earliest).
    #[must_use]
    pub fn min_ts_ns(&self) -> Option<UnixNanos> {
        let quote_min = self.quotes.values().filter_map(|c| c.ts_ns.first()).min();
        let trade_min = self.trades.values().filter_map(|c| c.ts_ns.first()).min();
        match (quote_min, trade_min) {
            (Some(q), Some(t)) => Some(*q.min(t)),
            (Some(q), None) => Some(*q),
            (None, Some(t)) => Some(*t),
            (None, None) => None,
        }
    }

    /// Returns the maximum timestamp across all columns.
    ///
    /// Relies on the per-instrument sort invariant (last row is the latest).
    #[must_use]
    pub fn max_ts_ns(&self) -> Option<UnixNanos> {
        let quote_max = self.quotes.values().filter_map(|c| c.ts_ns.last()).max();
        let trade_max = self.trades.values().filter_map(|c| c.ts_ns.last()).max();
        match (quote_max, trade_max) {
            (Some(q), Some(t)) => Some(*q.max(t)),
            (Some(q), None) => Some(*q),
            (None, Some(t)) => Some(*t),
            (None, None) => None,
        }
    }

    /// Returns a descriptive list of the execution resolutions per instrument.
    #[must_use]
    pub fn execution_resolutions(&self) -> Vec<String> {
        self.instrument_indexes
            .keys()
            .map(|instrument_id| {
                let mut resolutions = Vec::new();
                if self.quotes.get(instrument_id).is_some_and(|c| !c.is_empty()) {
                    resolutions.push("QUOTE_TICK");
                }
                if self.trades.get(instrument_id).is_some_and(|c| !c.is_empty()) {
                    resolutions.push("TRADE_TICK");
                }
                format!("{instrument_id}={}", resolutions.join(","))
            })
            .collect()
    }
}
