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

//! The historical market data producer for the backtest engine.

use marlin_core::UnixNanos;
use marlin_model::{
    data::{QuoteTick, Tick, TradeTick},
    enums::AggressorSide,
    identifiers::{ExecutionId, InstrumentId},
    types::{Price, Quantity},
};

use crate::container::BacktestDataContainer;

/// Errors produced when setting up a data producer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProducerError {
    /// The requested replay window is reversed or outside the container bounds.
    #[error("Invalid replay window: {0}")]
    WindowInvalid(String),
    /// The container violates a column shape or sort invariant.
    #[error("Malformed data container: {0}")]
    ContainerMalformed(String),
}

/// Merged global quote columns, sorted by timestamp ascending.
#[derive(Debug, Default)]
struct MergedQuotes {
    instrument_indexes: Vec<u32>,
    bid_prices: Vec<Price>,
    ask_prices: Vec<Price>,
    bid_sizes: Vec<Quantity>,
    ask_sizes: Vec<Quantity>,
    ts_ns: Vec<UnixNanos>,
}

/// Merged global trade columns, sorted by timestamp ascending.
#[derive(Debug, Default)]
struct MergedTrades {
    instrument_indexes: Vec<u32>,
    prices: Vec<Price>,
    sizes: Vec<Quantity>,
    aggressor_sides: Vec<AggressorSide>,
    match_ids: Vec<ExecutionId>,
    ts_ns: Vec<UnixNanos>,
}

/// Produces a single time-ordered tick stream from a [`BacktestDataContainer`],
/// bounded by a replay window.
///
/// [`BacktestDataProducer::setup`] merges all instruments' columns into one
/// global-time-sorted run per tick type and pre-stages a look-ahead tick per
/// cursor, so that [`BacktestDataProducer::next`] does constant work. At equal
/// timestamps quotes are emitted before trades.
#[derive(Debug)]
pub struct BacktestDataProducer {
    container: BacktestDataContainer,
    instrument_ids: Vec<InstrumentId>,
    quotes: Option<MergedQuotes>,
    trades: Option<MergedTrades>,
    quote_range: (usize, usize),
    trade_range: (usize, usize),
    quote_cursor: usize,
    trade_cursor: usize,
    next_quote: Option<QuoteTick>,
    next_trade: Option<TradeTick>,
    has_data: bool,
}

impl BacktestDataProducer {
    /// Creates a new [`BacktestDataProducer`] over the given container.
    #[must_use]
    pub fn new(container: BacktestDataContainer) -> Self {
        let instrument_ids = container.instruments();
        Self {
            container,
            instrument_ids,
            quotes: None,
            trades: None,
            quote_range: (0, 0),
            trade_range: (0, 0),
            quote_cursor: 0,
            trade_cursor: 0,
            next_quote: None,
            next_trade: None,
            has_data: false,
        }
    }

    /// Returns a reference to the underlying data container.
    #[must_use]
    pub fn container(&self) -> &BacktestDataContainer {
        &self.container
    }

    /// Returns `true` if the producer has remaining data for the armed window.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.has_data
    }

    /// Binds the replay window `[start_ns, stop_ns]` and rebuilds the merged runs.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The window is reversed or outside the container's timestamp bounds
    ///   ([`ProducerError::WindowInvalid`]).
    /// - A column shape or sort invariant is violated
    ///   ([`ProducerError::ContainerMalformed`]).
    pub fn setup(&mut self, start_ns: UnixNanos, stop_ns: UnixNanos) -> Result<(), ProducerError> {
        let min_ts_ns = self.container.min_ts_ns().ok_or_else(|| {
            ProducerError::WindowInvalid("container holds no tick data".to_string())
        })?;
        let max_ts_ns = self.container.max_ts_ns().ok_or_else(|| {
            ProducerError::WindowInvalid("container holds no tick data".to_string())
        })?;
        if start_ns > stop_ns {
            return Err(ProducerError::WindowInvalid(format!(
                "start {start_ns} was greater than stop {stop_ns}"
            )));
        }
        if start_ns < min_ts_ns || stop_ns > max_ts_ns {
            return Err(ProducerError::WindowInvalid(format!(
                "window [{start_ns}, {stop_ns}] outside container bounds [{min_ts_ns}, {max_ts_ns}]"
            )));
        }
        self.validate_container()?;

        self.build_merged_runs();

        let quotes_ts = self.quotes.as_ref().map(|m| m.ts_ns.as_slice()).unwrap_or(&[]);
        let trades_ts = self.trades.as_ref().map(|m| m.ts_ns.as_slice()).unwrap_or(&[]);
        self.quote_range = window_bounds(quotes_ts, start_ns, stop_ns);
        self.trade_range = window_bounds(trades_ts, start_ns, stop_ns);

        self.reset();

        log::info!(
            "Prepared {} quote ticks and {} trade ticks for window [{start_ns}, {stop_ns}]",
            self.quote_range.1 - self.quote_range.0,
            self.trade_range.1 - self.trade_range.0,
        );
        Ok(())
    }

    /// Re-positions both cursors to the start of the armed window without
    /// rebuilding the merged runs.
    pub fn reset(&mut self) {
        self.quote_cursor = self.quote_range.0;
        self.trade_cursor = self.trade_range.0;
        self.next_quote = self.stage_quote(self.quote_cursor);
        self.next_trade = self.stage_trade(self.trade_cursor);
        self.has_data = self.next_quote.is_some() || self.next_trade.is_some();
    }

    /// Returns the next tick in non-decreasing global timestamp order, or
    /// `None` once both cursors are exhausted.
    ///
    /// At equal timestamps the quote is emitted before the trade.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Tick> {
        let tick = match (self.next_quote, self.next_trade) {
            (Some(quote), Some(trade)) => {
                if quote.ts_ns <= trade.ts_ns {
                    self.advance_quote();
                    Tick::Quote(quote)
                } else {
                    self.advance_trade();
                    Tick::Trade(trade)
                }
            }
            (Some(quote), None) => {
                self.advance_quote();
                Tick::Quote(quote)
            }
            (None, Some(trade)) => {
                self.advance_trade();
                Tick::Trade(trade)
            }
            (None, None) => return None,
        };
        self.has_data = self.next_quote.is_some() || self.next_trade.is_some();
        Some(tick)
    }

    /// Drops the merged runs and look-ahead slots, releasing memory.
    pub fn clear(&mut self) {
        self.quotes = None;
        self.trades = None;
        self.quote_range = (0, 0);
        self.trade_range = (0, 0);
        self.quote_cursor = 0;
        self.trade_cursor = 0;
        self.next_quote = None;
        self.next_trade = None;
        self.has_data = false;
        log::debug!("Cleared merged tick buffers");
    }

    fn validate_container(&self) -> Result<(), ProducerError> {
        for instrument_id in &self.instrument_ids {
            if let Some(columns) = self.container.quote_columns(instrument_id) {
                check_column_shape(
                    instrument_id,
                    "quote",
                    columns.len(),
                    &[
                        columns.bid_prices.len(),
                        columns.ask_prices.len(),
                        columns.bid_sizes.len(),
                        columns.ask_sizes.len(),
                    ],
                )?;
                check_sorted_ascending(instrument_id, "quote", &columns.ts_ns)?;
            }
            if let Some(columns) = self.container.trade_columns(instrument_id) {
                check_column_shape(
                    instrument_id,
                    "trade",
                    columns.len(),
                    &[
                        columns.prices.len(),
                        columns.sizes.len(),
                        columns.aggressor_sides.len(),
                        columns.match_ids.len(),
                    ],
                )?;
                check_sorted_ascending(instrument_id, "trade", &columns.ts_ns)?;
            }
        }
        Ok(())
    }

    fn build_merged_runs(&mut self) {
        // (ts, instrument index, row) triples sorted stably by ts, so rows of
        // the same instrument keep their relative order at equal timestamps
        let mut quote_order: Vec<(UnixNanos, u32, usize)> =
            Vec::with_capacity(self.container.total_quote_count());
        let mut trade_order: Vec<(UnixNanos, u32, usize)> =
            Vec::with_capacity(self.container.total_trade_count());

        for (index, instrument_id) in self.instrument_ids.iter().enumerate() {
            let index = index as u32;
            if let Some(columns) = self.container.quote_columns(instrument_id) {
                for (row, ts_ns) in columns.ts_ns.iter().enumerate() {
                    quote_order.push((*ts_ns, index, row));
                }
            }
            if let Some(columns) = self.container.trade_columns(instrument_id) {
                for (row, ts_ns) in columns.ts_ns.iter().enumerate() {
                    trade_order.push((*ts_ns, index, row));
                }
            }
        }
        quote_order.sort_by_key(|(ts_ns, ..)| *ts_ns);
        trade_order.sort_by_key(|(ts_ns, ..)| *ts_ns);

        let mut quotes = MergedQuotes::default();
        for (ts_ns, index, row) in quote_order {
            let instrument_id = self.instrument_ids[index as usize];
            // SAFETY: the row was sourced from these columns above
            let columns = self.container.quote_columns(&instrument_id).unwrap();
            quotes.instrument_indexes.push(index);
            quotes.bid_prices.push(columns.bid_prices[row]);
            quotes.ask_prices.push(columns.ask_prices[row]);
            quotes.bid_sizes.push(columns.bid_sizes[row]);
            quotes.ask_sizes.push(columns.ask_sizes[row]);
            quotes.ts_ns.push(ts_ns);
        }

        let mut trades = MergedTrades::default();
        for (ts_ns, index, row) in trade_order {
            let instrument_id = self.instrument_ids[index as usize];
            // SAFETY: the row was sourced from these columns above
            let columns = self.container.trade_columns(&instrument_id).unwrap();
            trades.instrument_indexes.push(index);
            trades.prices.push(columns.prices[row]);
            trades.sizes.push(columns.sizes[row]);
            trades.aggressor_sides.push(columns.aggressor_sides[row]);
            trades.match_ids.push(columns.match_ids[row]);
            trades.ts_ns.push(ts_ns);
        }

        self.quotes = Some(quotes);
        self.trades = Some(trades);
    }

    fn advance_quote(&mut self) {
        self.quote_cursor += 1;
        self.next_quote = self.stage_quote(self.quote_cursor);
    }

    fn advance_trade(&mut self) {
        self.trade_cursor += 1;
        self.next_trade = self.stage_trade(self.trade_cursor);
    }

    fn stage_quote(&self, i: usize) -> Option<QuoteTick> {
        let quotes = self.quotes.as_ref()?;
        if i >= self.quote_range.1 {
            return None;
        }
        Some(QuoteTick {
            instrument_id: self.instrument_ids[quotes.instrument_indexes[i] as usize],
            bid_price: quotes.bid_prices[i],
            ask_price: quotes.ask_prices[i],
            bid_size: quotes.bid_sizes[i],
            ask_size: quotes.ask_sizes[i],
            ts_ns: quotes.ts_ns[i],
        })
    }

    fn stage_trade(&self, i: usize) -> Option<TradeTick> {
        let trades = self.trades.as_ref()?;
        if i >= self.trade_range.1 {
            return None;
        }
        Some(TradeTick {
            instrument_id: self.instrument_ids[trades.instrument_indexes[i] as usize],
            price: trades.prices[i],
            size: trades.sizes[i],
            aggressor_side: trades.aggressor_sides[i],
            match_id: trades.match_ids[i],
            ts_ns: trades.ts_ns[i],
        })
    }
}

/// Returns the half-open index range `[lo, hi)` covering timestamps within
/// `[start_ns, stop_ns]` in the sorted slice.
fn window_bounds(ts_ns: &[UnixNanos], start_ns: UnixNanos, stop_ns: UnixNanos) -> (usize, usize) {
    let lo = ts_ns.partition_point(|&ts| ts < start_ns);
    let hi = ts_ns.partition_point(|&ts| ts <= stop_ns);
    (lo, hi)
}

fn check_column_shape(
    instrument_id: &InstrumentId,
    group: &str,
    expected: usize,
    lens: &[usize],
) -> Result<(), ProducerError> {
    if lens.iter().any(|&len| len != expected) {
        return Err(ProducerError::ContainerMalformed(format!(
            "{group} columns for {instrument_id} have unequal lengths"
        )));
    }
    Ok(())
}

fn check_sorted_ascending(
    instrument_id: &InstrumentId,
    group: &str,
    ts_ns: &[UnixNanos],
) -> Result<(), ProducerError> {
    if ts_ns.windows(2).any(|pair| pair[0] > pair[1]) {
        return Err(ProducerError::ContainerMalformed(format!(
            "{group} timestamps for {instrument_id} not sorted ascending"
        )));
    }
    Ok(())
}
