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

//! A caching layer over the data producer for repeated replays.

use marlin_core::UnixNanos;
use marlin_model::data::Tick;

use crate::producer::{BacktestDataProducer, ProducerError};

/// Wraps a [`BacktestDataProducer`] and materializes its first full traversal
/// into memory, serving subsequent replays from the cache.
///
/// Repeated replays over the same container (parameter sweeps) pay the
/// parse/merge cost once.
#[derive(Debug)]
pub struct CachedProducer {
    producer: BacktestDataProducer,
    data_cache: Vec<Tick>,
    ts_cache: Vec<UnixNanos>,
    init_start: usize,
    init_stop: usize,
    cursor: usize,
    cached: bool,
    has_data: bool,
}

impl CachedProducer {
    /// Creates a new [`CachedProducer`] wrapping the given producer.
    #[must_use]
    pub fn new(producer: BacktestDataProducer) -> Self {
        Self {
            producer,
            data_cache: Vec::new(),
            ts_cache: Vec::new(),
            init_start: 0,
            init_stop: 0,
            cursor: 0,
            cached: false,
            has_data: false,
        }
    }

    /// Returns `true` if the cache holds remaining data for the armed window.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.has_data
    }

    /// Returns the number of ticks held in the cache.
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.data_cache.len()
    }

    /// Binds the replay window `[start_ns, stop_ns]`.
    ///
    /// On the first call the inner producer is drained over the container's
    /// entire range into the cache and then cleared; subsequent calls only
    /// re-resolve the window's index bounds against the cached timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if the window is reversed or outside the container's
    /// timestamp bounds ([`ProducerError::WindowInvalid`]), or if the cache
    /// build finds a malformed container ([`ProducerError::ContainerMalformed`]).
    pub fn setup(&mut self, start_ns: UnixNanos, stop_ns: UnixNanos) -> Result<(), ProducerError> {
        let min_ts_ns = self.producer.container().min_ts_ns().ok_or_else(|| {
            ProducerError::WindowInvalid("container holds no tick data".to_string())
        })?;
        let max_ts_ns = self.producer.container().max_ts_ns().ok_or_else(|| {
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

        if !self.cached {
            self.producer.setup(min_ts_ns, max_ts_ns)?;
            while let Some(tick) = self.producer.next() {
                self.ts_cache.push(tick.ts_ns());
                self.data_cache.push(tick);
            }
            self.producer.clear();
            self.cached = true;
            log::info!("Cached {} ticks", self.data_cache.len());
        }

        self.init_start = self.ts_cache.partition_point(|&ts| ts < start_ns);
        self.init_stop = self.ts_cache.partition_point(|&ts| ts <= stop_ns);
        self.reset();
        Ok(())
    }

    /// Restores the cursor to the start of the armed window.
    pub fn reset(&mut self) {
        self.cursor = self.init_start;
        self.has_data = self.cursor < self.init_stop;
    }

    /// Returns the next cached tick for the armed window, or `None` once the
    /// window is exhausted.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Tick> {
        if self.cursor >= self.init_stop {
            self.has_data = false;
            return None;
        }
        let tick = self.data_cache[self.cursor];
        self.cursor += 1;
        self.has_data = self.cursor < self.init_stop;
        Some(tick)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use marlin_model::{
        data::QuoteTick,
        stubs::{audusd_sim_id, test_quote, test_trade},
    };
    use rstest::rstest;

    use super::*;
    use crate::container::{BacktestDataContainer, QuoteTickColumns, TradeTickColumns};

    fn test_container() -> BacktestDataContainer {
        let quotes: Vec<QuoteTick> = [1_000_i64, 2_000, 3_000, 4_000]
            .iter()
            .map(|&t| test_quote(audusd_sim_id(), "1.0000", "1.0001", t))
            .collect();
        let trades = [1_000_i64, 2_500]
            .iter()
            .enumerate()
            .map(|(i, &t)| test_trade(audusd_sim_id(), "1.0000", &format!("T-{i}"), t))
            .collect::<Vec<_>>();

        let mut container = BacktestDataContainer::new();
        container.add_quote_ticks(audusd_sim_id(), QuoteTickColumns::from_ticks(&quotes));
        container.add_trade_ticks(audusd_sim_id(), TradeTickColumns::from_ticks(&trades));
        container
    }

    fn drain(producer: &mut CachedProducer) -> Vec<Tick> {
        let mut ticks = Vec::new();
        while let Some(tick) = producer.next() {
            ticks.push(tick);
        }
        ticks
    }

    #[rstest]
    fn test_cache_built_once_over_entire_range() {
        let mut producer = CachedProducer::new(BacktestDataProducer::new(test_container()));
        producer.setup(UnixNanos::from(2_000), UnixNanos::from(3_000)).unwrap();
        // The cache spans the full container range regardless of the window
        assert_eq!(producer.cached_count(), 6);
    }

    #[rstest]
    fn test_replay_idempotence() {
        let mut producer = CachedProducer::new(BacktestDataProducer::new(test_container()));
        producer.setup(UnixNanos::from(1_000), UnixNanos::from(4_000)).unwrap();
        let run1 = drain(&mut producer);

        producer.reset();
        let run2 = drain(&mut producer);

        producer.setup(UnixNanos::from(1_000), UnixNanos::from(4_000)).unwrap();
        let run3 = drain(&mut producer);

        assert_eq!(run1, run2);
        assert_eq!(run2, run3);
        assert_eq!(run1.len(), 6);
    }

    #[rstest]
    fn test_quote_before_trade_at_equal_timestamp_preserved() {
        let mut producer = CachedProducer::new(BacktestDataProducer::new(test_container()));
        producer.setup(UnixNanos::from(1_000), UnixNanos::from(1_000)).unwrap();

        let ticks = drain(&mut producer);
        assert_eq!(ticks.len(), 2);
        assert!(ticks[0].is_quote());
        assert!(ticks[1].is_trade());
    }

    #[rstest]
    fn test_window_resolved_against_cache() {
        let mut producer = CachedProducer::new(BacktestDataProducer::new(test_container()));
        producer.setup(UnixNanos::from(1_000), UnixNanos::from(4_000)).unwrap();
        assert_eq!(drain(&mut producer).len(), 6);

        producer.setup(UnixNanos::from(2_000), UnixNanos::from(3_000)).unwrap();
        let ticks = drain(&mut producer);
        assert_eq!(ticks.len(), 3);
        assert!(ticks.iter().all(|t| t.ts_ns() >= 2_000 && t.ts_ns() <= 3_000));
    }

    #[rstest]
    fn test_has_data_reflects_window() {
        let mut producer = CachedProducer::new(BacktestDataProducer::new(test_container()));
        producer.setup(UnixNanos::from(1_000), UnixNanos::from(2_000)).unwrap();
        assert!(producer.has_data());

        let _ = drain(&mut producer);
        assert!(!producer.has_data());

        producer.reset();
        assert!(producer.has_data());
    }

    #[rstest]
    fn test_setup_with_invalid_window_errors() {
        let mut producer = CachedProducer::new(BacktestDataProducer::new(test_container()));
        let result = producer.setup(UnixNanos::from(4_000), UnixNanos::from(1_000));
        assert!(matches!(result, Err(ProducerError::WindowInvalid(_))));

        let result = producer.setup(UnixNanos::from(500), UnixNanos::from(4_000));
        assert!(matches!(result, Err(ProducerError::WindowInvalid(_))));
    }

    #[rstest]
    fn test_next_past_window_returns_none() {
        let mut producer = CachedProducer::new(BacktestDataProducer::new(test_container()));
        producer.setup(UnixNanos::from(4_000), UnixNanos::from(4_000)).unwrap();

        assert!(producer.next().is_some());
        assert!(producer.next().is_none());
        assert!(producer.next().is_none());
        assert!(!producer.has_data());
    }

    #[rstest]
    fn test_non_decreasing_timestamps() {
        let mut producer = CachedProducer::new(BacktestDataProducer::new(test_container()));
        producer.setup(UnixNanos::from(1_000), UnixNanos::from(4_000)).unwrap();

        let ticks = drain(&mut producer);
        for pair in ticks.windows(2) {
            assert!(pair[0].ts_ns() <= pair[1].ts_ns());
        }
    }
}
