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

//! The historical market data subsystem for the backtest engine.
//!
//! A [`container::BacktestDataContainer`] holds per-instrument columnar tick
//! data; a [`producer::BacktestDataProducer`] merges it into a single
//! time-ordered stream bounded by a replay window; a [`cached::CachedProducer`]
//! serves repeated replays from memory.

pub mod cached;
pub mod container;
pub mod producer;

// Re-exports
pub use cached::CachedProducer;
pub use container::{BacktestDataContainer, QuoteTickColumns, TradeTickColumns};
pub use producer::{BacktestDataProducer, ProducerError};
