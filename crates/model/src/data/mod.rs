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

//! Market data types for the trading domain model.

pub mod quote;
pub mod trade;

use std::fmt::Display;

use marlin_core::UnixNanos;
use serde::{Deserialize, Serialize};

// Re-exports
pub use quote::QuoteTick;
pub use trade::TradeTick;

use crate::identifiers::InstrumentId;

/// A single timestamped market observation, either a quote or a trade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tick {
    /// A quote tick (top-of-book bid/ask).
    Quote(QuoteTick),
    /// A trade tick (last traded price and size).
    Trade(TradeTick),
}

impl Tick {
    /// Returns the instrument ID for the tick.
    #[must_use]
    pub fn instrument_id(&self) -> InstrumentId {
        match self {
            Self::Quote(quote) => quote.instrument_id,
            Self::Trade(trade) => trade.instrument_id,
        }
    }

    /// Returns the UNIX timestamp (nanoseconds) when the tick occurred.
    #[must_use]
    pub fn ts_ns(&self) -> UnixNanos {
        match self {
            Self::Quote(quote) => quote.ts_ns,
            Self::Trade(trade) => trade.ts_ns,
        }
    }

    /// Returns `true` if this is a quote tick.
    #[must_use]
    pub fn is_quote(&self) -> bool {
        matches!(self, Self::Quote(_))
    }

    /// Returns `true` if this is a trade tick.
    #[must_use]
    pub fn is_trade(&self) -> bool {
        matches!(self, Self::Trade(_))
    }
}

impl Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quote(quote) => write!(f, "{quote}"),
            Self::Trade(trade) => write!(f, "{trade}"),
        }
    }
}

impl From<QuoteTick> for Tick {
    fn from(value: QuoteTick) -> Self {
        Self::Quote(value)
    }
}

impl From<TradeTick> for Tick {
    fn from(value: TradeTick) -> Self {
        Self::Trade(value)
    }
}
