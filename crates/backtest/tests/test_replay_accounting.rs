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

//! Integration test driving order fills derived from a replayed tick stream
//! through the position accounting engine.

use marlin_backtest::{
    BacktestDataContainer, BacktestDataProducer, CachedProducer, QuoteTickColumns,
};
use marlin_core::UnixNanos;
use marlin_model::{
    data::{QuoteTick, Tick},
    enums::{OrderSide, PositionSide},
    events::OrderFilled,
    identifiers::{
        AccountId, ClientOrderId, ExecutionId, InstrumentId, OrderId, PositionId, StrategyId,
    },
    position::Position,
    types::{Currency, Money, Price, Quantity},
};
use rstest::rstest;
use rust_decimal_macros::dec;

fn audusd_sim_id() -> InstrumentId {
    InstrumentId::from("AUD/USD.SIM")
}

fn quote(bid: &str, ask: &str, ts_ns: i64) -> QuoteTick {
    QuoteTick::new(
        audusd_sim_id(),
        Price::from(bid),
        Price::from(ask),
        Quantity::from(1_000_000),
        Quantity::from(1_000_000),
        UnixNanos::from(ts_ns),
    )
}

fn fill_from_quote(
    quote: &QuoteTick,
    order_side: OrderSide,
    last_qty: u64,
    execution_id: &str,
) -> OrderFilled {
    // Market orders cross the spread: buys lift the ask, sells hit the bid
    let last_px = match order_side {
        OrderSide::Buy => quote.ask_price,
        _ => quote.bid_price,
    };
    OrderFilled::new(
        AccountId::new("SIM-001"),
        ClientOrderId::new("O-19700101-000000-001-001-1"),
        OrderId::new("1"),
        ExecutionId::new(execution_id),
        PositionId::new("P-19700101-001"),
        StrategyId::new("EMACross-001"),
        quote.instrument_id,
        order_side,
        Quantity::from(last_qty),
        last_px,
        Currency::USD(),
        false,
        Money::zero(Currency::USD()),
        quote.ts_ns,
    )
}

fn test_container() -> BacktestDataContainer {
    let quotes = vec![
        quote("1.0000", "1.0002", 1_000_000_000),
        quote("1.0004", "1.0006", 2_000_000_000),
        quote("1.0008", "1.0010", 3_000_000_000),
        quote("1.0012", "1.0014", 4_000_000_000),
    ];
    let mut container = BacktestDataContainer::new();
    container.add_quote_ticks(audusd_sim_id(), QuoteTickColumns::from_ticks(&quotes));
    container
}

#[rstest]
fn test_position_folded_from_replayed_stream() {
    let mut producer = BacktestDataProducer::new(test_container());
    producer
        .setup(UnixNanos::from(1_000_000_000), UnixNanos::from(4_000_000_000))
        .unwrap();

    // Open on the first quote, close on the last
    let mut position: Option<Position> = None;
    let mut execution_count = 0;
    while let Some(tick) = producer.next() {
        let Tick::Quote(quote) = tick else {
            continue;
        };
        match &mut position {
            None => {
                execution_count += 1;
                let fill = fill_from_quote(
                    &quote,
                    OrderSide::Buy,
                    100_000,
                    &format!("E-{execution_count}"),
                );
                position = Some(Position::new(fill).unwrap());
            }
            Some(position) if quote.ts_ns == 4_000_000_000 => {
                execution_count += 1;
                let fill = fill_from_quote(
                    &quote,
                    OrderSide::Sell,
                    100_000,
                    &format!("E-{execution_count}"),
                );
                position.apply(&fill).unwrap();
            }
            Some(_) => {}
        }
    }

    let position = position.unwrap();
    assert_eq!(position.side, PositionSide::Flat);
    assert_eq!(position.event_count(), 2);
    // Bought at 1.0002 (ask), sold at 1.0012 (bid): 0.0010 points on 100,000
    assert_eq!(position.avg_px_open, dec!(1.0002));
    assert_eq!(position.avg_px_close, Some(dec!(1.0012)));
    assert_eq!(position.realized_pnl, Money::from("100.00 USD"));
    assert_eq!(position.ts_closed, 4_000_000_000);
    assert_eq!(position.duration_ns, 3_000_000_000);
}

#[rstest]
fn test_cached_replays_produce_identical_positions() {
    let mut producer = CachedProducer::new(BacktestDataProducer::new(test_container()));

    let mut realized = Vec::new();
    for sweep in 0..3 {
        producer
            .setup(UnixNanos::from(1_000_000_000), UnixNanos::from(4_000_000_000))
            .unwrap();

        let mut position: Option<Position> = None;
        let mut execution_count = 0;
        while let Some(tick) = producer.next() {
            let Tick::Quote(quote) = tick else {
                continue;
            };
            execution_count += 1;
            let execution_id = format!("E-{sweep}-{execution_count}");
            match &mut position {
                None => {
                    let fill =
                        fill_from_quote(&quote, OrderSide::Buy, 100_000, &execution_id);
                    position = Some(Position::new(fill).unwrap());
                }
                Some(position) => {
                    let order_side = if position.is_open() {
                        OrderSide::Sell
                    } else {
                        OrderSide::Buy
                    };
                    let fill = fill_from_quote(&quote, order_side, 100_000, &execution_id);
                    position.apply(&fill).unwrap();
                }
            }
        }
        realized.push(position.unwrap().realized_pnl);
    }

    assert_eq!(realized[0], realized[1]);
    assert_eq!(realized[1], realized[2]);
}
