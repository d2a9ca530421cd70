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

//! Identifiers for the trading domain model.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[macro_use]
mod macros;

pub mod account_id;
pub mod client_order_id;
pub mod default;
pub mod execution_id;
pub mod instrument_id;
pub mod order_id;
pub mod position_id;
pub mod strategy_id;
pub mod symbol;
pub mod venue;

// Re-exports
pub use crate::identifiers::{
    account_id::AccountId, client_order_id::ClientOrderId, execution_id::ExecutionId,
    instrument_id::InstrumentId, order_id::OrderId, position_id::PositionId,
    strategy_id::StrategyId, symbol::Symbol, venue::Venue,
};

impl_from_str_for_identifier!(account_id::AccountId);
impl_from_str_for_identifier!(client_order_id::ClientOrderId);
impl_from_str_for_identifier!(execution_id::ExecutionId);
impl_from_str_for_identifier!(order_id::OrderId);
impl_from_str_for_identifier!(position_id::PositionId);
impl_from_str_for_identifier!(strategy_id::StrategyId);
impl_from_str_for_identifier!(symbol::Symbol);
impl_from_str_for_identifier!(venue::Venue);

impl_serialization_for_identifier!(account_id::AccountId);
impl_serialization_for_identifier!(client_order_id::ClientOrderId);
impl_serialization_for_identifier!(execution_id::ExecutionId);
impl_serialization_for_identifier!(order_id::OrderId);
impl_serialization_for_identifier!(position_id::PositionId);
impl_serialization_for_identifier!(strategy_id::StrategyId);
impl_serialization_for_identifier!(symbol::Symbol);
impl_serialization_for_identifier!(venue::Venue);

impl_display_debug_for_identifier!(account_id::AccountId);
impl_display_debug_for_identifier!(client_order_id::ClientOrderId);
impl_display_debug_for_identifier!(execution_id::ExecutionId);
impl_display_debug_for_identifier!(order_id::OrderId);
impl_display_debug_for_identifier!(position_id::PositionId);
impl_display_debug_for_identifier!(strategy_id::StrategyId);
impl_display_debug_for_identifier!(symbol::Symbol);
impl_display_debug_for_identifier!(venue::Venue);

impl_as_ref_for_identifier!(account_id::AccountId);
impl_as_ref_for_identifier!(client_order_id::ClientOrderId);
impl_as_ref_for_identifier!(execution_id::ExecutionId);
impl_as_ref_for_identifier!(order_id::OrderId);
impl_as_ref_for_identifier!(position_id::PositionId);
impl_as_ref_for_identifier!(strategy_id::StrategyId);
impl_as_ref_for_identifier!(symbol::Symbol);
impl_as_ref_for_identifier!(venue::Venue);
