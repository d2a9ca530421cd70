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

//! Defines established currency constants and an internal currency map.

use std::{
    collections::HashMap,
    sync::{LazyLock, Mutex},
};

use ustr::Ustr;

use crate::{enums::CurrencyType, types::Currency};

/// The global currency map, seeded with established fiat and crypto currencies.
pub static CURRENCY_MAP: LazyLock<Mutex<HashMap<String, Currency>>> = LazyLock::new(|| {
    Mutex::new(
        [
            // Fiat currencies
            Currency::AUD(),
            Currency::CAD(),
            Currency::CHF(),
            Currency::EUR(),
            Currency::GBP(),
            Currency::JPY(),
            Currency::USD(),
            // Crypto currencies
            Currency::BTC(),
            Currency::ETH(),
            Currency::USDC(),
            Currency::USDT(),
        ]
        .into_iter()
        .map(|c| (c.code.to_string(), c))
        .collect(),
    )
});

impl Currency {
    /// Returns the Australian dollar currency.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn AUD() -> Self {
        Self {
            code: Ustr::from("AUD"),
            precision: 2,
            iso4217: 36,
            name: Ustr::from("Australian dollar"),
            currency_type: CurrencyType::Fiat,
        }
    }

    /// Returns the Canadian dollar currency.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn CAD() -> Self {
        Self {
            code: Ustr::from("CAD"),
            precision: 2,
            iso4217: 124,
            name: Ustr::from("Canadian dollar"),
            currency_type: CurrencyType::Fiat,
        }
    }

    /// Returns the Swiss franc currency.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn CHF() -> Self {
        Self {
            code: Ustr::from("CHF"),
            precision: 2,
            iso4217: 756,
            name: Ustr::from("Swiss franc"),
            currency_type: CurrencyType::Fiat,
        }
    }

    /// Returns the euro currency.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn EUR() -> Self {
        Self {
            code: Ustr::from("EUR"),
            precision: 2,
            iso4217: 978,
            name: Ustr::from("Euro"),
            currency_type: CurrencyType::Fiat,
        }
    }

    /// Returns the pound sterling currency.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn GBP() -> Self {
        Self {
            code: Ustr::from("GBP"),
            precision: 2,
            iso4217: 826,
            name: Ustr::from("Pound sterling"),
            currency_type: CurrencyType::Fiat,
        }
    }

    /// Returns the Japanese yen currency.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn JPY() -> Self {
        Self {
            code: Ustr::from("JPY"),
            precision: 0,
            iso4217: 392,
            name: Ustr::from("Japanese yen"),
            currency_type: CurrencyType::Fiat,
        }
    }

    /// Returns the United States dollar currency.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn USD() -> Self {
        Self {
            code: Ustr::from("USD"),
            precision: 2,
            iso4217: 840,
            name: Ustr::from("United States dollar"),
            currency_type: CurrencyType::Fiat,
        }
    }

    /// Returns the Bitcoin cryptocurrency.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn BTC() -> Self {
        Self {
            code: Ustr::from("BTC"),
            precision: 8,
            iso4217: 0,
            name: Ustr::from("Bitcoin"),
            currency_type: CurrencyType::Crypto,
        }
    }

    /// Returns the Ether cryptocurrency.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn ETH() -> Self {
        Self {
            code: Ustr::from("ETH"),
            precision: 8,
            iso4217: 0,
            name: Ustr::from("Ether"),
            currency_type: CurrencyType::Crypto,
        }
    }

    /// Returns the USD Coin cryptocurrency.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn USDC() -> Self {
        Self {
            code: Ustr::from("USDC"),
            precision: 8,
            iso4217: 0,
            name: Ustr::from("USD Coin"),
            currency_type: CurrencyType::Crypto,
        }
    }

    /// Returns the Tether cryptocurrency.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn USDT() -> Self {
        Self {
            code: Ustr::from("USDT"),
            precision: 8,
            iso4217: 0,
            name: Ustr::from("Tether"),
            currency_type: CurrencyType::Crypto,
        }
    }
}
