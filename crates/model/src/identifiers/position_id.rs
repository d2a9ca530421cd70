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

//! Represents a valid position ID.

use marlin_core::correctness::{check_valid_string, FAILED};
use ustr::Ustr;

/// The sentinel value for an unassigned position ID.
const NULL_SENTINEL: &str = "NULL";

/// Represents a valid position ID.
///
/// The position ID may be assigned at the trading venue, or can be system
/// generated depending on a strategies OMS (Order Management System) settings.
#[repr(C)]
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PositionId(Ustr);

impl PositionId {
    /// Creates a new [`PositionId`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not a valid string.
    pub fn new_checked<T: AsRef<str>>(value: T) -> anyhow::Result<Self> {
        let value = value.as_ref();
        check_valid_string(value, stringify!(value))?;
        Ok(Self(Ustr::from(value)))
    }

    /// Creates a new [`PositionId`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a valid string.
    pub fn new<T: AsRef<str>>(value: T) -> Self {
        Self::new_checked(value).expect(FAILED)
    }

    /// Returns the `NULL` sentinel position ID.
    #[must_use]
    pub fn null() -> Self {
        Self(Ustr::from(NULL_SENTINEL))
    }

    /// Returns `true` if this is the `NULL` sentinel position ID.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == NULL_SENTINEL
    }

    /// Returns `true` if this is not the `NULL` sentinel position ID.
    #[must_use]
    pub fn not_null(&self) -> bool {
        !self.is_null()
    }

    /// Returns the inner identifier value.
    #[must_use]
    pub fn inner(&self) -> Ustr {
        self.0
    }

    /// Returns the inner identifier value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::PositionId;

    #[rstest]
    fn test_string_reprs() {
        let position_id = PositionId::new("P-123456");
        assert_eq!(position_id.as_str(), "P-123456");
        assert_eq!(format!("{position_id}"), "P-123456");
    }

    #[rstest]
    fn test_null_sentinel() {
        let position_id = PositionId::null();
        assert!(position_id.is_null());
        assert!(!position_id.not_null());
        assert_eq!(position_id.as_str(), "NULL");
    }

    #[rstest]
    fn test_not_null() {
        let position_id = PositionId::new("P-001");
        assert!(position_id.not_null());
        assert!(!position_id.is_null());
    }
}
