// Copyright 2024. The Tari Project
//
// Redistribution and use in source and binary forms, with or without modification, are permitted provided that the
// following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this list of conditions and the following
// disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice, this list of conditions and the
// following disclaimer in the documentation and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors may be used to endorse or promote
// products derived from this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES,
// INCLUDING, BUT NOT LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
// SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY,
// WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE
// USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use std::{
    fmt::{Display, Error, Formatter},
    iter::Sum,
    ops::Mul,
    str::FromStr,
};

use borsh::{BorshDeserialize, BorshSerialize};
use newtype_ops::newtype_ops;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// All native currency calculations should use this newtype to prevent unit conversion errors.
///
/// ```edition2018
/// use bitcann_common_types::amount::Satoshis;
///
/// let a = Satoshis::from(500);
/// let b = Satoshis::from(50);
/// assert_eq!(a + b, Satoshis::from(550));
/// ```
#[derive(
    Copy, Default, Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct Satoshis(pub u64);

#[derive(Debug, Clone, ThisError, PartialEq, Eq)]
pub enum SatoshisError {
    #[error("Failed to parse value: {0}")]
    ParseError(String),
}

/// A convenience constant that makes it easier to define amounts.
/// ```edition2018
///   use bitcann_common_types::amount::{Satoshis, sat, BCH};
///   assert_eq!(Satoshis::from(42), 42 * sat);
///   assert_eq!(1 * BCH, 100_000_000.into());
/// ```
#[allow(non_upper_case_globals)]
pub const sat: Satoshis = Satoshis(1);
pub const BCH: Satoshis = Satoshis(100_000_000);

// You can only add or subtract satoshis from satoshis
newtype_ops! { [Satoshis] {add sub} {:=} Self Self }
newtype_ops! { [Satoshis] {add sub} {:=} &Self &Self }
newtype_ops! { [Satoshis] {add sub} {:=} Self &Self }

// Multiplication and division only makes sense when an amount is multiplied/divided by a scalar
newtype_ops! { [Satoshis] {mul div rem} {:=} Self u64 }

impl Mul<Satoshis> for u64 {
    type Output = Satoshis;

    fn mul(self, rhs: Satoshis) -> Self::Output {
        Satoshis(self * rhs.0)
    }
}

impl Satoshis {
    pub fn as_u64(self) -> u64 {
        self.0
    }

    pub fn checked_add(self, v: Satoshis) -> Option<Satoshis> {
        self.0.checked_add(v.0).map(Satoshis)
    }

    pub fn checked_sub(self, v: Satoshis) -> Option<Satoshis> {
        self.0.checked_sub(v.0).map(Satoshis)
    }

    pub fn saturating_sub(self, v: Satoshis) -> Satoshis {
        Satoshis(self.0.saturating_sub(v.0))
    }
}

impl Display for Satoshis {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{} sat", self.0)
    }
}

impl From<u64> for Satoshis {
    fn from(v: u64) -> Self {
        Satoshis(v)
    }
}

impl From<Satoshis> for u64 {
    fn from(v: Satoshis) -> Self {
        v.0
    }
}

impl FromStr for Satoshis {
    type Err = SatoshisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let processed = s.replace([',', ' ', '_'], "").to_ascii_lowercase();
        let processed = processed.trim_end_matches("sats").trim_end_matches("sat");
        processed
            .parse::<u64>()
            .map(Satoshis)
            .map_err(|e| SatoshisError::ParseError(e.to_string()))
    }
}

impl Sum<Satoshis> for Satoshis {
    fn sum<I: Iterator<Item = Satoshis>>(iter: I) -> Self {
        iter.fold(Satoshis(0), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Satoshis> for Satoshis {
    fn sum<I: Iterator<Item = &'a Satoshis>>(iter: I) -> Self {
        iter.fold(Satoshis(0), |acc, x| acc + *x)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn add_and_sub() {
        let a = Satoshis::from(500);
        let b = Satoshis::from(50);
        assert_eq!(a + b, Satoshis::from(550));
        assert_eq!(a - b, Satoshis::from(450));
        assert_eq!(b.checked_sub(a), None);
        assert_eq!(b.saturating_sub(a), Satoshis::from(0));
    }

    #[test]
    fn scalar_ops() {
        assert_eq!(Satoshis::from(105) * 2, Satoshis::from(210));
        assert_eq!(Satoshis::from(105) / 2, Satoshis::from(52));
        assert_eq!(3 * sat, Satoshis(3));
    }

    #[test]
    fn from_string() {
        assert_eq!(Satoshis::from_str("1,000,000 sat").unwrap(), Satoshis(1_000_000));
        assert_eq!(Satoshis::from_str("20_000").unwrap(), Satoshis(20_000));
        assert!(Satoshis::from_str("one bch").is_err());
    }

    #[test]
    fn sums() {
        let values = vec![Satoshis(1), Satoshis(2), Satoshis(3)];
        assert_eq!(values.iter().sum::<Satoshis>(), Satoshis(6));
    }
}
