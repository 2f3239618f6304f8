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

//! Auction and platform fee pricing.
//!
//! All arithmetic is integer arithmetic in satoshis, widened to `u128` so that no intermediate product can overflow.

use bitcann_common_types::{amount::Satoshis, registration_id::RegistrationId};

use crate::consensus::DeploymentParams;

/// Price decay is expressed in units of 1/100000 of the starting bid
pub const DECAY_DENOMINATOR: u64 = 100_000;

/// The minimum opening bid for the name that will receive registration id `id`. The price decays linearly with every
/// issued id and is clamped to the configured floor.
pub fn auction_price(min_starting_bid: Satoshis, decay_points: u64, floor: Satoshis, id: RegistrationId) -> Satoshis {
    let decay = u128::from(id.as_u64())
        .saturating_mul(u128::from(decay_points))
        .min(u128::from(DECAY_DENOMINATOR));
    let price = u128::from(min_starting_bid.as_u64()) * (u128::from(DECAY_DENOMINATOR) - decay) /
        u128::from(DECAY_DENOMINATOR);
    // price <= min_starting_bid, so it always fits
    Satoshis(price as u64).max(floor)
}

pub fn auction_price_for(params: &DeploymentParams, id: RegistrationId) -> Satoshis {
    auction_price(
        params.min_starting_bid(),
        params.auction_price_decay_points(),
        params.min_auction_price(),
        id,
    )
}

/// The smallest bid that outbids `current`, i.e. the smallest `v` with `v * 100 >= current * (100 + pct)`
pub fn minimum_next_bid(current: Satoshis, min_increase_percentage: u64) -> Satoshis {
    let required = u128::from(current.as_u64()) * (100 + u128::from(min_increase_percentage));
    let bid = (required + 99) / 100;
    Satoshis(u64::try_from(bid).unwrap_or(u64::MAX))
}

/// Whether `bid` is high enough to replace `current`
pub fn is_sufficient_bid(current: Satoshis, bid: Satoshis, min_increase_percentage: u64) -> bool {
    u128::from(bid.as_u64()) * 100 >= u128::from(current.as_u64()) * (100 + u128::from(min_increase_percentage))
}

/// The platform fee the Factory allows for a winning bid, or `None` if the bid does not exceed the threshold
pub fn platform_fee(bid: Satoshis, threshold: Satoshis, max_percentage: u64) -> Option<Satoshis> {
    if bid <= threshold {
        return None;
    }
    let fee = u128::from(bid.as_u64()) * u128::from(max_percentage) / 100;
    u64::try_from(fee).ok().map(Satoshis)
}

pub fn platform_fee_for(params: &DeploymentParams, bid: Satoshis) -> Option<Satoshis> {
    platform_fee(
        bid,
        params.platform_fee_threshold(),
        params.max_platform_fee_percentage(),
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn auction_price_decays_to_the_floor() {
        let start = Satoshis(1_000_000);
        let floor = Satoshis(20_000);
        assert_eq!(auction_price(start, 15, floor, RegistrationId::new(0)), start);
        assert_eq!(auction_price(start, 15, floor, RegistrationId::new(1)), Satoshis(999_850));
        assert_eq!(auction_price(start, 15, floor, RegistrationId::new(1000)), Satoshis(850_000));
        assert_eq!(auction_price(start, 15, floor, RegistrationId::new(6_534)), Satoshis(20_000));
        assert_eq!(auction_price(start, 15, floor, RegistrationId::new(u64::MAX)), floor);
    }

    #[test]
    fn next_bid_rounds_up() {
        assert_eq!(minimum_next_bid(Satoshis(100_000), 5), Satoshis(105_000));
        assert_eq!(minimum_next_bid(Satoshis(101), 5), Satoshis(107));
        assert!(is_sufficient_bid(Satoshis(101), Satoshis(107), 5));
        assert!(!is_sufficient_bid(Satoshis(101), Satoshis(106), 5));
        assert!(is_sufficient_bid(Satoshis(0), Satoshis(0), 5));
    }

    #[test]
    fn platform_fee_requires_a_bid_above_threshold() {
        let threshold = Satoshis(10_000_000);
        assert_eq!(platform_fee(Satoshis(10_000_000), threshold, 50), None);
        assert_eq!(platform_fee(Satoshis(10_000_001), threshold, 50), Some(Satoshis(5_000_000)));
        assert_eq!(platform_fee(Satoshis(30_000_000), threshold, 0), Some(Satoshis(0)));
    }
}
