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

use bitcann_common::configuration::Network;
use bitcann_common_types::{
    amount::Satoshis,
    token::{TokenCategory, MAX_FUNGIBLE_AMOUNT},
};

/// The values every contract of one registry deployment is instantiated with. Two deployments with different
/// parameters have different contract addresses and never interact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentParams {
    network: Network,
    /// The token category shared by every NFT of the deployment
    name_category: TokenCategory,
    /// Top level domain appended to the ownership NFT commitment
    tld: Vec<u8>,
    /// Auction price of registration id 0
    min_starting_bid: Satoshis,
    /// Price decay per registration id, in 1/100000 of the starting bid
    auction_price_decay_points: u64,
    /// The auction price never drops below this
    min_auction_price: Satoshis,
    min_bid_increase_percentage: u64,
    /// Blocks a bid must stand before the name can be finalised
    min_wait_time: u32,
    /// Blocks of inactivity after which anyone can burn a name
    inactivity_expiry_time: u32,
    platform_fee_threshold: Satoshis,
    max_platform_fee_percentage: u64,
    /// Initial fungible amount of the Counter NFT
    mint_budget: u64,
}

impl DeploymentParams {
    pub fn network(&self) -> Network {
        self.network
    }

    pub fn name_category(&self) -> TokenCategory {
        self.name_category
    }

    pub fn tld(&self) -> &[u8] {
        &self.tld
    }

    pub fn min_starting_bid(&self) -> Satoshis {
        self.min_starting_bid
    }

    pub fn auction_price_decay_points(&self) -> u64 {
        self.auction_price_decay_points
    }

    pub fn min_auction_price(&self) -> Satoshis {
        self.min_auction_price
    }

    pub fn min_bid_increase_percentage(&self) -> u64 {
        self.min_bid_increase_percentage
    }

    pub fn min_wait_time(&self) -> u32 {
        self.min_wait_time
    }

    pub fn inactivity_expiry_time(&self) -> u32 {
        self.inactivity_expiry_time
    }

    pub fn platform_fee_threshold(&self) -> Satoshis {
        self.platform_fee_threshold
    }

    pub fn max_platform_fee_percentage(&self) -> u64 {
        self.max_platform_fee_percentage
    }

    pub fn mint_budget(&self) -> u64 {
        self.mint_budget
    }

    /// The production values for a network. Regtest uses short timelocks so that tests can mine past them quickly.
    pub fn for_network(network: Network, name_category: TokenCategory) -> Self {
        let (min_wait_time, inactivity_expiry_time) = match network {
            Network::RegTest => (2, 10),
            _ => (144, 105_120),
        };
        Self {
            network,
            name_category,
            tld: b".bch".to_vec(),
            min_starting_bid: Satoshis(1_000_000),
            auction_price_decay_points: 15,
            min_auction_price: Satoshis(20_000),
            min_bid_increase_percentage: 5,
            min_wait_time,
            inactivity_expiry_time,
            platform_fee_threshold: Satoshis(10_000_000),
            max_platform_fee_percentage: 50,
            mint_budget: MAX_FUNGIBLE_AMOUNT,
        }
    }
}

/// Class to create custom deployment parameters
pub struct DeploymentParamsBuilder {
    params: DeploymentParams,
}

impl DeploymentParamsBuilder {
    pub fn new(network: Network, name_category: TokenCategory) -> Self {
        Self {
            params: DeploymentParams::for_network(network, name_category),
        }
    }

    pub fn with_tld<T: Into<Vec<u8>>>(mut self, tld: T) -> Self {
        self.params.tld = tld.into();
        self
    }

    pub fn with_auction_pricing(mut self, min_starting_bid: Satoshis, decay_points: u64, floor: Satoshis) -> Self {
        self.params.min_starting_bid = min_starting_bid;
        self.params.auction_price_decay_points = decay_points;
        self.params.min_auction_price = floor;
        self
    }

    pub fn with_min_bid_increase_percentage(mut self, percentage: u64) -> Self {
        self.params.min_bid_increase_percentage = percentage;
        self
    }

    pub fn with_min_wait_time(mut self, blocks: u32) -> Self {
        self.params.min_wait_time = blocks;
        self
    }

    pub fn with_inactivity_expiry_time(mut self, blocks: u32) -> Self {
        self.params.inactivity_expiry_time = blocks;
        self
    }

    pub fn with_platform_fee(mut self, threshold: Satoshis, max_percentage: u64) -> Self {
        self.params.platform_fee_threshold = threshold;
        self.params.max_platform_fee_percentage = max_percentage;
        self
    }

    pub fn with_mint_budget(mut self, budget: u64) -> Self {
        self.params.mint_budget = budget;
        self
    }

    pub fn build(self) -> DeploymentParams {
        self.params
    }
}

#[cfg(test)]
mod test {
    use bitcann_common_types::types::Hash256;

    use super::*;

    #[test]
    fn builder_overrides_network_defaults() {
        let category = TokenCategory::new(Hash256::new([1u8; 32]));
        let params = DeploymentParamsBuilder::new(Network::MainNet, category)
            .with_tld(".sat")
            .with_min_wait_time(6)
            .with_platform_fee(Satoshis(5), 10)
            .build();
        assert_eq!(params.tld(), b".sat");
        assert_eq!(params.min_wait_time(), 6);
        assert_eq!(params.platform_fee_threshold(), Satoshis(5));
        assert_eq!(params.max_platform_fee_percentage(), 10);
        assert_eq!(params.inactivity_expiry_time(), 105_120);
        assert_eq!(params.name_category(), category);
    }

    #[test]
    fn regtest_uses_short_timelocks() {
        let params = DeploymentParams::for_network(Network::RegTest, TokenCategory::default());
        assert!(params.min_wait_time() < 144);
        assert!(params.inactivity_expiry_time() < 105_120);
    }
}
