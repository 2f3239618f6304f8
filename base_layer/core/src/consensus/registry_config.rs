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

use bitcann_common::{configuration::Network, ConfigurationError, SubConfigPath};
use bitcann_common_types::{amount::Satoshis, token::TokenCategory};
use bitcann_script::hash256;
use serde::{Deserialize, Serialize};

use crate::consensus::{DeploymentParams, DeploymentParamsBuilder};

const GENESIS_DOMAIN: &[u8] = b"bitcann.genesis.v1";

/// The `[registry]` section of the configuration file. Every field can be overridden with a `BITCANN_REGISTRY__`
/// prefixed environment variable.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(default)]
pub struct RegistryConfig {
    pub network: Network,
    /// Hex encoded category. Derived from the network and tld when absent.
    pub name_category: Option<TokenCategory>,
    pub tld: String,
    pub min_starting_bid: u64,
    pub auction_price_decay_points: u64,
    pub min_auction_price: u64,
    pub min_bid_increase_percentage: u64,
    pub min_wait_time: u32,
    pub inactivity_expiry_time: u32,
    pub platform_fee_threshold: u64,
    pub max_platform_fee_percentage: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        let network = Network::default();
        let params = DeploymentParams::for_network(network, TokenCategory::default());
        Self {
            network,
            name_category: None,
            tld: String::from_utf8_lossy(params.tld()).into_owned(),
            min_starting_bid: params.min_starting_bid().as_u64(),
            auction_price_decay_points: params.auction_price_decay_points(),
            min_auction_price: params.min_auction_price().as_u64(),
            min_bid_increase_percentage: params.min_bid_increase_percentage(),
            min_wait_time: params.min_wait_time(),
            inactivity_expiry_time: params.inactivity_expiry_time(),
            platform_fee_threshold: params.platform_fee_threshold().as_u64(),
            max_platform_fee_percentage: params.max_platform_fee_percentage(),
        }
    }
}

impl SubConfigPath for RegistryConfig {
    fn main_key_prefix() -> &'static str {
        "registry"
    }
}

/// Sequence numbers only encode 16 bits of block based relative lock
const MAX_RELATIVE_LOCK: u32 = 0xffff;

impl RegistryConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.tld.is_empty() || self.tld.len() > 16 {
            return Err(ConfigurationError::new(
                "registry.tld",
                Some(self.tld.clone()),
                "must be between 1 and 16 bytes",
            ));
        }
        if self.min_auction_price > self.min_starting_bid {
            return Err(ConfigurationError::new(
                "registry.min_auction_price",
                Some(self.min_auction_price.to_string()),
                "cannot exceed min_starting_bid",
            ));
        }
        if self.max_platform_fee_percentage > 100 {
            return Err(ConfigurationError::new(
                "registry.max_platform_fee_percentage",
                Some(self.max_platform_fee_percentage.to_string()),
                "must be a percentage",
            ));
        }
        for (field, value) in [
            ("registry.min_wait_time", self.min_wait_time),
            ("registry.inactivity_expiry_time", self.inactivity_expiry_time),
        ] {
            if value > MAX_RELATIVE_LOCK {
                return Err(ConfigurationError::new(
                    field,
                    Some(value.to_string()),
                    format!("relative locks are limited to {} blocks", MAX_RELATIVE_LOCK),
                ));
            }
        }
        Ok(())
    }

    /// The configured category, or one derived from the network and tld
    pub fn resolve_name_category(&self) -> TokenCategory {
        self.name_category.unwrap_or_else(|| {
            let mut preimage = GENESIS_DOMAIN.to_vec();
            preimage.push(self.network.as_byte());
            preimage.extend_from_slice(self.tld.as_bytes());
            TokenCategory::new(hash256(&preimage))
        })
    }

    pub fn to_deployment_params(&self) -> Result<DeploymentParams, ConfigurationError> {
        self.validate()?;
        Ok(DeploymentParamsBuilder::new(self.network, self.resolve_name_category())
            .with_tld(self.tld.as_bytes())
            .with_auction_pricing(
                Satoshis(self.min_starting_bid),
                self.auction_price_decay_points,
                Satoshis(self.min_auction_price),
            )
            .with_min_bid_increase_percentage(self.min_bid_increase_percentage)
            .with_min_wait_time(self.min_wait_time)
            .with_inactivity_expiry_time(self.inactivity_expiry_time)
            .with_platform_fee(Satoshis(self.platform_fee_threshold), self.max_platform_fee_percentage)
            .build())
    }
}
