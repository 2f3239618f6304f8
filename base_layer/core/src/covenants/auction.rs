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

use bitcann_common_types::{
    amount::Satoshis,
    registration_id::RegistrationId,
    token::NftCapability,
};
use bitcann_script::{ContractKind, DecodedContract};
use log::*;

use crate::{
    consensus::pricing::auction_price,
    covenants::{
        commitment::{decode_registration_id, encode_registration_id, AuctionCommitment, MAX_NAME_LENGTH},
        error::Side,
        Covenant,
        CovenantContext,
        CovenantError,
    },
};

const LOG_TARGET: &str = "c::cov::auction";

/// Opens the auction for a name. The Counter NFT at input 2 issues the next registration id, which becomes the
/// token amount of a new mutable Auction NFT held by the Registry at output 3.
///
/// Inputs: `[registry capsule, auction contract, counter, funding]`
/// Outputs: `[registry capsule, auction contract, counter, auction NFT, change?]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionCovenant {
    min_starting_bid: Satoshis,
    decay_points: u64,
    floor: Satoshis,
    name: Vec<u8>,
}

impl AuctionCovenant {
    pub fn new(min_starting_bid: Satoshis, decay_points: u64, floor: Satoshis, name: Vec<u8>) -> Self {
        Self {
            min_starting_bid,
            decay_points,
            floor,
            name,
        }
    }

    pub fn from_contract(contract: &DecodedContract, name: Vec<u8>) -> Result<Self, CovenantError> {
        Ok(Self::new(
            Satoshis(non_negative(contract, 0)?),
            non_negative(contract, 1)?,
            Satoshis(non_negative(contract, 2)?),
            name,
        ))
    }
}

pub(crate) fn non_negative(contract: &DecodedContract, index: usize) -> Result<u64, CovenantError> {
    let value = contract.int_arg(index)?;
    u64::try_from(value).map_err(|_| {
        CovenantError::ConstructorArgument(bitcann_script::ScriptError::InvalidArgument {
            contract: contract.kind.label(),
            index,
            reason: format!("{} is negative", value),
        })
    })
}

impl Covenant for AuctionCovenant {
    fn kind(&self) -> ContractKind {
        ContractKind::Auction
    }

    fn validate(&self, context: &CovenantContext<'_>) -> Result<(), CovenantError> {
        context.require_contract_thread()?;
        context.require_input_count(4)?;
        context.require_output_count(4, 5)?;

        if self.name.is_empty() || self.name.len() > MAX_NAME_LENGTH {
            return Err(CovenantError::InvalidNameLength {
                max: MAX_NAME_LENGTH,
                actual: self.name.len(),
            });
        }

        // Counter
        let counter = context.registry_nft(Side::Input, 2, NftCapability::Minting)?;
        let id = decode_registration_id(counter.commitment)
            .map_err(CovenantError::invalid_nft(Side::Input, 2))?;
        let next_id = id
            .checked_next()
            .ok_or(CovenantError::RegistrationIdOverflow(id.as_u64()))?;
        let budget = counter.token.amount;
        let remaining_budget = budget
            .checked_sub(id.as_u64())
            .ok_or(CovenantError::MintBudgetExhausted { id: id.as_u64(), budget })?;
        context.registry_nft(Side::Output, 2, NftCapability::Minting)?;
        context.require_commitment(2, &encode_registration_id(next_id))?;
        context.require_token_amount(2, remaining_budget)?;
        context.require_value(2, counter.output.value)?;

        // The bidder is whoever funds the auction
        let bidder = context
            .source_output(3)?
            .locking_bytecode
            .as_p2pkh()
            .ok_or(CovenantError::WrongLockingBytecode {
                side: Side::Input,
                index: 3,
                expected: "a P2PKH address",
            })?;

        let auction = context.registry_nft(Side::Output, 3, NftCapability::Mutable)?;
        context.require_commitment(3, &AuctionCommitment::new(bidder, self.name.clone()).encode())?;
        context.require_token_amount(3, id.as_u64())?;
        let price = self.price(id);
        if auction.output.value < price {
            return Err(CovenantError::BidBelowAuctionPrice {
                bid: auction.output.value,
                price,
            });
        }

        if context.output_count() == 5 {
            context.require_no_token(Side::Output, 4)?;
        }

        trace!(
            target: LOG_TARGET,
            "Auction for {} opened with id {} at {}",
            String::from_utf8_lossy(&self.name),
            id,
            auction.output.value
        );
        Ok(())
    }
}

impl AuctionCovenant {
    fn price(&self, id: RegistrationId) -> Satoshis {
        auction_price(self.min_starting_bid, self.decay_points, self.floor, id)
    }
}
