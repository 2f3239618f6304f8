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

use bitcann_common_types::token::NftCapability;
use bitcann_script::{ContractKind, DecodedContract, LockingBytecode};

use crate::{
    consensus::pricing::is_sufficient_bid,
    covenants::{
        auction::non_negative,
        commitment::AuctionCommitment,
        error::Side,
        Covenant,
        CovenantContext,
        CovenantError,
    },
};

/// Replaces the bidder of a live auction. The previous bidder is refunded in full at output 3.
///
/// Inputs: `[registry capsule, bid contract, auction NFT, funding]`
/// Outputs: `[registry capsule, bid contract, auction NFT, refund, change?]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidCovenant {
    min_bid_increase_percentage: u64,
}

impl BidCovenant {
    pub fn new(min_bid_increase_percentage: u64) -> Self {
        Self {
            min_bid_increase_percentage,
        }
    }

    pub fn from_contract(contract: &DecodedContract) -> Result<Self, CovenantError> {
        Ok(Self::new(non_negative(contract, 0)?))
    }
}

impl Covenant for BidCovenant {
    fn kind(&self) -> ContractKind {
        ContractKind::Bid
    }

    fn validate(&self, context: &CovenantContext<'_>) -> Result<(), CovenantError> {
        context.require_contract_thread()?;
        context.require_input_count(4)?;
        context.require_output_count(4, 5)?;

        let previous = context.registry_nft(Side::Input, 2, NftCapability::Mutable)?;
        let previous_auction =
            AuctionCommitment::decode(previous.commitment).map_err(CovenantError::invalid_nft(Side::Input, 2))?;

        let new_bidder = context
            .source_output(3)?
            .locking_bytecode
            .as_p2pkh()
            .ok_or(CovenantError::WrongLockingBytecode {
                side: Side::Input,
                index: 3,
                expected: "a P2PKH address",
            })?;

        let next = context.registry_nft(Side::Output, 2, NftCapability::Mutable)?;
        context.require_token_amount(2, previous.token.amount)?;
        context.require_commitment(
            2,
            &AuctionCommitment::new(new_bidder, previous_auction.name.clone()).encode(),
        )?;
        if !is_sufficient_bid(previous.output.value, next.output.value, self.min_bid_increase_percentage) {
            return Err(CovenantError::InsufficientBidIncrease {
                bid: next.output.value,
                previous: previous.output.value,
                percentage: self.min_bid_increase_percentage,
            });
        }

        // Refund
        let refund = context.output(3)?;
        if refund.locking_bytecode != LockingBytecode::p2pkh(&previous_auction.bidder) {
            return Err(CovenantError::WrongLockingBytecode {
                side: Side::Output,
                index: 3,
                expected: "the previous bidder",
            });
        }
        context.require_value(3, previous.output.value)?;
        context.require_no_token(Side::Output, 3)?;

        if context.output_count() == 5 {
            context.require_no_token(Side::Output, 4)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use bitcann_common_types::{amount::Satoshis, types::PubKeyHash};

    use super::*;
    use crate::{test_helpers::TestRegistry, transactions::transaction_components::Transaction};

    fn alice() -> PubKeyHash {
        PubKeyHash::new([0xa1; 20])
    }

    fn bob() -> PubKeyHash {
        PubKeyHash::new([0xb0; 20])
    }

    fn setup() -> TestRegistry {
        let registry = TestRegistry::new();
        registry.start_auction(b"name", &alice(), Satoshis(1_000_000)).unwrap();
        registry
    }

    fn check(registry: &TestRegistry, tx: &Transaction) -> Result<(), CovenantError> {
        let sources = registry.source_outputs(tx);
        BidCovenant::new(registry.params().min_bid_increase_percentage())
            .validate(&CovenantContext::new(tx, &sources, 1))
    }

    #[test]
    fn it_accepts_a_sufficient_bid() {
        let registry = setup();
        let tx = registry.build_bid(b"name", &bob(), Satoshis(1_050_000)).unwrap();
        check(&registry, &tx).unwrap();
        assert_eq!(tx.outputs[3].locking_bytecode, LockingBytecode::p2pkh(&alice()));
        assert_eq!(tx.outputs[3].value, Satoshis(1_000_000));
    }

    #[test]
    fn it_rejects_an_insufficient_increase() {
        let registry = setup();
        let tx = registry.build_bid(b"name", &bob(), Satoshis(1_049_999)).unwrap();
        assert!(matches!(
            check(&registry, &tx),
            Err(CovenantError::InsufficientBidIncrease { .. })
        ));
    }

    #[test]
    fn the_refund_must_be_exact() {
        let registry = setup();
        let mut tx = registry.build_bid(b"name", &bob(), Satoshis(1_050_000)).unwrap();
        tx.outputs[3].value = Satoshis(999_999);
        assert!(matches!(
            check(&registry, &tx),
            Err(CovenantError::ValueMismatch { index: 3, .. })
        ));
    }

    #[test]
    fn the_refund_goes_to_the_previous_bidder() {
        let registry = setup();
        let mut tx = registry.build_bid(b"name", &bob(), Satoshis(1_050_000)).unwrap();
        tx.outputs[3].locking_bytecode = LockingBytecode::p2pkh(&bob());
        assert!(matches!(
            check(&registry, &tx),
            Err(CovenantError::WrongLockingBytecode {
                side: Side::Output,
                index: 3,
                ..
            })
        ));
    }

    #[test]
    fn the_name_and_id_cannot_change() {
        let registry = setup();
        let mut tx = registry.build_bid(b"name", &bob(), Satoshis(1_050_000)).unwrap();
        if let Some(nft) = tx.outputs[2].token.as_mut().and_then(|t| t.nft.as_mut()) {
            nft.commitment = AuctionCommitment::new(bob(), b"other".to_vec()).encode();
        }
        assert!(matches!(
            check(&registry, &tx),
            Err(CovenantError::CommitmentMismatch { index: 2, .. })
        ));

        let mut tx = registry.build_bid(b"name", &bob(), Satoshis(1_050_000)).unwrap();
        if let Some(token) = tx.outputs[2].token.as_mut() {
            token.amount = 99;
        }
        assert!(matches!(
            check(&registry, &tx),
            Err(CovenantError::TokenAmountMismatch { index: 2, .. })
        ));
    }
}
