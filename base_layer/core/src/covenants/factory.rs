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
    token::{NftCapability, TokenCategory},
};
use bitcann_script::{ConstructorArg, ContractKind, DecodedContract, LockingBytecode, PartialBytecode};
use log::*;

use crate::{
    consensus::pricing::platform_fee,
    covenants::{
        auction::non_negative,
        commitment::{encode_registration_id, AuctionCommitment, CommitmentError, OwnershipCommitment},
        error::Side,
        Covenant,
        CovenantContext,
        CovenantError,
    },
};

const LOG_TARGET: &str = "c::cov::factory";

/// Finalises an auction that has stood unchallenged for the minimum wait time. The name-minting NFT mints the
/// external and internal auth NFTs of a new Name instance, whose address is derived from the shared Name partial
/// bytecode, and the ownership NFT that goes to the winning bidder.
///
/// Inputs: `[registry capsule, factory contract, name minting NFT, auction NFT]`
/// Outputs: `[registry capsule, factory contract, name minting NFT, external auth, internal auth, ownership, fee?]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryCovenant {
    name_partial: PartialBytecode,
    tld: Vec<u8>,
    min_wait_time: u32,
    platform_fee_threshold: Satoshis,
    max_platform_fee_percentage: u64,
}

impl FactoryCovenant {
    pub fn new(
        name_partial: PartialBytecode,
        tld: Vec<u8>,
        min_wait_time: u32,
        platform_fee_threshold: Satoshis,
        max_platform_fee_percentage: u64,
    ) -> Self {
        Self {
            name_partial,
            tld,
            min_wait_time,
            platform_fee_threshold,
            max_platform_fee_percentage,
        }
    }

    pub fn from_contract(contract: &DecodedContract) -> Result<Self, CovenantError> {
        let name_partial = PartialBytecode::decode(ContractKind::Name, contract.bytes_arg(0)?)?;
        let min_wait_time = u32::try_from(non_negative(contract, 2)?).map_err(|_| {
            bitcann_script::ScriptError::InvalidArgument {
                contract: contract.kind.label(),
                index: 2,
                reason: "not a sequence number".to_string(),
            }
        })?;
        Ok(Self::new(
            name_partial,
            contract.bytes_arg(1)?.to_vec(),
            min_wait_time,
            Satoshis(non_negative(contract, 3)?),
            non_negative(contract, 4)?,
        ))
    }

    /// The address of the Name instance for `name`
    pub fn name_locking_bytecode(
        &self,
        name: &[u8],
        category: TokenCategory,
    ) -> Result<LockingBytecode, CovenantError> {
        let redeem = self.name_partial.bind(&[
            ConstructorArg::Bytes(name.to_vec()),
            ConstructorArg::Bytes(self.tld.clone()),
            ConstructorArg::Bytes(category.as_bytes().to_vec()),
        ])?;
        Ok(redeem.locking_bytecode())
    }
}

impl Covenant for FactoryCovenant {
    fn kind(&self) -> ContractKind {
        ContractKind::Factory
    }

    fn validate(&self, context: &CovenantContext<'_>) -> Result<(), CovenantError> {
        context.require_contract_thread()?;
        context.require_input_count(4)?;
        context.require_output_count(6, 7)?;
        context.require_value(1, context.source_output(1)?.value)?;

        let category = context.registry_category()?;

        let minting = context.registry_nft(Side::Input, 2, NftCapability::Minting)?;
        if !minting.commitment.is_empty() {
            return Err(CovenantError::InvalidNft {
                side: Side::Input,
                index: 2,
                source: CommitmentError::InvalidLength {
                    kind: "name minting",
                    length: minting.commitment.len(),
                },
            });
        }
        context.registry_nft(Side::Output, 2, NftCapability::Minting)?;
        context.require_commitment(2, &[])?;
        context.require_token_amount(2, minting.token.amount)?;

        let auction = context.registry_nft(Side::Input, 3, NftCapability::Mutable)?;
        let sequence_number = context.sequence_number(3)?;
        if sequence_number != self.min_wait_time {
            return Err(CovenantError::SequenceMismatch {
                index: 3,
                expected: self.min_wait_time,
                actual: sequence_number,
            });
        }
        let AuctionCommitment { bidder, name } =
            AuctionCommitment::decode(auction.commitment).map_err(CovenantError::invalid_nft(Side::Input, 3))?;
        let id = auction.token.amount;

        let accumulated = context
            .source_output(0)?
            .token_amount()
            .checked_add(id)
            .ok_or(CovenantError::TokenAmountOverflow)?;
        context.require_token_amount(0, accumulated)?;

        let name_locking = self.name_locking_bytecode(&name, category)?;
        let id_bytes = encode_registration_id(id.into());
        // external auth at 3, internal auth at 4
        for (index, commitment) in [(3, &[][..]), (4, &id_bytes[..])] {
            if context.output(index)?.locking_bytecode != name_locking {
                return Err(CovenantError::WrongLockingBytecode {
                    side: Side::Output,
                    index,
                    expected: "the Name instance",
                });
            }
            context.category_nft(Side::Output, index, NftCapability::None)?;
            context.require_commitment(index, commitment)?;
            context.require_token_amount(index, 0)?;
        }

        if context.output(5)?.locking_bytecode != LockingBytecode::p2pkh(&bidder) {
            return Err(CovenantError::WrongLockingBytecode {
                side: Side::Output,
                index: 5,
                expected: "the winning bidder",
            });
        }
        context.category_nft(Side::Output, 5, NftCapability::None)?;
        let ownership = OwnershipCommitment::new(id.into(), name.clone(), self.tld.clone());
        context.require_commitment(5, &ownership.encode())?;
        context.require_token_amount(5, 0)?;

        if context.output_count() == 7 {
            let bid = auction.output.value;
            let fee = platform_fee(bid, self.platform_fee_threshold, self.max_platform_fee_percentage).ok_or(
                CovenantError::PlatformFeeNotAllowed {
                    threshold: self.platform_fee_threshold,
                },
            )?;
            context.require_no_token(Side::Output, 6)?;
            context.require_value(6, fee)?;
        }

        debug!(
            target: LOG_TARGET,
            "Name {} finalised with id {} at {}",
            String::from_utf8_lossy(&name),
            id,
            name_locking
        );
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use bitcann_common::configuration::Network;
    use bitcann_common_types::types::PubKeyHash;

    use super::*;
    use crate::{
        consensus::DeploymentParamsBuilder,
        test_helpers::TestRegistry,
        transactions::transaction_components::Transaction,
    };

    fn winner() -> PubKeyHash {
        PubKeyHash::new([0x77; 20])
    }

    fn finalization(registry: &TestRegistry, fee: Option<Satoshis>) -> Transaction {
        let auction = registry.view().live_auctions().unwrap().remove(0).utxo;
        registry.build_finalization(&auction, fee).unwrap()
    }

    fn check(registry: &TestRegistry, tx: &Transaction) -> Result<(), CovenantError> {
        let sources = registry.source_outputs(tx);
        let factory = registry.deployment().factory_covenant().unwrap();
        factory.validate(&CovenantContext::new(tx, &sources, 1))
    }

    fn setup(bid: Satoshis) -> TestRegistry {
        let registry = TestRegistry::new();
        registry.start_auction(b"winner", &winner(), bid).unwrap();
        registry
    }

    #[test]
    fn it_mints_the_name_instance() {
        let registry = setup(Satoshis(1_000_000));
        let tx = finalization(&registry, None);
        check(&registry, &tx).unwrap();

        let name_locking = registry.deployment().name_locking_bytecode(b"winner").unwrap();
        assert_eq!(tx.outputs[3].locking_bytecode, name_locking);
        assert_eq!(tx.outputs[4].locking_bytecode, name_locking);
        assert_eq!(tx.outputs[4].nft_commitment().unwrap(), &[0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(tx.outputs[5].locking_bytecode, LockingBytecode::p2pkh(&winner()));
        assert_eq!(tx.outputs[5].nft_commitment().unwrap(), b"\0\0\0\0\0\0\0\x01winner.bch");
    }

    #[test]
    fn the_auction_must_have_waited() {
        let registry = setup(Satoshis(1_000_000));
        let mut tx = finalization(&registry, None);
        tx.inputs[3].sequence_number = registry.params().min_wait_time() - 1;
        assert!(matches!(
            check(&registry, &tx),
            Err(CovenantError::SequenceMismatch { index: 3, .. })
        ));
    }

    #[test]
    fn ownership_goes_to_the_winner() {
        let registry = setup(Satoshis(1_000_000));
        let mut tx = finalization(&registry, None);
        tx.outputs[5].locking_bytecode = LockingBytecode::p2pkh(&PubKeyHash::new([1; 20]));
        assert!(matches!(
            check(&registry, &tx),
            Err(CovenantError::WrongLockingBytecode { index: 5, .. })
        ));
    }

    #[test]
    fn auth_nfts_must_be_locked_at_the_derived_instance() {
        let registry = setup(Satoshis(1_000_000));
        let mut tx = finalization(&registry, None);
        tx.outputs[4].locking_bytecode = registry.deployment().name_locking_bytecode(b"loser").unwrap();
        assert!(matches!(
            check(&registry, &tx),
            Err(CovenantError::WrongLockingBytecode { index: 4, .. })
        ));
    }

    #[test]
    fn platform_fee_only_above_threshold() {
        let registry = setup(Satoshis(1_000_000));
        let tx = finalization(&registry, Some(Satoshis(500_000)));
        assert!(matches!(
            check(&registry, &tx),
            Err(CovenantError::PlatformFeeNotAllowed { .. })
        ));
    }

    #[test]
    fn platform_fee_must_match_the_percentage() {
        let params = DeploymentParamsBuilder::new(Network::RegTest, TokenCategory::default())
            .with_platform_fee(Satoshis(100_000), 50)
            .build();
        let registry = TestRegistry::with_params(params);
        registry.start_auction(b"winner", &winner(), Satoshis(1_000_000)).unwrap();

        let tx = finalization(&registry, Some(Satoshis(500_000)));
        check(&registry, &tx).unwrap();
        let tx = finalization(&registry, Some(Satoshis(499_999)));
        assert!(matches!(
            check(&registry, &tx),
            Err(CovenantError::ValueMismatch { index: 6, .. })
        ));
    }
}
