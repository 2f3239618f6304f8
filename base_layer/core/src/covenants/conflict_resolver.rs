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
use bitcann_script::ContractKind;

use crate::covenants::{commitment::AuctionCommitment, error::Side, Covenant, CovenantContext, CovenantError};

/// Two auctions for the same name can be opened concurrently. Anyone may cancel the one with the higher
/// registration id and collect its bid; its token amount is parked on the thread capsule until the Accumulator
/// returns it to the Counter.
///
/// Inputs: `[registry capsule, resolver contract, valid auction, invalid auction]`
/// Outputs: `[registry capsule, resolver contract, valid auction, reward]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConflictResolverCovenant;

impl Covenant for ConflictResolverCovenant {
    fn kind(&self) -> ContractKind {
        ContractKind::ConflictResolver
    }

    fn validate(&self, context: &CovenantContext<'_>) -> Result<(), CovenantError> {
        context.require_contract_thread()?;
        context.require_input_count(4)?;
        context.require_output_count(4, 4)?;

        let valid = context.registry_nft(Side::Input, 2, NftCapability::Mutable)?;
        let invalid = context.registry_nft(Side::Input, 3, NftCapability::Mutable)?;
        let valid_name = AuctionCommitment::decode(valid.commitment)
            .map_err(CovenantError::invalid_nft(Side::Input, 2))?
            .name;
        let invalid_name = AuctionCommitment::decode(invalid.commitment)
            .map_err(CovenantError::invalid_nft(Side::Input, 3))?
            .name;
        if valid_name != invalid_name {
            return Err(CovenantError::NameMismatch);
        }
        if valid.token.amount >= invalid.token.amount {
            return Err(CovenantError::RegistrationIdNotLower {
                valid: valid.token.amount,
                invalid: invalid.token.amount,
            });
        }

        let accumulated = context
            .source_output(0)?
            .token_amount()
            .checked_add(invalid.token.amount)
            .ok_or(CovenantError::TokenAmountOverflow)?;
        context.require_token_amount(0, accumulated)?;

        context.require_passthrough(2, 2)?;

        context.require_no_token(Side::Output, 3)?;
        context.require_value(3, invalid.output.value)
    }
}

#[cfg(test)]
mod test {
    use bitcann_common_types::{amount::Satoshis, types::PubKeyHash};

    use super::*;
    use crate::{test_helpers::TestRegistry, transactions::transaction_components::Transaction};

    fn setup(second_name: &[u8]) -> (TestRegistry, Transaction) {
        let registry = TestRegistry::new();
        registry
            .start_auction(b"dup", &PubKeyHash::new([1; 20]), Satoshis(1_000_000))
            .unwrap();
        registry
            .start_auction(second_name, &PubKeyHash::new([2; 20]), Satoshis(1_200_000))
            .unwrap();
        let auctions = registry.view().live_auctions().unwrap();
        let tx = registry.build_conflict_resolution(&auctions[0].utxo, &auctions[1].utxo).unwrap();
        (registry, tx)
    }

    fn check(registry: &TestRegistry, tx: &Transaction) -> Result<(), CovenantError> {
        let sources = registry.source_outputs(tx);
        ConflictResolverCovenant.validate(&CovenantContext::new(tx, &sources, 1))
    }

    #[test]
    fn it_cancels_the_later_auction() {
        let (registry, tx) = setup(b"dup");
        check(&registry, &tx).unwrap();
        assert_eq!(tx.outputs[3].value, Satoshis(1_200_000));
        // the second auction received id 2
        assert_eq!(tx.outputs[0].token_amount(), 2);
    }

    #[test]
    fn the_later_auction_cannot_win() {
        let registry = TestRegistry::new();
        registry
            .start_auction(b"dup", &PubKeyHash::new([1; 20]), Satoshis(1_000_000))
            .unwrap();
        registry
            .start_auction(b"dup", &PubKeyHash::new([2; 20]), Satoshis(1_200_000))
            .unwrap();
        let auctions = registry.view().live_auctions().unwrap();
        let tx = registry.build_conflict_resolution(&auctions[1].utxo, &auctions[0].utxo).unwrap();
        assert_eq!(
            check(&registry, &tx),
            Err(CovenantError::RegistrationIdNotLower { valid: 2, invalid: 1 })
        );
    }

    #[test]
    fn names_must_match() {
        let (registry, tx) = setup(b"other");
        assert_eq!(check(&registry, &tx), Err(CovenantError::NameMismatch));
    }

    #[test]
    fn the_valid_auction_passes_through() {
        let (registry, mut tx) = setup(b"dup");
        tx.outputs[2].value = tx.outputs[2].value - Satoshis(1);
        assert!(matches!(
            check(&registry, &tx),
            Err(CovenantError::NotPreserved {
                index: 2,
                field: "value",
                ..
            })
        ));
    }

    #[test]
    fn the_capsule_accumulates_the_invalid_id() {
        let (registry, mut tx) = setup(b"dup");
        if let Some(token) = tx.outputs[0].token.as_mut() {
            token.amount = 0;
        }
        assert!(matches!(
            check(&registry, &tx),
            Err(CovenantError::TokenAmountMismatch { index: 0, .. })
        ));
    }
}
