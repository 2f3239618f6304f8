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

use crate::covenants::{
    charset::check_invalid_character,
    commitment::AuctionCommitment,
    error::Side,
    Covenant,
    CovenantContext,
    CovenantError,
};

/// Cancels an auction for a name containing a character outside `[a-zA-Z0-9-]`. The caller points at the
/// offending character and collects the bid.
///
/// Inputs: `[registry capsule, enforcer contract, auction NFT]`
/// Outputs: `[registry capsule, enforcer contract, reward]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameEnforcerCovenant {
    character_number: i64,
}

impl NameEnforcerCovenant {
    /// `character_number` is 1-based
    pub fn new(character_number: i64) -> Self {
        Self { character_number }
    }
}

impl Covenant for NameEnforcerCovenant {
    fn kind(&self) -> ContractKind {
        ContractKind::NameEnforcer
    }

    fn validate(&self, context: &CovenantContext<'_>) -> Result<(), CovenantError> {
        context.require_contract_thread()?;
        context.require_input_count(3)?;
        context.require_output_count(3, 3)?;

        let auction = context.registry_nft(Side::Input, 2, NftCapability::Mutable)?;
        let name = AuctionCommitment::decode(auction.commitment)
            .map_err(CovenantError::invalid_nft(Side::Input, 2))?
            .name;
        check_invalid_character(&name, self.character_number)?;

        let accumulated = context
            .source_output(0)?
            .token_amount()
            .checked_add(auction.token.amount)
            .ok_or(CovenantError::TokenAmountOverflow)?;
        context.require_token_amount(0, accumulated)?;

        context.require_no_token(Side::Output, 2)?;
        context.require_value(2, auction.output.value)
    }
}

#[cfg(test)]
mod test {
    use bitcann_common_types::{amount::Satoshis, types::PubKeyHash};

    use super::*;
    use crate::{chain_storage::Utxo, test_helpers::TestRegistry};

    fn setup(name: &[u8]) -> (TestRegistry, Utxo) {
        let registry = TestRegistry::new();
        registry
            .start_auction(name, &PubKeyHash::new([1; 20]), Satoshis(1_000_000))
            .unwrap();
        let auction = registry.view().live_auctions().unwrap().remove(0).utxo;
        (registry, auction)
    }

    fn check(registry: &TestRegistry, auction: &Utxo, character_number: i64) -> Result<(), CovenantError> {
        let tx = registry.build_name_enforcement(auction, character_number).unwrap();
        let sources = registry.source_outputs(&tx);
        NameEnforcerCovenant::new(character_number).validate(&CovenantContext::new(&tx, &sources, 1))
    }

    #[test]
    fn it_penalises_an_invalid_character() {
        let (registry, auction) = setup(b"bad_name");
        check(&registry, &auction, 4).unwrap();
        let tx = registry.build_name_enforcement(&auction, 4).unwrap();
        assert_eq!(tx.outputs[2].value, Satoshis(1_000_000));
        assert_eq!(tx.outputs[0].token_amount(), 1);
    }

    #[test]
    fn it_refuses_to_penalise_a_valid_character() {
        let (registry, auction) = setup(b"bad_name");
        assert!(matches!(
            check(&registry, &auction, 1),
            Err(CovenantError::ValidCharacter { position: 1, .. })
        ));
        let (registry, auction) = setup(b"Good-Name9");
        for position in 1..=10 {
            assert!(check(&registry, &auction, position).is_err());
        }
    }

    #[test]
    fn the_character_must_exist() {
        let (registry, auction) = setup(b"bad_name");
        assert!(matches!(
            check(&registry, &auction, 9),
            Err(CovenantError::CharacterOutOfRange { .. })
        ));
        assert!(matches!(
            check(&registry, &auction, 0),
            Err(CovenantError::CharacterOutOfRange { .. })
        ));
    }
}
