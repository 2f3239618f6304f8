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

use crate::covenants::{error::Side, Covenant, CovenantContext, CovenantError};

/// Returns token amount parked on an authorised thread NFT to the Counter's mint budget.
///
/// Inputs: `[registry capsule, accumulator contract, counter, authorised thread, funding]`
/// Outputs: `[registry capsule, accumulator contract, counter, authorised thread, change]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccumulatorCovenant;

impl Covenant for AccumulatorCovenant {
    fn kind(&self) -> ContractKind {
        ContractKind::Accumulator
    }

    fn validate(&self, context: &CovenantContext<'_>) -> Result<(), CovenantError> {
        context.require_contract_thread()?;
        context.require_input_count(5)?;
        context.require_output_count(5, 5)?;

        let counter = context.registry_nft(Side::Input, 2, NftCapability::Minting)?;
        if counter.commitment.is_empty() {
            return Err(CovenantError::EmptyCommitment { index: 2 });
        }
        if counter.token.amount == 0 {
            return Err(CovenantError::ZeroTokenAmount { index: 2 });
        }

        // The thread must be authorised for this very contract
        let thread = context.registry_nft(Side::Input, 3, NftCapability::None)?;
        if thread.commitment != context.active_locking_bytecode()?.as_bytes() {
            return Err(CovenantError::WrongLockingBytecode {
                side: Side::Input,
                index: 3,
                expected: "a thread capsule naming the Accumulator",
            });
        }

        let accumulated = counter
            .token
            .amount
            .checked_add(thread.token.amount)
            .ok_or(CovenantError::TokenAmountOverflow)?;
        context.registry_nft(Side::Output, 2, NftCapability::Minting)?;
        context.require_commitment(2, counter.commitment)?;
        context.require_token_amount(2, accumulated)?;

        context.registry_nft(Side::Output, 3, NftCapability::None)?;
        context.require_commitment(3, thread.commitment)?;
        context.require_token_amount(3, 0)?;

        context.require_no_token(Side::Input, 4)?;
        context.require_no_token(Side::Output, 4)
    }
}

#[cfg(test)]
mod test {
    use bitcann_common_types::token::TokenData;

    use super::*;
    use crate::{test_helpers::TestRegistry, transactions::transaction_components::Transaction};

    fn setup() -> (TestRegistry, Transaction) {
        let registry = TestRegistry::new();
        let thread = registry.seed_thread_capsule(ContractKind::Accumulator, 40);
        let tx = registry.build_accumulation(&thread).unwrap();
        (registry, tx)
    }

    fn check(registry: &TestRegistry, tx: &Transaction) -> Result<(), CovenantError> {
        let sources = registry.source_outputs(tx);
        AccumulatorCovenant.validate(&CovenantContext::new(tx, &sources, 1))
    }

    #[test]
    fn it_moves_the_thread_amount_into_the_counter() {
        let (registry, tx) = setup();
        check(&registry, &tx).unwrap();
        let sources = registry.source_outputs(&tx);
        assert_eq!(tx.outputs[2].token_amount(), sources[2].token_amount() + 40);
        assert_eq!(tx.outputs[3].token_amount(), 0);
    }

    #[test]
    fn other_threads_are_not_accepted() {
        let registry = TestRegistry::new();
        let thread = registry.seed_thread_capsule(ContractKind::ConflictResolver, 40);
        let tx = registry.build_accumulation(&thread).unwrap();
        assert!(matches!(
            check(&registry, &tx),
            Err(CovenantError::WrongLockingBytecode { index: 3, .. })
        ));
    }

    #[test]
    fn the_thread_must_be_emptied() {
        let (registry, mut tx) = setup();
        if let Some(token) = tx.outputs[3].token.as_mut() {
            token.amount = 1;
        }
        assert!(matches!(
            check(&registry, &tx),
            Err(CovenantError::TokenAmountMismatch { index: 3, .. })
        ));
    }

    #[test]
    fn funding_must_be_pure_currency() {
        let (registry, mut tx) = setup();
        let category = registry.params().name_category();
        tx.outputs[4].token = Some(TokenData::fungible(category, 1));
        assert!(matches!(
            check(&registry, &tx),
            Err(CovenantError::UnexpectedToken {
                side: Side::Output,
                index: 4
            })
        ));
    }
}
