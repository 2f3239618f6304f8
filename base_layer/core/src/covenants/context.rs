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
    token::{NftCapability, TokenCategory, TokenData},
};
use bitcann_script::LockingBytecode;

use crate::{
    covenants::{commitment::expect_nft, error::Side, CovenantError},
    transactions::transaction_components::{Transaction, TransactionInput, TransactionOutput},
};

/// An NFT held by the Registry at a given input or output
#[derive(Debug, Clone, Copy)]
pub struct HeldNft<'a> {
    pub output: &'a TransactionOutput,
    pub token: &'a TokenData,
    pub commitment: &'a [u8],
}

/// Everything a covenant can introspect: the spending transaction, the outputs its inputs spend and the index of
/// the input whose locking bytecode is being evaluated.
#[derive(Debug, Clone, Copy)]
pub struct CovenantContext<'a> {
    transaction: &'a Transaction,
    source_outputs: &'a [TransactionOutput],
    input_index: usize,
}

impl<'a> CovenantContext<'a> {
    pub fn new(transaction: &'a Transaction, source_outputs: &'a [TransactionOutput], input_index: usize) -> Self {
        Self {
            transaction,
            source_outputs,
            input_index,
        }
    }

    pub fn transaction(&self) -> &'a Transaction {
        self.transaction
    }

    pub fn input_index(&self) -> usize {
        self.input_index
    }

    pub fn input_count(&self) -> usize {
        self.transaction.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.transaction.outputs.len()
    }

    pub fn input(&self, index: usize) -> Result<&'a TransactionInput, CovenantError> {
        self.transaction.inputs.get(index).ok_or(CovenantError::Missing {
            side: Side::Input,
            index,
        })
    }

    /// The output spent by input `index`
    pub fn source_output(&self, index: usize) -> Result<&'a TransactionOutput, CovenantError> {
        self.source_outputs.get(index).ok_or(CovenantError::Missing {
            side: Side::Input,
            index,
        })
    }

    pub fn output(&self, index: usize) -> Result<&'a TransactionOutput, CovenantError> {
        self.transaction.outputs.get(index).ok_or(CovenantError::Missing {
            side: Side::Output,
            index,
        })
    }

    fn side(&self, side: Side, index: usize) -> Result<&'a TransactionOutput, CovenantError> {
        match side {
            Side::Input => self.source_output(index),
            Side::Output => self.output(index),
        }
    }

    pub fn active_locking_bytecode(&self) -> Result<&'a LockingBytecode, CovenantError> {
        Ok(&self.source_output(self.input_index)?.locking_bytecode)
    }

    pub fn sequence_number(&self, index: usize) -> Result<u32, CovenantError> {
        Ok(self.input(index)?.sequence_number)
    }

    pub fn require_active_input(&self, expected: usize) -> Result<(), CovenantError> {
        if self.input_index != expected {
            return Err(CovenantError::WrongActiveInput {
                expected,
                actual: self.input_index,
            });
        }
        Ok(())
    }

    pub fn require_input_count(&self, expected: usize) -> Result<(), CovenantError> {
        if self.input_count() != expected {
            return Err(CovenantError::InputCount {
                expected,
                actual: self.input_count(),
            });
        }
        Ok(())
    }

    pub fn require_output_count(&self, min: usize, max: usize) -> Result<(), CovenantError> {
        let actual = self.output_count();
        if actual < min || actual > max {
            return Err(CovenantError::OutputCount { min, max, actual });
        }
        Ok(())
    }

    pub fn require_no_token(&self, side: Side, index: usize) -> Result<(), CovenantError> {
        if self.side(side, index)?.token.is_some() {
            return Err(CovenantError::UnexpectedToken { side, index });
        }
        Ok(())
    }

    /// The Registry is always spent at input 0
    pub fn registry_locking_bytecode(&self) -> Result<&'a LockingBytecode, CovenantError> {
        Ok(&self.source_output(0)?.locking_bytecode)
    }

    /// The name category, taken from the thread capsule at input 0
    pub fn registry_category(&self) -> Result<TokenCategory, CovenantError> {
        self.source_output(0)?
            .token_category()
            .ok_or(CovenantError::MissingThreadCapsule)
    }

    /// Checks that `side` `index` is locked by the Registry and holds an NFT of the name category with the given
    /// capability
    pub fn registry_nft(
        &self,
        side: Side,
        index: usize,
        capability: NftCapability,
    ) -> Result<HeldNft<'a>, CovenantError> {
        let output = self.side(side, index)?;
        if &output.locking_bytecode != self.registry_locking_bytecode()? {
            return Err(CovenantError::WrongLockingBytecode {
                side,
                index,
                expected: "the Registry",
            });
        }
        self.category_nft(side, index, capability)
    }

    /// Checks that `side` `index` holds an NFT of the name category with the given capability, wherever it is locked
    pub fn category_nft(
        &self,
        side: Side,
        index: usize,
        capability: NftCapability,
    ) -> Result<HeldNft<'a>, CovenantError> {
        let output = self.side(side, index)?;
        let category = self.registry_category()?;
        let token = match &output.token {
            Some(token) if token.category == category => token,
            _ => return Err(CovenantError::WrongCategory { side, index }),
        };
        let commitment = expect_nft(token, capability).map_err(CovenantError::invalid_nft(side, index))?;
        Ok(HeldNft {
            output,
            token,
            commitment,
        })
    }

    /// Every auxiliary contract is spent at input 1 and must recreate itself, without a token, at output 1
    pub fn require_contract_thread(&self) -> Result<(), CovenantError> {
        self.require_active_input(1)?;
        let own = self.active_locking_bytecode()?;
        if &self.output(1)?.locking_bytecode != own {
            return Err(CovenantError::NotPreserved {
                index: 1,
                input: 1,
                field: "locking bytecode",
            });
        }
        self.require_no_token(Side::Output, 1)
    }

    /// Checks that the token amount of output `index` equals `expected`
    pub fn require_token_amount(&self, index: usize, expected: u64) -> Result<(), CovenantError> {
        let actual = self.output(index)?.token_amount();
        if actual != expected {
            return Err(CovenantError::TokenAmountMismatch {
                index,
                expected,
                actual,
            });
        }
        Ok(())
    }

    pub fn require_value(&self, index: usize, expected: Satoshis) -> Result<(), CovenantError> {
        let actual = self.output(index)?.value;
        if actual != expected {
            return Err(CovenantError::ValueMismatch {
                index,
                expected,
                actual,
            });
        }
        Ok(())
    }

    pub fn require_commitment(&self, index: usize, expected: &[u8]) -> Result<(), CovenantError> {
        let actual = self.output(index)?.nft_commitment().unwrap_or_default();
        if actual != expected {
            return Err(CovenantError::CommitmentMismatch {
                index,
                expected: hex::encode(expected),
                actual: hex::encode(actual),
            });
        }
        Ok(())
    }

    /// Output `index` must be an exact copy of the output spent by input `input`
    pub fn require_passthrough(&self, index: usize, input: usize) -> Result<(), CovenantError> {
        let source = self.source_output(input)?;
        let output = self.output(index)?;
        let field = if output.locking_bytecode != source.locking_bytecode {
            "locking bytecode"
        } else if output.token_category() != source.token_category() {
            "token category"
        } else if output.nft_capability() != source.nft_capability() {
            "NFT capability"
        } else if output.nft_commitment() != source.nft_commitment() {
            "NFT commitment"
        } else if output.token_amount() != source.token_amount() {
            "token amount"
        } else if output.value != source.value {
            "value"
        } else {
            return Ok(());
        };
        Err(CovenantError::NotPreserved { index, input, field })
    }
}
