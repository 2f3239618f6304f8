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

use bitcann_common_types::token::{NftCapability, TokenCategory};
use bitcann_script::{ContractKind, DecodedContract};

use crate::covenants::{error::Side, Covenant, CovenantContext, CovenantError};

/// The hub of a deployment. It never acts on its own: every spend has to route a thread capsule through input and
/// output 0, and the capsule names the one auxiliary contract that must sit at input 1 to enforce the rest of the
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryCovenant {
    name_category: TokenCategory,
}

impl RegistryCovenant {
    pub fn new(name_category: TokenCategory) -> Self {
        Self { name_category }
    }

    pub fn from_contract(contract: &DecodedContract) -> Result<Self, CovenantError> {
        Ok(Self::new(TokenCategory::new(contract.hash_arg(0)?)))
    }

    fn validate_capsule_spend(&self, context: &CovenantContext<'_>) -> Result<(), CovenantError> {
        let input = context.source_output(0)?;
        let capsule = match &input.token {
            Some(token) if token.category == self.name_category && token.capability() == Some(NftCapability::None) => {
                token.commitment().unwrap_or_default()
            },
            _ => return Err(CovenantError::MissingThreadCapsule),
        };

        if context.source_output(1)?.locking_bytecode.as_bytes() != capsule {
            return Err(CovenantError::CapsuleMismatch);
        }

        let output = context.output(0)?;
        let field = if output.locking_bytecode != input.locking_bytecode {
            "locking bytecode"
        } else if output.token_category() != input.token_category() {
            "token category"
        } else if output.nft_capability() != input.nft_capability() {
            "NFT capability"
        } else if output.nft_commitment() != input.nft_commitment() {
            "NFT commitment"
        } else if output.value != input.value {
            "value"
        } else {
            return Ok(());
        };
        Err(CovenantError::NotPreserved {
            index: 0,
            input: 0,
            field,
        })
    }
}

impl Covenant for RegistryCovenant {
    fn kind(&self) -> ContractKind {
        ContractKind::Registry
    }

    fn validate(&self, context: &CovenantContext<'_>) -> Result<(), CovenantError> {
        if context.input_index() == 0 {
            return self.validate_capsule_spend(context);
        }
        // Any other Registry-held input defers to the capsule rules evaluated at input 0
        if context.registry_locking_bytecode()? != context.active_locking_bytecode()? {
            return Err(CovenantError::WrongLockingBytecode {
                side: Side::Input,
                index: 0,
                expected: "the Registry",
            });
        }
        Ok(())
    }
}
