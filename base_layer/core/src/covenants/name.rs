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
    registration_id::RegistrationId,
    token::{NftCapability, TokenCategory},
};
use bitcann_script::{ContractKind, DecodedContract};

use crate::{
    covenants::{
        charset::check_invalid_character,
        commitment::{decode_registration_id, OwnershipCommitment},
        error::Side,
        Covenant,
        CovenantContext,
        CovenantError,
        NameCall,
    },
    transactions::transaction_components::TransactionOutput,
};

/// The permanent contract of a registered name. It holds the external auth NFT (empty commitment) and the internal
/// auth NFT (registration id); the bearer of the matching ownership NFT controls the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCovenant {
    inactivity_expiry: u32,
    name: Vec<u8>,
    tld: Vec<u8>,
    category: TokenCategory,
    call: NameCall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    External,
    Internal,
}

impl NameCovenant {
    pub fn new(inactivity_expiry: u32, name: Vec<u8>, tld: Vec<u8>, category: TokenCategory, call: NameCall) -> Self {
        Self {
            inactivity_expiry,
            name,
            tld,
            category,
            call,
        }
    }

    pub fn from_contract(contract: &DecodedContract, call: NameCall) -> Result<Self, CovenantError> {
        let expiry = contract.int_arg(0)?;
        let inactivity_expiry = u32::try_from(expiry).map_err(|_| bitcann_script::ScriptError::InvalidArgument {
            contract: contract.kind.label(),
            index: 0,
            reason: format!("{} is not a sequence number", expiry),
        })?;
        Ok(Self::new(
            inactivity_expiry,
            contract.bytes_arg(1)?.to_vec(),
            contract.bytes_arg(2)?.to_vec(),
            TokenCategory::new(contract.hash_arg(3)?),
            call,
        ))
    }

    /// Checks that input `index` is an auth NFT of this instance and returns the registration id of an internal one
    fn require_auth(
        &self,
        context: &CovenantContext<'_>,
        index: usize,
        auth: Auth,
    ) -> Result<Option<RegistrationId>, CovenantError> {
        let expected = match auth {
            Auth::External => "external auth",
            Auth::Internal => "internal auth",
        };
        let not_auth = CovenantError::NotNameAuth { index, expected };
        let output = context.source_output(index)?;
        if &output.locking_bytecode != context.active_locking_bytecode()? {
            return Err(not_auth);
        }
        let token = match &output.token {
            Some(token) if token.category == self.category && token.capability() == Some(NftCapability::None) => token,
            _ => return Err(not_auth),
        };
        let commitment = token.commitment().unwrap_or_default();
        match auth {
            Auth::External if commitment.is_empty() => Ok(None),
            Auth::Internal if !commitment.is_empty() => decode_registration_id(commitment)
                .map(Some)
                .map_err(|_| not_auth),
            _ => Err(not_auth),
        }
    }

    fn is_ownership_nft(&self, output: &TransactionOutput, id: RegistrationId) -> bool {
        let expected = OwnershipCommitment::new(id, self.name.clone(), self.tld.clone()).encode();
        match &output.token {
            Some(token) => {
                token.category == self.category &&
                    token.capability() == Some(NftCapability::None) &&
                    token.commitment() == Some(expected.as_slice())
            },
            None => false,
        }
    }

    fn require_active_input_within(&self, context: &CovenantContext<'_>, last: usize) -> Result<(), CovenantError> {
        if context.input_index() > last {
            return Err(CovenantError::WrongActiveInput {
                expected: last,
                actual: context.input_index(),
            });
        }
        Ok(())
    }

    fn use_auth(&self, context: &CovenantContext<'_>, auth_id: i64) -> Result<(), CovenantError> {
        let index = context.input_index();
        if auth_id == 1 {
            let id = self
                .require_auth(context, index, Auth::Internal)?
                .ok_or(CovenantError::NotNameAuth {
                    index,
                    expected: "internal auth",
                })?;
            let ownership = context.source_output(index + 1)?;
            if !self.is_ownership_nft(ownership, id) {
                return Err(CovenantError::OwnershipMismatch { index: index + 1 });
            }
            if context.output(index + 1)?.token != ownership.token {
                return Err(CovenantError::NotPreserved {
                    index: index + 1,
                    input: index + 1,
                    field: "ownership token",
                });
            }
        } else {
            self.require_auth(context, index, Auth::External)?;
        }

        let source = context.source_output(index)?;
        let output = context.output(index)?;
        if output.locking_bytecode != source.locking_bytecode {
            return Err(CovenantError::NotPreserved {
                index,
                input: index,
                field: "locking bytecode",
            });
        }
        if output.token != source.token {
            return Err(CovenantError::NotPreserved {
                index,
                input: index,
                field: "auth token",
            });
        }
        Ok(())
    }

    fn penalise_invalid_name(&self, context: &CovenantContext<'_>, character_number: i64) -> Result<(), CovenantError> {
        context.require_input_count(3)?;
        context.require_output_count(1, 1)?;
        self.require_active_input_within(context, 1)?;
        self.require_auth(context, 0, Auth::External)?;
        self.require_auth(context, 1, Auth::Internal)?;
        check_invalid_character(&self.name, character_number)?;
        context.require_no_token(Side::Output, 0)
    }

    fn resolve_owner_conflict(&self, context: &CovenantContext<'_>) -> Result<(), CovenantError> {
        context.require_input_count(5)?;
        context.require_output_count(3, 3)?;
        self.require_active_input_within(context, 3)?;
        self.require_auth(context, 0, Auth::External)?;
        let valid = self.require_auth(context, 1, Auth::Internal)?.unwrap_or_default();
        self.require_auth(context, 2, Auth::External)?;
        let invalid = self.require_auth(context, 3, Auth::Internal)?.unwrap_or_default();
        if valid >= invalid {
            return Err(CovenantError::RegistrationIdNotLower {
                valid: valid.as_u64(),
                invalid: invalid.as_u64(),
            });
        }
        context.require_passthrough(0, 0)?;
        context.require_passthrough(1, 1)?;
        context.require_no_token(Side::Output, 2)
    }

    fn burn(&self, context: &CovenantContext<'_>) -> Result<(), CovenantError> {
        context.require_input_count(3)?;
        context.require_output_count(1, 1)?;
        self.require_active_input_within(context, 1)?;
        self.require_auth(context, 0, Auth::External)?;
        let id = self.require_auth(context, 1, Auth::Internal)?.unwrap_or_default();

        let third = context.source_output(2)?;
        if third.is_pure_currency() {
            // Anyone can burn a name whose internal auth has not moved for the inactivity period
            let sequence_number = context.sequence_number(1)?;
            if sequence_number != self.inactivity_expiry {
                return Err(CovenantError::SequenceMismatch {
                    index: 1,
                    expected: self.inactivity_expiry,
                    actual: sequence_number,
                });
            }
        } else if !self.is_ownership_nft(third, id) {
            return Err(CovenantError::OwnershipMismatch { index: 2 });
        }
        context.require_no_token(Side::Output, 0)
    }
}

impl Covenant for NameCovenant {
    fn kind(&self) -> ContractKind {
        ContractKind::Name
    }

    fn validate(&self, context: &CovenantContext<'_>) -> Result<(), CovenantError> {
        match &self.call {
            NameCall::UseAuth { auth_id } => self.use_auth(context, *auth_id),
            NameCall::PenaliseInvalidName { character_number } => self.penalise_invalid_name(context, *character_number),
            NameCall::ResolveOwnerConflict => self.resolve_owner_conflict(context),
            NameCall::Burn => self.burn(context),
        }
    }
}
