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

use std::fmt;

use bitcann_script::{ContractKind, DecodedContract};
use borsh::{BorshDeserialize, BorshSerialize};
use log::*;
use serde::{Deserialize, Serialize};

use crate::covenants::{
    AccumulatorCovenant,
    AuctionCovenant,
    BidCovenant,
    ConflictResolverCovenant,
    CovenantContext,
    CovenantError,
    FactoryCovenant,
    NameCovenant,
    NameEnforcerCovenant,
    RegistryCovenant,
};

const LOG_TARGET: &str = "c::cov::contract";

/// A validator for one contract instance. Implementations are pure predicates over the covenant context.
pub trait Covenant {
    fn kind(&self) -> ContractKind;

    fn validate(&self, context: &CovenantContext<'_>) -> Result<(), CovenantError>;
}

/// The function an input invokes on the contract it spends, together with its arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum ContractCall {
    Registry,
    Auction {
        #[serde(with = "bitcann_common_types::serializers::hex")]
        name: Vec<u8>,
    },
    Bid,
    ConflictResolver,
    NameEnforcer {
        character_number: i64,
    },
    Accumulator,
    Factory,
    Name(NameCall),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum NameCall {
    UseAuth { auth_id: i64 },
    PenaliseInvalidName { character_number: i64 },
    ResolveOwnerConflict,
    Burn,
}

impl ContractCall {
    pub fn name(&self) -> &'static str {
        match self {
            ContractCall::Registry => "call",
            ContractCall::Auction { .. } => "newAuction",
            ContractCall::Bid => "outbid",
            ContractCall::ConflictResolver => "resolve",
            ContractCall::NameEnforcer { .. } => "penaliseInvalidName",
            ContractCall::Accumulator => "accumulate",
            ContractCall::Factory => "call",
            ContractCall::Name(NameCall::UseAuth { .. }) => "useAuth",
            ContractCall::Name(NameCall::PenaliseInvalidName { .. }) => "penaliseInvalidName",
            ContractCall::Name(NameCall::ResolveOwnerConflict) => "resolveOwnerConflict",
            ContractCall::Name(NameCall::Burn) => "burn",
        }
    }

    /// The contract kind that exposes this function
    pub fn contract_kind(&self) -> ContractKind {
        match self {
            ContractCall::Registry => ContractKind::Registry,
            ContractCall::Auction { .. } => ContractKind::Auction,
            ContractCall::Bid => ContractKind::Bid,
            ContractCall::ConflictResolver => ContractKind::ConflictResolver,
            ContractCall::NameEnforcer { .. } => ContractKind::NameEnforcer,
            ContractCall::Accumulator => ContractKind::Accumulator,
            ContractCall::Factory => ContractKind::Factory,
            ContractCall::Name(_) => ContractKind::Name,
        }
    }
}

impl fmt::Display for ContractCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.contract_kind(), self.name())
    }
}

/// Instantiates the covenant described by a decoded redeem bytecode and validates `call` against it
pub fn evaluate(
    contract: &DecodedContract,
    call: &ContractCall,
    context: &CovenantContext<'_>,
) -> Result<(), CovenantError> {
    if call.contract_kind() != contract.kind {
        return Err(CovenantError::WrongCall {
            contract: contract.kind,
            call: call.name(),
        });
    }
    let result = match call {
        ContractCall::Registry => RegistryCovenant::from_contract(contract)?.validate(context),
        ContractCall::Auction { name } => AuctionCovenant::from_contract(contract, name.clone())?.validate(context),
        ContractCall::Bid => BidCovenant::from_contract(contract)?.validate(context),
        ContractCall::ConflictResolver => ConflictResolverCovenant.validate(context),
        ContractCall::NameEnforcer { character_number } => {
            NameEnforcerCovenant::new(*character_number).validate(context)
        },
        ContractCall::Accumulator => AccumulatorCovenant.validate(context),
        ContractCall::Factory => FactoryCovenant::from_contract(contract)?.validate(context),
        ContractCall::Name(name_call) => NameCovenant::from_contract(contract, name_call.clone())?.validate(context),
    };
    if let Err(e) = &result {
        debug!(
            target: LOG_TARGET,
            "{} rejected at input {}: {}",
            call,
            context.input_index(),
            e
        );
    }
    result
}
