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

use bitcann_common_types::{amount::Satoshis, token::TokenCategory};
use bitcann_script::ScriptError;
use thiserror::Error;

use crate::{
    chain_storage::ChainStorageError,
    covenants::CovenantError,
    transactions::transaction_components::{OutPoint, TransactionError},
};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Input {index} spends {outpoint}, which is not in the UTXO set")]
    UnknownInput { index: usize, outpoint: OutPoint },
    #[error("Expected the outputs spent by {expected} inputs but got {actual}")]
    SpentOutputCountMismatch { expected: usize, actual: usize },
    #[error("The transaction is invalid: {0}")]
    TransactionError(#[from] TransactionError),
    #[error("Input {index} uses a time based relative lock, only block based locks are supported")]
    TimeBasedLock { index: usize },
    #[error("Input {index} is not yet spendable: it requires {required} confirmations but has {age}")]
    MaturityError { index: usize, required: u32, age: u64 },
    #[error("Outputs are worth {outputs} but the inputs only provide {inputs}")]
    ValueImbalance { inputs: Satoshis, outputs: Satoshis },
    #[error("The sum of input values overflows")]
    InputValueOverflow,
    #[error("Output {index} has a {length} byte commitment, the maximum is {max}")]
    CommitmentTooLong { index: usize, length: usize, max: usize },
    #[error("Output {index} carries a token with neither an NFT nor a fungible amount")]
    EmptyToken { index: usize },
    #[error("Output {index} carries {amount} fungible tokens, more than the maximum supply")]
    FungibleAmountTooLarge { index: usize, amount: u64 },
    #[error("Outputs hold {outputs} fungible tokens of category {category} but the inputs only hold {inputs}")]
    FungibleInflation {
        category: TokenCategory,
        inputs: u128,
        outputs: u128,
    },
    #[error("Output {index} creates an NFT of category {category} that no input is allowed to produce")]
    UnauthorizedNft { index: usize, category: TokenCategory },
    #[error("Input {index} cannot be spent: {reason}")]
    UnspendableInput { index: usize, reason: &'static str },
    #[error("Input {index} declares signer {declared} but the output is locked to another key")]
    SignerMismatch { index: usize, declared: String },
    #[error("The signature of input {index} was rejected")]
    InvalidSignature { index: usize },
    #[error("The redeem bytecode of input {index} does not hash to the spent P2SH32 output")]
    RedeemHashMismatch { index: usize },
    #[error("Input {index} reveals an invalid redeem bytecode: {source}")]
    InvalidRedeemBytecode { index: usize, source: ScriptError },
    #[error("Covenant rejected input {index}: {source}")]
    CovenantRejected { index: usize, source: CovenantError },
    #[error("Fatal storage error during validation: {0}")]
    FatalStorageError(String),
}

// ChainStorageError has a ValidationError variant, so to prevent a cyclic dependency we use a string representation
// for storage errors that cause validation failures.
impl From<ChainStorageError> for ValidationError {
    fn from(err: ChainStorageError) -> Self {
        Self::FatalStorageError(err.to_string())
    }
}

impl ValidationError {
    /// The covenant rule that rejected the transaction, if that is why it was rejected
    pub fn covenant_error(&self) -> Option<&CovenantError> {
        match self {
            ValidationError::CovenantRejected { source, .. } => Some(source),
            _ => None,
        }
    }
}
