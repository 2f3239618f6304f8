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

use bitcann_common_types::{amount::Satoshis, token::NftCapability};
use bitcann_script::{ContractKind, ScriptError};
use thiserror::Error;

use crate::covenants::CommitmentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Input,
    Output,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Input => f.write_str("Input"),
            Side::Output => f.write_str("Output"),
        }
    }
}

/// A covenant rule that the transaction violates. The first failing rule aborts validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CovenantError {
    #[error("The contract must be spent at input {expected}, not input {actual}")]
    WrongActiveInput { expected: usize, actual: usize },
    #[error("Expected {expected} inputs but the transaction has {actual}")]
    InputCount { expected: usize, actual: usize },
    #[error("Expected between {min} and {max} outputs but the transaction has {actual}")]
    OutputCount { min: usize, max: usize, actual: usize },
    #[error("The transaction has no {side} at index {index}")]
    Missing { side: Side, index: usize },
    #[error("{side} {index} must be locked by {expected}")]
    WrongLockingBytecode {
        side: Side,
        index: usize,
        expected: &'static str,
    },
    #[error("{side} {index} must carry a token of the name category")]
    WrongCategory { side: Side, index: usize },
    #[error("{side} {index} has an unexpected NFT: {source}")]
    InvalidNft {
        side: Side,
        index: usize,
        source: CommitmentError,
    },
    #[error("{side} {index} must not carry a token")]
    UnexpectedToken { side: Side, index: usize },
    #[error("Output {index} does not preserve the {field} of input {input}")]
    NotPreserved {
        index: usize,
        input: usize,
        field: &'static str,
    },
    #[error("Output {index} has commitment {actual}, expected {expected}")]
    CommitmentMismatch {
        index: usize,
        expected: String,
        actual: String,
    },
    #[error("Output {index} has token amount {actual}, expected {expected}")]
    TokenAmountMismatch { index: usize, expected: u64, actual: u64 },
    #[error("Output {index} has value {actual}, expected {expected}")]
    ValueMismatch {
        index: usize,
        expected: Satoshis,
        actual: Satoshis,
    },
    #[error("Input 0 must hold an immutable thread capsule of the name category")]
    MissingThreadCapsule,
    #[error("Input 1 is not the contract named by the thread capsule")]
    CapsuleMismatch,
    #[error("Input {index} must carry a non-empty commitment")]
    EmptyCommitment { index: usize },
    #[error("Input {index} must carry a positive token amount")]
    ZeroTokenAmount { index: usize },
    #[error("Token amount arithmetic overflowed")]
    TokenAmountOverflow,
    #[error("The Counter budget of {budget} cannot cover registration id {id}")]
    MintBudgetExhausted { id: u64, budget: u64 },
    #[error("Registration id {0} cannot be incremented")]
    RegistrationIdOverflow(u64),
    #[error("Names must be between 1 and {max} bytes, got {actual}")]
    InvalidNameLength { max: usize, actual: usize },
    #[error("Bid of {bid} is below the auction price of {price}")]
    BidBelowAuctionPrice { bid: Satoshis, price: Satoshis },
    #[error("Bid of {bid} does not exceed the previous bid of {previous} by {percentage}%")]
    InsufficientBidIncrease {
        bid: Satoshis,
        previous: Satoshis,
        percentage: u64,
    },
    #[error("The auctions are for different names")]
    NameMismatch,
    #[error("Registration id {valid} is not lower than {invalid}")]
    RegistrationIdNotLower { valid: u64, invalid: u64 },
    #[error("Character number {position} is outside of the {length} byte name")]
    CharacterOutOfRange { position: i64, length: usize },
    #[error("Character {character:#04x} at position {position} is allowed in names")]
    ValidCharacter { position: usize, character: u8 },
    #[error("Input {index} has sequence number {actual}, expected {expected}")]
    SequenceMismatch { index: usize, expected: u32, actual: u32 },
    #[error("A platform fee output requires a winning bid above {threshold}")]
    PlatformFeeNotAllowed { threshold: Satoshis },
    #[error("Input {index} is not the {expected} NFT of this name")]
    NotNameAuth { index: usize, expected: &'static str },
    #[error("Input {index} is not the ownership NFT of this name")]
    OwnershipMismatch { index: usize },
    #[error("The {contract} contract has no function {call}")]
    WrongCall { contract: ContractKind, call: &'static str },
    #[error("Invalid constructor argument: {0}")]
    ConstructorArgument(#[from] ScriptError),
}

impl CovenantError {
    pub(crate) fn invalid_nft(side: Side, index: usize) -> impl FnOnce(CommitmentError) -> Self {
        move |source| CovenantError::InvalidNft { side, index, source }
    }
}
