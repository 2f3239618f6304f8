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

use bitcann_common_types::{
    amount::Satoshis,
    token::{NftCapability, TokenCategory, TokenData},
};
use bitcann_script::LockingBytecode;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct TransactionOutput {
    pub value: Satoshis,
    pub locking_bytecode: LockingBytecode,
    pub token: Option<TokenData>,
}

impl TransactionOutput {
    pub fn new(value: Satoshis, locking_bytecode: LockingBytecode) -> Self {
        Self {
            value,
            locking_bytecode,
            token: None,
        }
    }

    pub fn with_token(mut self, token: TokenData) -> Self {
        self.token = Some(token);
        self
    }

    /// An output that carries native currency only
    pub fn is_pure_currency(&self) -> bool {
        self.token.is_none()
    }

    pub fn token_category(&self) -> Option<TokenCategory> {
        self.token.as_ref().map(|t| t.category)
    }

    pub fn nft_capability(&self) -> Option<NftCapability> {
        self.token.as_ref().and_then(TokenData::capability)
    }

    pub fn nft_commitment(&self) -> Option<&[u8]> {
        self.token.as_ref().and_then(TokenData::commitment)
    }

    /// The fungible token amount, zero when the output carries no token
    pub fn token_amount(&self) -> u64 {
        self.token.as_ref().map(|t| t.amount).unwrap_or(0)
    }
}

impl fmt::Display for TransactionOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.value, self.locking_bytecode)?;
        if let Some(token) = &self.token {
            write!(f, " with {} tokens of {}", token.amount, token.category)?;
            if let Some(nft) = &token.nft {
                write!(f, " ({} NFT {})", nft.capability, hex::encode(&nft.commitment))?;
            }
        }
        Ok(())
    }
}
