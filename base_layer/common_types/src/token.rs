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

use std::{
    convert::TryFrom,
    fmt,
    str::FromStr,
};

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{FixedBytesSizeError, Hash256};

/// Largest NFT commitment the ledger accepts
pub const MAX_COMMITMENT_LENGTH: usize = 40;

/// Upper bound of a fungible token amount (a positive VM number)
pub const MAX_FUNGIBLE_AMOUNT: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Unknown NFT capability byte {0:#04x}")]
    UnknownCapability(u8),
    #[error("Invalid token category: {0}")]
    InvalidCategory(#[from] FixedBytesSizeError),
}

/// The 32 byte token identity. Every token of a registry deployment shares the same category.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
#[serde(transparent)]
pub struct TokenCategory(Hash256);

impl TokenCategory {
    pub const fn new(id: Hash256) -> Self {
        Self(id)
    }

    pub fn as_hash(&self) -> &Hash256 {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl From<Hash256> for TokenCategory {
    fn from(id: Hash256) -> Self {
        Self(id)
    }
}

impl TryFrom<&[u8]> for TokenCategory {
    type Error = TokenError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(Hash256::try_from(bytes)?))
    }
}

impl FromStr for TokenCategory {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Hash256::from_hex(s)?))
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Controls what a spending transaction may do with the data of a non-fungible token
#[repr(u8)]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
#[borsh(use_discriminant = true)]
pub enum NftCapability {
    /// Immutable. The token can only be passed on with an identical commitment.
    None = 0x00,
    /// The commitment may be replaced once per spend.
    Mutable = 0x01,
    /// Any number of new tokens of the category may be created.
    Minting = 0x02,
}

impl NftCapability {
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for NftCapability {
    type Error = TokenError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(NftCapability::None),
            0x01 => Ok(NftCapability::Mutable),
            0x02 => Ok(NftCapability::Minting),
            v => Err(TokenError::UnknownCapability(v)),
        }
    }
}

impl fmt::Display for NftCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NftCapability::None => f.write_str("none"),
            NftCapability::Mutable => f.write_str("mutable"),
            NftCapability::Minting => f.write_str("minting"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct NonFungibleToken {
    pub capability: NftCapability,
    pub commitment: Vec<u8>,
}

impl NonFungibleToken {
    pub fn new(capability: NftCapability, commitment: Vec<u8>) -> Self {
        Self { capability, commitment }
    }
}

/// Token data attached to a transaction output
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct TokenData {
    pub category: TokenCategory,
    pub amount: u64,
    pub nft: Option<NonFungibleToken>,
}

impl TokenData {
    pub fn fungible(category: TokenCategory, amount: u64) -> Self {
        Self {
            category,
            amount,
            nft: None,
        }
    }

    pub fn nft(category: TokenCategory, capability: NftCapability, commitment: Vec<u8>) -> Self {
        Self {
            category,
            amount: 0,
            nft: Some(NonFungibleToken::new(capability, commitment)),
        }
    }

    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }

    pub fn capability(&self) -> Option<NftCapability> {
        self.nft.as_ref().map(|nft| nft.capability)
    }

    pub fn commitment(&self) -> Option<&[u8]> {
        self.nft.as_ref().map(|nft| nft.commitment.as_slice())
    }

    pub fn is_nft(&self) -> bool {
        self.nft.is_some()
    }

    /// The category followed by the capability byte for mutable and minting tokens. This is the value token
    /// introspection exposes, so two tokens compare equal under it only if category and capability both match.
    pub fn category_with_capability(&self) -> Vec<u8> {
        let mut bytes = self.category.as_bytes().to_vec();
        match self.capability() {
            Some(NftCapability::Mutable) => bytes.push(NftCapability::Mutable.as_byte()),
            Some(NftCapability::Minting) => bytes.push(NftCapability::Minting.as_byte()),
            _ => {},
        }
        bytes
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn category() -> TokenCategory {
        TokenCategory::new(Hash256::new([7u8; 32]))
    }

    #[test]
    fn capability_bytes() {
        for cap in [NftCapability::None, NftCapability::Mutable, NftCapability::Minting] {
            assert_eq!(NftCapability::try_from(cap.as_byte()).unwrap(), cap);
        }
        assert_eq!(NftCapability::try_from(3), Err(TokenError::UnknownCapability(3)));
    }

    #[test]
    fn category_with_capability_appends_the_capability() {
        let immutable = TokenData::nft(category(), NftCapability::None, vec![]);
        assert_eq!(immutable.category_with_capability().len(), 32);

        let minting = TokenData::nft(category(), NftCapability::Minting, vec![1]);
        let bytes = minting.category_with_capability();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[32], 0x02);

        let fungible = TokenData::fungible(category(), 10);
        assert_eq!(fungible.category_with_capability(), category().as_bytes().to_vec());
    }

    #[test]
    fn category_from_hex() {
        let hex_str = "07".repeat(32);
        assert_eq!(TokenCategory::from_str(&hex_str).unwrap(), category());
        assert!(TokenCategory::from_str("0707").is_err());
    }
}
