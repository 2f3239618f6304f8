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

//! Fixed-width encodings of the state the registry keeps in NFT commitments.
//!
//! | NFT             | capability | commitment                               | token amount      |
//! |-----------------|------------|------------------------------------------|-------------------|
//! | Thread capsule  | none       | 35-byte locking bytecode of one contract | accumulated ids   |
//! | Counter         | minting    | next registration id, 8 bytes BE         | mint budget       |
//! | Name minting    | minting    | empty                                    | unused            |
//! | Auction         | mutable    | 20-byte bidder pkh + name                | registration id   |
//! | External auth   | none       | empty                                    | 0                 |
//! | Internal auth   | none       | registration id, 8 bytes BE              | 0                 |
//! | Ownership       | none       | registration id + name + tld             | 0                 |

use bitcann_common_types::{
    registration_id::{RegistrationId, REGISTRATION_ID_LENGTH},
    token::{NftCapability, TokenCategory, TokenData, MAX_COMMITMENT_LENGTH},
    types::{PubKeyHash, PUB_KEY_HASH_LENGTH},
};
use bitcann_script::{LockingBytecode, P2SH32_LOCKING_BYTECODE_LENGTH};
use thiserror::Error;

pub const MAX_NAME_LENGTH: usize = 16;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommitmentError {
    #[error("The token carries no NFT")]
    NoNft,
    #[error("Expected a {expected} NFT but found a {actual} NFT")]
    UnexpectedCapability {
        expected: NftCapability,
        actual: NftCapability,
    },
    #[error("A {kind} commitment cannot be {length} bytes long")]
    InvalidLength { kind: &'static str, length: usize },
    #[error("The commitment is not a P2SH32 locking bytecode")]
    NotALockingBytecode,
    #[error("The ownership commitment does not end with the registry tld")]
    MissingTld,
    #[error("Commitment of {0} bytes does not match any registry NFT layout")]
    UnknownLayout(usize),
}

pub fn encode_registration_id(id: RegistrationId) -> Vec<u8> {
    id.to_be_bytes().to_vec()
}

pub fn decode_registration_id(bytes: &[u8]) -> Result<RegistrationId, CommitmentError> {
    RegistrationId::try_from(bytes).map_err(|_| CommitmentError::InvalidLength {
        kind: "registration id",
        length: bytes.len(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionCommitment {
    pub bidder: PubKeyHash,
    pub name: Vec<u8>,
}

impl AuctionCommitment {
    pub fn new(bidder: PubKeyHash, name: Vec<u8>) -> Self {
        Self { bidder, name }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(PUB_KEY_HASH_LENGTH + self.name.len());
        bytes.extend_from_slice(self.bidder.as_slice());
        bytes.extend_from_slice(&self.name);
        bytes
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CommitmentError> {
        let name_length = bytes.len().saturating_sub(PUB_KEY_HASH_LENGTH);
        if bytes.len() <= PUB_KEY_HASH_LENGTH || name_length > MAX_NAME_LENGTH {
            return Err(CommitmentError::InvalidLength {
                kind: "auction",
                length: bytes.len(),
            });
        }
        let (bidder, name) = bytes.split_at(PUB_KEY_HASH_LENGTH);
        Ok(Self {
            bidder: PubKeyHash::try_from(bidder).map_err(|_| CommitmentError::InvalidLength {
                kind: "auction",
                length: bytes.len(),
            })?,
            name: name.to_vec(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipCommitment {
    pub id: RegistrationId,
    pub name: Vec<u8>,
    pub tld: Vec<u8>,
}

impl OwnershipCommitment {
    pub fn new(id: RegistrationId, name: Vec<u8>, tld: Vec<u8>) -> Self {
        Self { id, name, tld }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = encode_registration_id(self.id);
        bytes.extend_from_slice(&self.name);
        bytes.extend_from_slice(&self.tld);
        bytes
    }

    /// The tld is not self-delimiting, so the deployment's tld has to be supplied
    pub fn decode(bytes: &[u8], tld: &[u8]) -> Result<Self, CommitmentError> {
        if bytes.len() <= REGISTRATION_ID_LENGTH + tld.len() || bytes.len() > MAX_COMMITMENT_LENGTH {
            return Err(CommitmentError::InvalidLength {
                kind: "ownership",
                length: bytes.len(),
            });
        }
        if !bytes.ends_with(tld) {
            return Err(CommitmentError::MissingTld);
        }
        let id = decode_registration_id(&bytes[..REGISTRATION_ID_LENGTH])?;
        let name = bytes[REGISTRATION_ID_LENGTH..bytes.len() - tld.len()].to_vec();
        Ok(Self {
            id,
            name,
            tld: tld.to_vec(),
        })
    }
}

/// Every NFT of the name category, classified by capability and commitment layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryNft {
    ThreadCapsule { contract: LockingBytecode },
    Counter { next_id: RegistrationId },
    NameMinting,
    Auction(AuctionCommitment),
    ExternalAuth,
    InternalAuth { id: RegistrationId },
    Ownership(OwnershipCommitment),
}

impl RegistryNft {
    pub fn from_token(token: &TokenData, tld: &[u8]) -> Result<Self, CommitmentError> {
        let nft = token.nft.as_ref().ok_or(CommitmentError::NoNft)?;
        let commitment = nft.commitment.as_slice();
        match nft.capability {
            NftCapability::Minting if commitment.is_empty() => Ok(RegistryNft::NameMinting),
            NftCapability::Minting => Ok(RegistryNft::Counter {
                next_id: decode_registration_id(commitment)?,
            }),
            NftCapability::Mutable => Ok(RegistryNft::Auction(AuctionCommitment::decode(commitment)?)),
            NftCapability::None => match commitment.len() {
                0 => Ok(RegistryNft::ExternalAuth),
                REGISTRATION_ID_LENGTH => Ok(RegistryNft::InternalAuth {
                    id: decode_registration_id(commitment)?,
                }),
                P2SH32_LOCKING_BYTECODE_LENGTH if LockingBytecode::new(commitment.to_vec()).is_p2sh32() => {
                    Ok(RegistryNft::ThreadCapsule {
                        contract: LockingBytecode::new(commitment.to_vec()),
                    })
                },
                len if len > REGISTRATION_ID_LENGTH => {
                    Ok(RegistryNft::Ownership(OwnershipCommitment::decode(commitment, tld)?))
                },
                len => Err(CommitmentError::UnknownLayout(len)),
            },
        }
    }

    pub fn capability(&self) -> NftCapability {
        match self {
            RegistryNft::Counter { .. } | RegistryNft::NameMinting => NftCapability::Minting,
            RegistryNft::Auction(_) => NftCapability::Mutable,
            _ => NftCapability::None,
        }
    }

    pub fn commitment(&self) -> Vec<u8> {
        match self {
            RegistryNft::ThreadCapsule { contract } => contract.to_vec(),
            RegistryNft::Counter { next_id } => encode_registration_id(*next_id),
            RegistryNft::NameMinting | RegistryNft::ExternalAuth => Vec::new(),
            RegistryNft::Auction(auction) => auction.encode(),
            RegistryNft::InternalAuth { id } => encode_registration_id(*id),
            RegistryNft::Ownership(ownership) => ownership.encode(),
        }
    }

    pub fn to_token(&self, category: TokenCategory, amount: u64) -> TokenData {
        TokenData::nft(category, self.capability(), self.commitment()).with_amount(amount)
    }
}

/// Checks that a token is an NFT of the expected capability and returns its commitment
pub fn expect_nft(token: &TokenData, expected: NftCapability) -> Result<&[u8], CommitmentError> {
    let nft = token.nft.as_ref().ok_or(CommitmentError::NoNft)?;
    if nft.capability != expected {
        return Err(CommitmentError::UnexpectedCapability {
            expected,
            actual: nft.capability,
        });
    }
    Ok(&nft.commitment)
}

#[cfg(test)]
mod test {
    use bitcann_common_types::types::Hash256;

    use super::*;

    const TLD: &[u8] = b".bch";

    fn category() -> TokenCategory {
        TokenCategory::new(Hash256::new([5u8; 32]))
    }

    #[test]
    fn every_layout_is_recognised() {
        let pkh = PubKeyHash::new([1u8; 20]);
        let nfts = vec![
            RegistryNft::ThreadCapsule {
                contract: LockingBytecode::p2sh32(&Hash256::new([2u8; 32])),
            },
            RegistryNft::Counter {
                next_id: RegistrationId::new(7),
            },
            RegistryNft::NameMinting,
            RegistryNft::Auction(AuctionCommitment::new(pkh, b"alice".to_vec())),
            RegistryNft::ExternalAuth,
            RegistryNft::InternalAuth {
                id: RegistrationId::new(7),
            },
            RegistryNft::Ownership(OwnershipCommitment::new(
                RegistrationId::new(7),
                b"alice".to_vec(),
                TLD.to_vec(),
            )),
        ];
        for nft in nfts {
            let token = nft.to_token(category(), 3);
            assert_eq!(token.amount, 3);
            assert_eq!(RegistryNft::from_token(&token, TLD).unwrap(), nft);
        }
    }

    #[test]
    fn auction_commitment_layout() {
        let pkh = PubKeyHash::new([0xaa; 20]);
        let bytes = AuctionCommitment::new(pkh, b"bob".to_vec()).encode();
        assert_eq!(bytes.len(), 23);
        assert_eq!(&bytes[..20], pkh.as_slice());
        assert_eq!(&bytes[20..], b"bob");
        assert!(AuctionCommitment::decode(&bytes[..20]).is_err());
        assert!(AuctionCommitment::decode(&[0u8; 37]).is_err());
        assert!(AuctionCommitment::decode(&[0u8; 36]).is_ok());
    }

    #[test]
    fn ownership_commitment_requires_the_tld() {
        let bytes = OwnershipCommitment::new(RegistrationId::new(1), b"carol".to_vec(), TLD.to_vec()).encode();
        assert_eq!(&bytes[..8], &[0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(OwnershipCommitment::decode(&bytes, b".sat"), Err(CommitmentError::MissingTld));
        let empty_name = [&[0u8; 8][..], TLD].concat();
        assert!(OwnershipCommitment::decode(&empty_name, TLD).is_err());
    }

    #[test]
    fn it_rejects_unknown_layouts() {
        let token = TokenData::nft(category(), NftCapability::None, vec![1, 2, 3]);
        assert_eq!(
            RegistryNft::from_token(&token, TLD),
            Err(CommitmentError::UnknownLayout(3))
        );
        let token = TokenData::nft(category(), NftCapability::Minting, vec![1, 2, 3]);
        assert!(RegistryNft::from_token(&token, TLD).is_err());
        let token = TokenData::fungible(category(), 10);
        assert_eq!(RegistryNft::from_token(&token, TLD), Err(CommitmentError::NoNft));
    }

    #[test]
    fn expect_nft_checks_the_capability() {
        let token = TokenData::nft(category(), NftCapability::Mutable, vec![9]);
        assert_eq!(expect_nft(&token, NftCapability::Mutable).unwrap(), &[9]);
        assert_eq!(
            expect_nft(&token, NftCapability::Minting),
            Err(CommitmentError::UnexpectedCapability {
                expected: NftCapability::Minting,
                actual: NftCapability::Mutable
            })
        );
    }
}
