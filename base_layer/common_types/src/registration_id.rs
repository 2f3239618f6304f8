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
    fmt::Formatter,
};

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const REGISTRATION_ID_LENGTH: usize = 8;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("A registration id commitment must be exactly 8 bytes, got {0}")]
pub struct RegistrationIdSizeError(pub usize);

/// The sequential id assigned to every name by the Counter NFT. On the wire it is always 8 bytes big-endian.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct RegistrationId(u64);

impl RegistrationId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }

    pub fn to_be_bytes(self) -> [u8; REGISTRATION_ID_LENGTH] {
        self.0.to_be_bytes()
    }

    /// Reads an id from the leading 8 bytes of a commitment
    pub fn from_prefix(bytes: &[u8]) -> Result<Self, RegistrationIdSizeError> {
        bytes
            .get(..REGISTRATION_ID_LENGTH)
            .ok_or(RegistrationIdSizeError(bytes.len()))
            .and_then(Self::try_from)
    }

    pub fn checked_next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl TryFrom<&[u8]> for RegistrationId {
    type Error = RegistrationIdSizeError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr = <[u8; REGISTRATION_ID_LENGTH]>::try_from(bytes).map_err(|_| RegistrationIdSizeError(bytes.len()))?;
        Ok(Self(u64::from_be_bytes(arr)))
    }
}

impl From<u64> for RegistrationId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<RegistrationId> for u64 {
    fn from(id: RegistrationId) -> Self {
        id.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_encodes_big_endian() {
        let id = RegistrationId::new(0x0102);
        assert_eq!(id.to_be_bytes(), [0, 0, 0, 0, 0, 0, 1, 2]);
        assert_eq!(RegistrationId::try_from(&id.to_be_bytes()[..]).unwrap(), id);
    }

    #[test]
    fn it_reads_the_prefix_of_a_longer_commitment() {
        let mut commitment = RegistrationId::new(77).to_be_bytes().to_vec();
        commitment.extend_from_slice(b"alice.bch");
        assert_eq!(RegistrationId::from_prefix(&commitment).unwrap(), RegistrationId::new(77));
        assert_eq!(RegistrationId::from_prefix(&[1, 2, 3]), Err(RegistrationIdSizeError(3)));
    }

    #[test]
    fn it_rejects_short_or_long_commitments() {
        assert!(RegistrationId::try_from(&[0u8; 7][..]).is_err());
        assert!(RegistrationId::try_from(&[0u8; 9][..]).is_err());
    }
}
