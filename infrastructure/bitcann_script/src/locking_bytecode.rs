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

use bitcann_common_types::types::{Hash256, PubKeyHash, PUB_KEY_HASH_LENGTH};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{
    encode_push,
    op_codes::{OP_CHECKSIG, OP_DUP, OP_EQUAL, OP_EQUALVERIFY, OP_HASH160, OP_HASH256, OP_PUSHBYTES_20, OP_PUSHBYTES_32, OP_RETURN},
    read_pushes,
};

pub const P2PKH_LOCKING_BYTECODE_LENGTH: usize = 25;
pub const P2SH32_LOCKING_BYTECODE_LENGTH: usize = 35;

/// The locking bytecode of an output. Only the three standard shapes used by the registry are classified; anything
/// else is carried around opaquely.
#[derive(
    Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct LockingBytecode(#[serde(with = "bitcann_common_types::serializers::hex")] Vec<u8>);

impl LockingBytecode {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// `OP_DUP OP_HASH160 <pkh> OP_EQUALVERIFY OP_CHECKSIG`
    pub fn p2pkh(pkh: &PubKeyHash) -> Self {
        let mut bytes = Vec::with_capacity(P2PKH_LOCKING_BYTECODE_LENGTH);
        bytes.extend_from_slice(&[OP_DUP, OP_HASH160, OP_PUSHBYTES_20]);
        bytes.extend_from_slice(pkh.as_slice());
        bytes.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        Self(bytes)
    }

    /// `OP_HASH256 <script hash> OP_EQUAL`
    pub fn p2sh32(script_hash: &Hash256) -> Self {
        let mut bytes = Vec::with_capacity(P2SH32_LOCKING_BYTECODE_LENGTH);
        bytes.extend_from_slice(&[OP_HASH256, OP_PUSHBYTES_32]);
        bytes.extend_from_slice(script_hash.as_slice());
        bytes.push(OP_EQUAL);
        Self(bytes)
    }

    /// A provably unspendable data carrier
    pub fn op_return<T: AsRef<[u8]>>(items: &[T]) -> Self {
        let mut bytes = vec![OP_RETURN];
        for item in items {
            bytes.extend(encode_push(item.as_ref()));
        }
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.clone()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_p2pkh(&self) -> Option<PubKeyHash> {
        let b = &self.0;
        if b.len() == P2PKH_LOCKING_BYTECODE_LENGTH &&
            b[..3] == [OP_DUP, OP_HASH160, OP_PUSHBYTES_20] &&
            b[23..] == [OP_EQUALVERIFY, OP_CHECKSIG]
        {
            PubKeyHash::try_from(&b[3..3 + PUB_KEY_HASH_LENGTH]).ok()
        } else {
            None
        }
    }

    pub fn as_p2sh32(&self) -> Option<Hash256> {
        let b = &self.0;
        if b.len() == P2SH32_LOCKING_BYTECODE_LENGTH && b[..2] == [OP_HASH256, OP_PUSHBYTES_32] && b[34] == OP_EQUAL {
            Hash256::try_from(&b[2..34]).ok()
        } else {
            None
        }
    }

    pub fn is_p2pkh(&self) -> bool {
        self.as_p2pkh().is_some()
    }

    pub fn is_p2sh32(&self) -> bool {
        self.as_p2sh32().is_some()
    }

    pub fn is_op_return(&self) -> bool {
        self.0.first() == Some(&OP_RETURN)
    }

    /// The data pushed after `OP_RETURN`, or `None` if this is not a well-formed data carrier
    pub fn op_return_pushes(&self) -> Option<Vec<Vec<u8>>> {
        if !self.is_op_return() {
            return None;
        }
        read_pushes(&self.0[1..]).ok()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<Vec<u8>> for LockingBytecode {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for LockingBytecode {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for LockingBytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for LockingBytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LockingBytecode({})", self.to_hex())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn p2pkh_layout() {
        let pkh = PubKeyHash::new([7u8; 20]);
        let lb = LockingBytecode::p2pkh(&pkh);
        assert_eq!(lb.len(), P2PKH_LOCKING_BYTECODE_LENGTH);
        assert_eq!(lb.to_hex(), format!("76a914{}88ac", "07".repeat(20)));
        assert_eq!(lb.as_p2pkh(), Some(pkh));
        assert!(lb.as_p2sh32().is_none());
        assert!(!lb.is_op_return());
    }

    #[test]
    fn p2sh32_layout() {
        let hash = Hash256::new([0xab; 32]);
        let lb = LockingBytecode::p2sh32(&hash);
        assert_eq!(lb.len(), P2SH32_LOCKING_BYTECODE_LENGTH);
        assert_eq!(lb.to_hex(), format!("aa20{}87", "ab".repeat(32)));
        assert_eq!(lb.as_p2sh32(), Some(hash));
        assert!(lb.as_p2pkh().is_none());
    }

    #[test]
    fn op_return_pushes() {
        let lb = LockingBytecode::op_return(&[b"RMV".to_vec(), vec![1u8; 32]]);
        assert!(lb.is_op_return());
        let pushes = lb.op_return_pushes().unwrap();
        assert_eq!(pushes, vec![b"RMV".to_vec(), vec![1u8; 32]]);

        let not_data = LockingBytecode::p2pkh(&PubKeyHash::zero());
        assert!(not_data.op_return_pushes().is_none());
        let malformed = LockingBytecode::new(vec![OP_RETURN, 0x05, 0x01]);
        assert!(malformed.op_return_pushes().is_none());
    }

    #[test]
    fn similar_but_wrong_shapes_are_not_classified() {
        let mut bytes = LockingBytecode::p2sh32(&Hash256::zero()).to_vec();
        bytes[34] = OP_EQUALVERIFY;
        assert!(LockingBytecode::new(bytes).as_p2sh32().is_none());
        let mut bytes = LockingBytecode::p2pkh(&PubKeyHash::zero()).to_vec();
        bytes.push(0x00);
        assert!(LockingBytecode::new(bytes).as_p2pkh().is_none());
    }
}
