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

use bitcann_common_types::{amount::Satoshis, types::Hash256};
use bitcann_script::{sha256, LockingBytecode};
use serde::{Deserialize, Serialize};

use crate::{
    covenants::{ContractCall, NameCall},
    transactions::transaction_components::{Transaction, TransactionOutput},
};

/// Prefix of a record that withdraws an earlier record, followed by the sha256 of the withdrawn payload
pub const INVALIDATION_MARKER: &[u8] = b"RMV";

/// A record published by a name owner in an OP_RETURN output of a `useAuth` transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameRecord {
    Data(#[serde(with = "bitcann_common_types::serializers::hex")] Vec<u8>),
    Invalidation(Hash256),
}

impl NameRecord {
    /// Interprets the concatenated data pushes of one OP_RETURN output
    pub fn from_payload(payload: Vec<u8>) -> Self {
        if payload.len() == INVALIDATION_MARKER.len() + 32 && payload.starts_with(INVALIDATION_MARKER) {
            if let Ok(hash) = Hash256::try_from(&payload[INVALIDATION_MARKER.len()..]) {
                return NameRecord::Invalidation(hash);
            }
        }
        NameRecord::Data(payload)
    }

    pub fn to_payload(&self) -> Vec<u8> {
        match self {
            NameRecord::Data(data) => data.clone(),
            NameRecord::Invalidation(hash) => {
                let mut payload = INVALIDATION_MARKER.to_vec();
                payload.extend_from_slice(hash.as_slice());
                payload
            },
        }
    }

    /// The hash an invalidation record uses to refer to this record
    pub fn content_hash(&self) -> Hash256 {
        sha256(&self.to_payload())
    }

    pub fn to_output(&self) -> TransactionOutput {
        TransactionOutput::new(Satoshis(0), LockingBytecode::op_return(&[self.to_payload()]))
    }
}

impl fmt::Display for NameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameRecord::Data(data) => match std::str::from_utf8(data) {
                Ok(text) => write!(f, "{}", text),
                Err(_) => write!(f, "0x{}", hex::encode(data)),
            },
            NameRecord::Invalidation(hash) => write!(f, "RMV {}", hash.to_hex()),
        }
    }
}

/// Records published by `transaction`. Only the owner publishes records: the transaction must exercise `useAuth`
/// with the internal auth NFT of the Name instance locked at `name_locking`, which requires the ownership NFT.
pub fn extract_records(
    transaction: &Transaction,
    source_outputs: &[TransactionOutput],
    name_locking: &LockingBytecode,
) -> Vec<NameRecord> {
    let uses_auth = transaction
        .inputs
        .iter()
        .zip(source_outputs)
        .any(|(input, source)| {
            &source.locking_bytecode == name_locking &&
                matches!(
                    input.unlocking.contract_call(),
                    Some(ContractCall::Name(NameCall::UseAuth { auth_id: 1 }))
                )
        });
    if !uses_auth {
        return Vec::new();
    }
    transaction
        .outputs
        .iter()
        .filter_map(|output| output.locking_bytecode.op_return_pushes())
        .map(|pushes| NameRecord::from_payload(pushes.concat()))
        .collect()
}

/// Replays records in publication order and returns the data records still live at the end. An invalidation only
/// withdraws records published before it.
pub fn resolve_records<I: IntoIterator<Item = NameRecord>>(records: I) -> Vec<Vec<u8>> {
    records.into_iter().fold(Vec::new(), |mut live, record| {
        match record {
            NameRecord::Data(data) => live.push(data),
            NameRecord::Invalidation(hash) => live.retain(|data: &Vec<u8>| sha256(data) != hash),
        }
        live
    })
}

#[cfg(test)]
mod test {
    use bitcann_common_types::types::PubKeyHash;

    use super::*;
    use crate::test_helpers::TestRegistry;

    #[test]
    fn it_recognises_invalidations() {
        let data = NameRecord::Data(b"txt=hello".to_vec());
        let removal = NameRecord::Invalidation(data.content_hash());
        assert_eq!(NameRecord::from_payload(removal.to_payload()), removal);
        assert_eq!(removal.to_payload().len(), 35);
        // too short to carry a hash
        assert_eq!(
            NameRecord::from_payload(b"RMVabc".to_vec()),
            NameRecord::Data(b"RMVabc".to_vec())
        );
    }

    #[test]
    fn invalidated_records_are_dropped() {
        let first = NameRecord::Data(b"a=1".to_vec());
        let second = NameRecord::Data(b"b=2".to_vec());
        let resolved = resolve_records(vec![
            first.clone(),
            second,
            NameRecord::Invalidation(first.content_hash()),
        ]);
        assert_eq!(resolved, vec![b"b=2".to_vec()]);
    }

    #[test]
    fn a_republished_record_is_live_again() {
        let record = NameRecord::Data(b"a=1".to_vec());
        let resolved = resolve_records(vec![
            record.clone(),
            NameRecord::Invalidation(record.content_hash()),
            record,
        ]);
        assert_eq!(resolved, vec![b"a=1".to_vec()]);
    }

    #[test]
    fn an_invalidation_does_not_reach_later_records() {
        let record = NameRecord::Data(b"b=2".to_vec());
        let resolved = resolve_records(vec![NameRecord::Invalidation(record.content_hash()), record]);
        assert_eq!(resolved, vec![b"b=2".to_vec()]);
    }

    #[test]
    fn only_the_owner_publishes() {
        let owner = PubKeyHash::new([3; 20]);
        let registry = TestRegistry::new();
        registry.register(b"carol", &owner, Satoshis(1_000_000)).unwrap();
        let name_locking = registry.deployment().name_locking_bytecode(b"carol").unwrap();

        let tx = registry
            .build_use_auth_internal(b"carol", &[b"url=https://carol.example".as_slice()])
            .unwrap();
        let sources = registry.source_outputs(&tx);
        assert_eq!(extract_records(&tx, &sources, &name_locking), vec![NameRecord::Data(
            b"url=https://carol.example".to_vec()
        )]);

        let other = registry.deployment().name_locking_bytecode(b"dave").unwrap();
        assert!(extract_records(&tx, &sources, &other).is_empty());

        let tx = registry
            .build_use_auth_external(b"carol", &[b"url=https://mallory.example".as_slice()])
            .unwrap();
        let sources = registry.source_outputs(&tx);
        assert!(extract_records(&tx, &sources, &name_locking).is_empty());
    }
}
