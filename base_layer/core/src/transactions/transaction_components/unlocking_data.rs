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

use bitcann_common_types::types::PubKeyHash;
use bitcann_script::RedeemBytecode;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::covenants::ContractCall;

/// What an input reveals to satisfy the locking bytecode of the output it spends
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum UnlockingData {
    /// Spends a P2PKH output. Signatures are produced and checked outside of the registry, the signer is declared by
    /// its public key hash.
    P2pkh {
        public_key_hash: PubKeyHash,
        #[serde(with = "bitcann_common_types::serializers::hex")]
        signature: Vec<u8>,
    },
    /// Spends a P2SH32 contract output by revealing the redeem bytecode and selecting a contract function
    Covenant {
        redeem_bytecode: RedeemBytecode,
        call: ContractCall,
    },
}

impl UnlockingData {
    pub fn p2pkh(public_key_hash: PubKeyHash) -> Self {
        UnlockingData::P2pkh {
            public_key_hash,
            signature: Vec::new(),
        }
    }

    pub fn covenant(redeem_bytecode: RedeemBytecode, call: ContractCall) -> Self {
        UnlockingData::Covenant { redeem_bytecode, call }
    }

    pub fn contract_call(&self) -> Option<&ContractCall> {
        match self {
            UnlockingData::Covenant { call, .. } => Some(call),
            UnlockingData::P2pkh { .. } => None,
        }
    }
}
