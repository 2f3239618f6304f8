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

use bitcann_common_types::token::{NftCapability, TokenCategory};
use bitcann_script::LockingBytecode;
use serde::{Deserialize, Serialize};

use crate::{
    chain_storage::ChainStorageError,
    transactions::transaction_components::{OutPoint, TransactionOutput},
};

/// An unspent output together with the height of the block that created it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub outpoint: OutPoint,
    pub output: TransactionOutput,
    pub height: u64,
}

impl Utxo {
    pub fn new(outpoint: OutPoint, output: TransactionOutput, height: u64) -> Self {
        Self {
            outpoint,
            output,
            height,
        }
    }

    /// The relative age of this output as seen by a transaction included in the block after `tip_height`
    pub fn age_at(&self, tip_height: u64) -> u64 {
        tip_height.saturating_add(1).saturating_sub(self.height)
    }
}

impl fmt::Display for Utxo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @{} {}", self.outpoint, self.height, self.output)
    }
}

/// Selects UTXOs by locking bytecode, token category and NFT capability. Unset fields match anything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UtxoFilter {
    pub locking_bytecode: Option<LockingBytecode>,
    pub category: Option<TokenCategory>,
    pub capability: Option<NftCapability>,
}

impl UtxoFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locked_by(mut self, locking_bytecode: LockingBytecode) -> Self {
        self.locking_bytecode = Some(locking_bytecode);
        self
    }

    pub fn with_category(mut self, category: TokenCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_capability(mut self, capability: NftCapability) -> Self {
        self.capability = Some(capability);
        self
    }

    pub fn matches(&self, output: &TransactionOutput) -> bool {
        if let Some(locking_bytecode) = &self.locking_bytecode {
            if &output.locking_bytecode != locking_bytecode {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if output.token_category().as_ref() != Some(category) {
                return false;
            }
        }
        if let Some(capability) = self.capability {
            if output.nft_capability() != Some(capability) {
                return false;
            }
        }
        true
    }
}

/// Read access to the unspent outputs of a ledger
pub trait UtxoSource {
    /// All unspent outputs matching `filter`, oldest first
    fn fetch_utxos(&self, filter: &UtxoFilter) -> Result<Vec<Utxo>, ChainStorageError>;

    fn fetch_utxo(&self, outpoint: &OutPoint) -> Result<Option<Utxo>, ChainStorageError>;

    fn tip_height(&self) -> Result<u64, ChainStorageError>;
}

#[cfg(test)]
mod test {
    use bitcann_common_types::{
        amount::Satoshis,
        token::TokenData,
        types::{Hash256, PubKeyHash},
    };

    use super::*;

    #[test]
    fn filter_fields_are_conjunctive() {
        let category = TokenCategory::new(Hash256::new([1; 32]));
        let locking = LockingBytecode::p2pkh(&PubKeyHash::new([2; 20]));
        let output = TransactionOutput::new(Satoshis(1000), locking.clone()).with_token(TokenData::nft(
            category,
            NftCapability::Mutable,
            vec![1],
        ));

        assert!(UtxoFilter::new().matches(&output));
        assert!(UtxoFilter::new()
            .locked_by(locking.clone())
            .with_category(category)
            .with_capability(NftCapability::Mutable)
            .matches(&output));
        assert!(!UtxoFilter::new()
            .locked_by(locking)
            .with_capability(NftCapability::Minting)
            .matches(&output));
        assert!(!UtxoFilter::new()
            .with_category(TokenCategory::default())
            .matches(&output));
    }

    #[test]
    fn age_is_measured_from_the_creating_block() {
        let utxo = Utxo::new(
            OutPoint::new(Hash256::default(), 0),
            TransactionOutput::new(Satoshis(1), LockingBytecode::default()),
            10,
        );
        assert_eq!(utxo.age_at(9), 0);
        assert_eq!(utxo.age_at(10), 1);
        assert_eq!(utxo.age_at(12), 3);
    }
}
