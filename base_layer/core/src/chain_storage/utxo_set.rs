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

use crate::{
    chain_storage::{ChainStorageError, DbTransaction, Utxo, UtxoFilter},
    transactions::transaction_components::OutPoint,
};

/// Storage backend for the ledger's unspent outputs. Implementations must be `Send` and `Sync` and must apply a
/// [DbTransaction] atomically: either every operation in it succeeds or none of them take effect.
pub trait UtxoSet: Send + Sync {
    /// Commit the given batch. On error nothing is written.
    fn write(&self, tx: DbTransaction) -> Result<(), ChainStorageError>;

    fn fetch_utxo(&self, outpoint: &OutPoint) -> Result<Option<Utxo>, ChainStorageError>;

    /// Every UTXO matching `filter`, in the order they were inserted
    fn fetch_utxos(&self, filter: &UtxoFilter) -> Result<Vec<Utxo>, ChainStorageError>;

    fn contains(&self, outpoint: &OutPoint) -> Result<bool, ChainStorageError> {
        Ok(self.fetch_utxo(outpoint)?.is_some())
    }

    fn tip_height(&self) -> Result<u64, ChainStorageError>;

    fn utxo_count(&self) -> Result<usize, ChainStorageError>;
}
