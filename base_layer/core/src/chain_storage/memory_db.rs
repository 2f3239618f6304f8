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

//! A memory-based UTXO set, generally only useful for testing and simulation

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, RwLock, RwLockReadGuard},
};

use log::*;

use crate::{
    chain_storage::{ChainStorageError, DbTransaction, Utxo, UtxoFilter, UtxoSet, WriteOperation},
    transactions::transaction_components::OutPoint,
};

pub const LOG_TARGET: &str = "c::cs::memory_db";

#[derive(Debug, Default, Clone)]
struct InnerDatabase {
    // insertion sequence -> utxo, so that queries return the oldest outputs first
    utxos: BTreeMap<u64, Utxo>,
    index: HashMap<OutPoint, u64>,
    next_sequence: u64,
    tip_height: u64,
}

impl InnerDatabase {
    fn apply(&mut self, operation: WriteOperation) -> Result<(), ChainStorageError> {
        match operation {
            WriteOperation::InsertUtxo(utxo) => {
                if self.index.contains_key(&utxo.outpoint) {
                    return Err(ChainStorageError::DuplicateUtxo(utxo.outpoint));
                }
                let sequence = self.next_sequence;
                self.next_sequence += 1;
                self.index.insert(utxo.outpoint, sequence);
                self.utxos.insert(sequence, *utxo);
            },
            WriteOperation::SpendUtxo(outpoint) => {
                let sequence = self
                    .index
                    .remove(&outpoint)
                    .ok_or(ChainStorageError::UnspendableInput(outpoint))?;
                self.utxos.remove(&sequence);
            },
            WriteOperation::SetTipHeight(height) => {
                if height < self.tip_height {
                    return Err(ChainStorageError::InvalidOperation(format!(
                        "tip height cannot decrease from {} to {}",
                        self.tip_height, height
                    )));
                }
                self.tip_height = height;
            },
        }
        Ok(())
    }
}

/// A memory-backed UTXO set. All data is lost when the program terminates. A single lock protects the whole set.
#[derive(Debug, Default, Clone)]
pub struct MemoryUtxoSet {
    db: Arc<RwLock<InnerDatabase>>,
}

impl MemoryUtxoSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn db_read_access(&self) -> Result<RwLockReadGuard<'_, InnerDatabase>, ChainStorageError> {
        self.db
            .read()
            .map_err(|e| ChainStorageError::AccessError(e.to_string()))
    }
}

impl UtxoSet for MemoryUtxoSet {
    fn write(&self, tx: DbTransaction) -> Result<(), ChainStorageError> {
        if tx.is_empty() {
            return Ok(());
        }
        let mut db = self
            .db
            .write()
            .map_err(|e| ChainStorageError::AccessError(e.to_string()))?;
        // Operations are applied to a copy so that a failure part way through leaves the set untouched
        let mut staged = db.clone();
        let num_operations = tx.operations.len();
        for operation in tx.operations {
            staged.apply(operation)?;
        }
        *db = staged;
        trace!(target: LOG_TARGET, "Committed {} operations", num_operations);
        Ok(())
    }

    fn fetch_utxo(&self, outpoint: &OutPoint) -> Result<Option<Utxo>, ChainStorageError> {
        let db = self.db_read_access()?;
        Ok(db.index.get(outpoint).and_then(|seq| db.utxos.get(seq)).cloned())
    }

    fn fetch_utxos(&self, filter: &UtxoFilter) -> Result<Vec<Utxo>, ChainStorageError> {
        let db = self.db_read_access()?;
        Ok(db
            .utxos
            .values()
            .filter(|utxo| filter.matches(&utxo.output))
            .cloned()
            .collect())
    }

    fn tip_height(&self) -> Result<u64, ChainStorageError> {
        Ok(self.db_read_access()?.tip_height)
    }

    fn utxo_count(&self) -> Result<usize, ChainStorageError> {
        Ok(self.db_read_access()?.utxos.len())
    }
}

#[cfg(test)]
mod test {
    use bitcann_common_types::{amount::Satoshis, types::Hash256};
    use bitcann_script::LockingBytecode;

    use super::*;
    use crate::transactions::transaction_components::TransactionOutput;

    fn utxo(index: u32) -> Utxo {
        Utxo::new(
            OutPoint::new(Hash256::new([9; 32]), index),
            TransactionOutput::new(Satoshis(u64::from(index) + 1), LockingBytecode::default()),
            0,
        )
    }

    #[test]
    fn it_returns_utxos_in_insertion_order() {
        let db = MemoryUtxoSet::new();
        let mut tx = DbTransaction::new();
        tx.insert_utxo(utxo(2)).insert_utxo(utxo(0)).insert_utxo(utxo(1));
        db.write(tx).unwrap();
        let indexes = db
            .fetch_utxos(&UtxoFilter::new())
            .unwrap()
            .into_iter()
            .map(|u| u.outpoint.index)
            .collect::<Vec<_>>();
        assert_eq!(indexes, vec![2, 0, 1]);
        assert!(db.contains(&utxo(1).outpoint).unwrap());
    }

    #[test]
    fn a_failed_write_changes_nothing() {
        let db = MemoryUtxoSet::new();
        let mut tx = DbTransaction::new();
        tx.insert_utxo(utxo(0));
        db.write(tx).unwrap();

        let mut tx = DbTransaction::new();
        tx.spend_utxo(utxo(0).outpoint)
            .insert_utxo(utxo(1))
            .spend_utxo(utxo(7).outpoint);
        let err = db.write(tx).unwrap_err();
        assert!(matches!(err, ChainStorageError::UnspendableInput(_)));
        assert!(db.contains(&utxo(0).outpoint).unwrap());
        assert!(!db.contains(&utxo(1).outpoint).unwrap());
        assert_eq!(db.utxo_count().unwrap(), 1);
    }

    #[test]
    fn outputs_cannot_be_spent_twice() {
        let db = MemoryUtxoSet::new();
        let mut tx = DbTransaction::new();
        tx.insert_utxo(utxo(0));
        db.write(tx).unwrap();
        let mut tx = DbTransaction::new();
        tx.spend_utxo(utxo(0).outpoint).spend_utxo(utxo(0).outpoint);
        assert!(db.write(tx).is_err());
        assert_eq!(db.utxo_count().unwrap(), 1);
    }

    #[test]
    fn the_tip_only_moves_forward() {
        let db = MemoryUtxoSet::new();
        let mut tx = DbTransaction::new();
        tx.set_tip_height(5);
        db.write(tx).unwrap();
        let mut tx = DbTransaction::new();
        tx.set_tip_height(4);
        assert!(db.write(tx).is_err());
        assert_eq!(db.tip_height().unwrap(), 5);
    }
}
