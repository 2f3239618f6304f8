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

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
    RwLock,
};

use log::*;

use crate::{
    chain_storage::{ChainStorageError, DbTransaction, MemoryUtxoSet, Utxo, UtxoFilter, UtxoSet, UtxoSource},
    transactions::transaction_components::{OutPoint, Transaction, TransactionOutput},
    validation::{TransactionContext, TransactionValidation, TransactionValidator, ValidationError},
};

const LOG_TARGET: &str = "c::cs::ledger";

/// A transaction that the ledger has applied, with the outputs its inputs spent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedTransaction {
    pub transaction: Transaction,
    pub source_outputs: Vec<TransactionOutput>,
    pub height: u64,
}

/// An in-memory ledger. Transactions are validated against the UTXO set and applied atomically to the block that
/// follows the current tip. Mining only moves the tip, which is what relative timelocks are measured against.
#[derive(Clone)]
pub struct Ledger<B = MemoryUtxoSet> {
    db: B,
    validator: Arc<TransactionValidator>,
    history: Arc<RwLock<Vec<ConfirmedTransaction>>>,
    seed_nonce: Arc<AtomicU32>,
}

impl Ledger<MemoryUtxoSet> {
    /// A memory backed ledger with the standard validation rules
    pub fn in_memory() -> Self {
        Self::new(MemoryUtxoSet::new(), TransactionValidator::default())
    }
}

impl<B: UtxoSet> Ledger<B> {
    pub fn new(db: B, validator: TransactionValidator) -> Self {
        Self {
            db,
            validator: Arc::new(validator),
            history: Arc::new(RwLock::new(Vec::new())),
            seed_nonce: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    /// Creates `outputs` out of thin air, like a genesis block or a coinbase. Nothing is validated.
    pub fn seed(&self, outputs: Vec<TransactionOutput>) -> Result<Vec<Utxo>, ChainStorageError> {
        let mut genesis = Transaction::new(Vec::new(), outputs);
        // distinct seeds of identical outputs must not share a txid
        genesis.lock_time = self.seed_nonce.fetch_add(1, Ordering::SeqCst);
        let height = self.db.tip_height()?;
        let utxos = self.created_utxos(&genesis, height);
        let mut txn = DbTransaction::new();
        for utxo in &utxos {
            txn.insert_utxo(utxo.clone());
        }
        self.db.write(txn)?;
        info!(
            target: LOG_TARGET,
            "Seeded {} outputs at height {} in {}",
            utxos.len(),
            height,
            genesis.txid()
        );
        Ok(utxos)
    }

    /// Resolves the outputs spent by `transaction`, in input order
    pub fn fetch_spent_utxos(&self, transaction: &Transaction) -> Result<Vec<Utxo>, ChainStorageError> {
        transaction
            .inputs
            .iter()
            .enumerate()
            .map(|(index, input)| -> Result<Utxo, ChainStorageError> {
                let utxo = self.db.fetch_utxo(&input.outpoint)?.ok_or(ValidationError::UnknownInput {
                    index,
                    outpoint: input.outpoint,
                })?;
                Ok(utxo)
            })
            .collect()
    }

    /// Validates `transaction` as if it were included in the next block, without applying it
    pub fn validate(&self, transaction: &Transaction) -> Result<(), ChainStorageError> {
        let spent = self.fetch_spent_utxos(transaction)?;
        let context = TransactionContext::new(transaction, spent, self.db.tip_height()?)?;
        self.validator.validate(&context)?;
        Ok(())
    }

    /// Validates and applies `transaction`. Its inputs are removed from and its spendable outputs added to the UTXO
    /// set in a single atomic write, so of two transactions spending the same output only the first succeeds.
    pub fn submit(&self, transaction: &Transaction) -> Result<Vec<Utxo>, ChainStorageError> {
        let tip_height = self.db.tip_height()?;
        let spent = self.fetch_spent_utxos(transaction)?;
        let context = TransactionContext::new(transaction, spent, tip_height)?;
        if let Err(e) = self.validator.validate(&context) {
            debug!(target: LOG_TARGET, "Rejected {}: {}", transaction.txid(), e);
            return Err(e.into());
        }

        let height = tip_height + 1;
        let created = self.created_utxos(transaction, height);
        let mut txn = DbTransaction::new();
        for input in &transaction.inputs {
            txn.spend_utxo(input.outpoint);
        }
        for utxo in &created {
            txn.insert_utxo(utxo.clone());
        }
        self.db.write(txn)?;

        self.history
            .write()
            .map_err(|e| ChainStorageError::AccessError(e.to_string()))?
            .push(ConfirmedTransaction {
                transaction: transaction.clone(),
                source_outputs: context.source_outputs().to_vec(),
                height,
            });
        info!(
            target: LOG_TARGET,
            "Applied transaction {} ({} inputs, {} outputs) at height {}",
            transaction.txid(),
            transaction.inputs.len(),
            transaction.outputs.len(),
            height
        );
        Ok(created)
    }

    /// Advances the tip by `blocks`, returning the new tip height
    pub fn mine_blocks(&self, blocks: u64) -> Result<u64, ChainStorageError> {
        let height = self
            .db
            .tip_height()?
            .checked_add(blocks)
            .ok_or_else(|| ChainStorageError::InvalidOperation("tip height overflow".to_string()))?;
        let mut txn = DbTransaction::new();
        txn.set_tip_height(height);
        self.db.write(txn)?;
        debug!(target: LOG_TARGET, "Mined {} blocks, tip is now {}", blocks, height);
        Ok(height)
    }

    /// Every transaction applied through [Ledger::submit], oldest first
    pub fn transactions(&self) -> Result<Vec<ConfirmedTransaction>, ChainStorageError> {
        Ok(self
            .history
            .read()
            .map_err(|e| ChainStorageError::AccessError(e.to_string()))?
            .clone())
    }

    fn created_utxos(&self, transaction: &Transaction, height: u64) -> Vec<Utxo> {
        let txid = transaction.txid();
        transaction
            .outputs
            .iter()
            .enumerate()
            .filter(|(_, output)| !output.locking_bytecode.is_op_return())
            .map(|(index, output)| Utxo::new(OutPoint::new(txid, index as u32), output.clone(), height))
            .collect()
    }
}

impl<B: UtxoSet> UtxoSource for Ledger<B> {
    fn fetch_utxos(&self, filter: &UtxoFilter) -> Result<Vec<Utxo>, ChainStorageError> {
        self.db.fetch_utxos(filter)
    }

    fn fetch_utxo(&self, outpoint: &OutPoint) -> Result<Option<Utxo>, ChainStorageError> {
        self.db.fetch_utxo(outpoint)
    }

    fn tip_height(&self) -> Result<u64, ChainStorageError> {
        self.db.tip_height()
    }
}
