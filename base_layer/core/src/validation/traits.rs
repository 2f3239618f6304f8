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
    chain_storage::Utxo,
    transactions::transaction_components::{Transaction, TransactionOutput},
    validation::ValidationError,
};

/// A transaction together with the UTXOs its inputs spend, in input order, and the height of the chain tip it is
/// validated against
#[derive(Debug, Clone)]
pub struct TransactionContext<'a> {
    transaction: &'a Transaction,
    spent_utxos: Vec<Utxo>,
    source_outputs: Vec<TransactionOutput>,
    tip_height: u64,
}

impl<'a> TransactionContext<'a> {
    pub fn new(
        transaction: &'a Transaction,
        spent_utxos: Vec<Utxo>,
        tip_height: u64,
    ) -> Result<Self, ValidationError> {
        if spent_utxos.len() != transaction.inputs.len() {
            return Err(ValidationError::SpentOutputCountMismatch {
                expected: transaction.inputs.len(),
                actual: spent_utxos.len(),
            });
        }
        let source_outputs = spent_utxos.iter().map(|utxo| utxo.output.clone()).collect();
        Ok(Self {
            transaction,
            spent_utxos,
            source_outputs,
            tip_height,
        })
    }

    pub fn transaction(&self) -> &'a Transaction {
        self.transaction
    }

    pub fn spent_utxos(&self) -> &[Utxo] {
        &self.spent_utxos
    }

    pub fn source_outputs(&self) -> &[TransactionOutput] {
        &self.source_outputs
    }

    pub fn tip_height(&self) -> u64 {
        self.tip_height
    }
}

/// A stateless check of one aspect of a transaction. Validators are composed by
/// [TransactionValidator](crate::validation::TransactionValidator).
pub trait TransactionValidation: Send + Sync {
    fn validate(&self, context: &TransactionContext<'_>) -> Result<(), ValidationError>;
}
