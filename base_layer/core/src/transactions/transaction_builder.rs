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
    transactions::transaction_components::{
        Transaction,
        TransactionError,
        TransactionInput,
        TransactionOutput,
        UnlockingData,
        TRANSACTION_VERSION,
    },
};

/// Assembles a transaction with inputs and outputs in exactly the order they are added. The covenants address
/// inputs and outputs by position, so callers are responsible for the layout.
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    inputs: Vec<TransactionInput>,
    source_outputs: Vec<TransactionOutput>,
    outputs: Vec<TransactionOutput>,
    lock_time: u32,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_input(self, utxo: &Utxo, unlocking: UnlockingData) -> Self {
        let input = TransactionInput::new(utxo.outpoint, unlocking);
        self.push_input(utxo, input)
    }

    pub fn add_input_with_sequence(self, utxo: &Utxo, unlocking: UnlockingData, sequence_number: u32) -> Self {
        let input = TransactionInput::new(utxo.outpoint, unlocking).with_sequence_number(sequence_number);
        self.push_input(utxo, input)
    }

    fn push_input(mut self, utxo: &Utxo, input: TransactionInput) -> Self {
        self.inputs.push(input);
        self.source_outputs.push(utxo.output.clone());
        self
    }

    pub fn add_output(mut self, output: TransactionOutput) -> Self {
        self.outputs.push(output);
        self
    }

    pub fn with_lock_time(mut self, lock_time: u32) -> Self {
        self.lock_time = lock_time;
        self
    }

    /// The outputs spent by the inputs added so far, in input order
    pub fn source_outputs(&self) -> &[TransactionOutput] {
        &self.source_outputs
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn build(self) -> Result<Transaction, TransactionError> {
        let tx = Transaction {
            version: TRANSACTION_VERSION,
            inputs: self.inputs,
            outputs: self.outputs,
            lock_time: self.lock_time,
        };
        tx.check_internal_consistency()?;
        Ok(tx)
    }
}
