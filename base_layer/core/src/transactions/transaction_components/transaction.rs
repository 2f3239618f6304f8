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

use std::{collections::HashSet, fmt};

use bitcann_common_types::{amount::Satoshis, types::Hash256};
use bitcann_script::hash256;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::transactions::transaction_components::{OutPoint, TransactionError, TransactionInput, TransactionOutput};

/// Relative lock-time rules apply from this version onwards
pub const TRANSACTION_VERSION: u32 = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,
}

impl Transaction {
    pub fn new(inputs: Vec<TransactionInput>, outputs: Vec<TransactionOutput>) -> Self {
        Self {
            version: TRANSACTION_VERSION,
            inputs,
            outputs,
            lock_time: 0,
        }
    }

    /// The double SHA-256 of the borsh encoded transaction
    pub fn txid(&self) -> Hash256 {
        // Writing to a Vec cannot fail
        let bytes = borsh::to_vec(self).unwrap_or_default();
        hash256(&bytes)
    }

    pub fn outpoint(&self, index: u32) -> OutPoint {
        OutPoint::new(self.txid(), index)
    }

    pub fn total_output_value(&self) -> Result<Satoshis, TransactionError> {
        self.outputs
            .iter()
            .try_fold(Satoshis(0), |acc, o| acc.checked_add(o.value))
            .ok_or(TransactionError::ValueOverflow("output"))
    }

    /// Returns the index of the first input that spends an outpoint already spent by an earlier input
    pub fn first_duplicated_input(&self) -> Option<usize> {
        let mut seen = HashSet::with_capacity(self.inputs.len());
        self.inputs.iter().position(|input| !seen.insert(input.outpoint))
    }

    pub fn check_internal_consistency(&self) -> Result<(), TransactionError> {
        if self.inputs.is_empty() {
            return Err(TransactionError::NoInputs);
        }
        if self.outputs.is_empty() {
            return Err(TransactionError::NoOutputs);
        }
        if let Some(index) = self.first_duplicated_input() {
            return Err(TransactionError::DuplicateInput(index));
        }
        self.total_output_value()?;
        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transaction {}", self.txid())?;
        for (i, input) in self.inputs.iter().enumerate() {
            writeln!(f, "  in  {}: {} seq {:#x}", i, input.outpoint, input.sequence_number)?;
        }
        for (i, output) in self.outputs.iter().enumerate() {
            writeln!(f, "  out {}: {}", i, output)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use bitcann_common_types::types::PubKeyHash;
    use bitcann_script::LockingBytecode;

    use super::*;
    use crate::transactions::transaction_components::UnlockingData;

    fn input(txid: u8, index: u32) -> TransactionInput {
        TransactionInput::new(
            OutPoint::new(Hash256::new([txid; 32]), index),
            UnlockingData::p2pkh(PubKeyHash::zero()),
        )
    }

    fn output(value: u64) -> TransactionOutput {
        TransactionOutput::new(Satoshis(value), LockingBytecode::p2pkh(&PubKeyHash::zero()))
    }

    #[test]
    fn txid_commits_to_every_field() {
        let tx = Transaction::new(vec![input(1, 0)], vec![output(10)]);
        let mut other = tx.clone();
        other.inputs[0].sequence_number = 5;
        assert_ne!(tx.txid(), other.txid());
        let mut other = tx.clone();
        other.lock_time = 1;
        assert_ne!(tx.txid(), other.txid());
        assert_eq!(tx.txid(), tx.clone().txid());
    }

    #[test]
    fn it_detects_duplicated_inputs() {
        let tx = Transaction::new(vec![input(1, 0), input(1, 1), input(1, 0)], vec![output(1)]);
        assert_eq!(tx.first_duplicated_input(), Some(2));
        assert_eq!(tx.check_internal_consistency(), Err(TransactionError::DuplicateInput(2)));
    }

    #[test]
    fn it_rejects_empty_transactions_and_overflows() {
        assert_eq!(
            Transaction::new(vec![], vec![output(1)]).check_internal_consistency(),
            Err(TransactionError::NoInputs)
        );
        assert_eq!(
            Transaction::new(vec![input(1, 0)], vec![]).check_internal_consistency(),
            Err(TransactionError::NoOutputs)
        );
        let tx = Transaction::new(vec![input(1, 0)], vec![output(u64::MAX), output(1)]);
        assert!(tx.total_output_value().is_err());
    }
}
