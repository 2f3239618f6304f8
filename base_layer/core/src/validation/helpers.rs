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

use bitcann_common_types::amount::Satoshis;
use log::*;

use crate::validation::{TransactionContext, ValidationError};

pub const LOG_TARGET: &str = "c::val::helpers";

/// Inputs with this bit set in their sequence number have no relative lock
pub const SEQUENCE_LOCKTIME_DISABLE_FLAG: u32 = 1 << 31;
/// Selects a time based relative lock, in units of 512 seconds
pub const SEQUENCE_LOCKTIME_TYPE_FLAG: u32 = 1 << 22;
pub const SEQUENCE_LOCKTIME_MASK: u32 = 0x0000_ffff;
/// Relative locks only apply to transactions of at least this version
pub const RELATIVE_LOCK_MIN_VERSION: u32 = 2;

/// The number of blocks a sequence number requires the spent output to be buried under, or `None` if it does not
/// encode a relative lock
pub fn relative_lock_blocks(sequence_number: u32) -> Option<u32> {
    if sequence_number & SEQUENCE_LOCKTIME_DISABLE_FLAG != 0 {
        return None;
    }
    Some(sequence_number & SEQUENCE_LOCKTIME_MASK)
}

/// Checks the BIP68 relative lock of every input against the age its spent output will have in the next block
pub fn check_relative_timelocks(context: &TransactionContext<'_>) -> Result<(), ValidationError> {
    let tx = context.transaction();
    if tx.version < RELATIVE_LOCK_MIN_VERSION {
        return Ok(());
    }
    for (index, (input, utxo)) in tx.inputs.iter().zip(context.spent_utxos()).enumerate() {
        let required = match relative_lock_blocks(input.sequence_number) {
            Some(blocks) => blocks,
            None => continue,
        };
        if input.sequence_number & SEQUENCE_LOCKTIME_TYPE_FLAG != 0 {
            return Err(ValidationError::TimeBasedLock { index });
        }
        let age = utxo.age_at(context.tip_height());
        if age < u64::from(required) {
            debug!(
                target: LOG_TARGET,
                "Input {} spending {} needs {} confirmations, has {}", index, utxo.outpoint, required, age
            );
            return Err(ValidationError::MaturityError { index, required, age });
        }
    }
    Ok(())
}

/// The outputs may not be worth more than the inputs. The difference is the miner fee.
pub fn check_value_balance(context: &TransactionContext<'_>) -> Result<Satoshis, ValidationError> {
    let inputs = context
        .source_outputs()
        .iter()
        .try_fold(Satoshis(0), |sum, output| sum.checked_add(output.value))
        .ok_or(ValidationError::InputValueOverflow)?;
    let outputs = context.transaction().total_output_value()?;
    inputs
        .checked_sub(outputs)
        .ok_or(ValidationError::ValueImbalance { inputs, outputs })
}

#[cfg(test)]
mod test {
    use bitcann_common_types::types::{Hash256, PubKeyHash};
    use bitcann_script::LockingBytecode;

    use super::*;
    use crate::{
        chain_storage::Utxo,
        transactions::transaction_components::{
            OutPoint,
            Transaction,
            TransactionInput,
            TransactionOutput,
            UnlockingData,
            SEQUENCE_FINAL,
        },
    };

    fn spend(value: u64, height: u64, sequence_number: u32, output_value: u64) -> (Transaction, Vec<Utxo>) {
        let pkh = PubKeyHash::new([1; 20]);
        let utxo = Utxo::new(
            OutPoint::new(Hash256::new([2; 32]), 0),
            TransactionOutput::new(Satoshis(value), LockingBytecode::p2pkh(&pkh)),
            height,
        );
        let tx = Transaction::new(
            vec![TransactionInput::new(utxo.outpoint, UnlockingData::p2pkh(pkh)).with_sequence_number(sequence_number)],
            vec![TransactionOutput::new(Satoshis(output_value), LockingBytecode::p2pkh(&pkh))],
        );
        (tx, vec![utxo])
    }

    #[test]
    fn sequence_numbers() {
        assert_eq!(relative_lock_blocks(SEQUENCE_FINAL), None);
        assert_eq!(relative_lock_blocks(144), Some(144));
        assert_eq!(relative_lock_blocks(0x0001_0005), Some(5));
    }

    #[test]
    fn it_enforces_block_based_relative_locks() {
        let (tx, utxos) = spend(1000, 10, 3, 900);
        let context = TransactionContext::new(&tx, utxos.clone(), 11).unwrap();
        assert!(matches!(
            check_relative_timelocks(&context),
            Err(ValidationError::MaturityError {
                index: 0,
                required: 3,
                age: 2
            })
        ));
        let context = TransactionContext::new(&tx, utxos, 12).unwrap();
        check_relative_timelocks(&context).unwrap();
    }

    #[test]
    fn time_based_locks_are_rejected() {
        let (tx, utxos) = spend(1000, 0, SEQUENCE_LOCKTIME_TYPE_FLAG | 1, 900);
        let context = TransactionContext::new(&tx, utxos, 100).unwrap();
        assert!(matches!(
            check_relative_timelocks(&context),
            Err(ValidationError::TimeBasedLock { index: 0 })
        ));
    }

    #[test]
    fn version_one_transactions_ignore_sequence_numbers() {
        let (mut tx, utxos) = spend(1000, 10, 50, 900);
        tx.version = 1;
        let context = TransactionContext::new(&tx, utxos, 10).unwrap();
        check_relative_timelocks(&context).unwrap();
    }

    #[test]
    fn outputs_cannot_exceed_inputs() {
        let (tx, utxos) = spend(1000, 0, SEQUENCE_FINAL, 900);
        let context = TransactionContext::new(&tx, utxos, 0).unwrap();
        assert_eq!(check_value_balance(&context).unwrap(), Satoshis(100));

        let (tx, utxos) = spend(1000, 0, SEQUENCE_FINAL, 1001);
        let context = TransactionContext::new(&tx, utxos, 0).unwrap();
        assert!(matches!(
            check_value_balance(&context),
            Err(ValidationError::ValueImbalance { .. })
        ));
    }
}
