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

use std::sync::Arc;

use log::*;

use crate::validation::{
    helpers::{check_relative_timelocks, check_value_balance},
    interpreter::{Interpreter, SignatureOracle},
    token_rules::check_token_rules,
    TransactionContext,
    TransactionValidation,
    ValidationError,
};

pub const LOG_TARGET: &str = "c::val::transaction_validators";

/// This validator checks the internal consistency of the transaction: it has inputs and outputs, spends no outpoint
/// twice and its output values do not overflow.
///
/// This does NOT check that the inputs come from the UTXO set
#[derive(Debug, Clone, Copy, Default)]
pub struct TxInternalConsistencyValidator;

impl TransactionValidation for TxInternalConsistencyValidator {
    fn validate(&self, context: &TransactionContext<'_>) -> Result<(), ValidationError> {
        context.transaction().check_internal_consistency()?;
        Ok(())
    }
}

/// Checks the BIP68 block based relative lock of every input
#[derive(Debug, Clone, Copy, Default)]
pub struct TxTimelockValidator;

impl TransactionValidation for TxTimelockValidator {
    fn validate(&self, context: &TransactionContext<'_>) -> Result<(), ValidationError> {
        check_relative_timelocks(context)
    }
}

/// The outputs may not be worth more than the inputs
#[derive(Debug, Clone, Copy, Default)]
pub struct TxValueBalanceValidator;

impl TransactionValidation for TxValueBalanceValidator {
    fn validate(&self, context: &TransactionContext<'_>) -> Result<(), ValidationError> {
        let fee = check_value_balance(context)?;
        trace!(target: LOG_TARGET, "Transaction pays a fee of {}", fee);
        Ok(())
    }
}

/// Enforces the CashTokens encoding and conservation rules
#[derive(Debug, Clone, Copy, Default)]
pub struct TxTokenValidator;

impl TransactionValidation for TxTokenValidator {
    fn validate(&self, context: &TransactionContext<'_>) -> Result<(), ValidationError> {
        check_token_rules(context)
    }
}

/// Evaluates every input's unlocking data against the output it spends, running the covenants of contract inputs
#[derive(Clone, Default)]
pub struct TxScriptValidator {
    interpreter: Interpreter,
}

impl TxScriptValidator {
    pub fn new(oracle: Arc<dyn SignatureOracle>) -> Self {
        Self {
            interpreter: Interpreter::new(oracle),
        }
    }
}

impl TransactionValidation for TxScriptValidator {
    fn validate(&self, context: &TransactionContext<'_>) -> Result<(), ValidationError> {
        self.interpreter.verify_all(context)
    }
}

/// Runs its validators in order. The first failure rejects the transaction.
pub struct TransactionValidator {
    validators: Vec<Box<dyn TransactionValidation>>,
}

impl TransactionValidator {
    pub fn new(validators: Vec<Box<dyn TransactionValidation>>) -> Self {
        Self { validators }
    }

    /// The full rule set of the ledger, with P2PKH signatures checked by `oracle`
    pub fn standard(oracle: Arc<dyn SignatureOracle>) -> Self {
        Self::new(vec![
            Box::new(TxInternalConsistencyValidator),
            Box::new(TxTimelockValidator),
            Box::new(TxValueBalanceValidator),
            Box::new(TxTokenValidator),
            Box::new(TxScriptValidator::new(oracle)),
        ])
    }
}

impl Default for TransactionValidator {
    fn default() -> Self {
        Self::standard(Arc::new(crate::validation::DeclaredSignerOracle))
    }
}

impl TransactionValidation for TransactionValidator {
    fn validate(&self, context: &TransactionContext<'_>) -> Result<(), ValidationError> {
        for v in &self.validators {
            v.validate(context)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use bitcann_common_types::{
        amount::Satoshis,
        types::{Hash256, PubKeyHash},
    };
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
        },
    };

    struct AlwaysFails;

    impl TransactionValidation for AlwaysFails {
        fn validate(&self, _: &TransactionContext<'_>) -> Result<(), ValidationError> {
            Err(ValidationError::InputValueOverflow)
        }
    }

    fn payment(owner: PubKeyHash, value: u64) -> (Transaction, Vec<Utxo>) {
        let utxo = Utxo::new(
            OutPoint::new(Hash256::new([3; 32]), 1),
            TransactionOutput::new(Satoshis(10_000), LockingBytecode::p2pkh(&owner)),
            0,
        );
        let tx = Transaction::new(vec![TransactionInput::new(utxo.outpoint, UnlockingData::p2pkh(owner))], vec![
            TransactionOutput::new(Satoshis(value), LockingBytecode::p2pkh(&PubKeyHash::new([8; 20]))),
        ]);
        (tx, vec![utxo])
    }

    #[test]
    fn the_standard_rules_accept_a_plain_payment() {
        let (tx, utxos) = payment(PubKeyHash::new([1; 20]), 9_000);
        let context = TransactionContext::new(&tx, utxos, 0).unwrap();
        TransactionValidator::default().validate(&context).unwrap();
    }

    #[test]
    fn the_first_failure_is_reported() {
        let (tx, utxos) = payment(PubKeyHash::new([1; 20]), 11_000);
        let context = TransactionContext::new(&tx, utxos, 0).unwrap();
        assert!(matches!(
            TransactionValidator::default().validate(&context),
            Err(ValidationError::ValueImbalance { .. })
        ));

        let validator = TransactionValidator::new(vec![Box::new(AlwaysFails), Box::new(TxValueBalanceValidator)]);
        assert!(matches!(
            validator.validate(&context),
            Err(ValidationError::InputValueOverflow)
        ));
    }
}
