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

use bitcann_common_types::types::PubKeyHash;
use log::*;

use crate::{
    covenants::{evaluate, CovenantContext},
    transactions::transaction_components::{Transaction, UnlockingData},
    validation::{TransactionContext, ValidationError},
};

pub const LOG_TARGET: &str = "c::val::interpreter";

/// Verifies P2PKH signatures. Keys and signing live outside of the registry, so the interpreter delegates to an
/// oracle.
pub trait SignatureOracle: Send + Sync {
    fn verify(&self, transaction: &Transaction, input_index: usize, signer: &PubKeyHash, signature: &[u8]) -> bool;
}

/// Accepts every declared signer. The interpreter has already checked that the signer owns the spent output.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredSignerOracle;

impl SignatureOracle for DeclaredSignerOracle {
    fn verify(&self, _: &Transaction, _: usize, _: &PubKeyHash, _: &[u8]) -> bool {
        true
    }
}

/// Evaluates the locking bytecode of every spent output against the unlocking data of the input spending it
#[derive(Clone)]
pub struct Interpreter {
    oracle: Arc<dyn SignatureOracle>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Arc::new(DeclaredSignerOracle))
    }
}

impl Interpreter {
    pub fn new(oracle: Arc<dyn SignatureOracle>) -> Self {
        Self { oracle }
    }

    pub fn verify_input(&self, context: &TransactionContext<'_>, index: usize) -> Result<(), ValidationError> {
        let tx = context.transaction();
        let input = tx.inputs.get(index).ok_or(ValidationError::UnspendableInput {
            index,
            reason: "no such input",
        })?;
        let locking = context
            .source_outputs()
            .get(index)
            .map(|output| &output.locking_bytecode)
            .ok_or(ValidationError::UnspendableInput {
                index,
                reason: "the spent output is unknown",
            })?;

        if locking.is_op_return() {
            return Err(ValidationError::UnspendableInput {
                index,
                reason: "OP_RETURN outputs are provably unspendable",
            });
        }

        if let Some(owner) = locking.as_p2pkh() {
            return match &input.unlocking {
                UnlockingData::P2pkh {
                    public_key_hash,
                    signature,
                } => {
                    if public_key_hash != &owner {
                        return Err(ValidationError::SignerMismatch {
                            index,
                            declared: public_key_hash.to_hex(),
                        });
                    }
                    if !self.oracle.verify(tx, index, public_key_hash, signature) {
                        return Err(ValidationError::InvalidSignature { index });
                    }
                    Ok(())
                },
                UnlockingData::Covenant { .. } => Err(ValidationError::UnspendableInput {
                    index,
                    reason: "a P2PKH output needs a signature",
                }),
            };
        }

        if let Some(script_hash) = locking.as_p2sh32() {
            let (redeem_bytecode, call) = match &input.unlocking {
                UnlockingData::Covenant { redeem_bytecode, call } => (redeem_bytecode, call),
                UnlockingData::P2pkh { .. } => {
                    return Err(ValidationError::UnspendableInput {
                        index,
                        reason: "a P2SH32 output needs a redeem bytecode",
                    })
                },
            };
            if redeem_bytecode.script_hash() != script_hash {
                return Err(ValidationError::RedeemHashMismatch { index });
            }
            let contract = redeem_bytecode
                .decode()
                .map_err(|source| ValidationError::InvalidRedeemBytecode { index, source })?;
            trace!(target: LOG_TARGET, "Input {} invokes {}", index, call);
            let covenant_context = CovenantContext::new(tx, context.source_outputs(), index);
            return evaluate(&contract, call, &covenant_context)
                .map_err(|source| ValidationError::CovenantRejected { index, source });
        }

        Err(ValidationError::UnspendableInput {
            index,
            reason: "non-standard locking bytecode",
        })
    }

    pub fn verify_all(&self, context: &TransactionContext<'_>) -> Result<(), ValidationError> {
        for index in 0..context.transaction().inputs.len() {
            self.verify_input(context, index)?;
        }
        Ok(())
    }
}
