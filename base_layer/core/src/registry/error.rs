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

use bitcann_script::{ContractKind, ScriptError};
use thiserror::Error;

use crate::{
    chain_storage::ChainStorageError,
    covenants::{CommitmentError, CovenantError},
    transactions::transaction_components::TransactionError,
};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Storage error: {0}")]
    StorageError(#[from] ChainStorageError),
    #[error("Script error: {0}")]
    ScriptError(#[from] ScriptError),
    #[error("Commitment error: {0}")]
    CommitmentError(#[from] CommitmentError),
    #[error("Covenant error: {0}")]
    CovenantError(#[from] CovenantError),
    #[error("Transaction error: {0}")]
    TransactionError(#[from] TransactionError),
    #[error("The deployment has no {0} contract")]
    UnknownContract(ContractKind),
    #[error("Could not find {entity} for `{key}`")]
    NotFound { entity: &'static str, key: String },
}

impl RegistryError {
    pub fn not_found<K: ToString>(entity: &'static str, key: K) -> Self {
        RegistryError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}
