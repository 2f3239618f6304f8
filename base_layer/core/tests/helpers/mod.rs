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

use bitcann_common_types::types::PubKeyHash;
use bitcann_core::{
    chain_storage::ChainStorageError,
    covenants::CovenantError,
    registry::RegistryError,
    validation::ValidationError,
};

pub fn pkh(byte: u8) -> PubKeyHash {
    PubKeyHash::new([byte; 20])
}

/// The validation error a ledger rejection carries
pub fn validation_error(err: RegistryError) -> ValidationError {
    match err {
        RegistryError::StorageError(ChainStorageError::ValidationError { source }) => source,
        err => panic!("Expected a validation error, got {}", err),
    }
}

/// The covenant error behind a rejected script, with the input it was raised for
pub fn covenant_rejection(err: RegistryError) -> (usize, CovenantError) {
    match validation_error(err) {
        ValidationError::CovenantRejected { index, source } => (index, source),
        err => panic!("Expected a covenant rejection, got {}", err),
    }
}
