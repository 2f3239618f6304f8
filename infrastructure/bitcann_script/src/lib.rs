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

//! Locking bytecode for the BitCANN covenants.
//!
//! Covenants are never executed from bytecode in this crate. What matters is their identity: a contract is
//! addressed by the P2SH32 hash of its redeem bytecode, which is a fixed template preceded by the pushes of its
//! constructor arguments. [`ContractTemplate`] and [`PartialBytecode`] derive those identities deterministically,
//! and [`decode_redeem_bytecode`] recovers the contract kind and arguments from a revealed redeem bytecode.

mod builder;
mod error;
mod hashing;
mod locking_bytecode;
pub mod op_codes;
mod script_num;
mod template;

pub use builder::{encode_push, read_pushes, ScriptBuilder};
pub use error::ScriptError;
pub use hashing::{hash256, sha256};
pub use locking_bytecode::{LockingBytecode, P2PKH_LOCKING_BYTECODE_LENGTH, P2SH32_LOCKING_BYTECODE_LENGTH};
pub use script_num::{decode_script_num, encode_script_num, MAX_SCRIPT_NUM_LENGTH};
pub use template::{
    decode_redeem_bytecode,
    ConstructorArg,
    ContractKind,
    ContractTemplate,
    DecodedContract,
    PartialBytecode,
    RedeemBytecode,
};
