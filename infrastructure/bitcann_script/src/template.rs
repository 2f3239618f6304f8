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

//! Deterministic redeem bytecode for the registry contracts.
//!
//! A redeem bytecode is the contract's constructor arguments pushed in reverse order followed by the contract code,
//! so the first argument sits directly in front of the code. A [PartialBytecode] has the first arguments already
//! bound and can be completed many times over with the remaining ones, which is how a single shared Name template
//! yields a distinct address for every registered name.

use std::fmt;

use bitcann_common_types::types::Hash256;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{
    decode_script_num,
    op_codes::{OP_1, OP_DROP},
    read_pushes,
    sha256,
    LockingBytecode,
    ScriptBuilder,
    ScriptError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContractKind {
    Registry,
    Auction,
    Bid,
    ConflictResolver,
    NameEnforcer,
    Accumulator,
    Factory,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgType {
    Int,
    Bytes,
    Hash,
}

impl ContractKind {
    pub const ALL: [ContractKind; 8] = [
        ContractKind::Registry,
        ContractKind::Auction,
        ContractKind::Bid,
        ContractKind::ConflictResolver,
        ContractKind::NameEnforcer,
        ContractKind::Accumulator,
        ContractKind::Factory,
        ContractKind::Name,
    ];

    /// The contracts whose UTXOs are authorised at the Registry by a thread capsule
    pub const AUXILIARY: [ContractKind; 6] = [
        ContractKind::Auction,
        ContractKind::Bid,
        ContractKind::ConflictResolver,
        ContractKind::NameEnforcer,
        ContractKind::Accumulator,
        ContractKind::Factory,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ContractKind::Registry => "registry",
            ContractKind::Auction => "auction",
            ContractKind::Bid => "bid",
            ContractKind::ConflictResolver => "conflict_resolver",
            ContractKind::NameEnforcer => "name_enforcer",
            ContractKind::Accumulator => "accumulator",
            ContractKind::Factory => "factory",
            ContractKind::Name => "name",
        }
    }

    fn arg_types(self) -> &'static [ArgType] {
        use ArgType::*;
        match self {
            // name category
            ContractKind::Registry => &[Hash],
            // minimum starting bid, price decay points, price floor
            ContractKind::Auction => &[Int, Int, Int],
            // minimum bid increase percentage
            ContractKind::Bid => &[Int],
            ContractKind::ConflictResolver | ContractKind::NameEnforcer | ContractKind::Accumulator => &[],
            // name partial bytecode, tld, minimum wait time, platform fee threshold, maximum platform fee percentage
            ContractKind::Factory => &[Bytes, Bytes, Int, Int, Int],
            // inactivity expiry, name, tld, category
            ContractKind::Name => &[Int, Bytes, Bytes, Hash],
        }
    }

    pub fn arg_count(self) -> usize {
        self.arg_types().len()
    }

    fn check_args(self, offset: usize, args: &[ConstructorArg]) -> Result<(), ScriptError> {
        let types = &self.arg_types()[offset..offset + args.len()];
        for (i, (ty, arg)) in types.iter().zip(args).enumerate() {
            let ok = matches!(
                (ty, arg),
                (ArgType::Int, ConstructorArg::Int(_)) | (ArgType::Bytes, ConstructorArg::Bytes(_))
            ) || matches!((ty, arg), (ArgType::Hash, ConstructorArg::Bytes(b)) if b.len() == 32);
            if !ok {
                return Err(ScriptError::InvalidArgument {
                    contract: self.label(),
                    index: offset + i,
                    reason: format!("expected {:?}", ty),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructorArg {
    Bytes(Vec<u8>),
    Int(i64),
}

impl ConstructorArg {
    fn encode(&self) -> Vec<u8> {
        match self {
            ConstructorArg::Bytes(b) => ScriptBuilder::new().push_data(b).into_bytes(),
            ConstructorArg::Int(n) => ScriptBuilder::new().push_int(*n).into_bytes(),
        }
    }
}

impl From<i64> for ConstructorArg {
    fn from(n: i64) -> Self {
        ConstructorArg::Int(n)
    }
}

impl From<Vec<u8>> for ConstructorArg {
    fn from(b: Vec<u8>) -> Self {
        ConstructorArg::Bytes(b)
    }
}

impl From<&[u8]> for ConstructorArg {
    fn from(b: &[u8]) -> Self {
        ConstructorArg::Bytes(b.to_vec())
    }
}

impl From<Hash256> for ConstructorArg {
    fn from(h: Hash256) -> Self {
        ConstructorArg::Bytes(h.to_vec())
    }
}

fn push_reversed(args: &[ConstructorArg]) -> Vec<u8> {
    args.iter().rev().flat_map(ConstructorArg::encode).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractTemplate {
    kind: ContractKind,
    code: Vec<u8>,
}

impl ContractTemplate {
    /// The code of each contract is a unique tag followed by `OP_DROP OP_1`; the rules themselves are enforced by the
    /// covenant validators.
    pub fn new(kind: ContractKind) -> Self {
        let tag = sha256(format!("bitcann.v1.{}", kind.label()).as_bytes());
        let code = ScriptBuilder::new()
            .push_data(tag.as_slice())
            .push_opcode(OP_DROP)
            .push_opcode(OP_1)
            .into_bytes();
        Self { kind, code }
    }

    pub fn kind(&self) -> ContractKind {
        self.kind
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn instantiate(&self, args: &[ConstructorArg]) -> Result<RedeemBytecode, ScriptError> {
        self.partial(&[])?.bind(args)
    }

    /// Binds the first `args.len()` constructor arguments
    pub fn partial(&self, args: &[ConstructorArg]) -> Result<PartialBytecode, ScriptError> {
        if args.len() > self.kind.arg_count() {
            return Err(ScriptError::ArgumentCountMismatch {
                contract: self.kind.label(),
                expected: self.kind.arg_count(),
                actual: args.len(),
            });
        }
        self.kind.check_args(0, args)?;
        let mut bytes = push_reversed(args);
        bytes.extend_from_slice(&self.code);
        Ok(PartialBytecode {
            kind: self.kind,
            bound: args.len(),
            bytes,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialBytecode {
    kind: ContractKind,
    bound: usize,
    bytes: Vec<u8>,
}

impl PartialBytecode {
    /// Recovers a partial bytecode of the given kind from its raw bytes
    pub fn decode(kind: ContractKind, bytes: &[u8]) -> Result<Self, ScriptError> {
        let code = ContractTemplate::new(kind).code;
        let prefix = bytes.strip_suffix(code.as_slice()).ok_or(ScriptError::UnknownTemplate)?;
        let mut pushes = read_pushes(prefix)?;
        pushes.reverse();
        if pushes.len() > kind.arg_count() {
            return Err(ScriptError::ArgumentCountMismatch {
                contract: kind.label(),
                expected: kind.arg_count(),
                actual: pushes.len(),
            });
        }
        let args = to_args(kind, pushes)?;
        kind.check_args(0, &args)?;
        Ok(Self {
            kind,
            bound: args.len(),
            bytes: bytes.to_vec(),
        })
    }

    pub fn kind(&self) -> ContractKind {
        self.kind
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Completes the bytecode with the remaining constructor arguments
    pub fn bind(&self, args: &[ConstructorArg]) -> Result<RedeemBytecode, ScriptError> {
        let expected = self.kind.arg_count() - self.bound;
        if args.len() != expected {
            return Err(ScriptError::ArgumentCountMismatch {
                contract: self.kind.label(),
                expected,
                actual: args.len(),
            });
        }
        self.kind.check_args(self.bound, args)?;
        let mut bytes = push_reversed(args);
        bytes.extend_from_slice(&self.bytes);
        Ok(RedeemBytecode(bytes))
    }
}

fn to_args(kind: ContractKind, pushes: Vec<Vec<u8>>) -> Result<Vec<ConstructorArg>, ScriptError> {
    kind.arg_types()
        .iter()
        .zip(pushes)
        .enumerate()
        .map(|(index, (ty, item))| match ty {
            ArgType::Int => decode_script_num(&item)
                .map(ConstructorArg::Int)
                .map_err(|e| ScriptError::InvalidArgument {
                    contract: kind.label(),
                    index,
                    reason: e.to_string(),
                }),
            ArgType::Bytes | ArgType::Hash => Ok(ConstructorArg::Bytes(item)),
        })
        .collect()
}

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct RedeemBytecode(#[serde(with = "bitcann_common_types::serializers::hex")] Vec<u8>);

impl RedeemBytecode {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn script_hash(&self) -> Hash256 {
        crate::hash256(&self.0)
    }

    /// The P2SH32 address of the contract
    pub fn locking_bytecode(&self) -> LockingBytecode {
        LockingBytecode::p2sh32(&self.script_hash())
    }

    pub fn decode(&self) -> Result<DecodedContract, ScriptError> {
        decode_redeem_bytecode(&self.0)
    }
}

impl fmt::Debug for RedeemBytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedeemBytecode({})", hex::encode(&self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedContract {
    pub kind: ContractKind,
    pub args: Vec<ConstructorArg>,
}

impl DecodedContract {
    pub fn bytes_arg(&self, index: usize) -> Result<&[u8], ScriptError> {
        match self.args.get(index) {
            Some(ConstructorArg::Bytes(b)) => Ok(b),
            _ => Err(self.bad_arg(index, "expected a byte string")),
        }
    }

    pub fn int_arg(&self, index: usize) -> Result<i64, ScriptError> {
        match self.args.get(index) {
            Some(ConstructorArg::Int(n)) => Ok(*n),
            _ => Err(self.bad_arg(index, "expected an integer")),
        }
    }

    pub fn hash_arg(&self, index: usize) -> Result<Hash256, ScriptError> {
        let bytes = self.bytes_arg(index)?;
        Hash256::try_from(bytes).map_err(|e| self.bad_arg(index, &e.to_string()))
    }

    fn bad_arg(&self, index: usize, reason: &str) -> ScriptError {
        ScriptError::InvalidArgument {
            contract: self.kind.label(),
            index,
            reason: reason.to_string(),
        }
    }
}

/// Identifies the contract behind a redeem bytecode and recovers its constructor arguments in declaration order
pub fn decode_redeem_bytecode(bytes: &[u8]) -> Result<DecodedContract, ScriptError> {
    for kind in ContractKind::ALL {
        let template = ContractTemplate::new(kind);
        let Some(prefix) = bytes.strip_suffix(template.code()) else {
            continue;
        };
        let mut pushes = read_pushes(prefix)?;
        if pushes.len() != kind.arg_count() {
            return Err(ScriptError::ArgumentCountMismatch {
                contract: kind.label(),
                expected: kind.arg_count(),
                actual: pushes.len(),
            });
        }
        pushes.reverse();
        let args = to_args(kind, pushes)?;
        kind.check_args(0, &args)?;
        return Ok(DecodedContract { kind, args });
    }
    Err(ScriptError::UnknownTemplate)
}

#[cfg(test)]
mod test {
    use super::*;

    fn name_args() -> Vec<ConstructorArg> {
        vec![
            b"alice".to_vec().into(),
            b".bch".to_vec().into(),
            Hash256::new([3u8; 32]).into(),
        ]
    }

    #[test]
    fn every_kind_has_distinct_code() {
        let codes: std::collections::HashSet<_> =
            ContractKind::ALL.iter().map(|k| ContractTemplate::new(*k).code).collect();
        assert_eq!(codes.len(), ContractKind::ALL.len());
        assert_eq!(ContractTemplate::new(ContractKind::Bid).code().len(), 35);
    }

    #[test]
    fn args_are_pushed_in_reverse_order() {
        let template = ContractTemplate::new(ContractKind::Auction);
        let redeem = template.instantiate(&[ConstructorArg::Int(1), ConstructorArg::Int(2), ConstructorArg::Int(3)]).unwrap();
        let mut expected = vec![0x53, 0x52, 0x51];
        expected.extend_from_slice(template.code());
        assert_eq!(redeem.as_bytes(), expected.as_slice());
    }

    #[test]
    fn it_decodes_an_instantiated_contract() {
        let template = ContractTemplate::new(ContractKind::Factory);
        let args: Vec<ConstructorArg> = vec![
            vec![1u8, 2, 3].into(),
            b".bch".to_vec().into(),
            ConstructorArg::Int(144),
            ConstructorArg::Int(10_000_000),
            ConstructorArg::Int(50),
        ];
        let redeem = template.instantiate(&args).unwrap();
        let decoded = redeem.decode().unwrap();
        assert_eq!(decoded.kind, ContractKind::Factory);
        assert_eq!(decoded.args, args);
        assert_eq!(decoded.int_arg(2).unwrap(), 144);
        assert_eq!(decoded.bytes_arg(1).unwrap(), b".bch");
        assert!(decoded.int_arg(1).is_err());
    }

    #[test]
    fn partial_bytecode_completes_to_the_full_instantiation() {
        let template = ContractTemplate::new(ContractKind::Name);
        let partial = template.partial(&[ConstructorArg::Int(105_120)]).unwrap();
        let bound = partial.bind(&name_args()).unwrap();

        let mut all = vec![ConstructorArg::Int(105_120)];
        all.extend(name_args());
        let full = template.instantiate(&all).unwrap();
        assert_eq!(bound, full);
        assert_eq!(full.decode().unwrap().args, all);

        let recovered = PartialBytecode::decode(ContractKind::Name, partial.as_bytes()).unwrap();
        assert_eq!(recovered, partial);
        assert_eq!(recovered.bind(&name_args()).unwrap().locking_bytecode(), full.locking_bytecode());
    }

    #[test]
    fn different_names_have_different_addresses() {
        let partial = ContractTemplate::new(ContractKind::Name).partial(&[ConstructorArg::Int(10)]).unwrap();
        let mut other = name_args();
        other[0] = b"bob".to_vec().into();
        let a = partial.bind(&name_args()).unwrap().locking_bytecode();
        let b = partial.bind(&other).unwrap().locking_bytecode();
        assert_ne!(a, b);
        assert!(a.is_p2sh32());
    }

    #[test]
    fn it_rejects_bad_arguments() {
        let template = ContractTemplate::new(ContractKind::Registry);
        assert!(matches!(
            template.instantiate(&[]),
            Err(ScriptError::ArgumentCountMismatch { .. })
        ));
        assert!(matches!(
            template.instantiate(&[vec![1u8; 31].into()]),
            Err(ScriptError::InvalidArgument { index: 0, .. })
        ));
        let partial = ContractTemplate::new(ContractKind::Name).partial(&[ConstructorArg::Int(1)]).unwrap();
        assert!(partial.bind(&name_args()[..2]).is_err());
    }

    #[test]
    fn unknown_bytecode_is_rejected() {
        assert_eq!(decode_redeem_bytecode(&[0x51]), Err(ScriptError::UnknownTemplate));
        let mut bytes = vec![0x51];
        bytes.extend_from_slice(ContractTemplate::new(ContractKind::Bid).code());
        bytes[0] = 0x76;
        assert!(decode_redeem_bytecode(&bytes).is_err());
    }
}
