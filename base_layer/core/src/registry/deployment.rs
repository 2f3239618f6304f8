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

use std::collections::BTreeMap;

use bitcann_script::{
    ConstructorArg,
    ContractKind,
    ContractTemplate,
    LockingBytecode,
    PartialBytecode,
    RedeemBytecode,
    ScriptError,
};
use log::*;

use crate::{
    consensus::DeploymentParams,
    covenants::{ContractCall, FactoryCovenant, NameCall},
    registry::RegistryError,
    transactions::transaction_components::UnlockingData,
};

const LOG_TARGET: &str = "c::reg::deployment";

fn script_int(contract: ContractKind, index: usize, value: u64) -> Result<ConstructorArg, RegistryError> {
    let value = i64::try_from(value).map_err(|_| ScriptError::InvalidArgument {
        contract: contract.label(),
        index,
        reason: format!("{} does not fit a script number", value),
    })?;
    Ok(ConstructorArg::Int(value))
}

/// Every contract of one registry deployment, instantiated from its parameters. The Name contract is only partially
/// bound: each registered name completes it with its own name, tld and category.
#[derive(Debug, Clone)]
pub struct Deployment {
    params: DeploymentParams,
    contracts: BTreeMap<ContractKind, RedeemBytecode>,
    name_partial: PartialBytecode,
}

impl Deployment {
    pub fn new(params: DeploymentParams) -> Result<Self, RegistryError> {
        let name_partial = ContractTemplate::new(ContractKind::Name)
            .partial(&[ConstructorArg::Int(i64::from(params.inactivity_expiry_time()))])?;

        let mut contracts = BTreeMap::new();
        for kind in ContractKind::ALL {
            let args = match kind {
                ContractKind::Registry => vec![ConstructorArg::from(params.name_category().as_bytes())],
                ContractKind::Auction => vec![
                    script_int(kind, 0, params.min_starting_bid().as_u64())?,
                    script_int(kind, 1, params.auction_price_decay_points())?,
                    script_int(kind, 2, params.min_auction_price().as_u64())?,
                ],
                ContractKind::Bid => vec![script_int(kind, 0, params.min_bid_increase_percentage())?],
                ContractKind::ConflictResolver | ContractKind::NameEnforcer | ContractKind::Accumulator => Vec::new(),
                ContractKind::Factory => vec![
                    ConstructorArg::Bytes(name_partial.as_bytes().to_vec()),
                    ConstructorArg::Bytes(params.tld().to_vec()),
                    ConstructorArg::Int(i64::from(params.min_wait_time())),
                    script_int(kind, 3, params.platform_fee_threshold().as_u64())?,
                    script_int(kind, 4, params.max_platform_fee_percentage())?,
                ],
                ContractKind::Name => continue,
            };
            let redeem = ContractTemplate::new(kind).instantiate(&args)?;
            debug!(
                target: LOG_TARGET,
                "{} contract at {}",
                kind,
                redeem.locking_bytecode()
            );
            contracts.insert(kind, redeem);
        }

        Ok(Self {
            params,
            contracts,
            name_partial,
        })
    }

    pub fn params(&self) -> &DeploymentParams {
        &self.params
    }

    /// The redeem bytecode of a deployed contract. The per-name Name contract has none, see
    /// [Deployment::name_redeem_bytecode].
    pub fn redeem_bytecode(&self, kind: ContractKind) -> Option<&RedeemBytecode> {
        self.contracts.get(&kind)
    }

    pub fn locking_bytecode(&self, kind: ContractKind) -> Option<LockingBytecode> {
        self.redeem_bytecode(kind).map(RedeemBytecode::locking_bytecode)
    }

    pub fn registry_locking_bytecode(&self) -> Result<LockingBytecode, RegistryError> {
        self.locking_bytecode(ContractKind::Registry)
            .ok_or(RegistryError::UnknownContract(ContractKind::Registry))
    }

    pub fn name_partial(&self) -> &PartialBytecode {
        &self.name_partial
    }

    /// Completes the Name contract for `name`, exactly as the Factory derives it
    pub fn name_redeem_bytecode(&self, name: &[u8]) -> Result<RedeemBytecode, RegistryError> {
        Ok(self.name_partial.bind(&[
            ConstructorArg::Bytes(name.to_vec()),
            ConstructorArg::Bytes(self.params.tld().to_vec()),
            ConstructorArg::from(self.params.name_category().as_bytes()),
        ])?)
    }

    pub fn name_locking_bytecode(&self, name: &[u8]) -> Result<LockingBytecode, RegistryError> {
        Ok(self.name_redeem_bytecode(name)?.locking_bytecode())
    }

    /// The Factory covenant as decoded from its deployed redeem bytecode
    pub fn factory_covenant(&self) -> Result<FactoryCovenant, RegistryError> {
        let redeem = self
            .redeem_bytecode(ContractKind::Factory)
            .ok_or(RegistryError::UnknownContract(ContractKind::Factory))?;
        Ok(FactoryCovenant::from_contract(&redeem.decode()?)?)
    }

    /// Unlocking data that invokes `call` on the deployed contract exposing it
    pub fn unlocking(&self, call: ContractCall) -> Result<UnlockingData, RegistryError> {
        let kind = call.contract_kind();
        let redeem = self.redeem_bytecode(kind).ok_or(RegistryError::UnknownContract(kind))?;
        Ok(UnlockingData::covenant(redeem.clone(), call))
    }

    /// Unlocking data that invokes `call` on the Name instance of `name`
    pub fn name_unlocking(&self, name: &[u8], call: NameCall) -> Result<UnlockingData, RegistryError> {
        Ok(UnlockingData::covenant(
            self.name_redeem_bytecode(name)?,
            ContractCall::Name(call),
        ))
    }
}

#[cfg(test)]
mod test {
    use bitcann_common::configuration::Network;
    use bitcann_common_types::{token::TokenCategory, types::Hash256};

    use super::*;
    use crate::consensus::DeploymentParamsBuilder;

    fn deployment() -> Deployment {
        let category = TokenCategory::new(Hash256::new([0x5a; 32]));
        Deployment::new(DeploymentParams::for_network(Network::RegTest, category)).unwrap()
    }

    #[test]
    fn every_contract_has_a_distinct_address() {
        let deployment = deployment();
        let mut addresses = ContractKind::ALL
            .iter()
            .filter_map(|kind| deployment.locking_bytecode(*kind))
            .collect::<Vec<_>>();
        assert_eq!(addresses.len(), 7);
        assert!(addresses.iter().all(LockingBytecode::is_p2sh32));
        addresses.sort();
        addresses.dedup();
        assert_eq!(addresses.len(), 7);
        assert!(deployment.locking_bytecode(ContractKind::Name).is_none());
    }

    #[test]
    fn the_factory_derives_the_same_name_address() {
        let deployment = deployment();
        let factory = deployment.factory_covenant().unwrap();
        let category = deployment.params().name_category();
        assert_eq!(
            factory.name_locking_bytecode(b"alice", category).unwrap(),
            deployment.name_locking_bytecode(b"alice").unwrap()
        );
        assert_ne!(
            deployment.name_locking_bytecode(b"alice").unwrap(),
            deployment.name_locking_bytecode(b"bob").unwrap()
        );
    }

    #[test]
    fn parameters_change_the_addresses() {
        let a = deployment();
        let b = Deployment::new(
            DeploymentParamsBuilder::new(Network::RegTest, a.params().name_category())
                .with_min_bid_increase_percentage(10)
                .build(),
        )
        .unwrap();
        assert_ne!(a.locking_bytecode(ContractKind::Bid), b.locking_bytecode(ContractKind::Bid));
        assert_eq!(
            a.locking_bytecode(ContractKind::Auction),
            b.locking_bytecode(ContractKind::Auction)
        );
    }

    #[test]
    fn the_name_instance_decodes_to_its_arguments() {
        let deployment = deployment();
        let contract = deployment.name_redeem_bytecode(b"alice").unwrap().decode().unwrap();
        assert_eq!(contract.kind, ContractKind::Name);
        assert_eq!(contract.int_arg(0).unwrap(), 10);
        assert_eq!(contract.bytes_arg(1).unwrap(), b"alice");
        assert_eq!(contract.bytes_arg(2).unwrap(), b".bch");
    }
}
