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

use bitcann_common_types::{amount::Satoshis, registration_id::RegistrationId};
use bitcann_script::ContractKind;
use log::*;

use crate::{
    covenants::RegistryNft,
    registry::{Deployment, RegistryError},
    transactions::transaction_components::TransactionOutput,
};

const LOG_TARGET: &str = "c::reg::genesis";

/// Value carried by every state UTXO of the registry
pub const DUST_VALUE: Satoshis = Satoshis(1_000);

/// The id issued by a freshly deployed Counter
pub const FIRST_REGISTRATION_ID: RegistrationId = RegistrationId::new(1);

impl Deployment {
    /// The thread capsule authorising `kind` at the Registry, carrying `amount` parked tokens
    pub fn thread_capsule(&self, kind: ContractKind, amount: u64) -> Result<TransactionOutput, RegistryError> {
        let contract = self.locking_bytecode(kind).ok_or(RegistryError::UnknownContract(kind))?;
        let token = RegistryNft::ThreadCapsule { contract }.to_token(self.params().name_category(), amount);
        Ok(TransactionOutput::new(DUST_VALUE, self.registry_locking_bytecode()?).with_token(token))
    }

    /// The initial state of the registry. It has to be created by the transaction that mints the name category.
    ///
    /// - one thread capsule per auxiliary contract, held by the Registry
    /// - the Counter, issuing [FIRST_REGISTRATION_ID] with the full mint budget
    /// - the name-minting NFT
    /// - one UTXO per auxiliary contract
    pub fn genesis_outputs(&self) -> Result<Vec<TransactionOutput>, RegistryError> {
        let category = self.params().name_category();
        let registry = self.registry_locking_bytecode()?;

        let mut outputs = ContractKind::AUXILIARY
            .iter()
            .map(|kind| self.thread_capsule(*kind, 0))
            .collect::<Result<Vec<_>, _>>()?;

        let counter = RegistryNft::Counter {
            next_id: FIRST_REGISTRATION_ID,
        };
        outputs.push(
            TransactionOutput::new(DUST_VALUE, registry.clone())
                .with_token(counter.to_token(category, self.params().mint_budget())),
        );
        outputs.push(
            TransactionOutput::new(DUST_VALUE, registry).with_token(RegistryNft::NameMinting.to_token(category, 0)),
        );

        for kind in ContractKind::AUXILIARY {
            let contract = self.locking_bytecode(kind).ok_or(RegistryError::UnknownContract(kind))?;
            outputs.push(TransactionOutput::new(DUST_VALUE, contract));
        }
        info!(
            target: LOG_TARGET,
            "Genesis of category {} with {} outputs",
            category,
            outputs.len()
        );
        Ok(outputs)
    }
}

#[cfg(test)]
mod test {
    use bitcann_common::configuration::Network;
    use bitcann_common_types::{
        token::{NftCapability, TokenCategory},
        types::Hash256,
    };

    use super::*;
    use crate::consensus::DeploymentParams;

    #[test]
    fn it_creates_the_initial_state() {
        let category = TokenCategory::new(Hash256::new([7; 32]));
        let deployment = Deployment::new(DeploymentParams::for_network(Network::RegTest, category)).unwrap();
        let outputs = deployment.genesis_outputs().unwrap();
        assert_eq!(outputs.len(), 14);

        let registry = deployment.registry_locking_bytecode().unwrap();
        let tld = deployment.params().tld();
        let held = outputs
            .iter()
            .filter(|o| o.locking_bytecode == registry)
            .map(|o| RegistryNft::from_token(o.token.as_ref().unwrap(), tld).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(held.len(), 8);
        for kind in ContractKind::AUXILIARY {
            let contract = deployment.locking_bytecode(kind).unwrap();
            assert!(held.contains(&RegistryNft::ThreadCapsule {
                contract: contract.clone()
            }));
            assert_eq!(outputs.iter().filter(|o| o.locking_bytecode == contract).count(), 1);
        }
        assert!(held.contains(&RegistryNft::Counter {
            next_id: FIRST_REGISTRATION_ID
        }));
        assert!(held.contains(&RegistryNft::NameMinting));

        let counter = outputs
            .iter()
            .find(|o| o.nft_capability() == Some(NftCapability::Minting) && !o.nft_commitment().unwrap().is_empty())
            .unwrap();
        assert_eq!(counter.token_amount(), deployment.params().mint_budget());
    }
}
