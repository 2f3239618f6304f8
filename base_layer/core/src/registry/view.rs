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

use bitcann_common_types::{
    amount::Satoshis,
    registration_id::RegistrationId,
    token::NftCapability,
    types::PubKeyHash,
};
use bitcann_script::{ContractKind, LockingBytecode};
use log::*;

use crate::{
    chain_storage::{ConfirmedTransaction, Utxo, UtxoFilter, UtxoSource},
    covenants::{
        commitment::{decode_registration_id, OwnershipCommitment},
        records::{extract_records, resolve_records},
        RegistryNft,
    },
    registry::{Deployment, RegistryError},
};

const LOG_TARGET: &str = "c::reg::view";

/// The Counter NFT and the registration id it issues next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterState {
    pub utxo: Utxo,
    pub next_id: RegistrationId,
    /// Token amount left to hand out as registration ids
    pub budget: u64,
}

/// A live auction NFT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionState {
    pub utxo: Utxo,
    pub id: RegistrationId,
    pub bidder: PubKeyHash,
    pub name: Vec<u8>,
    pub bid: Satoshis,
}

/// The auth NFTs held by the Name instance of one name. More than one pair exists only while an owner conflict is
/// unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameInstance {
    pub locking_bytecode: LockingBytecode,
    pub external_auths: Vec<Utxo>,
    /// Sorted by registration id, oldest registration first
    pub internal_auths: Vec<(RegistrationId, Utxo)>,
}

impl NameInstance {
    pub fn is_registered(&self) -> bool {
        !self.internal_auths.is_empty()
    }

    pub fn has_conflict(&self) -> bool {
        self.internal_auths.len() > 1
    }
}

/// Read-only queries over the state of one deployment
pub struct RegistryView<'a, S: ?Sized> {
    source: &'a S,
    deployment: &'a Deployment,
}

impl<'a, S: UtxoSource + ?Sized> RegistryView<'a, S> {
    pub fn new(source: &'a S, deployment: &'a Deployment) -> Self {
        Self { source, deployment }
    }

    fn registry_nfts(&self, capability: NftCapability) -> Result<Vec<(Utxo, RegistryNft)>, RegistryError> {
        let filter = UtxoFilter::new()
            .locked_by(self.deployment.registry_locking_bytecode()?)
            .with_category(self.deployment.params().name_category())
            .with_capability(capability);
        let tld = self.deployment.params().tld();
        let mut nfts = Vec::new();
        for utxo in self.source.fetch_utxos(&filter)? {
            let decoded = utxo
                .output
                .token
                .as_ref()
                .map(|token| RegistryNft::from_token(token, tld));
            match decoded {
                Some(Ok(nft)) => nfts.push((utxo, nft)),
                Some(Err(e)) => warn!(target: LOG_TARGET, "Ignoring malformed registry NFT {}: {}", utxo.outpoint, e),
                None => {},
            }
        }
        Ok(nfts)
    }

    /// Every thread capsule authorising `kind`
    pub fn thread_capsules(&self, kind: ContractKind) -> Result<Vec<Utxo>, RegistryError> {
        let contract = self
            .deployment
            .locking_bytecode(kind)
            .ok_or(RegistryError::UnknownContract(kind))?;
        Ok(self
            .registry_nfts(NftCapability::None)?
            .into_iter()
            .filter_map(|(utxo, nft)| match nft {
                RegistryNft::ThreadCapsule { contract: c } if c == contract => Some(utxo),
                _ => None,
            })
            .collect())
    }

    pub fn thread_capsule(&self, kind: ContractKind) -> Result<Utxo, RegistryError> {
        self.thread_capsules(kind)?
            .into_iter()
            .next()
            .ok_or_else(|| RegistryError::not_found("thread capsule", kind))
    }

    /// The UTXO of an auxiliary contract
    pub fn contract_utxo(&self, kind: ContractKind) -> Result<Utxo, RegistryError> {
        let contract = self
            .deployment
            .locking_bytecode(kind)
            .ok_or(RegistryError::UnknownContract(kind))?;
        self.source
            .fetch_utxos(&UtxoFilter::new().locked_by(contract))?
            .into_iter()
            .find(|utxo| utxo.output.token.is_none())
            .ok_or_else(|| RegistryError::not_found("contract UTXO", kind))
    }

    pub fn counter(&self) -> Result<CounterState, RegistryError> {
        self.registry_nfts(NftCapability::Minting)?
            .into_iter()
            .find_map(|(utxo, nft)| match nft {
                RegistryNft::Counter { next_id } => Some(CounterState {
                    budget: utxo.output.token_amount(),
                    utxo,
                    next_id,
                }),
                _ => None,
            })
            .ok_or_else(|| RegistryError::not_found("Counter", "registry"))
    }

    pub fn name_minting(&self) -> Result<Utxo, RegistryError> {
        self.registry_nfts(NftCapability::Minting)?
            .into_iter()
            .find_map(|(utxo, nft)| matches!(nft, RegistryNft::NameMinting).then_some(utxo))
            .ok_or_else(|| RegistryError::not_found("name minting NFT", "registry"))
    }

    /// Every live auction, lowest registration id first
    pub fn live_auctions(&self) -> Result<Vec<AuctionState>, RegistryError> {
        let mut auctions = self
            .registry_nfts(NftCapability::Mutable)?
            .into_iter()
            .filter_map(|(utxo, nft)| match nft {
                RegistryNft::Auction(auction) => Some(AuctionState {
                    id: RegistrationId::new(utxo.output.token_amount()),
                    bid: utxo.output.value,
                    bidder: auction.bidder,
                    name: auction.name,
                    utxo,
                }),
                _ => None,
            })
            .collect::<Vec<_>>();
        auctions.sort_by_key(|auction| auction.id);
        Ok(auctions)
    }

    pub fn auctions_by_name(&self, name: &[u8]) -> Result<Vec<AuctionState>, RegistryError> {
        Ok(self
            .live_auctions()?
            .into_iter()
            .filter(|auction| auction.name == name)
            .collect())
    }

    pub fn name_instance(&self, name: &[u8]) -> Result<NameInstance, RegistryError> {
        let locking_bytecode = self.deployment.name_locking_bytecode(name)?;
        let filter = UtxoFilter::new()
            .locked_by(locking_bytecode.clone())
            .with_category(self.deployment.params().name_category())
            .with_capability(NftCapability::None);
        let mut external_auths = Vec::new();
        let mut internal_auths = Vec::new();
        for utxo in self.source.fetch_utxos(&filter)? {
            let commitment = utxo.output.nft_commitment().unwrap_or_default();
            if commitment.is_empty() {
                external_auths.push(utxo);
            } else {
                match decode_registration_id(commitment) {
                    Ok(id) => internal_auths.push((id, utxo)),
                    Err(e) => warn!(target: LOG_TARGET, "Ignoring malformed auth {}: {}", utxo.outpoint, e),
                }
            }
        }
        internal_auths.sort_by_key(|(id, _)| *id);
        Ok(NameInstance {
            locking_bytecode,
            external_auths,
            internal_auths,
        })
    }

    /// Ownership NFTs of `name`, wherever they are held, lowest registration id first
    pub fn ownership_nfts(&self, name: &[u8]) -> Result<Vec<Utxo>, RegistryError> {
        let filter = UtxoFilter::new()
            .with_category(self.deployment.params().name_category())
            .with_capability(NftCapability::None);
        let tld = self.deployment.params().tld();
        let mut owned = self
            .source
            .fetch_utxos(&filter)?
            .into_iter()
            .filter_map(|utxo| {
                let commitment = utxo.output.nft_commitment()?;
                let ownership = OwnershipCommitment::decode(commitment, tld).ok()?;
                (ownership.name == name).then_some((ownership.id, utxo))
            })
            .collect::<Vec<_>>();
        owned.sort_by_key(|(id, _)| *id);
        Ok(owned.into_iter().map(|(_, utxo)| utxo).collect())
    }

    /// The live records of `name`, replayed from `history` in publication order
    pub fn name_records(&self, history: &[ConfirmedTransaction], name: &[u8]) -> Result<Vec<Vec<u8>>, RegistryError> {
        let name_locking = self.deployment.name_locking_bytecode(name)?;
        Ok(resolve_records(history.iter().flat_map(|confirmed| {
            extract_records(&confirmed.transaction, &confirmed.source_outputs, &name_locking)
        })))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_helpers::TestRegistry;

    #[test]
    fn it_reads_the_genesis_state() {
        let registry = TestRegistry::new();
        let view = registry.view();
        let counter = view.counter().unwrap();
        assert_eq!(counter.next_id, RegistrationId::new(1));
        assert_eq!(counter.budget, registry.params().mint_budget());
        for kind in ContractKind::AUXILIARY {
            assert_eq!(view.thread_capsules(kind).unwrap().len(), 1);
            assert!(view.contract_utxo(kind).unwrap().output.token.is_none());
        }
        view.name_minting().unwrap();
        assert!(view.live_auctions().unwrap().is_empty());
        assert!(!view.name_instance(b"alice").unwrap().is_registered());
    }

    #[test]
    fn auctions_are_ordered_by_id() {
        let registry = TestRegistry::new();
        let alice = PubKeyHash::new([1; 20]);
        let bob = PubKeyHash::new([2; 20]);
        registry.start_auction(b"zed", &alice, Satoshis(1_000_000)).unwrap();
        registry.start_auction(b"amy", &bob, Satoshis(1_100_000)).unwrap();

        let view = registry.view();
        let auctions = view.live_auctions().unwrap();
        assert_eq!(auctions.len(), 2);
        assert_eq!(auctions[0].id, RegistrationId::new(1));
        assert_eq!(auctions[0].name, b"zed");
        assert_eq!(auctions[0].bidder, alice);
        assert_eq!(auctions[1].id, RegistrationId::new(2));
        assert_eq!(auctions[1].bid, Satoshis(1_100_000));
        assert_eq!(view.auctions_by_name(b"amy").unwrap()[0].bidder, bob);
        assert_eq!(view.counter().unwrap().next_id, RegistrationId::new(3));
    }

    #[test]
    fn it_finds_a_registered_name() {
        let registry = TestRegistry::new();
        let owner = PubKeyHash::new([3; 20]);
        registry.register(b"carol", &owner, Satoshis(1_000_000)).unwrap();

        let view = registry.view();
        let instance = view.name_instance(b"carol").unwrap();
        assert!(instance.is_registered());
        assert!(!instance.has_conflict());
        assert_eq!(instance.external_auths.len(), 1);
        assert_eq!(instance.internal_auths[0].0, RegistrationId::new(1));

        let ownership = view.ownership_nfts(b"carol").unwrap();
        assert_eq!(ownership.len(), 1);
        assert_eq!(ownership[0].output.locking_bytecode, LockingBytecode::p2pkh(&owner));
        assert!(view.ownership_nfts(b"caro").unwrap().is_empty());
        assert!(view.live_auctions().unwrap().is_empty());
    }
}
