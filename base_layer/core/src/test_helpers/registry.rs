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

use bitcann_common::configuration::Network;
use bitcann_common_types::{
    amount::Satoshis,
    registration_id::RegistrationId,
    token::TokenCategory,
    types::{Hash256, PubKeyHash},
};
use bitcann_script::{ContractKind, LockingBytecode};

use crate::{
    chain_storage::{Ledger, Utxo, UtxoSource},
    consensus::DeploymentParams,
    covenants::{
        commitment::{AuctionCommitment, OwnershipCommitment},
        ContractCall,
        NameCall,
        RegistryNft,
    },
    registry::{Deployment, RegistryError, RegistryView, DUST_VALUE},
    transactions::{
        transaction_components::{Transaction, TransactionOutput, UnlockingData},
        TransactionBuilder,
    },
};

/// Miner fee paid by every funded transaction the fixture builds
pub const FEE: Satoshis = Satoshis(1_000);
/// Funding inputs carry this much on top of what the transaction spends, returned as change
pub const FUNDING_MARGIN: Satoshis = Satoshis(100_000);

/// A regtest deployment seeded into an in-memory ledger, with builders for every protocol transaction. Builders only
/// assemble transactions from the current UTXO set; `submit` applies them.
#[derive(Clone)]
pub struct TestRegistry {
    ledger: Ledger,
    deployment: Deployment,
}

impl Default for TestRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRegistry {
    /// A regtest deployment with a random name category
    pub fn new() -> Self {
        let category = TokenCategory::new(Hash256::random());
        Self::with_params(DeploymentParams::for_network(Network::RegTest, category))
    }

    pub fn with_params(params: DeploymentParams) -> Self {
        let deployment = Deployment::new(params).unwrap();
        let ledger = Ledger::in_memory();
        ledger.seed(deployment.genesis_outputs().unwrap()).unwrap();
        Self { ledger, deployment }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    pub fn params(&self) -> &DeploymentParams {
        self.deployment.params()
    }

    pub fn view(&self) -> RegistryView<'_, Ledger> {
        RegistryView::new(&self.ledger, &self.deployment)
    }

    /// The outputs spent by `transaction`, which must all be unspent
    pub fn source_outputs(&self, transaction: &Transaction) -> Vec<TransactionOutput> {
        transaction
            .inputs
            .iter()
            .map(|input| self.ledger.fetch_utxo(&input.outpoint).unwrap().unwrap().output)
            .collect()
    }

    pub fn submit(&self, transaction: &Transaction) -> Result<Vec<Utxo>, RegistryError> {
        Ok(self.ledger.submit(transaction)?)
    }

    pub fn mine_blocks(&self, blocks: u64) -> Result<u64, RegistryError> {
        Ok(self.ledger.mine_blocks(blocks)?)
    }

    /// Seeds a P2PKH output of `value` owned by `owner`
    pub fn fund(&self, owner: &PubKeyHash, value: Satoshis) -> Result<Utxo, RegistryError> {
        let output = TransactionOutput::new(value, LockingBytecode::p2pkh(owner));
        self.ledger
            .seed(vec![output])?
            .pop()
            .ok_or_else(|| RegistryError::not_found("funding", owner))
    }

    /// Seeds an additional thread capsule for `kind` holding `amount` parked tokens
    pub fn seed_thread_capsule(&self, kind: ContractKind, amount: u64) -> Utxo {
        let capsule = self.deployment.thread_capsule(kind, amount).unwrap();
        self.ledger.seed(vec![capsule]).unwrap().remove(0)
    }

    fn call(&self, call: ContractCall) -> Result<UnlockingData, RegistryError> {
        self.deployment.unlocking(call)
    }

    fn registry_output(&self, value: Satoshis, nft: &RegistryNft, amount: u64) -> Result<TransactionOutput, RegistryError> {
        let token = nft.to_token(self.params().name_category(), amount);
        Ok(TransactionOutput::new(value, self.deployment.registry_locking_bytecode()?).with_token(token))
    }

    /// `capsule` with `amount` more parked tokens
    fn accumulated(capsule: &Utxo, amount: u64) -> TransactionOutput {
        let mut output = capsule.output.clone();
        if let Some(token) = output.token.as_mut() {
            token.amount += amount;
        }
        output
    }

    /// Opens the auction for `name`, funded by `bidder`
    pub fn build_auction(&self, name: &[u8], bidder: &PubKeyHash, bid: Satoshis) -> Result<Transaction, RegistryError> {
        let view = self.view();
        let capsule = view.thread_capsule(ContractKind::Auction)?;
        let contract = view.contract_utxo(ContractKind::Auction)?;
        let counter = view.counter()?;
        let funding = self.fund(bidder, bid + FUNDING_MARGIN)?;

        let id = counter.next_id;
        let next_id = RegistryNft::Counter {
            next_id: RegistrationId::new(id.as_u64() + 1),
        };
        let auction = RegistryNft::Auction(AuctionCommitment::new(*bidder, name.to_vec()));
        Ok(TransactionBuilder::new()
            .add_input(&capsule, self.call(ContractCall::Registry)?)
            .add_input(&contract, self.call(ContractCall::Auction { name: name.to_vec() })?)
            .add_input(&counter.utxo, self.call(ContractCall::Registry)?)
            .add_input(&funding, UnlockingData::p2pkh(*bidder))
            .add_output(capsule.output.clone())
            .add_output(contract.output.clone())
            .add_output(self.registry_output(
                counter.utxo.output.value,
                &next_id,
                counter.budget - id.as_u64(),
            )?)
            .add_output(self.registry_output(bid, &auction, id.as_u64())?)
            .add_output(TransactionOutput::new(
                FUNDING_MARGIN - FEE,
                LockingBytecode::p2pkh(bidder),
            ))
            .build()?)
    }

    /// Opens and submits the auction for `name`, returning the auction NFT
    pub fn start_auction(&self, name: &[u8], bidder: &PubKeyHash, bid: Satoshis) -> Result<Utxo, RegistryError> {
        let tx = self.build_auction(name, bidder, bid)?;
        let mut created = self.submit(&tx)?;
        Ok(created.remove(3))
    }

    /// Outbids the oldest live auction for `name`
    pub fn build_bid(&self, name: &[u8], bidder: &PubKeyHash, bid: Satoshis) -> Result<Transaction, RegistryError> {
        let view = self.view();
        let previous = view
            .auctions_by_name(name)?
            .into_iter()
            .next()
            .ok_or_else(|| RegistryError::not_found("auction", String::from_utf8_lossy(name)))?;
        let capsule = view.thread_capsule(ContractKind::Bid)?;
        let contract = view.contract_utxo(ContractKind::Bid)?;
        let funding = self.fund(bidder, bid + FUNDING_MARGIN)?;

        let auction = RegistryNft::Auction(AuctionCommitment::new(*bidder, name.to_vec()));
        Ok(TransactionBuilder::new()
            .add_input(&capsule, self.call(ContractCall::Registry)?)
            .add_input(&contract, self.call(ContractCall::Bid)?)
            .add_input(&previous.utxo, self.call(ContractCall::Registry)?)
            .add_input(&funding, UnlockingData::p2pkh(*bidder))
            .add_output(capsule.output.clone())
            .add_output(contract.output.clone())
            .add_output(self.registry_output(bid, &auction, previous.id.as_u64())?)
            .add_output(TransactionOutput::new(
                previous.bid,
                LockingBytecode::p2pkh(&previous.bidder),
            ))
            .add_output(TransactionOutput::new(
                FUNDING_MARGIN - FEE,
                LockingBytecode::p2pkh(bidder),
            ))
            .build()?)
    }

    /// Cancels `invalid` in favour of `valid`. The bid of the cancelled auction goes to a fresh address.
    pub fn build_conflict_resolution(&self, valid: &Utxo, invalid: &Utxo) -> Result<Transaction, RegistryError> {
        let view = self.view();
        let capsule = view.thread_capsule(ContractKind::ConflictResolver)?;
        let contract = view.contract_utxo(ContractKind::ConflictResolver)?;
        Ok(TransactionBuilder::new()
            .add_input(&capsule, self.call(ContractCall::Registry)?)
            .add_input(&contract, self.call(ContractCall::ConflictResolver)?)
            .add_input(valid, self.call(ContractCall::Registry)?)
            .add_input(invalid, self.call(ContractCall::Registry)?)
            .add_output(Self::accumulated(&capsule, invalid.output.token_amount()))
            .add_output(contract.output.clone())
            .add_output(valid.output.clone())
            .add_output(TransactionOutput::new(
                invalid.output.value,
                LockingBytecode::p2pkh(&PubKeyHash::random()),
            ))
            .build()?)
    }

    /// Cancels `auction` by pointing at its 1-based `character_number`
    pub fn build_name_enforcement(&self, auction: &Utxo, character_number: i64) -> Result<Transaction, RegistryError> {
        let view = self.view();
        let capsule = view.thread_capsule(ContractKind::NameEnforcer)?;
        let contract = view.contract_utxo(ContractKind::NameEnforcer)?;
        Ok(TransactionBuilder::new()
            .add_input(&capsule, self.call(ContractCall::Registry)?)
            .add_input(&contract, self.call(ContractCall::NameEnforcer { character_number })?)
            .add_input(auction, self.call(ContractCall::Registry)?)
            .add_output(Self::accumulated(&capsule, auction.output.token_amount()))
            .add_output(contract.output.clone())
            .add_output(TransactionOutput::new(
                auction.output.value,
                LockingBytecode::p2pkh(&PubKeyHash::random()),
            ))
            .build()?)
    }

    /// Returns the tokens parked on `thread` to the Counter. Input 0 is another Accumulator capsule.
    pub fn build_accumulation(&self, thread: &Utxo) -> Result<Transaction, RegistryError> {
        let view = self.view();
        let capsule = view
            .thread_capsules(ContractKind::Accumulator)?
            .into_iter()
            .find(|capsule| capsule.outpoint != thread.outpoint)
            .ok_or_else(|| RegistryError::not_found("thread capsule", ContractKind::Accumulator))?;
        let contract = view.contract_utxo(ContractKind::Accumulator)?;
        let counter = view.counter()?;
        let payer = PubKeyHash::random();
        let funding = self.fund(&payer, FUNDING_MARGIN)?;

        let mut emptied = thread.output.clone();
        if let Some(token) = emptied.token.as_mut() {
            token.amount = 0;
        }
        Ok(TransactionBuilder::new()
            .add_input(&capsule, self.call(ContractCall::Registry)?)
            .add_input(&contract, self.call(ContractCall::Accumulator)?)
            .add_input(&counter.utxo, self.call(ContractCall::Registry)?)
            .add_input(thread, self.call(ContractCall::Registry)?)
            .add_input(&funding, UnlockingData::p2pkh(payer))
            .add_output(capsule.output.clone())
            .add_output(contract.output.clone())
            .add_output(Self::accumulated(&counter.utxo, thread.output.token_amount()))
            .add_output(emptied)
            .add_output(TransactionOutput::new(
                FUNDING_MARGIN - FEE,
                LockingBytecode::p2pkh(&payer),
            ))
            .build()?)
    }

    /// Finalises `auction`, optionally paying `platform_fee` at output 6. Whatever the bid leaves after the dust
    /// outputs and the fee goes to the miner.
    pub fn build_finalization(
        &self,
        auction: &Utxo,
        platform_fee: Option<Satoshis>,
    ) -> Result<Transaction, RegistryError> {
        let view = self.view();
        let capsule = view.thread_capsule(ContractKind::Factory)?;
        let contract = view.contract_utxo(ContractKind::Factory)?;
        let minting = view.name_minting()?;

        let commitment = auction
            .output
            .nft_commitment()
            .ok_or_else(|| RegistryError::not_found("auction commitment", auction.outpoint))?;
        let AuctionCommitment { bidder, name } = AuctionCommitment::decode(commitment)?;
        let id = RegistrationId::new(auction.output.token_amount());
        let category = self.params().name_category();
        let name_locking = self.deployment.name_locking_bytecode(&name)?;
        let ownership = RegistryNft::Ownership(OwnershipCommitment::new(id, name, self.params().tld().to_vec()));

        let mut builder = TransactionBuilder::new()
            .add_input(&capsule, self.call(ContractCall::Registry)?)
            .add_input(&contract, self.call(ContractCall::Factory)?)
            .add_input(&minting, self.call(ContractCall::Registry)?)
            .add_input_with_sequence(
                auction,
                self.call(ContractCall::Registry)?,
                self.params().min_wait_time(),
            )
            .add_output(Self::accumulated(&capsule, id.as_u64()))
            .add_output(contract.output.clone())
            .add_output(minting.output.clone())
            .add_output(
                TransactionOutput::new(DUST_VALUE, name_locking.clone())
                    .with_token(RegistryNft::ExternalAuth.to_token(category, 0)),
            )
            .add_output(
                TransactionOutput::new(DUST_VALUE, name_locking)
                    .with_token(RegistryNft::InternalAuth { id }.to_token(category, 0)),
            )
            .add_output(
                TransactionOutput::new(DUST_VALUE, LockingBytecode::p2pkh(&bidder))
                    .with_token(ownership.to_token(category, 0)),
            );
        if let Some(fee) = platform_fee {
            builder = builder.add_output(TransactionOutput::new(
                fee,
                LockingBytecode::p2pkh(&PubKeyHash::new([0xfe; 20])),
            ));
        }
        Ok(builder.build()?)
    }

    /// Runs a full registration of `name` for `owner`: auction, minimum wait and finalisation
    pub fn register(&self, name: &[u8], owner: &PubKeyHash, bid: Satoshis) -> Result<Transaction, RegistryError> {
        let auction = self.start_auction(name, owner, bid)?;
        self.mine_blocks(u64::from(self.params().min_wait_time()))?;
        let tx = self.build_finalization(&auction, None)?;
        self.submit(&tx)?;
        Ok(tx)
    }

    /// Registers `name` twice by finalising two concurrent auctions, `first` winning the older one
    pub fn register_duplicate(&self, name: &[u8], first: &PubKeyHash, second: &PubKeyHash) -> Result<(), RegistryError> {
        let older = self.start_auction(name, first, Satoshis(1_000_000))?;
        let newer = self.start_auction(name, second, Satoshis(1_000_000))?;
        self.mine_blocks(u64::from(self.params().min_wait_time()))?;
        for auction in [older, newer] {
            let tx = self.build_finalization(&auction, None)?;
            self.submit(&tx)?;
        }
        Ok(())
    }

    fn auths(&self, name: &[u8]) -> Result<(Utxo, RegistrationId, Utxo), RegistryError> {
        let instance = self.view().name_instance(name)?;
        let not_registered = || RegistryError::not_found("name instance", String::from_utf8_lossy(name));
        let external = instance.external_auths.into_iter().next().ok_or_else(not_registered)?;
        let (id, internal) = instance.internal_auths.into_iter().next().ok_or_else(not_registered)?;
        Ok((external, id, internal))
    }

    fn ownership_nft(&self, name: &[u8], id: RegistrationId) -> Result<(Utxo, PubKeyHash), RegistryError> {
        let tld = self.params().tld();
        let utxo = self
            .view()
            .ownership_nfts(name)?
            .into_iter()
            .find(|utxo| {
                utxo.output
                    .nft_commitment()
                    .and_then(|c| OwnershipCommitment::decode(c, tld).ok())
                    .map_or(false, |ownership| ownership.id == id)
            })
            .ok_or_else(|| RegistryError::not_found("ownership NFT", id))?;
        let owner = utxo
            .output
            .locking_bytecode
            .as_p2pkh()
            .ok_or_else(|| RegistryError::not_found("owner", utxo.outpoint))?;
        Ok((utxo, owner))
    }

    fn record_outputs(records: &[&[u8]]) -> Vec<TransactionOutput> {
        records
            .iter()
            .map(|record| TransactionOutput::new(Satoshis(0), LockingBytecode::op_return(&[*record])))
            .collect()
    }

    /// The owner spends the internal auth of `name` together with the ownership NFT and publishes `records`
    pub fn build_use_auth_internal(&self, name: &[u8], records: &[&[u8]]) -> Result<Transaction, RegistryError> {
        let (_, id, internal) = self.auths(name)?;
        let (ownership, owner) = self.ownership_nft(name, id)?;
        let call = self
            .deployment
            .name_unlocking(name, NameCall::UseAuth { auth_id: 1 })?;
        let mut builder = TransactionBuilder::new()
            .add_input(&internal, call)
            .add_input(&ownership, UnlockingData::p2pkh(owner))
            .add_output(internal.output.clone())
            .add_output(ownership.output.clone());
        for output in Self::record_outputs(records) {
            builder = builder.add_output(output);
        }
        Ok(builder.build()?)
    }

    /// Anyone spends the external auth of `name`, attaching `records`
    pub fn build_use_auth_external(&self, name: &[u8], records: &[&[u8]]) -> Result<Transaction, RegistryError> {
        let (external, ..) = self.auths(name)?;
        let call = self
            .deployment
            .name_unlocking(name, NameCall::UseAuth { auth_id: 0 })?;
        let mut builder = TransactionBuilder::new()
            .add_input(&external, call)
            .add_output(external.output.clone());
        for output in Self::record_outputs(records) {
            builder = builder.add_output(output);
        }
        Ok(builder.build()?)
    }

    /// Burns a registered name whose 1-based `character_number` is invalid, rewarding a fresh address
    pub fn build_penalise_invalid_name(&self, name: &[u8], character_number: i64) -> Result<Transaction, RegistryError> {
        let (external, _, internal) = self.auths(name)?;
        let call = NameCall::PenaliseInvalidName { character_number };
        let penaliser = PubKeyHash::random();
        let funding = self.fund(&penaliser, FUNDING_MARGIN)?;
        let reward = external.output.value + internal.output.value + funding.output.value - FEE;
        Ok(TransactionBuilder::new()
            .add_input(&external, self.deployment.name_unlocking(name, call.clone())?)
            .add_input(&internal, self.deployment.name_unlocking(name, call)?)
            .add_input(&funding, UnlockingData::p2pkh(penaliser))
            .add_output(TransactionOutput::new(reward, LockingBytecode::p2pkh(&penaliser)))
            .build()?)
    }

    /// Burns the oldest registration of `name`, either by its owner or by anyone once the internal auth has been
    /// inactive for the expiry period
    pub fn build_burn(&self, name: &[u8], by_owner: bool) -> Result<Transaction, RegistryError> {
        let (external, id, internal) = self.auths(name)?;
        let call = || self.deployment.name_unlocking(name, NameCall::Burn);
        let (third, burner, internal_sequence) = if by_owner {
            let (ownership, owner) = self.ownership_nft(name, id)?;
            (ownership, owner, None)
        } else {
            let burner = PubKeyHash::random();
            let funding = self.fund(&burner, FUNDING_MARGIN)?;
            (funding, burner, Some(self.params().inactivity_expiry_time()))
        };
        let payout = external.output.value + internal.output.value + third.output.value - FEE;
        let builder = TransactionBuilder::new().add_input(&external, call()?);
        let builder = match internal_sequence {
            Some(sequence) => builder.add_input_with_sequence(&internal, call()?, sequence),
            None => builder.add_input(&internal, call()?),
        };
        Ok(builder
            .add_input(&third, UnlockingData::p2pkh(burner))
            .add_output(TransactionOutput::new(payout, LockingBytecode::p2pkh(&burner)))
            .build()?)
    }

    /// Removes the newer of two registrations of `name`. The older pair is passed through at outputs 0 and 1.
    pub fn build_resolve_owner_conflict(&self, name: &[u8]) -> Result<Transaction, RegistryError> {
        let instance = self.view().name_instance(name)?;
        let (valid, invalid) = match (instance.internal_auths.first(), instance.internal_auths.get(1)) {
            (Some((_, valid)), Some((_, invalid))) => (valid.clone(), invalid.clone()),
            _ => return Err(RegistryError::not_found("owner conflict", String::from_utf8_lossy(name))),
        };
        let (first_external, second_external) = match instance.external_auths.as_slice() {
            [first, second, ..] => (first.clone(), second.clone()),
            _ => return Err(RegistryError::not_found("external auth", String::from_utf8_lossy(name))),
        };
        let resolver = PubKeyHash::random();
        let funding = self.fund(&resolver, FUNDING_MARGIN)?;
        let reward = second_external.output.value + invalid.output.value + funding.output.value - FEE;
        let call = || self.deployment.name_unlocking(name, NameCall::ResolveOwnerConflict);
        Ok(TransactionBuilder::new()
            .add_input(&first_external, call()?)
            .add_input(&valid, call()?)
            .add_input(&second_external, call()?)
            .add_input(&invalid, call()?)
            .add_input(&funding, UnlockingData::p2pkh(resolver))
            .add_output(first_external.output.clone())
            .add_output(valid.output.clone())
            .add_output(TransactionOutput::new(reward, LockingBytecode::p2pkh(&resolver)))
            .build()?)
    }

    /// The live records of `name`, in publication order
    pub fn records(&self, name: &[u8]) -> Result<Vec<Vec<u8>>, RegistryError> {
        let history = self.ledger.transactions()?;
        self.view().name_records(&history, name)
    }
}
