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

#[allow(dead_code)]
mod helpers;

use bitcann_common::configuration::Network;
use bitcann_common_types::{amount::Satoshis, registration_id::RegistrationId, token::TokenCategory, types::Hash256};
use bitcann_core::{
    chain_storage::{UtxoFilter, UtxoSource},
    consensus::{pricing::minimum_next_bid, DeploymentParamsBuilder},
    covenants::{commitment::OwnershipCommitment, CovenantError},
    test_helpers::TestRegistry,
    validation::ValidationError,
};
use bitcann_script::{ContractKind, LockingBytecode};
use helpers::{covenant_rejection, pkh, validation_error};

#[test]
fn auction_bid_and_finalisation() {
    let registry = TestRegistry::new();
    let budget = registry.params().mint_budget();
    let alice = pkh(0xa1);
    let bob = pkh(0xb0);

    registry.start_auction(b"satoshi", &alice, Satoshis(1_000_000)).unwrap();
    let bid = minimum_next_bid(Satoshis(1_000_000), registry.params().min_bid_increase_percentage());
    let tx = registry.build_bid(b"satoshi", &bob, bid).unwrap();
    registry.submit(&tx).unwrap();

    // alice got her bid back
    let refunds = registry
        .ledger()
        .fetch_utxos(&UtxoFilter::new().locked_by(LockingBytecode::p2pkh(&alice)))
        .unwrap();
    assert!(refunds.iter().any(|utxo| utxo.output.value == Satoshis(1_000_000)));

    let auction = registry.view().auctions_by_name(b"satoshi").unwrap().remove(0);
    assert_eq!(auction.bidder, bob);
    assert_eq!(auction.bid, bid);

    registry
        .mine_blocks(u64::from(registry.params().min_wait_time()))
        .unwrap();
    let tx = registry.build_finalization(&auction.utxo, None).unwrap();
    registry.submit(&tx).unwrap();

    let view = registry.view();
    let counter = view.counter().unwrap();
    assert_eq!(counter.next_id, RegistrationId::new(2));
    assert_eq!(counter.budget, budget - 1);
    assert!(view.live_auctions().unwrap().is_empty());

    let ownership = view.ownership_nfts(b"satoshi").unwrap().remove(0);
    assert_eq!(ownership.output.locking_bytecode, LockingBytecode::p2pkh(&bob));
    assert_eq!(
        ownership.output.nft_commitment().unwrap(),
        OwnershipCommitment::new(RegistrationId::new(1), b"satoshi".to_vec(), b".bch".to_vec())
            .encode()
            .as_slice()
    );
    assert_eq!(
        ownership.output.nft_commitment().unwrap(),
        b"\0\0\0\0\0\0\0\x01satoshi.bch"
    );

    let instance = view.name_instance(b"satoshi").unwrap();
    assert_eq!(instance.internal_auths.len(), 1);
    assert_eq!(instance.external_auths.len(), 1);
    // the factory thread parked the registration id
    assert_eq!(
        view.thread_capsule(ContractKind::Factory)
            .unwrap()
            .output
            .token_amount(),
        1
    );
}

#[test]
fn a_bid_restarts_the_wait() {
    let registry = TestRegistry::new();
    let wait = u64::from(registry.params().min_wait_time());
    registry.start_auction(b"late", &pkh(1), Satoshis(1_000_000)).unwrap();
    registry.mine_blocks(wait).unwrap();
    let tx = registry.build_bid(b"late", &pkh(2), Satoshis(2_000_000)).unwrap();
    registry.submit(&tx).unwrap();

    let auction = registry.view().auctions_by_name(b"late").unwrap().remove(0);
    let tx = registry.build_finalization(&auction.utxo, None).unwrap();
    let err = validation_error(registry.submit(&tx).unwrap_err());
    assert!(matches!(err, ValidationError::MaturityError { index: 3, .. }));

    registry.mine_blocks(wait).unwrap();
    registry.submit(&tx).unwrap();
}

#[test]
fn registration_ids_are_issued_in_order() {
    let registry = TestRegistry::new();
    let budget = registry.params().mint_budget();
    for (i, name) in [b"one".as_slice(), b"two".as_slice(), b"three".as_slice()].iter().enumerate() {
        let auction = registry.start_auction(name, &pkh(i as u8), Satoshis(1_000_000)).unwrap();
        assert_eq!(auction.output.token_amount(), i as u64 + 1);
    }
    let counter = registry.view().counter().unwrap();
    assert_eq!(counter.next_id, RegistrationId::new(4));
    assert_eq!(counter.budget, budget - 6);
}

#[test]
fn the_counter_is_spent_only_once() {
    let registry = TestRegistry::new();
    let first = registry.build_auction(b"first", &pkh(1), Satoshis(1_000_000)).unwrap();
    let second = registry.build_auction(b"second", &pkh(2), Satoshis(1_000_000)).unwrap();
    registry.submit(&first).unwrap();
    let err = validation_error(registry.submit(&second).unwrap_err());
    assert!(matches!(err, ValidationError::UnknownInput { index: 0, .. }));
    assert_eq!(registry.view().live_auctions().unwrap().len(), 1);
}

#[test]
fn an_insufficient_bid_is_rejected_by_the_bid_contract() {
    let registry = TestRegistry::new();
    registry.start_auction(b"cheap", &pkh(1), Satoshis(1_000_000)).unwrap();
    let tx = registry.build_bid(b"cheap", &pkh(2), Satoshis(1_000_001)).unwrap();
    let (index, err) = covenant_rejection(registry.submit(&tx).unwrap_err());
    assert_eq!(index, 1);
    assert!(matches!(err, CovenantError::InsufficientBidIncrease { .. }));
}

#[test]
fn the_platform_fee_is_paid_above_the_threshold() {
    let category = TokenCategory::new(Hash256::random());
    let params = DeploymentParamsBuilder::new(Network::RegTest, category)
        .with_platform_fee(Satoshis(1_000_000), 10)
        .build();
    let registry = TestRegistry::with_params(params);
    let auction = registry.start_auction(b"premium", &pkh(7), Satoshis(2_000_000)).unwrap();
    registry
        .mine_blocks(u64::from(registry.params().min_wait_time()))
        .unwrap();

    let tx = registry.build_finalization(&auction, Some(Satoshis(200_001))).unwrap();
    let (index, err) = covenant_rejection(registry.submit(&tx).unwrap_err());
    assert_eq!(index, 1);
    assert!(matches!(err, CovenantError::ValueMismatch { index: 6, .. }));

    let tx = registry.build_finalization(&auction, Some(Satoshis(200_000))).unwrap();
    registry.submit(&tx).unwrap();
    assert_eq!(registry.view().ownership_nfts(b"premium").unwrap().len(), 1);
}

#[test]
fn deployments_do_not_interact() {
    let a = TestRegistry::new();
    let b = TestRegistry::new();
    assert_ne!(
        a.deployment().name_locking_bytecode(b"same").unwrap(),
        b.deployment().name_locking_bytecode(b"same").unwrap()
    );
}
