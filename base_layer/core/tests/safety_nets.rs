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
    consensus::DeploymentParamsBuilder,
    covenants::{charset::is_valid_name_character, CovenantError},
    test_helpers::TestRegistry,
};
use bitcann_script::ContractKind;
use helpers::{covenant_rejection, pkh};

#[test]
fn the_later_of_two_auctions_is_cancelled() {
    let registry = TestRegistry::new();
    registry.start_auction(b"twin", &pkh(1), Satoshis(1_000_000)).unwrap();
    registry.start_auction(b"twin", &pkh(2), Satoshis(1_500_000)).unwrap();
    let auctions = registry.view().auctions_by_name(b"twin").unwrap();
    assert_eq!(auctions.len(), 2);

    // the older auction cannot be cancelled
    let tx = registry
        .build_conflict_resolution(&auctions[1].utxo, &auctions[0].utxo)
        .unwrap();
    let (index, err) = covenant_rejection(registry.submit(&tx).unwrap_err());
    assert_eq!(index, 1);
    assert_eq!(err, CovenantError::RegistrationIdNotLower { valid: 2, invalid: 1 });

    let tx = registry
        .build_conflict_resolution(&auctions[0].utxo, &auctions[1].utxo)
        .unwrap();
    registry.submit(&tx).unwrap();
    assert_eq!(tx.outputs[3].value, Satoshis(1_500_000));

    let view = registry.view();
    let remaining = view.auctions_by_name(b"twin").unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, RegistrationId::new(1));
    let capsule = view.thread_capsule(ContractKind::ConflictResolver).unwrap();
    assert_eq!(capsule.output.token_amount(), 2);
}

#[test]
fn an_invalid_name_is_cancelled() {
    let registry = TestRegistry::new();
    let auction = registry.start_auction(b"no_way", &pkh(1), Satoshis(1_000_000)).unwrap();

    let tx = registry.build_name_enforcement(&auction, 2).unwrap();
    let (_, err) = covenant_rejection(registry.submit(&tx).unwrap_err());
    assert!(matches!(err, CovenantError::ValidCharacter { position: 2, .. }));

    let tx = registry.build_name_enforcement(&auction, 3).unwrap();
    registry.submit(&tx).unwrap();
    let view = registry.view();
    assert!(view.live_auctions().unwrap().is_empty());
    assert_eq!(
        view.thread_capsule(ContractKind::NameEnforcer)
            .unwrap()
            .output
            .token_amount(),
        1
    );
}

#[test]
fn a_valid_name_cannot_be_cancelled_anywhere() {
    let registry = TestRegistry::new();
    let auction = registry.start_auction(b"Good-Name9", &pkh(1), Satoshis(1_000_000)).unwrap();
    for character_number in 0..=11 {
        let tx = registry.build_name_enforcement(&auction, character_number).unwrap();
        covenant_rejection(registry.submit(&tx).unwrap_err());
    }
    assert_eq!(registry.view().live_auctions().unwrap().len(), 1);
}

#[test]
fn parked_tokens_return_to_the_counter() {
    // a full budget has no headroom for returned tokens
    let params = DeploymentParamsBuilder::new(Network::RegTest, TokenCategory::new(Hash256::random()))
        .with_mint_budget(1_000)
        .build();
    let registry = TestRegistry::with_params(params);
    let budget = registry.view().counter().unwrap().budget;
    let thread = registry.seed_thread_capsule(ContractKind::Accumulator, 40);
    let tx = registry.build_accumulation(&thread).unwrap();
    registry.submit(&tx).unwrap();

    let view = registry.view();
    assert_eq!(view.counter().unwrap().budget, budget + 40);
    let capsules = view.thread_capsules(ContractKind::Accumulator).unwrap();
    assert_eq!(capsules.len(), 2);
    assert!(capsules.iter().all(|capsule| capsule.output.token_amount() == 0));
}

#[test]
fn cancelled_budget_stays_on_the_conflict_resolver_capsule() {
    let registry = TestRegistry::new();
    registry.start_auction(b"twin", &pkh(1), Satoshis(1_000_000)).unwrap();
    registry.start_auction(b"twin", &pkh(2), Satoshis(1_500_000)).unwrap();
    let auctions = registry.view().auctions_by_name(b"twin").unwrap();
    let tx = registry
        .build_conflict_resolution(&auctions[0].utxo, &auctions[1].utxo)
        .unwrap();
    registry.submit(&tx).unwrap();

    let view = registry.view();
    let budget = view.counter().unwrap().budget;
    let parked = view.thread_capsule(ContractKind::ConflictResolver).unwrap();
    assert_eq!(parked.output.token_amount(), 2);

    // the Accumulator only takes threads naming itself
    let tx = registry.build_accumulation(&parked).unwrap();
    let (index, err) = covenant_rejection(registry.submit(&tx).unwrap_err());
    assert_eq!(index, 1);
    assert!(matches!(err, CovenantError::WrongLockingBytecode { index: 3, .. }));

    let view = registry.view();
    assert_eq!(view.counter().unwrap().budget, budget);
    assert_eq!(
        view.thread_capsule(ContractKind::ConflictResolver)
            .unwrap()
            .output
            .token_amount(),
        2
    );
}

#[test]
fn a_foreign_thread_is_not_accumulated() {
    let registry = TestRegistry::new();
    let thread = registry.seed_thread_capsule(ContractKind::NameEnforcer, 5);
    let tx = registry.build_accumulation(&thread).unwrap();
    let (index, err) = covenant_rejection(registry.submit(&tx).unwrap_err());
    assert_eq!(index, 1);
    assert!(matches!(err, CovenantError::WrongLockingBytecode { index: 3, .. }));
}

#[test]
fn penalties_agree_on_every_character() {
    let registry = TestRegistry::new();
    for byte in 0..=u8::MAX {
        let name = [b'a', byte, b'z'];
        let auction = registry.start_auction(&name, &pkh(1), Satoshis(1_000_000)).unwrap();
        let enforcement = registry.build_name_enforcement(&auction, 2).unwrap();
        let enforced = registry.ledger().validate(&enforcement).is_ok();

        registry.mine_blocks(u64::from(registry.params().min_wait_time())).unwrap();
        let finalization = registry.build_finalization(&auction, None).unwrap();
        registry.submit(&finalization).unwrap();
        let penalty = registry.build_penalise_invalid_name(&name, 2).unwrap();
        let penalised = registry.ledger().validate(&penalty).is_ok();

        assert_eq!(enforced, penalised, "character {:#04x}", byte);
        assert_eq!(enforced, !is_valid_name_character(byte), "character {:#04x}", byte);
    }
}
