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

use std::collections::{BTreeMap, HashMap};

use bitcann_common_types::token::{NftCapability, TokenCategory, MAX_COMMITMENT_LENGTH, MAX_FUNGIBLE_AMOUNT};
use log::*;

use crate::validation::{TransactionContext, ValidationError};

pub const LOG_TARGET: &str = "c::val::token_rules";

/// What the inputs of a transaction hold of one token category
#[derive(Debug, Default)]
struct CategoryInputs {
    fungible: u128,
    minting: usize,
    mutable: usize,
    // commitment -> number of immutable NFTs carrying it
    immutable: HashMap<Vec<u8>, usize>,
}

/// A new category can only be created by the first input, and only when it spends an output at index 0. The category
/// is the txid of that outpoint.
pub fn genesis_category(context: &TransactionContext<'_>) -> Option<TokenCategory> {
    context
        .transaction()
        .inputs
        .first()
        .filter(|input| input.outpoint.index == 0)
        .map(|input| TokenCategory::new(input.outpoint.txid))
}

/// Checks the token encoding of every output and that no output holds tokens its inputs could not have produced.
///
/// - fungible amounts are conserved per category, outputs may burn but never inflate
/// - a minting NFT input allows any NFT of its category in the outputs
/// - a mutable NFT input allows one NFT, mutable or immutable with any commitment
/// - an immutable NFT input can only be reproduced verbatim
/// - the genesis category is unrestricted
pub fn check_token_rules(context: &TransactionContext<'_>) -> Result<(), ValidationError> {
    let tx = context.transaction();
    for (index, output) in tx.outputs.iter().enumerate() {
        let token = match &output.token {
            Some(token) => token,
            None => continue,
        };
        if let Some(commitment) = token.commitment() {
            if commitment.len() > MAX_COMMITMENT_LENGTH {
                return Err(ValidationError::CommitmentTooLong {
                    index,
                    length: commitment.len(),
                    max: MAX_COMMITMENT_LENGTH,
                });
            }
        }
        if !token.is_nft() && token.amount == 0 {
            return Err(ValidationError::EmptyToken { index });
        }
        if token.amount > MAX_FUNGIBLE_AMOUNT {
            return Err(ValidationError::FungibleAmountTooLarge {
                index,
                amount: token.amount,
            });
        }
    }

    let mut available = BTreeMap::<TokenCategory, CategoryInputs>::new();
    for output in context.source_outputs() {
        if let Some(token) = &output.token {
            let entry = available.entry(token.category).or_default();
            entry.fungible += u128::from(token.amount);
            if let Some(nft) = &token.nft {
                match nft.capability {
                    NftCapability::Minting => entry.minting += 1,
                    NftCapability::Mutable => entry.mutable += 1,
                    NftCapability::None => *entry.immutable.entry(nft.commitment.clone()).or_default() += 1,
                }
            }
        }
    }

    let genesis = genesis_category(context);
    let mut produced = BTreeMap::<TokenCategory, u128>::new();
    // NFTs that could not be matched to an identical immutable input and need a mutable input's allowance
    let mut needs_mutable = BTreeMap::<TokenCategory, Vec<usize>>::new();
    for (index, output) in tx.outputs.iter().enumerate() {
        let token = match &output.token {
            Some(token) => token,
            None => continue,
        };
        if Some(token.category) == genesis {
            continue;
        }
        *produced.entry(token.category).or_default() += u128::from(token.amount);
        let nft = match &token.nft {
            Some(nft) => nft,
            None => continue,
        };
        let inputs = available.get_mut(&token.category);
        let unauthorized = ValidationError::UnauthorizedNft {
            index,
            category: token.category,
        };
        let inputs = match inputs {
            Some(inputs) => inputs,
            None => return Err(unauthorized),
        };
        if inputs.minting > 0 {
            continue;
        }
        match nft.capability {
            NftCapability::Minting => return Err(unauthorized),
            NftCapability::Mutable => needs_mutable.entry(token.category).or_default().push(index),
            NftCapability::None => match inputs.immutable.get_mut(&nft.commitment) {
                Some(count) if *count > 0 => *count -= 1,
                _ => needs_mutable.entry(token.category).or_default().push(index),
            },
        }
    }

    for (category, indexes) in needs_mutable {
        let allowance = available.get(&category).map(|inputs| inputs.mutable).unwrap_or_default();
        if let Some(index) = indexes.get(allowance) {
            debug!(
                target: LOG_TARGET,
                "Output {} needs a mutable input of {} but only {} are spent", index, category, allowance
            );
            return Err(ValidationError::UnauthorizedNft {
                index: *index,
                category,
            });
        }
    }

    for (category, outputs) in produced {
        let inputs = available.get(&category).map(|inputs| inputs.fungible).unwrap_or_default();
        if outputs > inputs {
            return Err(ValidationError::FungibleInflation {
                category,
                inputs,
                outputs,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use bitcann_common_types::{
        amount::Satoshis,
        token::TokenData,
        types::{Hash256, PubKeyHash},
    };
    use bitcann_script::LockingBytecode;

    use super::*;
    use crate::{
        chain_storage::Utxo,
        transactions::transaction_components::{
            OutPoint,
            Transaction,
            TransactionInput,
            TransactionOutput,
            UnlockingData,
        },
    };

    fn category() -> TokenCategory {
        TokenCategory::new(Hash256::new([5; 32]))
    }

    fn output(token: Option<TokenData>) -> TransactionOutput {
        let out = TransactionOutput::new(Satoshis(1000), LockingBytecode::p2pkh(&PubKeyHash::new([1; 20])));
        match token {
            Some(token) => out.with_token(token),
            None => out,
        }
    }

    fn check(inputs: Vec<Option<TokenData>>, outputs: Vec<Option<TokenData>>) -> Result<(), ValidationError> {
        let utxos = inputs
            .into_iter()
            .enumerate()
            .map(|(i, token)| Utxo::new(OutPoint::new(Hash256::new([7; 32]), i as u32 + 1), output(token), 0))
            .collect::<Vec<_>>();
        let tx = Transaction::new(
            utxos
                .iter()
                .map(|u| TransactionInput::new(u.outpoint, UnlockingData::p2pkh(PubKeyHash::new([1; 20]))))
                .collect(),
            outputs.into_iter().map(output).collect(),
        );
        let context = TransactionContext::new(&tx, utxos, 0).unwrap();
        check_token_rules(&context)
    }

    fn nft(capability: NftCapability, commitment: &[u8]) -> Option<TokenData> {
        Some(TokenData::nft(category(), capability, commitment.to_vec()))
    }

    #[test]
    fn fungible_tokens_can_be_burned_but_not_inflated() {
        let ft = |amount| Some(TokenData::fungible(category(), amount));
        check(vec![ft(10), ft(5)], vec![ft(15)]).unwrap();
        check(vec![ft(10)], vec![ft(4), None]).unwrap();
        assert!(matches!(
            check(vec![ft(10)], vec![ft(11)]),
            Err(ValidationError::FungibleInflation {
                inputs: 10,
                outputs: 11,
                ..
            })
        ));
    }

    #[test]
    fn immutable_nfts_are_only_reproduced_verbatim() {
        check(vec![nft(NftCapability::None, b"a")], vec![nft(NftCapability::None, b"a")]).unwrap();
        assert!(matches!(
            check(vec![nft(NftCapability::None, b"a")], vec![nft(NftCapability::None, b"b")]),
            Err(ValidationError::UnauthorizedNft { index: 0, .. })
        ));
        assert!(check(vec![nft(NftCapability::None, b"a")], vec![
            nft(NftCapability::None, b"a"),
            nft(NftCapability::None, b"a")
        ])
        .is_err());
    }

    #[test]
    fn a_mutable_nft_yields_at_most_one_nft() {
        check(vec![nft(NftCapability::Mutable, b"a")], vec![nft(NftCapability::Mutable, b"z")]).unwrap();
        check(vec![nft(NftCapability::Mutable, b"a")], vec![nft(NftCapability::None, b"z")]).unwrap();
        check(vec![nft(NftCapability::Mutable, b"a")], vec![None]).unwrap();
        assert!(matches!(
            check(vec![nft(NftCapability::Mutable, b"a")], vec![
                nft(NftCapability::Mutable, b"a"),
                nft(NftCapability::None, b"b")
            ]),
            Err(ValidationError::UnauthorizedNft { index: 1, .. })
        ));
        assert!(check(vec![nft(NftCapability::Mutable, b"a")], vec![nft(NftCapability::Minting, b"a")]).is_err());
    }

    #[test]
    fn a_minting_nft_allows_anything_of_its_category() {
        check(vec![nft(NftCapability::Minting, b"")], vec![
            nft(NftCapability::Minting, b""),
            nft(NftCapability::Mutable, b"x"),
            nft(NftCapability::None, b"y"),
            nft(NftCapability::None, b"y"),
        ])
        .unwrap();
    }

    #[test]
    fn token_encoding_limits() {
        assert!(matches!(
            check(vec![nft(NftCapability::Minting, b"")], vec![nft(NftCapability::None, &[0u8; 41])]),
            Err(ValidationError::CommitmentTooLong { length: 41, .. })
        ));
        assert!(matches!(
            check(vec![Some(TokenData::fungible(category(), 1))], vec![Some(TokenData::fungible(
                category(),
                0
            ))]),
            Err(ValidationError::EmptyToken { index: 0 })
        ));
    }

    #[test]
    fn the_genesis_category_is_unrestricted() {
        let utxo = Utxo::new(OutPoint::new(Hash256::new([8; 32]), 0), output(None), 0);
        let genesis = TokenCategory::new(utxo.outpoint.txid);
        let tx = Transaction::new(
            vec![TransactionInput::new(utxo.outpoint, UnlockingData::p2pkh(PubKeyHash::new([1; 20])))],
            vec![output(Some(TokenData::nft(genesis, NftCapability::Minting, vec![]).with_amount(1000)))],
        );
        let context = TransactionContext::new(&tx, vec![utxo.clone()], 0).unwrap();
        check_token_rules(&context).unwrap();
        assert_eq!(genesis_category(&context), Some(genesis));

        // an outpoint at another index cannot create a category
        let spend_index_one = Utxo::new(OutPoint::new(Hash256::new([8; 32]), 1), output(None), 0);
        let mut tx = tx;
        tx.inputs[0].outpoint = spend_index_one.outpoint;
        let context = TransactionContext::new(&tx, vec![spend_index_one], 0).unwrap();
        assert!(check_token_rules(&context).is_err());
    }
}
