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

use std::fmt::{Display, Error, Formatter};

use crate::{chain_storage::Utxo, transactions::transaction_components::OutPoint};

/// A batch of writes that a [UtxoSet](crate::chain_storage::UtxoSet) backend applies atomically
#[derive(Debug, Default)]
pub struct DbTransaction {
    pub operations: Vec<WriteOperation>,
}

impl Display for DbTransaction {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result<(), Error> {
        fmt.write_str("Db transaction: \n")?;
        for write_op in &self.operations {
            fmt.write_str(&format!("{}\n", write_op))?;
        }
        Ok(())
    }
}

impl DbTransaction {
    pub fn new() -> Self {
        DbTransaction::default()
    }

    /// Adds a UTXO to the set. The write fails with `DuplicateUtxo` if the outpoint already exists.
    pub fn insert_utxo(&mut self, utxo: Utxo) -> &mut Self {
        self.operations.push(WriteOperation::InsertUtxo(Box::new(utxo)));
        self
    }

    /// Removes a UTXO from the set. The write fails with `UnspendableInput` if it is not in the set.
    pub fn spend_utxo(&mut self, outpoint: OutPoint) -> &mut Self {
        self.operations.push(WriteOperation::SpendUtxo(outpoint));
        self
    }

    pub fn set_tip_height(&mut self, height: u64) -> &mut Self {
        self.operations.push(WriteOperation::SetTipHeight(height));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[derive(Debug)]
pub enum WriteOperation {
    InsertUtxo(Box<Utxo>),
    SpendUtxo(OutPoint),
    SetTipHeight(u64),
}

impl Display for WriteOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            WriteOperation::InsertUtxo(utxo) => write!(f, "Insert UTXO {}", utxo.outpoint),
            WriteOperation::SpendUtxo(outpoint) => write!(f, "Spend UTXO {}", outpoint),
            WriteOperation::SetTipHeight(height) => write!(f, "Set tip height to {}", height),
        }
    }
}
