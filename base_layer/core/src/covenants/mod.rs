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

//! The BitCANN covenants. Each contract is a pure predicate over the spending transaction, the outputs it spends and
//! the index of the input being evaluated.

mod accumulator;
pub use accumulator::AccumulatorCovenant;

mod auction;
pub use auction::AuctionCovenant;

mod bid;
pub use bid::BidCovenant;

pub mod charset;

pub mod commitment;
pub use commitment::{CommitmentError, RegistryNft};

mod conflict_resolver;
pub use conflict_resolver::ConflictResolverCovenant;

mod context;
pub use context::{CovenantContext, HeldNft};

mod contract;
pub use contract::{evaluate, ContractCall, Covenant, NameCall};

pub mod error;
pub use error::{CovenantError, Side};

mod factory;
pub use factory::FactoryCovenant;

mod name;
pub use name::NameCovenant;

mod name_enforcer;
pub use name_enforcer::NameEnforcerCovenant;

pub mod records;

mod registry;
pub use registry::RegistryCovenant;
