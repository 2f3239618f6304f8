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

use crate::covenants::CovenantError;

pub const HYPHEN: u8 = 45;

/// Names may only contain ASCII letters, digits and the hyphen
pub fn is_valid_name_character(c: u8) -> bool {
    c == HYPHEN || (97..123).contains(&c) || (65..91).contains(&c) || (48..58).contains(&c)
}

pub fn is_valid_name(name: &[u8]) -> bool {
    !name.is_empty() && name.iter().all(|c| is_valid_name_character(*c))
}

/// The 1-based position of the first character that is not allowed in a name
pub fn first_invalid_character(name: &[u8]) -> Option<usize> {
    name.iter().position(|c| !is_valid_name_character(*c)).map(|i| i + 1)
}

/// Succeeds, returning the offending byte, only if the character at the 1-based `character_number` is not allowed
/// in a name. This is the condition under which a name can be penalised.
pub fn check_invalid_character(name: &[u8], character_number: i64) -> Result<u8, CovenantError> {
    let out_of_range = || CovenantError::CharacterOutOfRange {
        position: character_number,
        length: name.len(),
    };
    let position = usize::try_from(character_number).map_err(|_| out_of_range())?;
    if position == 0 {
        return Err(out_of_range());
    }
    let character = *name.get(position - 1).ok_or_else(out_of_range)?;
    if is_valid_name_character(character) {
        return Err(CovenantError::ValidCharacter { position, character });
    }
    Ok(character)
}
