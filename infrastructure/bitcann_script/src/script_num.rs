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

use crate::ScriptError;

pub const MAX_SCRIPT_NUM_LENGTH: usize = 8;

/// Encodes an integer as a minimal little-endian sign-magnitude script number
pub fn encode_script_num(value: i64) -> Vec<u8> {
    if value == 0 {
        return Vec::new();
    }
    let negative = value < 0;
    let mut abs = value.unsigned_abs();
    let mut bytes = Vec::with_capacity(MAX_SCRIPT_NUM_LENGTH + 1);
    while abs > 0 {
        bytes.push((abs & 0xff) as u8);
        abs >>= 8;
    }
    // The most significant byte carries the sign bit, so add a padding byte if it is already in use
    let last = bytes.len() - 1;
    if bytes[last] & 0x80 != 0 {
        bytes.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        bytes[last] |= 0x80;
    }
    bytes
}

pub fn decode_script_num(bytes: &[u8]) -> Result<i64, ScriptError> {
    if bytes.is_empty() {
        return Ok(0);
    }
    if bytes.len() > MAX_SCRIPT_NUM_LENGTH {
        return Err(ScriptError::NumberTooLong {
            max: MAX_SCRIPT_NUM_LENGTH,
        });
    }
    let last = bytes[bytes.len() - 1];
    if last & 0x7f == 0 && (bytes.len() == 1 || bytes[bytes.len() - 2] & 0x80 == 0) {
        return Err(ScriptError::NonMinimalNumber);
    }

    let mut magnitude: u64 = 0;
    for (i, b) in bytes.iter().enumerate() {
        let b = if i == bytes.len() - 1 { b & 0x7f } else { *b };
        magnitude |= u64::from(b) << (8 * i);
    }
    // Eight bytes with the sign bit cleared always fit in 63 bits
    let value = magnitude as i64;
    if last & 0x80 != 0 {
        Ok(-value)
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_encodes_known_values() {
        assert_eq!(encode_script_num(0), Vec::<u8>::new());
        assert_eq!(encode_script_num(1), vec![0x01]);
        assert_eq!(encode_script_num(-1), vec![0x81]);
        assert_eq!(encode_script_num(127), vec![0x7f]);
        assert_eq!(encode_script_num(128), vec![0x80, 0x00]);
        assert_eq!(encode_script_num(-128), vec![0x80, 0x80]);
        assert_eq!(encode_script_num(256), vec![0x00, 0x01]);
        assert_eq!(encode_script_num(1_000_000), vec![0x40, 0x42, 0x0f]);
    }

    #[test]
    fn it_decodes_what_it_encodes() {
        for value in [0, 1, -1, 16, 127, 128, -255, 65_535, 1_000_000, i64::MAX, -i64::MAX] {
            assert_eq!(decode_script_num(&encode_script_num(value)).unwrap(), value);
        }
    }

    #[test]
    fn it_rejects_non_minimal_encodings() {
        assert_eq!(decode_script_num(&[0x00]), Err(ScriptError::NonMinimalNumber));
        assert_eq!(decode_script_num(&[0x01, 0x00]), Err(ScriptError::NonMinimalNumber));
        assert_eq!(decode_script_num(&[0x80]), Err(ScriptError::NonMinimalNumber));
        assert!(decode_script_num(&[0x80, 0x00]).is_ok());
    }

    #[test]
    fn it_rejects_oversized_numbers() {
        assert!(decode_script_num(&[1u8; 9]).is_err());
    }
}
