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

use crate::{
    encode_script_num,
    op_codes::{small_int_value, OP_0, OP_1, OP_1NEGATE, OP_PUSHBYTES_75, OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4},
    ScriptError,
};

/// Encodes `data` as a single push operation
pub fn encode_push(data: &[u8]) -> Vec<u8> {
    let len = data.len();
    let mut out = Vec::with_capacity(len + 5);
    match len {
        0 => out.push(OP_0),
        1..=75 => out.push(len as u8),
        76..=0xff => {
            out.push(OP_PUSHDATA1);
            out.push(len as u8);
        },
        0x100..=0xffff => {
            out.push(OP_PUSHDATA2);
            out.extend_from_slice(&(len as u16).to_le_bytes());
        },
        _ => {
            out.push(OP_PUSHDATA4);
            out.extend_from_slice(&(len as u32).to_le_bytes());
        },
    }
    out.extend_from_slice(data);
    out
}

/// Reads a script made exclusively of push operations and returns the pushed items in order
pub fn read_pushes(script: &[u8]) -> Result<Vec<Vec<u8>>, ScriptError> {
    let mut items = Vec::new();
    let mut pos = 0;
    while pos < script.len() {
        let op = script[pos];
        pos += 1;
        let len = match op {
            OP_0 => 0,
            1..=OP_PUSHBYTES_75 => usize::from(op),
            OP_PUSHDATA1 => read_len(script, &mut pos, 1)?,
            OP_PUSHDATA2 => read_len(script, &mut pos, 2)?,
            OP_PUSHDATA4 => read_len(script, &mut pos, 4)?,
            OP_1NEGATE => {
                items.push(vec![0x81]);
                continue;
            },
            op => match small_int_value(op) {
                Some(n) => {
                    items.push(vec![n]);
                    continue;
                },
                None => return Err(ScriptError::NonPushOpcode(op)),
            },
        };
        let end = pos.checked_add(len).ok_or(ScriptError::TruncatedPush)?;
        let data = script.get(pos..end).ok_or(ScriptError::TruncatedPush)?;
        items.push(data.to_vec());
        pos = end;
    }
    Ok(items)
}

fn read_len(script: &[u8], pos: &mut usize, width: usize) -> Result<usize, ScriptError> {
    let bytes = script.get(*pos..*pos + width).ok_or(ScriptError::TruncatedPush)?;
    *pos += width;
    let mut buf = [0u8; 4];
    buf[..width].copy_from_slice(bytes);
    Ok(u32::from_le_bytes(buf) as usize)
}

#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    bytes: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_opcode(mut self, op: u8) -> Self {
        self.bytes.push(op);
        self
    }

    pub fn push_data(mut self, data: &[u8]) -> Self {
        self.bytes.extend(encode_push(data));
        self
    }

    /// Pushes an integer using the shortest encoding, `OP_1NEGATE` and `OP_1`..`OP_16` included
    pub fn push_int(mut self, value: i64) -> Self {
        match value {
            0 => self.bytes.push(OP_0),
            -1 => self.bytes.push(OP_1NEGATE),
            1..=16 => self.bytes.push(OP_1 + (value as u8) - 1),
            _ => self.bytes.extend(encode_push(&encode_script_num(value))),
        }
        self
    }

    pub fn extend(mut self, raw: &[u8]) -> Self {
        self.bytes.extend_from_slice(raw);
        self
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode_script_num;

    #[test]
    fn push_lengths() {
        assert_eq!(encode_push(&[]), vec![OP_0]);
        assert_eq!(encode_push(&[9; 3]), vec![3, 9, 9, 9]);
        assert_eq!(encode_push(&[1; 80])[..2], [OP_PUSHDATA1, 80]);
        assert_eq!(encode_push(&[1; 300])[..3], [OP_PUSHDATA2, 0x2c, 0x01]);
    }

    #[test]
    fn it_reads_back_mixed_pushes() {
        let script = ScriptBuilder::new()
            .push_data(b"alice")
            .push_int(0)
            .push_int(5)
            .push_int(-1)
            .push_int(1_000)
            .push_data(&[0xab; 100])
            .into_bytes();
        let items = read_pushes(&script).unwrap();
        assert_eq!(items.len(), 6);
        assert_eq!(items[0], b"alice".to_vec());
        assert_eq!(decode_script_num(&items[1]).unwrap(), 0);
        assert_eq!(decode_script_num(&items[2]).unwrap(), 5);
        assert_eq!(decode_script_num(&items[3]).unwrap(), -1);
        assert_eq!(decode_script_num(&items[4]).unwrap(), 1_000);
        assert_eq!(items[5], vec![0xab; 100]);
    }

    #[test]
    fn it_rejects_truncated_and_non_push_scripts() {
        assert_eq!(read_pushes(&[5, 1, 2]), Err(ScriptError::TruncatedPush));
        assert_eq!(read_pushes(&[OP_PUSHDATA2, 1]), Err(ScriptError::TruncatedPush));
        assert_eq!(read_pushes(&[0x76]), Err(ScriptError::NonPushOpcode(0x76)));
    }
}
