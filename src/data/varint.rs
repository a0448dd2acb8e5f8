//! VarInt codec
//!
//! 7 data bits per byte, least-significant group first, high bit set on every
//! byte except the last. Negative values go through their two's complement bit
//! pattern, so they always take the full 5 bytes.

use crate::{data::DataReader, ProtocolError};

/// Max encoded length of a 32-bit VarInt
pub const MAX_VARINT_LEN: usize = 5;

const SEGMENT_BITS: u32 = 0b0111_1111;
const CONTINUE_BIT: u8 = 0b1000_0000;
/// Bits a fifth byte may carry: the top 4 bits of the value, no continuation
const LAST_BYTE_BITS: u8 = 0b0000_1111;

/// Encode VarInt to bytes
pub fn encode(value: i32) -> Vec<u8> {
    let mut value = value as u32;
    let mut bytes = Vec::with_capacity(MAX_VARINT_LEN);

    loop {
        let byte = (value & SEGMENT_BITS) as u8;
        value >>= 7;

        if value == 0 {
            bytes.push(byte);
            return bytes;
        }

        bytes.push(byte | CONTINUE_BIT);
    }
}

/// Decode VarInt from the start of bytes, returns (value, size in bytes)
pub fn decode(mut bytes: &[u8]) -> Result<(i32, usize), ProtocolError> {
    bytes.read_varint_size()
}

/// Encoded size of VarInt in bytes
pub fn size(value: i32) -> usize {
    match value as u32 {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0xFFF_FFFF => 4,
        _ => 5,
    }
}

pub(crate) fn read_varint_size<R: DataReader + ?Sized>(
    reader: &mut R,
) -> Result<(i32, usize), ProtocolError> {
    let mut decoded: u32 = 0;
    let mut size: usize = 0;

    loop {
        if size == MAX_VARINT_LEN {
            return Err(ProtocolError::VarIntError);
        }

        let next = reader.read_byte()?;

        if size == MAX_VARINT_LEN - 1 && next & !LAST_BYTE_BITS != 0 {
            return Err(ProtocolError::VarIntError);
        }

        decoded |= (next as u32 & SEGMENT_BITS) << (7 * size);
        size += 1;

        if next & CONTINUE_BIT == 0 {
            return Ok((decoded as i32, size));
        }
    }
}
