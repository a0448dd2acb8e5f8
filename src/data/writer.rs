use crate::{data::varint, ProtocolError};
use std::io::Write;

/// Packet data writer trait
pub trait DataWriter {
    /// Write bytes
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), ProtocolError>;

    /// Write byte
    fn write_byte(&mut self, byte: u8) -> Result<(), ProtocolError> {
        self.write_bytes(&[byte])
    }
    /// Write String, prefixed with its length in bytes
    fn write_string(&mut self, val: &str) -> Result<(), ProtocolError> {
        let bytes = val.as_bytes();
        self.write_usize_varint(bytes.len())?;
        self.write_bytes(bytes)
    }
    /// Write Unsigned Short as u16
    fn write_unsigned_short(&mut self, val: u16) -> Result<(), ProtocolError> {
        self.write_bytes(&val.to_be_bytes())
    }
    /// Write Long as i64
    fn write_long(&mut self, val: i64) -> Result<(), ProtocolError> {
        self.write_bytes(&val.to_be_bytes())
    }

    /// Write VarInt as i32
    fn write_varint(&mut self, val: i32) -> Result<(), ProtocolError> {
        self.write_bytes(&varint::encode(val))
    }
    /// Write VarInt as usize, values above i32::MAX are rejected
    fn write_usize_varint(&mut self, val: usize) -> Result<(), ProtocolError> {
        self.write_varint(i32::try_from(val).or(Err(ProtocolError::VarIntError))?)
    }
}

impl<W: Write> DataWriter for W {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), ProtocolError> {
        self.write_all(bytes).or(Err(ProtocolError::WriteError))
    }
}

/// Encode string as VarInt byte length followed by UTF-8 bytes
pub fn encode_string(val: &str) -> Result<Vec<u8>, ProtocolError> {
    let mut bytes = Vec::with_capacity(varint::MAX_VARINT_LEN + val.len());
    bytes.write_string(val)?;
    Ok(bytes)
}
