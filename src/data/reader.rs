use crate::{data::varint, ProtocolError};
use std::io::{ErrorKind, Read};

/// Longest string or packet body accepted from the wire (2^21 - 1, the protocol's max packet size)
pub const MAX_DATA_LEN: usize = 2_097_151;

/// Packet data reader trait
pub trait DataReader {
    /// Read bytes
    fn read_bytes(&mut self, size: usize) -> Result<Vec<u8>, ProtocolError>;

    /// Read byte
    fn read_byte(&mut self) -> Result<u8, ProtocolError> {
        Ok(self.read_bytes(1)?[0])
    }
    /// Read String
    fn read_string(&mut self) -> Result<String, ProtocolError> {
        let size = self.read_usize_varint()?;
        if size > MAX_DATA_LEN {
            return Err(ProtocolError::DataTooLongError);
        }
        String::from_utf8(self.read_bytes(size)?).or(Err(ProtocolError::StringParseError))
    }
    /// Read Unsigned Short as u16
    fn read_unsigned_short(&mut self) -> Result<u16, ProtocolError> {
        match self.read_bytes(2)?.try_into() {
            Ok(i) => Ok(u16::from_be_bytes(i)),
            Err(_) => Err(ProtocolError::ReadError),
        }
    }
    /// Read Long as i64
    fn read_long(&mut self) -> Result<i64, ProtocolError> {
        match self.read_bytes(8)?.try_into() {
            Ok(i) => Ok(i64::from_be_bytes(i)),
            Err(_) => Err(ProtocolError::ReadError),
        }
    }

    /// Read VarInt with size in bytes (varint, size)
    fn read_varint_size(&mut self) -> Result<(i32, usize), ProtocolError> {
        varint::read_varint_size(self)
    }
    /// Read VarInt as i32
    fn read_varint(&mut self) -> Result<i32, ProtocolError> {
        Ok(self.read_varint_size()?.0)
    }
    /// Read VarInt as usize, negative values are rejected
    fn read_usize_varint(&mut self) -> Result<usize, ProtocolError> {
        usize::try_from(self.read_varint()?).or(Err(ProtocolError::VarIntError))
    }
}

impl<R: Read> DataReader for R {
    fn read_bytes(&mut self, size: usize) -> Result<Vec<u8>, ProtocolError> {
        let mut buf = vec![0; size];
        match self.read_exact(&mut buf) {
            Ok(()) => Ok(buf),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(ProtocolError::DataRanOutError),
            Err(_) => Err(ProtocolError::ReadError),
        }
    }
}

/// Decode string framed as VarInt byte length followed by UTF-8 bytes
pub fn decode_string(mut bytes: &[u8]) -> Result<String, ProtocolError> {
    bytes.read_string()
}
