//! Minecraft packet struct and uncompressed framing

use crate::data::{varint, DataReader, DataWriter, MAX_DATA_LEN};
use crate::ProtocolError;
use std::io::{Cursor, Read, Write};

/// Minecraft packet
#[derive(Debug, Clone)]
pub struct Packet {
    id: i32,
    cursor: Cursor<Vec<u8>>,
}

impl Packet {
    /// Create new packet from raw packet (id + data)
    pub fn from_data(data: &[u8]) -> Result<Packet, ProtocolError> {
        let (packet_id, packet_id_size) = varint::decode(data)?;

        Ok(Packet {
            id: packet_id,
            cursor: Cursor::new(data[packet_id_size..].to_vec()),
        })
    }

    /// Create new packet with id and empty buffer
    pub fn empty(id: i32) -> Packet {
        Packet {
            id,
            cursor: Cursor::new(Vec::new()),
        }
    }

    /// Build packet with lambda
    pub fn build<F>(id: i32, builder: F) -> Result<Packet, ProtocolError>
    where
        F: FnOnce(&mut Packet) -> Result<(), ProtocolError>,
    {
        let mut packet = Self::empty(id);
        builder(&mut packet)?;
        Ok(packet)
    }

    /// Get packet id
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Get unread length
    pub fn len(&self) -> usize {
        self.cursor.get_ref().len() - self.cursor.position() as usize
    }

    /// Is everything read
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get whole packet body, regardless of read position
    pub fn get_bytes(&self) -> &[u8] {
        self.cursor.get_ref()
    }

    /// Serialize as a frame: VarInt(length) ++ VarInt(id) ++ body
    pub fn to_frame(&self) -> Result<Vec<u8>, ProtocolError> {
        let body = self.get_bytes();
        let length = varint::size(self.id) + body.len();

        let mut frame = Vec::with_capacity(varint::size(length as i32) + length);
        frame.write_usize_varint(length)?;
        frame.write_varint(self.id)?;
        frame.write_bytes(body)?;
        Ok(frame)
    }

    /// Write packet frame to stream
    pub fn write_to<W: Write>(&self, stream: &mut W) -> Result<(), ProtocolError> {
        stream.write_bytes(&self.to_frame()?)
    }

    /// Read one packet frame from stream
    pub fn read_from<R: Read>(stream: &mut R) -> Result<Packet, ProtocolError> {
        let length = stream.read_usize_varint()?;
        if length > MAX_DATA_LEN {
            return Err(ProtocolError::DataTooLongError);
        }

        Packet::from_data(&stream.read_bytes(length)?)
    }
}

impl DataReader for Packet {
    fn read_bytes(&mut self, size: usize) -> Result<Vec<u8>, ProtocolError> {
        self.cursor.read_bytes(size)
    }
}

impl DataWriter for Packet {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), ProtocolError> {
        self.cursor.write_bytes(bytes)
    }
}
