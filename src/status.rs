//! Handshake and status packets of the Server List Ping exchange

use crate::data::{DataReader, DataWriter};
use crate::packet::Packet;
use crate::ProtocolError;

/// Default Minecraft server port
pub const DEFAULT_PORT: u16 = 25565;

/// Protocol version sent when the client only wants to query the status
pub const STATUS_QUERY_PROTOCOL_VERSION: i32 = -1;

/// Handshake `next_state` value for the status state
pub const NEXT_STATE_STATUS: i32 = 1;

pub const HANDSHAKE_PACKET_ID: i32 = 0x00;
pub const STATUS_REQUEST_PACKET_ID: i32 = 0x00;
pub const STATUS_RESPONSE_PACKET_ID: i32 = 0x00;
pub const PING_PACKET_ID: i32 = 0x01;

/// First packet of every connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub protocol_version: i32,
    pub server_address: String,
    pub server_port: u16,
    pub next_state: i32,
}

impl Handshake {
    /// Handshake asking for the status state
    pub fn status(server_address: &str, server_port: u16) -> Handshake {
        Handshake {
            protocol_version: STATUS_QUERY_PROTOCOL_VERSION,
            server_address: server_address.to_string(),
            server_port,
            next_state: NEXT_STATE_STATUS,
        }
    }

    pub fn to_packet(&self) -> Result<Packet, ProtocolError> {
        Packet::build(HANDSHAKE_PACKET_ID, |packet| {
            packet.write_varint(self.protocol_version)?;
            packet.write_string(&self.server_address)?;
            packet.write_unsigned_short(self.server_port)?;
            packet.write_varint(self.next_state)
        })
    }

    /// Read handshake fields from a received packet
    pub fn from_packet(packet: &mut Packet) -> Result<Handshake, ProtocolError> {
        Ok(Handshake {
            protocol_version: packet.read_varint()?,
            server_address: packet.read_string()?,
            server_port: packet.read_unsigned_short()?,
            next_state: packet.read_varint()?,
        })
    }
}

/// Payload-less status request packet, `01 00` on the wire
pub fn status_request() -> Packet {
    Packet::empty(STATUS_REQUEST_PACKET_ID)
}

/// Status response packet carrying the JSON document as a string
pub fn status_response(json: &str) -> Result<Packet, ProtocolError> {
    Packet::build(STATUS_RESPONSE_PACKET_ID, |packet| packet.write_string(json))
}

/// Whole outbound byte sequence of a status query: handshake frame followed by status request frame
pub fn build_status_query(handshake: &Handshake) -> Result<Vec<u8>, ProtocolError> {
    let mut bytes = handshake.to_packet()?.to_frame()?;
    status_request().write_to(&mut bytes)?;
    Ok(bytes)
}
