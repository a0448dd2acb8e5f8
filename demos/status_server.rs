use std::{
    net::{TcpListener, TcpStream},
    sync::Arc,
    thread,
};

use serde_json::json;

use rust_mc_ping::{
    status_response, DataReader, DataWriter, Handshake, Packet, ProtocolError,
    NEXT_STATE_STATUS, PING_PACKET_ID, STATUS_REQUEST_PACKET_ID,
};

/*

    Fake server that answers the server list ping
    like a vanilla minecraft server, for trying out `mcping`

*/

struct StatusServer {
    address: String,
    status: String,
}

fn accept_client(mut stream: TcpStream, server: Arc<StatusServer>) -> Result<(), ProtocolError> {
    let mut packet = Packet::read_from(&mut stream)?;
    let handshake = Handshake::from_packet(&mut packet)?;

    println!("Client handshake info:");
    println!("  IP: {:?}", stream.peer_addr());
    println!("  Protocol version: {}", handshake.protocol_version);
    println!("  Server address: {}", handshake.server_address);
    println!("  Server port: {}", handshake.server_port);

    if handshake.next_state != NEXT_STATE_STATUS {
        return Ok(());
    }

    loop {
        let mut packet = match Packet::read_from(&mut stream) {
            Ok(i) => i,
            Err(_) => break,
        };

        match packet.id() {
            STATUS_REQUEST_PACKET_ID => status_response(&server.status)?.write_to(&mut stream)?,
            PING_PACKET_ID => {
                let payload = packet.read_long()?;
                Packet::build(PING_PACKET_ID, |pong| pong.write_long(payload))?
                    .write_to(&mut stream)?;
            }
            _ => break,
        }
    }

    Ok(())
}

fn main() {
    let server = Arc::new(StatusServer {
        address: "localhost:25565".to_string(),
        status: json!({
            "version": {"name": "1.20.4", "protocol": 765},
            "players": {
                "max": 20,
                "online": 1,
                "sample": [{"name": "Notch", "id": "069a79f4-44e9-4726-a5be-fca90e38aaf5"}]
            },
            "description": {
                "text": "",
                "extra": [
                    {"color": "aqua", "text": "☄ "},
                    {"bold": true, "text": "A {braced} fake server"}
                ]
            }
        })
        .to_string(),
    });

    let listener = TcpListener::bind(&server.address).unwrap();
    println!("listening on {}", server.address);

    for stream in listener.incoming() {
        let stream = stream.unwrap();
        let server = server.clone();

        thread::spawn(move || {
            if let Err(e) = accept_client(stream, server) {
                eprintln!("client error: {}", e);
            }
        });
    }
}
