use std::time::Duration;

use rust_mc_ping::{ping, PingError};

/*

    Ping a server once and print its status,
    run `status_server` first to have something local to ping

*/

fn main() -> Result<(), PingError> {
    let result = ping("localhost", 25565, Duration::from_millis(2000))?;

    let status = result.status_response().map_err(PingError::Decode)?;

    println!("latency: {} ms", result.latency_ms());
    println!("version: {}", status.version.name);
    println!("motd: {}", status.motd());

    Ok(())
}
