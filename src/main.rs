use clap::Parser;
use rust_mc_ping::{PingSession, PingTarget, DEFAULT_PORT, STATUS_QUERY_PROTOCOL_VERSION};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    version,
    about = "Query a Minecraft server's status with a Server List Ping",
    long_about = None
)]
struct Args {
    /// Server host name or address
    host: String,

    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Give up after this many milliseconds
    #[arg(short, long, default_value_t = 2000)]
    timeout_ms: u64,

    /// Protocol version sent in the handshake
    #[arg(long, default_value_t = STATUS_QUERY_PROTOCOL_VERSION, allow_hyphen_values = true)]
    protocol: i32,

    /// Print the raw status json instead of a summary
    #[arg(long)]
    raw: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let target = PingTarget::new(&args.host)
        .port(args.port)
        .timeout(Duration::from_millis(args.timeout_ms));

    let result = match PingSession::new(target).protocol_version(args.protocol).ping() {
        Ok(result) => result,
        Err(e) => {
            eprintln!("failed to ping {}:{}: {}", args.host, args.port, e);
            return ExitCode::FAILURE;
        }
    };

    if args.raw {
        println!("{}", result.to_json());
        return ExitCode::SUCCESS;
    }

    println!("{}:{} responded in {} ms", args.host, args.port, result.latency_ms());

    match result.status_response() {
        Ok(status) => {
            match status.version.protocol {
                Some(protocol) => {
                    println!("version: {} (protocol {})", status.version.name, protocol)
                }
                None => println!("version: {}", status.version.name),
            }
            if let Some(players) = &status.players {
                println!("players: {}/{}", players.online, players.max);
                for player in &players.sample {
                    println!("  {} ({})", player.name, player.id);
                }
            }
            let motd = status.motd();
            if !motd.is_empty() {
                println!("motd: {}", motd);
            }
        }
        Err(_) => println!("{}", result.to_json()),
    }

    ExitCode::SUCCESS
}
