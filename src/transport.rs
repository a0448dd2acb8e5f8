//! Byte stream transport used by ping sessions

use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};
use tracing::trace;

/// Connected byte stream
pub trait Transport: Read + Write {
    /// Bound how long the next `read` may block. `None` blocks indefinitely
    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()>;

    /// Tear the connection down, unblocking any pending read
    fn close(&mut self) -> io::Result<()>;
}

/// Opens transports to `host:port`
pub trait Connector {
    type Transport: Transport;

    /// Open a transport, spending at most `timeout` in total
    fn connect(&self, host: &str, port: u16, timeout: Duration) -> io::Result<Self::Transport>;
}

impl Transport for TcpStream {
    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        TcpStream::set_read_timeout(self, timeout)
    }

    fn close(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Both)
    }
}

/// Plain TCP connector
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Transport = TcpStream;

    /// Resolve `host` and try every address in order, all within `timeout`
    fn connect(&self, host: &str, port: u16, timeout: Duration) -> io::Result<TcpStream> {
        let deadline = Instant::now() + timeout;
        let mut last_error = None;

        for addr in (host, port).to_socket_addrs()? {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                last_error = Some(io::Error::new(
                    ErrorKind::TimedOut,
                    format!("connecting to {host}:{port} timed out"),
                ));
                break;
            }

            trace!(%addr, ?remaining, "trying address");
            match TcpStream::connect_timeout(&addr, remaining) {
                Ok(stream) => {
                    stream.set_nodelay(true)?;
                    return Ok(stream);
                }
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            io::Error::new(
                ErrorKind::NotFound,
                format!("{host}:{port} did not resolve to any address"),
            )
        }))
    }
}
