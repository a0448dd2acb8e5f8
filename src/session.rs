//! One Server List Ping exchange: connect, send, collect, close

use crate::assembler::{ResponseAssembler, DEFAULT_MAX_RESPONSE_LEN};
use crate::response::PingResult;
use crate::status::{build_status_query, Handshake, DEFAULT_PORT, STATUS_QUERY_PROTOCOL_VERSION};
use crate::transport::{Connector, TcpConnector, Transport};
use crate::PingError;
use std::io::{ErrorKind, Read, Write};
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Default budget for the whole exchange, connecting included
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

/// Longest single blocking read, bounds how late cancellation is noticed
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

const READ_CHUNK_LEN: usize = 4096;

/// Server to ping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingTarget {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl PingTarget {
    /// Target on the default port with the default timeout
    pub fn new(host: impl Into<String>) -> PingTarget {
        PingTarget {
            host: host.into(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn port(mut self, port: u16) -> PingTarget {
        self.port = port;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> PingTarget {
        self.timeout = timeout;
        self
    }
}

/// Shared flag to abort a running ping from another thread
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Single ping attempt. Consumed by [`PingSession::ping`], so every in-flight
/// ping owns its own session.
#[derive(Debug)]
pub struct PingSession<C: Connector = TcpConnector> {
    target: PingTarget,
    connector: C,
    cancel: Option<CancelToken>,
    max_response_len: usize,
    protocol_version: i32,
}

impl PingSession<TcpConnector> {
    pub fn new(target: PingTarget) -> PingSession<TcpConnector> {
        Self::with_connector(target, TcpConnector)
    }
}

impl<C: Connector> PingSession<C> {
    pub fn with_connector(target: PingTarget, connector: C) -> PingSession<C> {
        PingSession {
            target,
            connector,
            cancel: None,
            max_response_len: DEFAULT_MAX_RESPONSE_LEN,
            protocol_version: STATUS_QUERY_PROTOCOL_VERSION,
        }
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn max_response_len(mut self, len: usize) -> Self {
        self.max_response_len = len;
        self
    }

    /// Protocol version announced in the handshake, -1 by default
    pub fn protocol_version(mut self, version: i32) -> Self {
        self.protocol_version = version;
        self
    }

    pub fn target(&self) -> &PingTarget {
        &self.target
    }

    /// Run the exchange. The transport is closed exactly once on every path.
    ///
    /// The target timeout bounds connecting and receiving together.
    pub fn ping(self) -> Result<PingResult, PingError> {
        let PingTarget {
            ref host,
            port,
            timeout,
        } = self.target;

        self.check_cancelled()?;

        let deadline = Instant::now() + timeout;

        debug!(%host, port, "connecting");
        let stream = self
            .connector
            .connect(host, port, timeout)
            .map_err(PingError::Connection)?;

        let mut stream = OpenTransport::new(stream);
        let result = self.exchange(&mut *stream, deadline);
        stream.close();

        match &result {
            Ok(ping) => debug!(%host, port, latency_ms = ping.latency_ms(), "completed"),
            Err(err) => debug!(%host, port, %err, "failed"),
        }
        result
    }

    fn exchange<T: Transport>(
        &self,
        stream: &mut T,
        deadline: Instant,
    ) -> Result<PingResult, PingError> {
        let started = Instant::now();

        let handshake = Handshake {
            protocol_version: self.protocol_version,
            ..Handshake::status(&self.target.host, self.target.port)
        };
        let outbound = build_status_query(&handshake)?;

        debug!(bytes = outbound.len(), "sending status query");
        stream
            .write_all(&outbound)
            .and_then(|_| stream.flush())
            .map_err(PingError::Write)?;

        debug!("awaiting response");
        let mut assembler = ResponseAssembler::with_limit(self.max_response_len);
        let mut chunk = [0; READ_CHUNK_LEN];

        loop {
            self.check_cancelled()?;

            let now = Instant::now();
            if now >= deadline {
                return Err(PingError::Timeout(self.target.timeout));
            }

            stream
                .set_read_timeout(Some((deadline - now).min(POLL_INTERVAL)))
                .map_err(PingError::Read)?;

            let read = match stream.read(&mut chunk) {
                Ok(0) => return Err(PingError::ConnectionClosed),
                Ok(read) => read,
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
                    ) =>
                {
                    continue
                }
                Err(e) => return Err(PingError::Read(e)),
            };

            trace!(read, buffered = assembler.buffered(), "received chunk");

            if let Some(status) = assembler.feed(&chunk[..read])? {
                let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                return Ok(PingResult::new(status, latency_ms));
            }
        }
    }

    fn check_cancelled(&self) -> Result<(), PingError> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(PingError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Ping `host:port` over TCP
pub fn ping(host: &str, port: u16, timeout: Duration) -> Result<PingResult, PingError> {
    PingSession::new(PingTarget::new(host).port(port).timeout(timeout)).ping()
}

/// Owns a transport and closes it once, on `close` or on drop
struct OpenTransport<T: Transport> {
    inner: T,
    closed: bool,
}

impl<T: Transport> OpenTransport<T> {
    fn new(inner: T) -> OpenTransport<T> {
        OpenTransport {
            inner,
            closed: false,
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(err) = self.inner.close() {
            trace!(%err, "closing transport");
        }
    }
}

impl<T: Transport> Deref for OpenTransport<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> DerefMut for OpenTransport<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T: Transport> Drop for OpenTransport<T> {
    fn drop(&mut self) {
        self.close();
    }
}
