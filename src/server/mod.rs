//! Server module implementing the request loop
//!
//! One connection is accepted, served to completion (including the blocking
//! bus transaction) and closed before the next one is accepted.
//!
//! ```text
//! Idle -> Accepted -> Parsed -> Processed -> Responded -> Idle
//!            \           \          \
//!             +-----------+----------+--> ErrorResponding -> close
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::error::{BridgeError, Result};
use crate::transport::Transport;

pub mod handlers;
pub mod request;
pub mod response;

pub use response::{HttpResponse, Status};

/// Per-connection limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Upper bound for the single read of a request. Longer requests are
    /// truncated.
    pub request_buffer: usize,
    /// `None` waits for the client indefinitely.
    pub read_timeout: Option<Duration>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            request_buffer: 1024,
            read_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// How a single connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionOutcome {
    Responded(Status),
    EmptyRequest,
    ReadFailed,
    WriteFailed,
}

/// Bridges HTTP clients to the peripheral behind `transport`.
pub struct BridgeServer<T: Transport> {
    transport: T,
    settings: ServerSettings,
}

impl<T: Transport> BridgeServer<T> {
    pub fn new(transport: T, settings: ServerSettings) -> Self {
        Self { transport, settings }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Serves connections forever. Accept failures are logged and the loop
    /// moves on.
    pub async fn run(&mut self, listener: TcpListener) -> Result<()> {
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    info!("Client connected from {}", peer);
                    let outcome = self.serve_connection(stream, peer).await;
                    debug!("Connection from {} finished: {:?}", peer, outcome);
                }
                Err(e) => {
                    error!("Socket error while accepting: {}", e);
                    continue;
                }
            }
        }
    }

    /// Reads one request from `stream`, answers it and closes the stream.
    /// The stream is shut down exactly once whatever happens before.
    pub async fn serve_connection<S>(&mut self, mut stream: S, peer: SocketAddr) -> ConnectionOutcome
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let outcome = self.exchange(&mut stream, peer).await;
        close(stream, peer).await;
        outcome
    }

    async fn exchange<S>(&mut self, stream: &mut S, peer: SocketAddr) -> ConnectionOutcome
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let raw = match self.read_request(stream).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Socket error reading from {}: {}", peer, e);
                return ConnectionOutcome::ReadFailed;
            }
        };

        if raw.is_empty() {
            debug!("{} closed without sending a request", peer);
            return ConnectionOutcome::EmptyRequest;
        }

        let response = handlers::handle_request(&mut self.transport, &raw);

        if let Err(e) = stream.write_all(&response.to_bytes()).await {
            warn!("Failed to send response to {}: {}", peer, e);
            return ConnectionOutcome::WriteFailed;
        }
        ConnectionOutcome::Responded(response.status)
    }

    /// A single bounded read; nothing is reassembled.
    async fn read_request<S>(&self, stream: &mut S) -> Result<Vec<u8>>
    where
        S: AsyncRead + Unpin,
    {
        let mut buf = vec![0u8; self.settings.request_buffer];
        let read = stream.read(&mut buf);
        let n = match self.settings.read_timeout {
            Some(limit) => tokio::time::timeout(limit, read).await.map_err(|_| {
                BridgeError::NetworkError(format!("no request within {}s", limit.as_secs()))
            })??,
            None => read.await?,
        };
        buf.truncate(n);
        Ok(buf)
    }
}

/// Binds the listener. Failure here is fatal to the process.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind {}: {}", addr, e);
        BridgeError::NetworkError(format!("bind {addr}: {e}"))
    })?;
    info!("Listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Best effort: a failing shutdown is logged and otherwise ignored.
async fn close<S>(mut stream: S, peer: SocketAddr)
where
    S: AsyncWrite + Unpin,
{
    if let Err(e) = stream.shutdown().await {
        debug!("Error closing connection to {}: {}", peer, e);
    }
}
