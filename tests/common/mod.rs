#![allow(dead_code)]

use std::io::{self, Cursor};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use cipher_bridge::models::Block;
use cipher_bridge::transport::{Transport, TransportError};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

pub fn peer() -> SocketAddr {
    "192.168.4.2:50000".parse().unwrap()
}

pub fn post(body: &str) -> Vec<u8> {
    format!(
        "POST / HTTP/1.1\r\nHost: 192.168.4.1\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    )
    .into_bytes()
}

/// Handles a test keeps after the stream has been moved into the server.
#[derive(Clone, Default)]
pub struct StreamProbe {
    pub written: Arc<Mutex<Vec<u8>>>,
    pub shutdowns: Arc<AtomicUsize>,
}

impl StreamProbe {
    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }

    pub fn response(&self) -> String {
        String::from_utf8_lossy(&self.written.lock().unwrap()).into_owned()
    }
}

enum ReadBehaviour {
    Data(Cursor<Vec<u8>>),
    Fail,
    Hang,
}

/// In-memory client connection.
pub struct MockStream {
    read: ReadBehaviour,
    fail_write: bool,
    fail_shutdown: bool,
    probe: StreamProbe,
}

impl MockStream {
    pub fn new(request: impl Into<Vec<u8>>) -> (Self, StreamProbe) {
        Self::with(ReadBehaviour::Data(Cursor::new(request.into())))
    }

    pub fn failing_read() -> (Self, StreamProbe) {
        Self::with(ReadBehaviour::Fail)
    }

    /// Never yields any request bytes.
    pub fn silent() -> (Self, StreamProbe) {
        Self::with(ReadBehaviour::Hang)
    }

    fn with(read: ReadBehaviour) -> (Self, StreamProbe) {
        let probe = StreamProbe::default();
        let stream = Self {
            read,
            fail_write: false,
            fail_shutdown: false,
            probe: probe.clone(),
        };
        (stream, probe)
    }

    pub fn fail_write(mut self) -> Self {
        self.fail_write = true;
        self
    }

    pub fn fail_shutdown(mut self) -> Self {
        self.fail_shutdown = true;
        self
    }
}

impl AsyncRead for MockStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match &mut self.get_mut().read {
            ReadBehaviour::Data(cursor) => Pin::new(cursor).poll_read(cx, buf),
            ReadBehaviour::Fail => Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            ))),
            ReadBehaviour::Hang => Poll::Pending,
        }
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.fail_write {
            return Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe")));
        }
        self.probe.written.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.probe.shutdowns.fetch_add(1, Ordering::SeqCst);
        if self.fail_shutdown {
            return Poll::Ready(Err(io::Error::new(io::ErrorKind::NotConnected, "already gone")));
        }
        Poll::Ready(Ok(()))
    }
}

/// Fails every bus operation.
#[derive(Default)]
pub struct FailingTransport {
    pub calls: usize,
}

impl Transport for FailingTransport {
    fn write_block(&mut self, _block: &Block) -> Result<(), TransportError> {
        self.calls += 1;
        Err(TransportError::Write("bus fault".to_string()))
    }

    fn read_block(&mut self) -> Result<Block, TransportError> {
        self.calls += 1;
        Err(TransportError::Read("bus fault".to_string()))
    }
}

/// Returns a fixed number of bytes, which may be fewer than a block.
pub struct ShortTransport(pub usize);

impl Transport for ShortTransport {
    fn write_block(&mut self, _block: &Block) -> Result<(), TransportError> {
        Ok(())
    }

    fn read_block(&mut self) -> Result<Block, TransportError> {
        TransportError::check_block(&vec![0x41; self.0])
    }
}

pub struct PanickingTransport;

impl Transport for PanickingTransport {
    fn write_block(&mut self, _block: &Block) -> Result<(), TransportError> {
        panic!("peripheral driver bug");
    }

    fn read_block(&mut self) -> Result<Block, TransportError> {
        panic!("peripheral driver bug");
    }
}
