//! Peripheral transport
//!
//! Everything the bridge needs from the hardware is a blocking exchange of
//! 16-byte blocks. Implementations own their bus handles; callers hold them
//! by `&mut`, which keeps transactions from interleaving.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::{Block, BLOCK_LEN};

#[cfg(target_os = "linux")]
pub mod linux;
pub mod simulated;
pub mod spi;

pub use simulated::SimulatedPeripheral;
pub use spi::SpiTransport;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("chip-select line failure: {0}")]
    Select(String),
    #[error("bus write failed: {0}")]
    Write(String),
    #[error("bus read failed: {0}")]
    Read(String),
    #[error("short read from peripheral: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },
    #[error("bus setup failed: {0}")]
    Setup(String),
}

impl TransportError {
    /// Turns raw bytes from a peripheral into a block, rejecting anything
    /// that is not exactly one block long.
    pub fn check_block(bytes: &[u8]) -> Result<Block, TransportError> {
        Block::from_slice(bytes).ok_or(TransportError::ShortRead {
            expected: BLOCK_LEN,
            actual: bytes.len(),
        })
    }
}

pub trait Transport {
    /// Writes one block inside its own chip-select frame.
    fn write_block(&mut self, block: &Block) -> Result<(), TransportError>;

    /// Reads one block inside its own chip-select frame.
    fn read_block(&mut self) -> Result<Block, TransportError>;

    /// Submits `block` and fetches the transformed result.
    fn transact(&mut self, block: &Block) -> Result<Block, TransportError> {
        self.write_block(block)?;
        self.read_block()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write_block(&mut self, block: &Block) -> Result<(), TransportError> {
        (**self).write_block(block)
    }

    fn read_block(&mut self) -> Result<Block, TransportError> {
        (**self).read_block()
    }

    fn transact(&mut self, block: &Block) -> Result<Block, TransportError> {
        (**self).transact(block)
    }
}

/// Fixed bus parameters, chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    pub device: PathBuf,
    pub clock_hz: u32,
    /// SPI mode 0..=3 (CPOL << 1 | CPHA).
    pub mode: u8,
    /// GPIO line driven as the active-low chip select.
    pub cs_gpio: u64,
}
