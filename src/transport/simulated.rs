use log::debug;

use super::{Transport, TransportError};
use crate::models::{Block, BLOCK_LEN};

/// Stand-in for the hardware peripheral. Every written block is XORed with
/// `key` and handed back on the next read, so the same instance both
/// "encrypts" and "decrypts". The all-zero key echoes blocks unchanged.
#[derive(Debug, Clone, Default)]
pub struct SimulatedPeripheral {
    key: [u8; BLOCK_LEN],
    pending: Option<Block>,
    writes: usize,
}

impl SimulatedPeripheral {
    pub fn new(key: [u8; BLOCK_LEN]) -> Self {
        Self {
            key,
            pending: None,
            writes: 0,
        }
    }

    pub fn echo() -> Self {
        Self::default()
    }

    /// Number of blocks written so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    fn apply(&self, block: &Block) -> Block {
        let mut out = *block.as_bytes();
        for (byte, k) in out.iter_mut().zip(self.key.iter()) {
            *byte ^= k;
        }
        Block::new(out)
    }
}

impl Transport for SimulatedPeripheral {
    fn write_block(&mut self, block: &Block) -> Result<(), TransportError> {
        self.writes += 1;
        self.pending = Some(self.apply(block));
        debug!("Simulated peripheral accepted {}", block.to_hex());
        Ok(())
    }

    fn read_block(&mut self) -> Result<Block, TransportError> {
        Ok(self.pending.take().unwrap_or_default())
    }
}
