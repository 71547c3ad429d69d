use std::fmt;

/// Size of the unit exchanged with the peripheral.
pub const BLOCK_LEN: usize = 16;

/// Fixed 16-byte block written to or read from the bus.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Block([u8; BLOCK_LEN]);

impl Block {
    pub const fn new(bytes: [u8; BLOCK_LEN]) -> Self {
        Self(bytes)
    }

    /// Builds a block from a slice that must be exactly `BLOCK_LEN` bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; BLOCK_LEN]>::try_from(bytes).ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; BLOCK_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({})", self.to_hex())
    }
}

/// Which way the peripheral is asked to transform a block. Derived from the
/// shape of the submitted text, never chosen explicitly by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationMode {
    Encrypt,
    Decrypt,
}

impl OperationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationMode::Encrypt => "encrypt",
            OperationMode::Decrypt => "decrypt",
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
