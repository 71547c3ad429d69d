//! Bridges HTTP form submissions to a block-cipher peripheral on an SPI bus.

pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod transport;

pub use error::{BridgeError, Result};
pub use models::{Block, OperationMode};
pub use server::BridgeServer;
