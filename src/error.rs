use std::net::AddrParseError;
use thiserror::Error;

use crate::transport::TransportError;

pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("invalid input: expected 10 digits or 32 hex characters, got {0:?}")]
    InvalidInput(String),
    #[error("missing form field: {0}")]
    MissingField(String),
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("unhandled failure: {0}")]
    Unhandled(String),
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::NetworkError(err.to_string())
    }
}

impl From<AddrParseError> for BridgeError {
    fn from(err: AddrParseError) -> Self {
        BridgeError::NetworkError(err.to_string())
    }
}
