//! Minimal HTTP request parsing
//!
//! Only the method token and, for POST, the form-encoded body are of
//! interest. Values are taken literally; no percent-decoding is applied.

use crate::error::{BridgeError, Result};

/// Name of the form field carrying the phone number or ciphertext.
pub const INPUT_FIELD: &str = "inputData";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other(String),
}

impl Method {
    fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "POST" => Method::Post,
            other => Method::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub method: Method,
    /// Present for POST requests only.
    pub body: Option<String>,
}

/// Parses the request text read from a connection.
///
/// A POST without an empty line separating headers from body is
/// `MalformedRequest`.
pub fn parse(raw: &str) -> Result<ParsedRequest> {
    let method = raw
        .split("\r\n")
        .next()
        .and_then(|line| line.split(' ').next())
        .map(Method::from_token)
        .unwrap_or_else(|| Method::Other(String::new()));

    if method != Method::Post {
        return Ok(ParsedRequest { method, body: None });
    }

    let body = find_body(raw).ok_or_else(|| {
        BridgeError::MalformedRequest("no blank line between headers and body".to_string())
    })?;

    Ok(ParsedRequest {
        method,
        body: Some(body),
    })
}

/// Everything after the first empty line, with line breaks removed.
fn find_body(raw: &str) -> Option<String> {
    let mut lines = raw.split("\r\n");
    lines.position(str::is_empty)?;
    Some(lines.collect())
}

/// Looks up `field` in a `key=value&key=value` body. The first matching key
/// wins; an empty value counts as missing.
pub fn extract_field<'a>(body: &'a str, field: &str) -> Option<&'a str> {
    body.split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == field)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
