//! Request dispatch: parser, codec, transport and renderer.

use std::panic::{self, AssertUnwindSafe};

use log::{debug, info, warn};

use super::request::{self, Method, INPUT_FIELD};
use super::response::{self, HttpResponse};
use crate::codec;
use crate::error::{BridgeError, Result};
use crate::transport::Transport;

/// Produces the response for one request. Every failure, including a panic
/// inside the transport, becomes the error page.
pub fn handle_request<T: Transport + ?Sized>(transport: &mut T, raw: &[u8]) -> HttpResponse {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| process_request(transport, raw)))
        .unwrap_or_else(|payload| Err(BridgeError::Unhandled(panic_message(payload.as_ref()))));

    match outcome {
        Ok(response) => response,
        Err(e) => {
            warn!("Handler failed: {}", e);
            response::error_page(&e.to_string())
        }
    }
}

fn process_request<T: Transport + ?Sized>(transport: &mut T, raw: &[u8]) -> Result<HttpResponse> {
    // Bytes outside UTF-8 become U+FFFD; neither accepted input shape can contain one.
    let text = String::from_utf8_lossy(raw);
    debug!("Request: {}", preview(&text));

    let parsed = request::parse(&text)?;
    if parsed.method != Method::Post {
        return Ok(response::form_page());
    }

    let body = parsed.body.unwrap_or_default();
    debug!("Body: {}", body);

    let input = request::extract_field(&body, INPUT_FIELD)
        .ok_or_else(|| BridgeError::MissingField(INPUT_FIELD.to_string()))?;

    let (block, mode) = codec::classify_and_encode(input)
        .ok_or_else(|| BridgeError::InvalidInput(input.to_string()))?;
    info!("Parsed {} request, block length {}", mode, block.as_bytes().len());

    debug!("Sending block over bus: {}", block.to_hex());
    let result = transport.transact(&block)?;
    debug!("Received block from bus: {}", result.to_hex());

    let rendered = codec::render_result(mode, &result);
    Ok(response::success_page(mode, input, &rendered))
}

/// First 50 characters of the request with line breaks made visible.
fn preview(text: &str) -> String {
    text.replace("\r\n", "\\n").chars().take(50).collect()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("handler panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("handler panicked: {s}")
    } else {
        "handler panicked".to_string()
    }
}
