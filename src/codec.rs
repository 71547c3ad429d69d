//! Conversion between submitted text and peripheral blocks.
//!
//! A 10-digit phone number is encrypted: its ASCII bytes are padded with
//! `'0'` (0x30) up to a full block. A 32-character hex string is decrypted:
//! its byte pairs are decoded left to right into the block.

use crate::models::{Block, OperationMode, BLOCK_LEN};

/// Digits in an accepted phone number.
pub const PHONE_DIGITS: usize = 10;
/// Hex characters in an accepted ciphertext.
pub const CIPHERTEXT_HEX_LEN: usize = BLOCK_LEN * 2;
/// Fills the tail of an encrypt block.
pub const ENCRYPT_PAD_BYTE: u8 = 0x30;
/// Stripped from the tail of a decrypt result before display.
/// Not the same byte as `ENCRYPT_PAD_BYTE`, so a decrypted phone number is
/// shown with its `'0'` padding.
pub const DECRYPT_TRIM_BYTE: u8 = 0x00;

/// Classifies `text` and builds the block to send to the peripheral.
///
/// Returns `None` when the text matches neither accepted shape.
pub fn classify_and_encode(text: &str) -> Option<(Block, OperationMode)> {
    if text.len() == PHONE_DIGITS && text.bytes().all(|b| b.is_ascii_digit()) {
        let mut bytes = [ENCRYPT_PAD_BYTE; BLOCK_LEN];
        bytes[..PHONE_DIGITS].copy_from_slice(text.as_bytes());
        return Some((Block::new(bytes), OperationMode::Encrypt));
    }

    if text.len() == CIPHERTEXT_HEX_LEN && text.bytes().all(|b| b.is_ascii_hexdigit()) {
        let mut bytes = [0u8; BLOCK_LEN];
        hex::decode_to_slice(text, &mut bytes).ok()?;
        return Some((Block::new(bytes), OperationMode::Decrypt));
    }

    None
}

/// Renders the block returned by the peripheral for display.
///
/// Encrypt results become 32 uppercase hex characters. Decrypt results lose
/// their trailing `DECRYPT_TRIM_BYTE`s and are decoded as ASCII, silently
/// dropping bytes outside the ASCII range.
pub fn render_result(mode: OperationMode, result: &Block) -> String {
    match mode {
        OperationMode::Encrypt => result.to_hex(),
        OperationMode::Decrypt => {
            let bytes = result.as_bytes();
            let end = bytes
                .iter()
                .rposition(|&b| b != DECRYPT_TRIM_BYTE)
                .map_or(0, |i| i + 1);
            bytes[..end]
                .iter()
                .filter(|b| b.is_ascii())
                .map(|&b| b as char)
                .collect()
        }
    }
}
