use cipher_bridge::codec::{classify_and_encode, render_result};
use cipher_bridge::models::{Block, OperationMode};
use cipher_bridge::server::request::{extract_field, INPUT_FIELD};

const CIPHERTEXT: &str = "CA4BCB48C849C94ECE4A52D2D2D2D2D2";

#[test]
fn test_ten_digits_select_encrypt() {
    for text in ["0000000000", "1234567890", "9999999999", "5551234567"] {
        let (block, mode) = classify_and_encode(text).unwrap();
        assert_eq!(mode, OperationMode::Encrypt);
        let mut expected = text.as_bytes().to_vec();
        expected.extend_from_slice(&[0x30; 6]);
        assert_eq!(block.as_bytes().as_slice(), expected.as_slice());
    }
}

#[test]
fn test_thirty_two_hex_select_decrypt() {
    let (block, mode) = classify_and_encode(CIPHERTEXT).unwrap();
    assert_eq!(mode, OperationMode::Decrypt);
    assert_eq!(
        block.as_bytes(),
        &[
            0xCA, 0x4B, 0xCB, 0x48, 0xC8, 0x49, 0xC9, 0x4E, 0xCE, 0x4A, 0x52, 0xD2, 0xD2, 0xD2,
            0xD2, 0xD2
        ]
    );
}

#[test]
fn test_hex_decoding_ignores_case() {
    let (upper, _) = classify_and_encode(CIPHERTEXT).unwrap();
    let (lower, _) = classify_and_encode(&CIPHERTEXT.to_lowercase()).unwrap();
    let (mixed, _) = classify_and_encode("cA4bCB48c849C94eCE4A52d2D2D2d2D2").unwrap();
    assert_eq!(upper, lower);
    assert_eq!(upper, mixed);
}

#[test]
fn test_thirty_two_digits_are_hex() {
    let (block, mode) = classify_and_encode("00112233445566778899001122334455").unwrap();
    assert_eq!(mode, OperationMode::Decrypt);
    assert_eq!(block.as_bytes()[1], 0x11);
}

#[test]
fn test_other_shapes_are_invalid() {
    let cases = [
        "",
        "123456789",
        "12345678901",
        "12345abcde",
        " 1234567890",
        "123456789\n",
        "+123456789",
        "CA4BCB48C849C94ECE4A52D2D2D2D2DG",
        "CA4BCB48C849C94ECE4A52D2D2D2D2D",
        "CA4BCB48C849C94ECE4A52D2D2D2D2D2A",
        "0xCA4BCB48C849C94ECE4A52D2D2D2D2",
        "%31%32%33%34%35%36%37%38%39%30",
    ];
    for text in cases {
        assert!(classify_and_encode(text).is_none(), "{text:?} should be invalid");
    }
}

#[test]
fn test_encrypt_result_is_fixed_width_uppercase_hex() {
    let mut bytes = [0u8; 16];
    bytes[0] = 0x0a;
    bytes[15] = 0xff;
    let rendered = render_result(OperationMode::Encrypt, &Block::new(bytes));
    assert_eq!(rendered, "0A0000000000000000000000000000FF");
    assert_eq!(rendered.len(), 32);
}

#[test]
fn test_decrypt_result_strips_trailing_nul_only() {
    let mut bytes = [0u8; 16];
    bytes[..10].copy_from_slice(b"1234567890");
    assert_eq!(render_result(OperationMode::Decrypt, &Block::new(bytes)), "1234567890");

    let padded = Block::new(*b"1234567890000000");
    assert_eq!(render_result(OperationMode::Decrypt, &padded), "1234567890000000");
}

#[test]
fn test_decrypt_result_drops_non_ascii_bytes() {
    let mut bytes = [0x80u8; 16];
    bytes[3] = b'7';
    bytes[10] = b'x';
    assert_eq!(render_result(OperationMode::Decrypt, &Block::new(bytes)), "7x");
}

#[test]
fn test_encrypt_of_echo_formats_as_hex() {
    let (block, mode) = classify_and_encode("1234567890").unwrap();
    let rendered = render_result(mode, &block);
    assert_eq!(rendered, "31323334353637383930303030303030");
}

#[test]
fn test_field_extraction() {
    assert_eq!(
        extract_field("inputData=1234567890&other=x", INPUT_FIELD),
        Some("1234567890")
    );
    assert_eq!(extract_field("other=x&inputData=42", INPUT_FIELD), Some("42"));
    assert_eq!(extract_field("other=x", INPUT_FIELD), None);
    assert_eq!(extract_field("inputdata=1234567890", INPUT_FIELD), None);
    // Only the first '=' separates key from value.
    assert_eq!(extract_field("inputData=a=b", INPUT_FIELD), Some("a=b"));
}
