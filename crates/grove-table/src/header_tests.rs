use crate::{HEADER_SIZE, Header, MAGIC, VERSION};

#[test]
fn header_roundtrip() {
    let header = Header {
        checksum: 0xdead_beef,
        total_size: 4096,
        grammar_fingerprint: 0x1234_5678,
        state_count: 42,
        symbol_count: 17,
        terminal_count: 9,
        production_count: 12,
        field_count: 3,
        lex_mode_count: 5,
        ..Default::default()
    };

    let bytes = header.to_bytes();
    assert_eq!(bytes.len(), HEADER_SIZE);
    assert_eq!(Header::from_bytes(&bytes), header);
}

#[test]
fn default_header_is_valid() {
    let header = Header::default();
    assert_eq!(header.magic, MAGIC);
    assert_eq!(header.version, VERSION);
    assert!(header.validate_magic());
    assert!(header.validate_version());
}

#[test]
fn layout_is_little_endian() {
    let header = Header {
        total_size: 0x0102_0304,
        state_count: 0x0506,
        ..Default::default()
    };
    let bytes = header.to_bytes();

    assert_eq!(&bytes[0..4], b"GRVT");
    assert_eq!(&bytes[12..16], &[0x04, 0x03, 0x02, 0x01]);
    assert_eq!(&bytes[20..22], &[0x06, 0x05]);
    assert!(bytes[32..].iter().all(|&b| b == 0));
}

#[test]
fn bad_magic_detected() {
    let mut bytes = Header::default().to_bytes();
    bytes[0] = b'X';
    assert!(!Header::from_bytes(&bytes).validate_magic());
}

#[test]
#[should_panic(expected = "header too short")]
fn short_input_panics() {
    Header::from_bytes(&[0u8; 10]);
}
