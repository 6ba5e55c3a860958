//! Table file header.
//!
//! Fixed 64-byte little-endian layout:
//!
//! | offset | size | field                 |
//! |--------|------|-----------------------|
//! | 0      | 4    | magic `GRVT`          |
//! | 4      | 4    | version               |
//! | 8      | 4    | CRC32 of the body     |
//! | 12     | 4    | total size            |
//! | 16     | 4    | grammar fingerprint   |
//! | 20     | 2    | state count           |
//! | 22     | 2    | symbol count          |
//! | 24     | 2    | terminal count        |
//! | 26     | 2    | production count      |
//! | 28     | 2    | field count           |
//! | 30     | 2    | lex mode count        |
//! | 32     | 32   | reserved              |

use crate::{HEADER_SIZE, MAGIC, VERSION};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub magic: [u8; 4],
    pub version: u32,
    /// CRC32 of everything after the header.
    pub checksum: u32,
    /// Header plus body, in bytes.
    pub total_size: u32,
    /// Fingerprint of the grammar the table was compiled from.
    pub grammar_fingerprint: u32,
    pub state_count: u16,
    pub symbol_count: u16,
    pub terminal_count: u16,
    pub production_count: u16,
    pub field_count: u16,
    pub lex_mode_count: u16,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            checksum: 0,
            total_size: 0,
            grammar_fingerprint: 0,
            state_count: 0,
            symbol_count: 0,
            terminal_count: 0,
            production_count: 0,
            field_count: 0,
            lex_mode_count: 0,
        }
    }
}

impl Header {
    /// Decode header from the first 64 bytes.
    ///
    /// # Panics
    /// Panics if `bytes.len() < 64`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert!(bytes.len() >= HEADER_SIZE, "header too short");

        let u32_at = |o: usize| u32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]]);
        let u16_at = |o: usize| u16::from_le_bytes([bytes[o], bytes[o + 1]]);

        Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            version: u32_at(4),
            checksum: u32_at(8),
            total_size: u32_at(12),
            grammar_fingerprint: u32_at(16),
            state_count: u16_at(20),
            symbol_count: u16_at(22),
            terminal_count: u16_at(24),
            production_count: u16_at(26),
            field_count: u16_at(28),
            lex_mode_count: u16_at(30),
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&self.magic);
        out[4..8].copy_from_slice(&self.version.to_le_bytes());
        out[8..12].copy_from_slice(&self.checksum.to_le_bytes());
        out[12..16].copy_from_slice(&self.total_size.to_le_bytes());
        out[16..20].copy_from_slice(&self.grammar_fingerprint.to_le_bytes());
        out[20..22].copy_from_slice(&self.state_count.to_le_bytes());
        out[22..24].copy_from_slice(&self.symbol_count.to_le_bytes());
        out[24..26].copy_from_slice(&self.terminal_count.to_le_bytes());
        out[26..28].copy_from_slice(&self.production_count.to_le_bytes());
        out[28..30].copy_from_slice(&self.field_count.to_le_bytes());
        out[30..32].copy_from_slice(&self.lex_mode_count.to_le_bytes());
        out
    }

    pub fn validate_magic(&self) -> bool {
        self.magic == MAGIC
    }

    pub fn validate_version(&self) -> bool {
        self.version == VERSION
    }
}
