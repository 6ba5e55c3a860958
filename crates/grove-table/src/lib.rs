#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Parse table format and runtime view for Grove.
//!
//! A compiled table is a 64-byte [`Header`] followed by a postcard-encoded
//! [`TableData`] body. [`ParseTable`] is the loaded, read-only view shared
//! (by `Arc`) between any number of concurrent parses.

mod action;
mod dump;
mod header;
mod matcher;
mod table;

#[cfg(test)]
mod header_tests;

pub use action::{Action, FieldId, LexModeId, NO_STATE, ProductionId, StateId, SymbolId};
pub use dump::dump;
pub use header::Header;
pub use matcher::{MatchResult, Matcher, MatcherDef, build_dfa};
pub use table::{
    FieldEntry, LexMode, ParseTable, ProductionInfo, SymbolInfo, SymbolKind, TableData, TableError,
    TokenDef,
};

/// Magic bytes identifying a Grove table file.
pub const MAGIC: [u8; 4] = *b"GRVT";

/// Current table format version.
pub const VERSION: u32 = 1;

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 64;
