//! Binary serialization for grammars using postcard.

use super::GrammarError;
use super::types::Grammar;

impl Grammar {
    /// Deserialize grammar from binary format.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, GrammarError> {
        Ok(postcard::from_bytes(bytes)?)
    }

    /// Serialize grammar to binary format.
    pub fn to_binary(&self) -> Result<Vec<u8>, GrammarError> {
        Ok(postcard::to_allocvec(self)?)
    }

    /// Grammar-version fingerprint: CRC32 of the binary encoding.
    ///
    /// Any change to rules, extras, precedences or conflicts changes the
    /// fingerprint. Compiled tables embed it and refuse to pair with a
    /// grammar that hashes differently.
    pub fn fingerprint(&self) -> Result<u32, GrammarError> {
        Ok(crc32fast::hash(&self.to_binary()?))
    }
}
