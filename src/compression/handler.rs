//! Compression handler trait definition

use crate::errors::ZonalResult;

/// Strategy trait for decoding one compressed strip or tile
pub trait CompressionHandler: Send + Sync {
    /// Decompress the data
    fn decompress(&self, data: &[u8]) -> ZonalResult<Vec<u8>>;

    /// Get the name of this compression method
    fn name(&self) -> &'static str;

    /// Get the compression code
    fn code(&self) -> u64;
}
