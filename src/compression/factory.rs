//! Factory for creating compression handlers

use crate::errors::{ZonalError, ZonalResult};
use super::handler::CompressionHandler;
use super::uncompressed::UncompressedHandler;
use super::deflate::AdobeDeflateHandler;
use super::lzw::LzwHandler;
use super::zstd::ZstdHandler;

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Create a compression handler for the given compression code
    pub fn create_handler(compression: u64) -> ZonalResult<Box<dyn CompressionHandler>> {
        match compression {
            1 => Ok(Box::new(UncompressedHandler)),
            5 => Ok(Box::new(LzwHandler)),
            8 | 32946 => Ok(Box::new(AdobeDeflateHandler::new(compression))),
            14 => Ok(Box::new(ZstdHandler)),
            _ => Err(ZonalError::UnsupportedCompression(compression))
        }
    }
}
