//! Handler for Deflate compressed data

use std::io::Read;

use flate2::read::ZlibDecoder;
use log::debug;

use crate::errors::{ZonalError, ZonalResult};
use super::handler::CompressionHandler;

/// Zlib-wrapped Deflate handler
///
/// Serves both the Adobe code (8) and the legacy PKZIP code (32946);
/// the payload format is the same.
pub struct AdobeDeflateHandler {
    code: u64,
}

impl AdobeDeflateHandler {
    pub fn new(code: u64) -> Self {
        AdobeDeflateHandler { code }
    }
}

impl Default for AdobeDeflateHandler {
    fn default() -> Self {
        Self::new(8)
    }
}

impl CompressionHandler for AdobeDeflateHandler {
    fn decompress(&self, data: &[u8]) -> ZonalResult<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        let mut decompressed_data = Vec::new();
        match decoder.read_to_end(&mut decompressed_data) {
            Ok(_) => {
                debug!("Deflate decompressed {} bytes to {}", data.len(), decompressed_data.len());
                Ok(decompressed_data)
            },
            Err(e) => Err(ZonalError::InvalidRaster(format!("Deflate decompression error: {}", e))),
        }
    }

    fn name(&self) -> &'static str {
        "Adobe Deflate"
    }

    fn code(&self) -> u64 {
        self.code
    }
}
