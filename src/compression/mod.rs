//! Decompression of TIFF strips and tiles
//!
//! Each supported TIFF compression code maps to one [`CompressionHandler`];
//! [`CompressionFactory`] picks the handler for a directory's code.

mod handler;
mod uncompressed;
mod deflate;
mod factory;
mod lzw;
mod zstd;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use deflate::AdobeDeflateHandler;
pub use factory::CompressionFactory;
pub use lzw::LzwHandler;
pub use zstd::ZstdHandler;
