//! Custom error types for zonal processing

use std::io;
use thiserror::Error;

/// Errors surfaced by the zonal statistics engine and its sources
#[derive(Debug, Error)]
pub enum ZonalError {
    /// Reference frame identifier cannot be resolved or transformed
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),
    /// Raster is malformed or inconsistent
    #[error("Invalid raster: {0}")]
    InvalidRaster(String),
    /// Region input is not a usable GeoJSON feature collection
    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Configuration could not be read or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),
    /// Invalid TIFF header
    #[error("Invalid TIFF header")]
    InvalidHeader,
    /// Invalid byte order marker
    #[error("Invalid byte order marker: {0:#06x}")]
    InvalidByteOrder(u16),
    /// Unsupported compression method
    #[error("Unsupported compression method: {0}")]
    UnsupportedCompression(u64),
    /// Tag not found
    #[error("Tag not found: {0}")]
    TagNotFound(u16),
}

/// Result type for zonal operations
pub type ZonalResult<T> = Result<T, ZonalError>;

impl From<toml::de::Error> for ZonalError {
    fn from(error: toml::de::Error) -> Self {
        ZonalError::Config(error.to_string())
    }
}
