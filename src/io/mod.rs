//! I/O utilities for binary raster files

pub mod seekable;
pub mod byte_order;
