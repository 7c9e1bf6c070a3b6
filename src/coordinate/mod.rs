//! Coordinate handling for geospatial data
//!
//! This module provides reference frame resolution, point transformations
//! and the geometry/raster reprojector used by the pipeline.

mod bbox;
mod transform;
mod crs;
mod reprojector;

// Re-export key types
pub use self::bbox::BoundingBox;
pub use self::transform::CoordinateTransformer;
pub use self::crs::{CoordinateSystem, CoordinateSystemFactory};
pub use self::reprojector::Reprojector;

/// Canonical output frame of the engine
pub const OUTPUT_CRS: &str = "EPSG:4326";
