pub mod errors;
pub mod io;
pub mod compression;
pub mod coordinate;
pub mod raster;
pub mod vector;
pub mod sampler;
pub mod aggregator;
pub mod classifier;
pub mod pipeline;
pub mod config;
pub mod utils;
pub mod commands;
pub mod api;

#[cfg(test)]
mod tests;

pub use crate::api::ZonalKit;

pub use errors::{ZonalError, ZonalResult};
pub use raster::{GeoTransform, GeoTiffReader, Raster, RasterSource};
pub use vector::{GeoJsonRegionSource, GeoJsonSerializer, Region, RegionCollection, RegionSource, Serializer};
pub use aggregator::{ZonalAggregator, ZonalStats};
pub use classifier::{ClassificationScheme, Classifier, SchemeKind};
pub use pipeline::{annotate, AnnotatedRegions, StatsPipeline};
pub use coordinate::{BoundingBox, CoordinateSystem, CoordinateTransformer, Reprojector};
