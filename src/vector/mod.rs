//! Polygon regions and their GeoJSON sources and serializers
//!
//! Regions are immutable apart from the statistics and class fields,
//! which the pipeline fills in exactly once.

mod geojson_source;
mod geojson_writer;

pub use geojson_source::GeoJsonRegionSource;
pub use geojson_writer::{GeoJsonSerializer, Serializer};

use geo::Geometry;

use crate::aggregator::ZonalStats;
use crate::errors::ZonalResult;

/// Supplies the initial region collection
pub trait RegionSource {
    /// Load all regions with their geometry, id, name and reference frame
    fn load_regions(&self) -> ZonalResult<RegionCollection>;
}

/// A named polygon (or multi-polygon) and its raster-derived annotation
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    id: String,
    name: Option<String>,
    geometry: Option<Geometry<f64>>,
    statistics: Option<ZonalStats>,
    class: Option<usize>,
}

impl Region {
    /// Create an unannotated region
    pub fn new(id: impl Into<String>, name: Option<String>, geometry: Option<Geometry<f64>>) -> Self {
        Region {
            id: id.into(),
            name,
            geometry,
            statistics: None,
            class: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Geometry, `None` for a feature without one
    pub fn geometry(&self) -> Option<&Geometry<f64>> {
        self.geometry.as_ref()
    }

    /// Statistics, `None` when no raster cell overlapped the region
    pub fn statistics(&self) -> Option<&ZonalStats> {
        self.statistics.as_ref()
    }

    pub fn mean(&self) -> Option<f64> {
        self.statistics.map(|s| s.mean)
    }

    pub fn min(&self) -> Option<f64> {
        self.statistics.map(|s| s.min)
    }

    pub fn max(&self) -> Option<f64> {
        self.statistics.map(|s| s.max)
    }

    /// Ordinal class in `0..=5`, `None` whenever the mean is missing
    pub fn class(&self) -> Option<usize> {
        self.class
    }

    pub(crate) fn with_geometry(mut self, geometry: Option<Geometry<f64>>) -> Self {
        self.geometry = geometry;
        self
    }

    pub(crate) fn annotate(&mut self, statistics: Option<ZonalStats>, class: Option<usize>) {
        self.statistics = statistics;
        self.class = class;
    }
}

/// Ordered sequence of regions sharing one reference frame
#[derive(Debug, Clone, PartialEq)]
pub struct RegionCollection {
    regions: Vec<Region>,
    crs: String,
}

impl RegionCollection {
    pub fn new(regions: Vec<Region>, crs: impl Into<String>) -> Self {
        RegionCollection { regions, crs: crs.into() }
    }

    /// Reference frame identifier of every geometry in the collection
    pub fn crs(&self) -> &str {
        &self.crs
    }

    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = crs.into();
        self
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Region> {
        self.regions.iter_mut()
    }

    /// Region ids in collection order
    pub fn ids(&self) -> Vec<&str> {
        self.regions.iter().map(|r| r.id()).collect()
    }
}

impl IntoIterator for RegionCollection {
    type Item = Region;
    type IntoIter = std::vec::IntoIter<Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.into_iter()
    }
}

impl<'a> IntoIterator for &'a RegionCollection {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}
