//! GeoJSON region source
//!
//! Reads an RFC 7946 FeatureCollection (or a single Feature) into a
//! [`RegionCollection`]. Properties other than the configured id and name
//! are not carried over.

use std::fs;
use std::path::{Path, PathBuf};

use geo::Geometry;
use geojson::{feature::Id, Feature, FeatureCollection, GeoJson, JsonObject, JsonValue};
use log::{debug, info};

use super::{Region, RegionCollection, RegionSource};
use crate::config::RegionsConfig;
use crate::coordinate::OUTPUT_CRS;
use crate::errors::{ZonalError, ZonalResult};

/// Loads regions from a GeoJSON file
pub struct GeoJsonRegionSource {
    path: PathBuf,
    config: RegionsConfig,
}

impl GeoJsonRegionSource {
    pub fn new(path: impl AsRef<Path>, config: RegionsConfig) -> Self {
        GeoJsonRegionSource {
            path: path.as_ref().to_path_buf(),
            config,
        }
    }

    /// Parse GeoJSON text into regions
    pub fn parse_str(&self, content: &str) -> ZonalResult<RegionCollection> {
        let geojson: GeoJson = content.parse()
            .map_err(|e: geojson::Error| ZonalError::InvalidGeoJson(e.to_string()))?;

        let collection = match geojson {
            GeoJson::FeatureCollection(collection) => collection,
            GeoJson::Feature(feature) => FeatureCollection {
                bbox: None,
                features: vec![feature],
                foreign_members: None,
            },
            GeoJson::Geometry(_) => {
                return Err(ZonalError::InvalidGeoJson(
                    "Expected a FeatureCollection or Feature, found a bare Geometry".to_string()
                ));
            }
        };

        let crs = self.config.crs.clone()
            .or_else(|| legacy_crs_name(collection.foreign_members.as_ref()))
            .unwrap_or_else(|| OUTPUT_CRS.to_string());

        let total = collection.features.len();
        let mut regions = Vec::with_capacity(total);

        for (index, feature) in collection.features.into_iter().enumerate() {
            if !self.matches_filter(&feature) {
                continue;
            }
            regions.push(self.feature_to_region(index, feature)?);
        }

        if regions.len() != total {
            info!("Filter kept {} of {} features", regions.len(), total);
        }

        Ok(RegionCollection::new(regions, crs))
    }

    fn feature_to_region(&self, index: usize, feature: Feature) -> ZonalResult<Region> {
        let id = property_string(&feature, &self.config.id_property)
            .or_else(|| feature.id.as_ref().map(id_to_string))
            .unwrap_or_else(|| {
                debug!("Feature {} has no id, using its position", index);
                format!("region-{}", index)
            });

        let name = property_string(&feature, &self.config.name_property);

        let geometry = match feature.geometry {
            Some(geometry) => Some(Geometry::<f64>::try_from(geometry)
                .map_err(|e| ZonalError::InvalidGeoJson(format!("Feature '{}': {}", id, e)))?),
            None => {
                debug!("Feature '{}' has no geometry", id);
                None
            }
        };

        Ok(Region::new(id, name, geometry))
    }

    fn matches_filter(&self, feature: &Feature) -> bool {
        match &self.config.filter {
            Some(filter) => property_string(feature, &filter.property)
                .map_or(false, |value| value == filter.equals),
            None => true,
        }
    }
}

impl RegionSource for GeoJsonRegionSource {
    fn load_regions(&self) -> ZonalResult<RegionCollection> {
        info!("Loading regions from {}", self.path.display());
        let content = fs::read_to_string(&self.path)?;
        let regions = self.parse_str(&content)?;
        info!("Loaded {} regions in {}", regions.len(), regions.crs());
        Ok(regions)
    }
}

/// Property value as text; numbers are formatted, null and missing are `None`
fn property_string(feature: &Feature, key: &str) -> Option<String> {
    match feature.property(key)? {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn id_to_string(id: &Id) -> String {
    match id {
        Id::String(s) => s.clone(),
        Id::Number(n) => n.to_string(),
    }
}

/// Pre-RFC 7946 `"crs": {"type": "name", "properties": {"name": ...}}` member
fn legacy_crs_name(foreign_members: Option<&JsonObject>) -> Option<String> {
    foreign_members?
        .get("crs")?
        .get("properties")?
        .get("name")?
        .as_str()
        .map(str::to_string)
}
