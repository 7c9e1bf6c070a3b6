//! GeoJSON serialization of annotated regions

use std::io::Write;

use geojson::{feature::Id, Feature, FeatureCollection, JsonObject, JsonValue};
use serde_json::json;

use super::{Region, RegionCollection};
use crate::config::OutputConfig;
use crate::coordinate::CoordinateSystemFactory;
use crate::errors::ZonalResult;

/// Turns an annotated region collection into an interchange document
pub trait Serializer {
    /// Serialize the whole collection to text
    fn serialize(&self, regions: &RegionCollection) -> ZonalResult<String>;
}

/// Writes regions as an RFC 7946 FeatureCollection
///
/// Each feature carries `id`, `name` and `<prefix>_count`, `<prefix>_mean`,
/// `<prefix>_min`, `<prefix>_max`, `<prefix>_class`, with `null` for missing values.
pub struct GeoJsonSerializer {
    prefix: String,
    pretty: bool,
}

impl GeoJsonSerializer {
    pub fn new(prefix: impl Into<String>, pretty: bool) -> Self {
        GeoJsonSerializer {
            prefix: prefix.into(),
            pretty,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.property_prefix.clone(), config.pretty)
    }

    /// Name of a statistic property, e.g. `lst_mean`
    pub fn property_name(&self, statistic: &str) -> String {
        format!("{}_{}", self.prefix, statistic)
    }

    /// Build the FeatureCollection for a region collection
    pub fn to_feature_collection(&self, regions: &RegionCollection) -> FeatureCollection {
        let features = regions.iter().map(|region| self.to_feature(region)).collect();

        // RFC 7946 documents are WGS 84 unless they say otherwise
        let is_wgs84 = CoordinateSystemFactory::from_string(regions.crs())
            .map(|system| system.is_geographic())
            .unwrap_or(false);

        let foreign_members = if is_wgs84 {
            None
        } else {
            let mut members = JsonObject::new();
            members.insert("crs".to_string(), json!({
                "type": "name",
                "properties": { "name": regions.crs() }
            }));
            Some(members)
        };

        FeatureCollection {
            bbox: None,
            features,
            foreign_members,
        }
    }

    fn to_feature(&self, region: &Region) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert("id".to_string(), JsonValue::from(region.id()));
        properties.insert("name".to_string(), JsonValue::from(region.name()));
        properties.insert(self.property_name("count"), JsonValue::from(region.statistics().map(|s| s.count)));
        properties.insert(self.property_name("mean"), JsonValue::from(region.mean()));
        properties.insert(self.property_name("min"), JsonValue::from(region.min()));
        properties.insert(self.property_name("max"), JsonValue::from(region.max()));
        properties.insert(self.property_name("class"), JsonValue::from(region.class()));

        Feature {
            bbox: None,
            geometry: region.geometry().map(|g| geojson::Geometry::new(geojson::Value::from(g))),
            id: Some(Id::String(region.id().to_string())),
            properties: Some(properties),
            foreign_members: None,
        }
    }

    /// Serialize straight into a writer
    pub fn write_to<W: Write>(&self, regions: &RegionCollection, writer: W) -> ZonalResult<()> {
        let collection = self.to_feature_collection(regions);
        if self.pretty {
            serde_json::to_writer_pretty(writer, &collection)?;
        } else {
            serde_json::to_writer(writer, &collection)?;
        }
        Ok(())
    }
}

impl Serializer for GeoJsonSerializer {
    fn serialize(&self, regions: &RegionCollection) -> ZonalResult<String> {
        let collection = self.to_feature_collection(regions);
        let text = if self.pretty {
            serde_json::to_string_pretty(&collection)?
        } else {
            serde_json::to_string(&collection)?
        };
        Ok(text)
    }
}
