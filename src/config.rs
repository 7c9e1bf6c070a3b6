//! Pipeline configuration
//!
//! Everything the engine needs from its surroundings (input locations,
//! reference frame overrides, output naming) is passed in through
//! [`PipelineConfig`], usually read from a TOML file:
//!
//! ```toml
//! show_progress = true
//!
//! [raster]
//! path = "data/raster/synthetic_lst.tif"
//!
//! [regions]
//! path = "data/neighborhoods.geojson"
//! id_property = "NUTS_ID"
//! name_property = "NAME_LATN"
//! filter = { property = "CNTR_CODE", equals = "AT" }
//!
//! [output]
//! crs = "EPSG:4326"
//! property_prefix = "lst"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

use crate::coordinate::OUTPUT_CRS;
use crate::errors::{ZonalError, ZonalResult};

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub raster: RasterConfig,
    pub regions: RegionsConfig,
    pub output: OutputConfig,
    /// Show a progress bar while sampling regions
    pub show_progress: bool,
}

/// Where the raster comes from and how to interpret it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RasterConfig {
    pub path: Option<PathBuf>,
    /// Reference frame to use when the file carries none
    pub crs: Option<String>,
    /// No-data sentinel overriding the file's
    pub nodata: Option<f64>,
}

/// Where the regions come from and which properties identify them
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegionsConfig {
    pub path: Option<PathBuf>,
    pub id_property: String,
    pub name_property: String,
    /// Reference frame overriding the document's
    pub crs: Option<String>,
    pub filter: Option<RegionFilter>,
}

/// Keep only features whose `property` equals `equals`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionFilter {
    pub property: String,
    pub equals: String,
}

/// Output reference frame and property naming
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub crs: String,
    pub property_prefix: String,
    pub pretty: bool,
}

impl Default for RegionsConfig {
    fn default() -> Self {
        RegionsConfig {
            path: None,
            id_property: "id".to_string(),
            name_property: "name".to_string(),
            crs: None,
            filter: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            crs: OUTPUT_CRS.to_string(),
            property_prefix: "lst".to_string(),
            pretty: false,
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> ZonalResult<Self> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file
    pub fn from_file(path: &Path) -> ZonalResult<Self> {
        info!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| ZonalError::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Reject settings that cannot produce a meaningful run
    pub fn validate(&self) -> ZonalResult<()> {
        if self.output.crs.trim().is_empty() {
            return Err(ZonalError::Config("output.crs must not be empty".to_string()));
        }
        if self.output.property_prefix.trim().is_empty() {
            return Err(ZonalError::Config("output.property_prefix must not be empty".to_string()));
        }
        if self.regions.id_property.trim().is_empty() {
            return Err(ZonalError::Config("regions.id_property must not be empty".to_string()));
        }
        if let Some(nodata) = self.raster.nodata {
            if nodata.is_nan() {
                return Err(ZonalError::Config("raster.nodata must be a number; NaN cells are always skipped".to_string()));
            }
        }
        Ok(())
    }

    /// Raster path, or a configuration error naming the missing setting
    pub fn raster_path(&self) -> ZonalResult<&Path> {
        self.raster.path.as_deref()
            .ok_or_else(|| ZonalError::Config("No raster path given (raster.path or --raster)".to_string()))
    }

    /// Regions path, or a configuration error naming the missing setting
    pub fn regions_path(&self) -> ZonalResult<&Path> {
        self.regions.path.as_deref()
            .ok_or_else(|| ZonalError::Config("No regions path given (regions.path or --regions)".to_string()))
    }
}
