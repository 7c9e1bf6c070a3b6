use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::info;

use crate::config::PipelineConfig;
use crate::errors::ZonalResult;
use crate::pipeline::{AnnotatedRegions, StatsPipeline};
use crate::raster::{GeoTiffReader, Raster, RasterSource};
use crate::vector::{GeoJsonRegionSource, GeoJsonSerializer, RegionCollection, RegionSource, Serializer};

/// Main interface to the ZonalKit library
///
/// Wires the configured sources, the pipeline and the serializer together.
pub struct ZonalKit {
    config: PipelineConfig,
}

impl ZonalKit {
    /// Create a ZonalKit instance from a validated configuration
    pub fn new(config: PipelineConfig) -> ZonalResult<Self> {
        config.validate()?;
        Ok(ZonalKit { config })
    }

    /// Create a ZonalKit instance from a TOML configuration file
    pub fn from_config_file(path: &Path) -> ZonalResult<Self> {
        Self::new(PipelineConfig::from_file(path)?)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load the configured GeoTIFF
    pub fn load_raster(&self) -> ZonalResult<Raster> {
        GeoTiffReader::from_config(&self.config.raster)?.load_raster()
    }

    /// Load the configured GeoJSON regions
    pub fn load_regions(&self) -> ZonalResult<RegionCollection> {
        let path = self.config.regions_path()?;
        GeoJsonRegionSource::new(path, self.config.regions.clone()).load_regions()
    }

    /// Run the pipeline on already loaded inputs
    pub fn annotate(&self, raster: &Raster, regions: &RegionCollection) -> ZonalResult<AnnotatedRegions> {
        StatsPipeline::from_config(&self.config).run(raster, regions)
    }

    /// Load both sources and run the pipeline
    pub fn annotate_files(&self) -> ZonalResult<AnnotatedRegions> {
        let raster = self.load_raster()?;
        let regions = self.load_regions()?;
        self.annotate(&raster, &regions)
    }

    /// Serialize annotated regions as a GeoJSON FeatureCollection
    pub fn to_geojson(&self, annotated: &AnnotatedRegions) -> ZonalResult<String> {
        GeoJsonSerializer::from_config(&self.config.output).serialize(&annotated.regions)
    }

    /// Write annotated regions to a GeoJSON file
    pub fn write_geojson(&self, annotated: &AnnotatedRegions, output_path: &Path) -> ZonalResult<()> {
        let writer = BufWriter::new(File::create(output_path)?);
        GeoJsonSerializer::from_config(&self.config.output).write_to(&annotated.regions, writer)?;
        info!("Wrote {} regions to {}", annotated.regions.len(), output_path.display());
        Ok(())
    }

    /// Describe the configured raster: size, georeferencing, frame and value range
    pub fn inspect(&self) -> ZonalResult<String> {
        let raster = self.load_raster()?;
        let transform = raster.transform();
        let extent = raster.extent();

        let mut result = format!("Raster: {}\n", self.config.raster_path()?.display());
        result.push_str(&format!("  Dimensions: {}x{}\n", raster.width(), raster.height()));
        result.push_str(&format!("  CRS: {}\n", raster.crs()));
        result.push_str(&format!("  Origin: ({}, {})\n", transform.origin_x, transform.origin_y));
        result.push_str(&format!("  Pixel size: ({}, {})\n", transform.pixel_width, transform.pixel_height));
        if !transform.is_north_up() {
            result.push_str(&format!("  Rotation: ({}, {})\n", transform.row_rotation, transform.col_rotation));
        }
        result.push_str(&format!("  Extent: [{}, {}, {}, {}]\n", extent.min_x, extent.min_y, extent.max_x, extent.max_y));

        match raster.nodata() {
            Some(nodata) => result.push_str(&format!("  No-data: {}\n", nodata)),
            None => result.push_str("  No-data: none\n"),
        }

        match raster.summary() {
            Some((count, min, mean, max)) => {
                result.push_str(&format!("  Valid cells: {}\n", count));
                result.push_str(&format!("  Min/Mean/Max: {} / {} / {}\n", min, mean, max));
            },
            None => result.push_str("  Valid cells: 0\n"),
        }

        Ok(result)
    }
}
