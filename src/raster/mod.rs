//! Raster grids and raster sources
//!
//! A [`Raster`] is an immutable, fully materialized single-band grid with its
//! georeferencing. Sources produce one; the engine only ever reads it.

mod geotransform;
mod window;
pub mod constants;
pub mod ifd;
pub mod geotiff;

pub use geotransform::GeoTransform;
pub use window::PixelWindow;
pub use geotiff::GeoTiffReader;

use crate::coordinate::BoundingBox;
use crate::errors::{ZonalError, ZonalResult};

/// Supplies a raster to the pipeline
pub trait RasterSource {
    /// Load the raster fully into memory
    fn load_raster(&self) -> ZonalResult<Raster>;
}

/// Single-band grid of scalar values with its geotransform and reference frame
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    /// Row-major cell values, `height * width` long
    data: Vec<f64>,
    transform: GeoTransform,
    crs: String,
    nodata: Option<f64>,
}

impl Raster {
    /// Create a raster, checking that the grid is non-empty, matches the data
    /// length and has a non-zero cell size
    pub fn new(width: usize, height: usize, data: Vec<f64>, transform: GeoTransform, crs: impl Into<String>) -> ZonalResult<Self> {
        if width == 0 || height == 0 {
            return Err(ZonalError::InvalidRaster(format!("Raster dimensions must be positive, got {}x{}", width, height)));
        }

        if data.len() != width * height {
            return Err(ZonalError::InvalidRaster(format!(
                "Raster data has {} values, expected {}x{} = {}",
                data.len(), width, height, width * height
            )));
        }

        let det = transform.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(ZonalError::InvalidRaster("Raster cell size must be non-zero".to_string()));
        }

        Ok(Raster {
            width,
            height,
            data,
            transform,
            crs: crs.into(),
            nodata: None,
        })
    }

    /// Set the no-data sentinel
    pub fn with_nodata(mut self, nodata: Option<f64>) -> Self {
        self.nodata = nodata;
        self
    }

    /// Same grid tagged with another reference frame identifier
    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = crs.into();
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Reference frame identifier, e.g. `EPSG:3857`
    pub fn crs(&self) -> &str {
        &self.crs
    }

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    /// Raw cell values in row-major order
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Value of cell (col, row), `None` when out of bounds
    pub fn get(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(self.data[row * self.width + col])
    }

    /// Whether a value counts as missing: NaN, infinite or equal to the no-data sentinel
    pub fn is_missing(&self, value: f64) -> bool {
        !value.is_finite() || self.nodata.map_or(false, |nodata| value == nodata)
    }

    /// Map-space extent of the whole grid
    pub fn extent(&self) -> BoundingBox {
        let corners = [
            self.transform.pixel_to_geo(0.0, 0.0),
            self.transform.pixel_to_geo(self.width as f64, 0.0),
            self.transform.pixel_to_geo(0.0, self.height as f64),
            self.transform.pixel_to_geo(self.width as f64, self.height as f64),
        ];

        let mut bbox = BoundingBox::new(f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (x, y) in corners {
            bbox.min_x = bbox.min_x.min(x);
            bbox.min_y = bbox.min_y.min(y);
            bbox.max_x = bbox.max_x.max(x);
            bbox.max_y = bbox.max_y.max(y);
        }
        bbox
    }

    /// Count, minimum, mean and maximum over all non-missing cells
    pub fn summary(&self) -> Option<(usize, f64, f64, f64)> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for &value in self.data.iter().filter(|v| !self.is_missing(**v)) {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            None
        } else {
            Some((count, min, sum / count as f64, max))
        }
    }
}
