//! Bounding box structure for limiting raster scans

use geo::{BoundingRect, Geometry};

use crate::raster::{GeoTransform, PixelWindow};

/// An axis-aligned bounding box in map coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum X coordinate
    pub min_x: f64,
    /// Minimum Y coordinate
    pub min_y: f64,
    /// Maximum X coordinate
    pub max_x: f64,
    /// Maximum Y coordinate
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox { min_x, min_y, max_x, max_y }
    }

    /// Bounds of a geometry, `None` when it has no coordinates
    pub fn from_geometry(geometry: &Geometry<f64>) -> Option<Self> {
        geometry.bounding_rect().map(|rect| BoundingBox {
            min_x: rect.min().x,
            min_y: rect.min().y,
            max_x: rect.max().x,
            max_y: rect.max().y,
        })
    }

    /// Convert to the block of cells whose centers may fall inside this box
    ///
    /// The window is a superset: every cell whose center lies in the box is in it,
    /// and it is clamped to `width` x `height`. Returns `None` when the box misses
    /// the raster entirely or the transform is singular.
    pub fn to_pixel_window(&self, transform: &GeoTransform, width: usize, height: usize) -> Option<PixelWindow> {
        let corners = [
            (self.min_x, self.min_y),
            (self.min_x, self.max_y),
            (self.max_x, self.min_y),
            (self.max_x, self.max_y),
        ];

        let mut col_min = f64::INFINITY;
        let mut col_max = f64::NEG_INFINITY;
        let mut row_min = f64::INFINITY;
        let mut row_max = f64::NEG_INFINITY;

        for (x, y) in corners {
            let (col, row) = transform.geo_to_pixel(x, y)?;
            col_min = col_min.min(col);
            col_max = col_max.max(col);
            row_min = row_min.min(row);
            row_max = row_max.max(row);
        }

        if !(col_min.is_finite() && col_max.is_finite() && row_min.is_finite() && row_max.is_finite()) {
            return None;
        }

        // Clamp in f64 first so huge coordinates cannot overflow the casts
        let start_x = col_min.floor().max(0.0);
        let start_y = row_min.floor().max(0.0);
        let end_x = col_max.ceil().min(width as f64);
        let end_y = row_max.ceil().min(height as f64);

        if end_x <= start_x || end_y <= start_y {
            return None;
        }

        let (start_x, start_y) = (start_x as usize, start_y as usize);
        Some(PixelWindow::new(
            start_x,
            start_y,
            end_x as usize - start_x,
            end_y as usize - start_y,
        ))
    }
}
