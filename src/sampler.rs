//! Polygon mask sampling
//!
//! A cell is covered by a polygon when its center lies inside the polygon or
//! on its boundary. Only cells inside the raster are ever visited; the scan is
//! limited to the polygon's bounding window.

use geo::{Coord, Geometry, Intersects};
use log::debug;

use crate::coordinate::BoundingBox;
use crate::raster::{PixelWindow, Raster};

/// Extracts the raster values covered by a polygon
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterSampler;

impl RasterSampler {
    pub fn new() -> Self {
        RasterSampler
    }

    /// Values of all cells whose center is covered by `geometry`
    ///
    /// Values are returned in row-major order as stored, missing ones included;
    /// filtering is left to the caller. An absent, empty or non-areal geometry,
    /// or one that misses the raster, yields an empty vector.
    pub fn sample(&self, raster: &Raster, geometry: Option<&Geometry<f64>>) -> Vec<f64> {
        let geometry = match geometry {
            Some(geometry) => geometry,
            None => return Vec::new(),
        };

        if !is_areal(geometry) {
            debug!("Skipping non-areal geometry");
            return Vec::new();
        }

        let window = match self.window_for(raster, geometry) {
            Some(window) => window,
            None => return Vec::new(),
        };

        let transform = raster.transform();
        let mut values = Vec::new();

        for row in window.y..window.end_y() {
            for col in window.x..window.end_x() {
                let (x, y) = transform.cell_center(col, row);
                if covers(geometry, Coord { x, y }) {
                    if let Some(value) = raster.get(col, row) {
                        values.push(value);
                    }
                }
            }
        }

        values
    }

    /// Cells worth testing for `geometry`, `None` when it cannot cover any cell
    pub fn window_for(&self, raster: &Raster, geometry: &Geometry<f64>) -> Option<PixelWindow> {
        let bbox = BoundingBox::from_geometry(geometry)?;
        bbox.to_pixel_window(raster.transform(), raster.width(), raster.height())
    }
}

fn is_areal(geometry: &Geometry<f64>) -> bool {
    match geometry {
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => true,
        Geometry::GeometryCollection(collection) => collection.iter().any(is_areal),
        _ => false,
    }
}

/// Center-inside-or-on-boundary test
fn covers(geometry: &Geometry<f64>, coord: Coord<f64>) -> bool {
    match geometry {
        Geometry::Polygon(polygon) => polygon.intersects(&coord),
        Geometry::MultiPolygon(multi) => multi.intersects(&coord),
        Geometry::Rect(rect) => rect.intersects(&coord),
        Geometry::Triangle(triangle) => triangle.intersects(&coord),
        Geometry::GeometryCollection(collection) => collection.iter().any(|g| covers(g, coord)),
        _ => false,
    }
}
