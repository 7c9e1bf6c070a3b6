//! Geometry and raster reprojection
//!
//! Reference frames travel through the engine as identifier strings
//! (`EPSG:3857`, `urn:ogc:def:crs:OGC:1.3:CRS84`, ...). They are resolved here,
//! so an identifier that cannot be resolved fails at the first reprojection
//! that touches it.

use geo::{Geometry, MapCoords};
use log::debug;

use super::crs::{CoordinateSystem, CoordinateSystemFactory};
use super::transform::CoordinateTransformer;
use crate::errors::{ZonalError, ZonalResult};
use crate::raster::Raster;
use crate::vector::RegionCollection;

/// Stateless converter between reference frames
#[derive(Debug, Clone, Copy, Default)]
pub struct Reprojector {
    transformer: CoordinateTransformer,
}

impl Reprojector {
    pub fn new() -> Self {
        Reprojector { transformer: CoordinateTransformer }
    }

    /// Resolve an identifier to a coordinate system
    pub fn resolve(&self, crs: &str) -> ZonalResult<CoordinateSystem> {
        CoordinateSystemFactory::from_string(crs)
    }

    /// Whether two identifiers name the same frame
    pub fn same_frame(&self, a: &str, b: &str) -> ZonalResult<bool> {
        Ok(self.resolve(a)? == self.resolve(b)?)
    }

    /// Reproject a geometry; the identity when both frames resolve to the same system
    pub fn reproject_geometry(&self, geometry: &Geometry<f64>, from_crs: &str, to_crs: &str) -> ZonalResult<Geometry<f64>> {
        let from = self.resolve(from_crs)?;
        let to = self.resolve(to_crs)?;

        if from == to {
            return Ok(geometry.clone());
        }

        let transformer = &self.transformer;
        geometry.try_map_coords(|coord| transformer.transform_coord(coord, &from, &to))
    }

    /// Re-tag a raster with another identifier for the same frame
    ///
    /// Cell values are never resampled, so the target must resolve to the
    /// raster's own system; anything else is `UnsupportedCrs`.
    pub fn reproject_raster_crs(&self, raster: &Raster, to_crs: &str) -> ZonalResult<Raster> {
        let from = self.resolve(raster.crs())?;
        let to = self.resolve(to_crs)?;

        if from != to {
            return Err(ZonalError::UnsupportedCrs(format!(
                "Raster resampling from {} to {} is not supported",
                from.description(), to.description()
            )));
        }

        Ok(raster.clone().with_crs(to_crs))
    }

    /// Reproject every region of a collection into `to_crs`
    pub fn reproject_regions(&self, regions: &RegionCollection, to_crs: &str) -> ZonalResult<RegionCollection> {
        if self.same_frame(regions.crs(), to_crs)? {
            debug!("Regions already in {}, skipping reprojection", to_crs);
            return Ok(regions.clone().with_crs(to_crs));
        }

        debug!("Reprojecting {} regions from {} to {}", regions.len(), regions.crs(), to_crs);

        let mut reprojected = Vec::with_capacity(regions.len());
        for region in regions.iter() {
            let geometry = match region.geometry() {
                Some(geometry) => Some(self.reproject_geometry(geometry, regions.crs(), to_crs)?),
                None => None,
            };
            reprojected.push(region.clone().with_geometry(geometry));
        }

        Ok(RegionCollection::new(reprojected, to_crs))
    }
}
