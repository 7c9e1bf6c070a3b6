//! Coordinate transformation functionality

use std::f64::consts::PI;

use geo::Coord;

use super::crs::CoordinateSystem;
use crate::errors::{ZonalError, ZonalResult};

/// WGS 84 semi-major axis in metres
const WGS84_A: f64 = 6378137.0;
/// WGS 84 flattening
const WGS84_F: f64 = 1.0 / 298.257223563;
/// UTM central meridian scale factor
const UTM_K0: f64 = 0.9996;
const UTM_FALSE_EASTING: f64 = 500000.0;
const UTM_FALSE_NORTHING_SOUTH: f64 = 10000000.0;

/// Transformer for converting between coordinate systems
///
/// Every supported pair goes through WGS 84 geographic coordinates
/// (x = longitude, y = latitude, degrees).
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateTransformer;

impl CoordinateTransformer {
    /// Earth radius in meters
    const EARTH_RADIUS: f64 = WGS84_A;

    /// Convert from WGS84 (EPSG:4326) to Web Mercator (EPSG:3857)
    pub fn wgs84_to_web_mercator(&self, lon: f64, lat: f64) -> Coord<f64> {
        // Web Mercator is undefined at the poles
        let lat = lat.clamp(-85.06, 85.06);

        let x = lon * Self::EARTH_RADIUS * PI / 180.0;
        let y = f64::ln(f64::tan((90.0 + lat) * PI / 360.0)) * Self::EARTH_RADIUS;

        Coord { x, y }
    }

    /// Convert from Web Mercator (EPSG:3857) to WGS84 (EPSG:4326)
    pub fn web_mercator_to_wgs84(&self, x: f64, y: f64) -> Coord<f64> {
        let lon = x * 180.0 / (Self::EARTH_RADIUS * PI);
        let lat = 180.0 / PI * (2.0 * f64::atan(f64::exp(y / Self::EARTH_RADIUS)) - PI / 2.0);

        Coord { x: lon, y: lat }
    }

    /// Convert from WGS84 to UTM easting/northing (Snyder, USGS PP 1395)
    pub fn wgs84_to_utm(&self, lon: f64, lat: f64, zone: u8, is_northern: bool) -> Coord<f64> {
        let e2 = WGS84_F * (2.0 - WGS84_F);
        let ep2 = e2 / (1.0 - e2);
        let lon0 = Self::central_meridian(zone).to_radians();

        let phi = lat.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let n = WGS84_A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let t = phi.tan().powi(2);
        let c = ep2 * cos_phi * cos_phi;
        let a = cos_phi * (lon.to_radians() - lon0);
        let m = Self::meridian_arc(phi, e2);

        let x = UTM_K0 * n * (a
            + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
            + UTM_FALSE_EASTING;

        let mut y = UTM_K0 * (m + n * phi.tan() * (a * a / 2.0
            + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
            + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));

        if !is_northern {
            y += UTM_FALSE_NORTHING_SOUTH;
        }

        Coord { x, y }
    }

    /// Convert from UTM easting/northing to WGS84
    pub fn utm_to_wgs84(&self, x: f64, y: f64, zone: u8, is_northern: bool) -> Coord<f64> {
        let e2 = WGS84_F * (2.0 - WGS84_F);
        let ep2 = e2 / (1.0 - e2);
        let lon0 = Self::central_meridian(zone).to_radians();

        let northing = if is_northern { y } else { y - UTM_FALSE_NORTHING_SOUTH };
        let m = northing / UTM_K0;
        let mu = m / (WGS84_A * (1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2.powi(3) / 256.0));

        let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let (sin_phi1, cos_phi1) = phi1.sin_cos();
        let n1 = WGS84_A / (1.0 - e2 * sin_phi1 * sin_phi1).sqrt();
        let t1 = phi1.tan().powi(2);
        let c1 = ep2 * cos_phi1 * cos_phi1;
        let r1 = WGS84_A * (1.0 - e2) / (1.0 - e2 * sin_phi1 * sin_phi1).powf(1.5);
        let d = (x - UTM_FALSE_EASTING) / (n1 * UTM_K0);

        let lat = phi1 - (n1 * phi1.tan() / r1) * (d * d / 2.0
            - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
            + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1) * d.powi(6) / 720.0);

        let lon = lon0 + (d
            - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d.powi(5) / 120.0)
            / cos_phi1;

        Coord { x: lon.to_degrees(), y: lat.to_degrees() }
    }

    /// Transform a coordinate between coordinate systems
    pub fn transform_coord(&self, coord: Coord<f64>, from_crs: &CoordinateSystem, to_crs: &CoordinateSystem) -> ZonalResult<Coord<f64>> {
        if from_crs == to_crs {
            return Ok(coord);
        }

        let geographic = self.to_wgs84(coord, from_crs, to_crs)?;
        self.from_wgs84(geographic, from_crs, to_crs)
    }

    fn to_wgs84(&self, coord: Coord<f64>, from_crs: &CoordinateSystem, to_crs: &CoordinateSystem) -> ZonalResult<Coord<f64>> {
        match from_crs {
            CoordinateSystem::WGS84 => Ok(coord),
            CoordinateSystem::WebMercator => Ok(self.web_mercator_to_wgs84(coord.x, coord.y)),
            CoordinateSystem::UTM(zone, north) => Ok(self.utm_to_wgs84(coord.x, coord.y, *zone, *north)),
            CoordinateSystem::Other(_) => Err(Self::unsupported(from_crs, to_crs)),
        }
    }

    fn from_wgs84(&self, coord: Coord<f64>, from_crs: &CoordinateSystem, to_crs: &CoordinateSystem) -> ZonalResult<Coord<f64>> {
        match to_crs {
            CoordinateSystem::WGS84 => Ok(coord),
            CoordinateSystem::WebMercator => Ok(self.wgs84_to_web_mercator(coord.x, coord.y)),
            CoordinateSystem::UTM(zone, north) => Ok(self.wgs84_to_utm(coord.x, coord.y, *zone, *north)),
            CoordinateSystem::Other(_) => Err(Self::unsupported(from_crs, to_crs)),
        }
    }

    fn unsupported(from_crs: &CoordinateSystem, to_crs: &CoordinateSystem) -> ZonalError {
        ZonalError::UnsupportedCrs(format!(
            "Unsupported coordinate transformation from {} to {}",
            from_crs.description(), to_crs.description()
        ))
    }

    fn central_meridian(zone: u8) -> f64 {
        (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
    }

    fn meridian_arc(phi: f64, e2: f64) -> f64 {
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        WGS84_A * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
    }
}
