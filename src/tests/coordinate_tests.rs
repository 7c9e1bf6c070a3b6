//! Tests for CRS parsing, point transforms and reprojection

use approx::assert_relative_eq;

use crate::coordinate::{BoundingBox, CoordinateSystem, CoordinateSystemFactory, CoordinateTransformer, Reprojector};
use crate::errors::ZonalError;
use crate::raster::{GeoTransform, PixelWindow};
use super::test_utils::{collection, region, sequential_raster, square};

#[test]
fn test_parse_identifier_forms() {
    let cases = [
        ("EPSG:4326", CoordinateSystem::WGS84),
        ("epsg:3857", CoordinateSystem::WebMercator),
        ("4326", CoordinateSystem::WGS84),
        ("urn:ogc:def:crs:EPSG::32633", CoordinateSystem::UTM(33, true)),
        ("http://www.opengis.net/def/crs/EPSG/0/32733", CoordinateSystem::UTM(33, false)),
        ("urn:ogc:def:crs:OGC:1.3:CRS84", CoordinateSystem::WGS84),
        ("OGC:CRS84", CoordinateSystem::WGS84),
        ("EPSG:4258", CoordinateSystem::WGS84),
        ("EPSG:900913", CoordinateSystem::WebMercator),
        ("EPSG:25832", CoordinateSystem::UTM(32, true)),
        ("EPSG:31287", CoordinateSystem::Other(31287)),
    ];

    for (text, expected) in cases {
        assert_eq!(CoordinateSystemFactory::from_string(text).unwrap(), expected, "{}", text);
    }
}

#[test]
fn test_unparsable_identifier_is_unsupported() {
    for text in ["", "WGS84-ish", "EPSG:", "+proj=longlat"] {
        let result = CoordinateSystemFactory::from_string(text);
        assert!(matches!(result, Err(ZonalError::UnsupportedCrs(_))), "{}", text);
    }
}

#[test]
fn test_epsg_code_and_display() {
    assert_eq!(CoordinateSystem::UTM(32, true).epsg_code(), 32632);
    assert_eq!(CoordinateSystem::UTM(19, false).epsg_code(), 32719);
    assert_eq!(CoordinateSystem::WebMercator.to_string(), "EPSG:3857");
    assert!(CoordinateSystem::WGS84.is_geographic());
    assert!(!CoordinateSystem::WebMercator.is_geographic());
}

#[test]
fn test_web_mercator_known_values() {
    let transformer = CoordinateTransformer;

    let east = transformer.wgs84_to_web_mercator(180.0, 0.0);
    assert_relative_eq!(east.x, 20037508.342789244, epsilon = 1e-6);
    assert_relative_eq!(east.y, 0.0, epsilon = 1e-6);

    let vienna = transformer.wgs84_to_web_mercator(16.37, 48.21);
    let back = transformer.web_mercator_to_wgs84(vienna.x, vienna.y);
    assert_relative_eq!(back.x, 16.37, epsilon = 1e-9);
    assert_relative_eq!(back.y, 48.21, epsilon = 1e-9);
}

#[test]
fn test_utm_central_meridian_on_equator() {
    let transformer = CoordinateTransformer;
    let coord = transformer.wgs84_to_utm(9.0, 0.0, 32, true);

    assert_relative_eq!(coord.x, 500000.0, epsilon = 1e-6);
    assert_relative_eq!(coord.y, 0.0, epsilon = 1e-6);
}

#[test]
fn test_utm_round_trip() {
    let transformer = CoordinateTransformer;
    for (lon, lat, zone, north) in [(10.5, 47.2, 32, true), (-70.6, -33.4, 19, false), (3.1, 60.0, 31, true)] {
        let projected = transformer.wgs84_to_utm(lon, lat, zone, north);
        let back = transformer.utm_to_wgs84(projected.x, projected.y, zone, north);
        assert_relative_eq!(back.x, lon, epsilon = 1e-6);
        assert_relative_eq!(back.y, lat, epsilon = 1e-6);
    }
}

#[test]
fn test_transform_between_projected_systems_goes_through_wgs84() {
    let transformer = CoordinateTransformer;
    let start = transformer.wgs84_to_utm(12.0, 45.0, 33, true);

    let mercator = transformer.transform_coord(start, &CoordinateSystem::UTM(33, true), &CoordinateSystem::WebMercator).unwrap();
    let expected = transformer.wgs84_to_web_mercator(12.0, 45.0);

    assert_relative_eq!(mercator.x, expected.x, epsilon = 0.05);
    assert_relative_eq!(mercator.y, expected.y, epsilon = 0.05);
}

#[test]
fn test_other_systems_only_support_identity() {
    let transformer = CoordinateTransformer;
    let coord = geo::Coord { x: 1.0, y: 2.0 };
    let other = CoordinateSystem::Other(31287);

    assert_eq!(transformer.transform_coord(coord, &other, &other).unwrap(), coord);
    assert!(matches!(
        transformer.transform_coord(coord, &other, &CoordinateSystem::WGS84),
        Err(ZonalError::UnsupportedCrs(_))
    ));
}

#[test]
fn test_identity_reprojection_returns_equal_geometry() {
    let reprojector = Reprojector::new();
    let geometry = square(1.0, 2.0, 3.0);

    let same = reprojector.reproject_geometry(&geometry, "EPSG:4326", "OGC:CRS84").unwrap();
    assert_eq!(same, geometry);

    let regions = collection(vec![region("a", geometry)], "EPSG:4326");
    let reprojected = reprojector.reproject_regions(&regions, "EPSG:4326").unwrap();
    assert_eq!(reprojected, regions);
}

#[test]
fn test_raster_crs_retag_requires_same_frame() {
    let reprojector = Reprojector::new();
    let raster = sequential_raster(2, 2);

    let retagged = reprojector.reproject_raster_crs(&raster, "OGC:CRS84").unwrap();
    assert_eq!(retagged.crs(), "OGC:CRS84");
    assert_eq!(retagged.data(), raster.data());

    assert!(matches!(
        reprojector.reproject_raster_crs(&raster, "EPSG:3857"),
        Err(ZonalError::UnsupportedCrs(_))
    ));
}

#[test]
fn test_bbox_to_pixel_window_is_clamped() {
    let transform = GeoTransform::new(0.0, 10.0, 1.0, -1.0);

    let inside = BoundingBox::new(2.2, 3.5, 4.1, 6.0);
    assert_eq!(inside.to_pixel_window(&transform, 10, 10), Some(PixelWindow::new(2, 4, 3, 3)));

    let overlapping = BoundingBox::new(-5.0, -5.0, 3.0, 20.0);
    assert_eq!(overlapping.to_pixel_window(&transform, 10, 10), Some(PixelWindow::new(0, 0, 3, 10)));

    let outside = BoundingBox::new(20.0, 20.0, 30.0, 30.0);
    assert_eq!(outside.to_pixel_window(&transform, 10, 10), None);
}
