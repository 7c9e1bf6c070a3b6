//! Tests for polygon mask sampling

use geo::{line_string, Geometry};

use crate::raster::PixelWindow;
use crate::sampler::RasterSampler;
use super::test_utils::{rect_polygon, sequential_raster, square};

#[test]
fn test_full_extent_covers_every_cell() {
    let raster = sequential_raster(4, 3);
    let geometry = rect_polygon(0.0, 0.0, 4.0, 3.0);

    let values = RasterSampler::new().sample(&raster, Some(&geometry));

    assert_eq!(values, (0..12).map(|v| v as f64).collect::<Vec<_>>());
}

#[test]
fn test_cells_are_selected_by_center() {
    let raster = sequential_raster(4, 3);
    // Covers the centers of the two upper-left cells only
    let geometry = rect_polygon(0.2, 2.2, 1.8, 2.9);

    let values = RasterSampler::new().sample(&raster, Some(&geometry));

    assert_eq!(values, vec![0.0, 1.0]);
}

#[test]
fn test_centers_on_boundary_are_included() {
    let raster = sequential_raster(4, 3);
    let geometry = rect_polygon(0.5, 1.5, 1.5, 2.5);

    let values = RasterSampler::new().sample(&raster, Some(&geometry));

    assert_eq!(values, vec![0.0, 1.0, 4.0, 5.0]);
}

#[test]
fn test_polygon_outside_raster_yields_nothing() {
    let raster = sequential_raster(4, 3);
    let geometry = square(100.0, 100.0, 5.0);

    let sampler = RasterSampler::new();
    assert!(sampler.sample(&raster, Some(&geometry)).is_empty());
    assert_eq!(sampler.window_for(&raster, &geometry), None);
}

#[test]
fn test_partially_overlapping_polygon_is_clipped() {
    let raster = sequential_raster(4, 3);
    let geometry = rect_polygon(-10.0, -10.0, 1.0, 1.0);

    let sampler = RasterSampler::new();
    assert_eq!(sampler.sample(&raster, Some(&geometry)), vec![8.0]);
    assert_eq!(sampler.window_for(&raster, &geometry), Some(PixelWindow::new(0, 2, 1, 1)));
}

#[test]
fn test_missing_geometry_yields_nothing() {
    let raster = sequential_raster(4, 3);
    assert!(RasterSampler::new().sample(&raster, None).is_empty());
}

#[test]
fn test_non_areal_geometry_yields_nothing() {
    let raster = sequential_raster(4, 3);
    let line = Geometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 4.0, y: 3.0)]);

    assert!(RasterSampler::new().sample(&raster, Some(&line)).is_empty());
}

#[test]
fn test_multipolygon_collects_all_parts() {
    let raster = sequential_raster(4, 3);
    let parts = match (square(0.0, 2.0, 1.0), square(3.0, 0.0, 1.0)) {
        (Geometry::Polygon(a), Geometry::Polygon(b)) => geo::MultiPolygon(vec![a, b]),
        _ => unreachable!(),
    };

    let values = RasterSampler::new().sample(&raster, Some(&Geometry::MultiPolygon(parts)));

    assert_eq!(values, vec![0.0, 11.0]);
}

#[test]
fn test_missing_values_are_returned_raw() {
    let mut data: Vec<f64> = (0..12).map(|v| v as f64).collect();
    data[0] = f64::NAN;
    let raster = super::test_utils::grid_raster(4, 3, data, "EPSG:4326");

    let values = RasterSampler::new().sample(&raster, Some(&rect_polygon(0.0, 2.0, 2.0, 3.0)));

    assert_eq!(values.len(), 2);
    assert!(values[0].is_nan());
    assert_eq!(values[1], 1.0);
}
