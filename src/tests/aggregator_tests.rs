//! Tests for per-region statistics

use approx::assert_relative_eq;

use crate::aggregator::{ZonalAggregator, ZonalStats};
use crate::coordinate::{CoordinateTransformer, OUTPUT_CRS};
use crate::raster::{GeoTransform, Raster};
use crate::vector::Region;
use super::test_utils::{collection, grid_raster, rect_polygon, region, sequential_raster, square};

#[test]
fn test_stats_from_values() {
    let stats = ZonalStats::from_values(vec![2.0, 4.0, 9.0]).unwrap();

    assert_eq!(stats.count, 3);
    assert_relative_eq!(stats.mean, 5.0);
    assert_eq!(stats.min, 2.0);
    assert_eq!(stats.max, 9.0);
    assert_eq!(ZonalStats::from_values(Vec::new()), None);
}

#[test]
fn test_full_extent_region_matches_grid_summary() {
    let raster = sequential_raster(4, 3);
    let regions = collection(vec![region("all", rect_polygon(0.0, 0.0, 4.0, 3.0))], OUTPUT_CRS);

    let aggregation = ZonalAggregator::default().aggregate(&raster, &regions).unwrap();
    let stats = aggregation.stats[0].unwrap();

    assert_eq!(stats.count, 12);
    assert_relative_eq!(stats.mean, 5.5);
    assert_eq!(stats.min, 0.0);
    assert_eq!(stats.max, 11.0);
}

#[test]
fn test_missing_cells_are_excluded() {
    let data = vec![1.0, f64::NAN, -9999.0, 3.0];
    let raster = grid_raster(2, 2, data, OUTPUT_CRS).with_nodata(Some(-9999.0));
    let regions = collection(vec![region("r", rect_polygon(0.0, 0.0, 2.0, 2.0))], OUTPUT_CRS);

    let aggregation = ZonalAggregator::default().aggregate(&raster, &regions).unwrap();
    let stats = aggregation.stats[0].unwrap();

    assert_eq!(stats.count, 2);
    assert_relative_eq!(stats.mean, 2.0);
    assert_eq!(stats.min, 1.0);
    assert_eq!(stats.max, 3.0);
}

#[test]
fn test_all_missing_cells_give_no_stats() {
    let raster = grid_raster(2, 1, vec![f64::NAN, -1.0], OUTPUT_CRS).with_nodata(Some(-1.0));
    let regions = collection(vec![region("r", rect_polygon(0.0, 0.0, 2.0, 1.0))], OUTPUT_CRS);

    let aggregation = ZonalAggregator::default().aggregate(&raster, &regions).unwrap();

    assert_eq!(aggregation.stats, vec![None]);
}

#[test]
fn test_region_outside_raster_and_empty_region_give_no_stats() {
    let raster = sequential_raster(4, 3);
    let regions = collection(vec![
        region("outside", square(50.0, 50.0, 1.0)),
        Region::new("empty", None, None),
        region("inside", square(0.0, 0.0, 1.0)),
    ], OUTPUT_CRS);

    let aggregation = ZonalAggregator::default().aggregate(&raster, &regions).unwrap();

    assert_eq!(aggregation.stats[0], None);
    assert_eq!(aggregation.stats[1], None);
    assert_eq!(aggregation.stats[2].map(|s| s.mean), Some(8.0));
    assert_eq!(aggregation.means(), vec![8.0]);
}

#[test]
fn test_region_order_is_preserved() {
    let raster = sequential_raster(4, 3);
    let ids = ["c", "a", "b"];
    let regions = collection(
        ids.iter().enumerate().map(|(i, id)| region(id, square(i as f64, 0.0, 1.0))).collect(),
        OUTPUT_CRS,
    );

    let aggregation = ZonalAggregator::default().aggregate(&raster, &regions).unwrap();

    assert_eq!(aggregation.regions.ids(), vec!["c", "a", "b"]);
    assert_eq!(aggregation.means(), vec![8.0, 9.0, 10.0]);
}

#[test]
fn test_duplicate_ids_last_wins_in_lookup() {
    let raster = sequential_raster(4, 3);
    let regions = collection(vec![
        region("dup", square(0.0, 0.0, 1.0)),
        region("dup", square(3.0, 0.0, 1.0)),
    ], OUTPUT_CRS);

    let aggregation = ZonalAggregator::default().aggregate(&raster, &regions).unwrap();

    assert_eq!(aggregation.stats.len(), 2);
    assert_eq!(aggregation.by_id()["dup"].map(|s| s.mean), Some(11.0));
}

#[test]
fn test_regions_are_reprojected_to_raster_and_back() {
    let transformer = CoordinateTransformer;
    // 4x3 Web Mercator raster with 1 km cells east of Null Island
    let transform = GeoTransform::new(0.0, 3000.0, 1000.0, -1000.0);
    let data = (0..12).map(|v| v as f64).collect();
    let raster = Raster::new(4, 3, data, transform, "EPSG:3857").unwrap();

    let lower_left = transformer.web_mercator_to_wgs84(-10.0, -10.0);
    let upper_right = transformer.web_mercator_to_wgs84(4010.0, 3010.0);
    let geometry = rect_polygon(lower_left.x, lower_left.y, upper_right.x, upper_right.y);
    let regions = collection(vec![region("wide", geometry.clone())], "EPSG:4326");

    let aggregation = ZonalAggregator::default().aggregate(&raster, &regions).unwrap();
    let stats = aggregation.stats[0].unwrap();

    assert_eq!(stats.count, 12);
    assert_relative_eq!(stats.mean, 5.5);
    assert_eq!(aggregation.regions.crs(), OUTPUT_CRS);

    let returned = aggregation.regions.get(0).and_then(|r| r.geometry()).unwrap();
    let (geo::Geometry::Polygon(expected), geo::Geometry::Polygon(actual)) = (&geometry, returned) else {
        panic!("expected polygons");
    };
    for (a, b) in expected.exterior().coords().zip(actual.exterior().coords()) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
    }
}

#[test]
fn test_output_geometry_is_the_input_not_the_raster_frame_copy() {
    let transform = GeoTransform::new(0.0, 3000.0, 1000.0, -1000.0);
    let raster = Raster::new(4, 3, (0..12).map(|v| v as f64).collect(), transform, "EPSG:3857").unwrap();

    // Beyond the Web Mercator latitude limit; clamped only for sampling
    let polar = rect_polygon(-20.0, 86.0, 20.0, 89.5);
    let regions = collection(vec![region("polar", polar.clone())], OUTPUT_CRS);

    let aggregation = ZonalAggregator::default().aggregate(&raster, &regions).unwrap();

    assert_eq!(aggregation.stats[0], None);
    assert_eq!(aggregation.regions.get(0).unwrap().geometry(), Some(&polar));
}

#[test]
fn test_infinite_cells_count_as_missing() {
    let stats = ZonalStats::from_values(vec![1.0, f64::INFINITY, 3.0, f64::NEG_INFINITY]).unwrap();
    assert_eq!(stats.count, 2);
    assert_relative_eq!(stats.mean, 2.0);
    assert_eq!((stats.min, stats.max), (1.0, 3.0));

    assert_eq!(ZonalStats::from_values(vec![f64::INFINITY]), None);

    let raster = grid_raster(2, 1, vec![f64::INFINITY, 4.0], OUTPUT_CRS);
    let regions = collection(vec![region("both", rect_polygon(0.0, 0.0, 2.0, 1.0))], OUTPUT_CRS);
    let stats = ZonalAggregator::default().aggregate(&raster, &regions).unwrap().stats[0].unwrap();
    assert_eq!(stats.count, 1);
    assert_eq!(stats.mean, 4.0);
    assert_eq!(raster.summary(), Some((1, 4.0, 4.0, 4.0)));
}

#[test]
fn test_unresolvable_region_crs_fails() {
    let raster = sequential_raster(2, 2);
    let regions = collection(vec![region("r", square(0.0, 0.0, 1.0))], "EPSG:31287");

    let result = ZonalAggregator::default().aggregate(&raster, &regions);

    assert!(matches!(result, Err(crate::errors::ZonalError::UnsupportedCrs(_))));
}
