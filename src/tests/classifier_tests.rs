//! Tests for quantile breakpoints and class assignment

use approx::assert_relative_eq;

use crate::classifier::{ClassificationScheme, Classifier, SchemeKind};

fn assert_breakpoints(scheme: &ClassificationScheme, expected: [f64; 6]) {
    for (actual, expected) in scheme.breakpoints().iter().zip(expected) {
        assert_relative_eq!(*actual, expected, epsilon = 1e-12);
    }
}

#[test]
fn test_five_means_use_quantiles() {
    let means: Vec<Option<f64>> = [10.0, 20.0, 30.0, 40.0, 50.0].iter().map(|m| Some(*m)).collect();
    let (scheme, classes) = Classifier::new().classify(&means);

    assert_eq!(scheme.kind(), SchemeKind::Quantile);
    assert_breakpoints(&scheme, [10.0, 18.0, 26.0, 34.0, 42.0, 50.0]);
    assert_eq!(classes, vec![Some(0), Some(2), Some(3), Some(4), Some(5)]);
}

#[test]
fn test_quantiles_interpolate_between_ranks() {
    let means: Vec<f64> = (0..=6).map(|v| v as f64).collect();
    let scheme = ClassificationScheme::from_means(&means);

    assert_eq!(scheme.kind(), SchemeKind::Quantile);
    assert_breakpoints(&scheme, [0.0, 1.2, 2.4, 3.6, 4.8, 6.0]);
}

#[test]
fn test_quantiles_ignore_input_order() {
    let scheme = ClassificationScheme::from_means(&[50.0, 10.0, 40.0, 30.0, 20.0]);
    assert_breakpoints(&scheme, [10.0, 18.0, 26.0, 34.0, 42.0, 50.0]);
}

#[test]
fn test_empty_means_fall_back_to_unit_range() {
    let (scheme, classes) = Classifier::new().classify(&[]);

    assert_eq!(scheme.kind(), SchemeKind::LinearFallbackEmpty);
    assert!(!scheme.is_widened());
    assert_breakpoints(&scheme, [0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    assert!(classes.is_empty());
}

#[test]
fn test_all_missing_means_fall_back_to_unit_range() {
    let (scheme, classes) = Classifier::new().classify(&[None, None]);

    assert_eq!(scheme.kind(), SchemeKind::LinearFallbackEmpty);
    assert_eq!(classes, vec![None, None]);
}

#[test]
fn test_single_value_widens_range() {
    let (scheme, classes) = Classifier::new().classify(&[Some(7.0)]);

    assert_eq!(scheme.kind(), SchemeKind::LinearFallbackSingleRange);
    assert!(scheme.is_widened());
    assert_breakpoints(&scheme, [7.0, 7.2, 7.4, 7.6, 7.8, 8.0]);
    assert_eq!(classes, vec![Some(0)]);
}

#[test]
fn test_identical_values_widen_range() {
    let scheme = ClassificationScheme::from_means(&[3.5, 3.5, 3.5]);

    assert_eq!(scheme.kind(), SchemeKind::LinearFallbackSingleRange);
    assert!(scheme.is_widened());
    assert_relative_eq!(scheme.breakpoints()[5], 4.5);
}

#[test]
fn test_few_values_span_min_to_max() {
    let (scheme, classes) = Classifier::new().classify(&[Some(10.0), Some(20.0)]);

    assert_eq!(scheme.kind(), SchemeKind::LinearFallbackSingleRange);
    assert!(!scheme.is_widened());
    assert_breakpoints(&scheme, [10.0, 12.0, 14.0, 16.0, 18.0, 20.0]);
    assert_eq!(classes, vec![Some(0), Some(5)]);
}

#[test]
fn test_missing_means_keep_position_and_get_no_class() {
    let means = vec![Some(10.0), None, Some(20.0), Some(30.0), None, Some(40.0), Some(50.0)];
    let (scheme, classes) = Classifier::new().classify(&means);

    assert_eq!(scheme.kind(), SchemeKind::Quantile);
    assert_eq!(classes, vec![Some(0), None, Some(2), Some(3), None, Some(4), Some(5)]);
}

#[test]
fn test_value_on_breakpoint_falls_into_lower_class() {
    let scheme = ClassificationScheme::from_means(&[10.0, 20.0, 30.0, 40.0, 50.0]);

    assert_eq!(scheme.class_of(18.0), Some(1));
    assert_eq!(scheme.class_of(18.000001), Some(2));
    assert_eq!(scheme.class_of(10.0), Some(0));
    assert_eq!(scheme.class_of(f64::NAN), None);
}

#[test]
fn test_classes_stay_within_range_for_classified_means() {
    let means: Vec<Option<f64>> = [3.1, -2.0, 8.7, 8.7, 0.0, 15.2, 4.4, 4.4, 9.9]
        .iter().map(|m| Some(*m)).collect();
    let (_, classes) = Classifier::new().classify(&means);

    for class in classes {
        let class = class.unwrap();
        assert!(class <= 5);
    }
}
