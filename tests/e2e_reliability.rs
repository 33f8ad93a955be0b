//! End-to-end tests for the reliability analyzer.
//!
//! Inputs are generated with exact sample moments, so alpha and the
//! item-level figures can be checked against closed-form values.

use likert_rs::{
    compute_alpha, compute_alpha_with, generate, AlphaOptions, CovarianceSpec, Error, ItemMatrix,
    ReliabilityReport,
};
use pretty_assertions::assert_eq;

const TOL: f64 = 1e-9;

fn sample(rows: &[&[f64]], seed: u64) -> (ItemMatrix, Vec<String>) {
    let names: Vec<String> = (1..=rows.len()).map(|i| format!("x{i}")).collect();
    let spec = CovarianceSpec::from_correlations(&names, rows).unwrap();
    (generate(&spec, 300, seed).unwrap(), names)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < TOL
}

// ============================================================================
// 1. Closed-form alpha
// ============================================================================

#[test]
fn test_three_items_at_half_give_alpha_three_quarters() {
    let spec = CovarianceSpec::equicorrelated(&["x1", "x2", "x3"], 0.5).unwrap();
    let matrix = generate(&spec, 200, 42).unwrap();
    let report = compute_alpha(&matrix, &["x1", "x2", "x3"], false).unwrap();

    assert!(close(report.std_alpha, 0.75), "{}", report.std_alpha);
    // unit variances, so raw and standardized alpha agree
    assert!(close(report.raw_alpha, 0.75));
    assert!(close(report.average_r, 0.5));
    assert_eq!(report.n_obs, 200);
    for item in &report.items {
        assert!(close(item.alpha_if_dropped.unwrap(), 2.0 / 3.0));
        assert!(!item.reversed);
    }
}

#[test]
fn test_raw_alpha_tracks_unequal_variances() {
    let cov = nalgebra::DMatrix::from_row_slice(
        3,
        3,
        &[4.0, 1.0, 1.0, 1.0, 1.0, 0.5, 1.0, 0.5, 1.0],
    );
    let spec = CovarianceSpec::new(&["a", "b", "c"], vec![0.0; 3], cov).unwrap();
    let matrix = generate(&spec, 120, 9).unwrap();
    let report = compute_alpha(&matrix, &["a", "b", "c"], false).unwrap();
    // 3/2 · (1 − 6/11)
    assert!(close(report.raw_alpha, 1.5 * (1.0 - 6.0 / 11.0)));
    // correlations .5/.5/.5
    assert!(close(report.std_alpha, 0.75));
}

// ============================================================================
// 2. Alpha-if-dropped
// ============================================================================

#[test]
fn test_dropping_the_unrelated_item_raises_alpha() {
    let (matrix, items) = sample(
        &[
            &[1.0, 0.0, 0.0, 0.0],
            &[0.0, 1.0, 0.5, 0.5],
            &[0.0, 0.5, 1.0, 0.5],
            &[0.0, 0.5, 0.5, 1.0],
        ],
        7,
    );
    let report = compute_alpha(&matrix, &items, false).unwrap();

    assert!(close(report.std_alpha, 4.0 / 7.0));
    let x1 = report.item("x1").unwrap();
    assert!(close(x1.alpha_if_dropped.unwrap(), 0.75));
    assert!(x1.alpha_if_dropped.unwrap() > report.std_alpha);
    assert!(close(x1.corrected_item_total_r, 0.0));
    assert_eq!(report.most_improving_drop().map(|s| s.name.as_str()), Some("x1"));
}

#[test]
fn test_homogeneous_scale_has_no_improving_drop() {
    let (matrix, items) = sample(
        &[&[1.0, 0.4, 0.4, 0.4], &[0.4, 1.0, 0.4, 0.4], &[0.4, 0.4, 1.0, 0.4], &[0.4, 0.4, 0.4, 1.0]],
        11,
    );
    let report = compute_alpha(&matrix, &items, false).unwrap();
    assert!(report.most_improving_drop().is_none());
}

// ============================================================================
// 3. Reverse-key detection
// ============================================================================

fn negatively_keyed() -> (ItemMatrix, Vec<String>) {
    sample(
        &[
            &[1.0, -0.5, -0.5, -0.5],
            &[-0.5, 1.0, 0.5, 0.5],
            &[-0.5, 0.5, 1.0, 0.5],
            &[-0.5, 0.5, 0.5, 1.0],
        ],
        3,
    )
}

#[test]
fn test_negative_item_is_flagged_and_reverse_scored() {
    let (matrix, items) = negatively_keyed();
    let report = compute_alpha(&matrix, &items, true).unwrap();

    assert_eq!(report.reversed_items(), vec!["x1"]);
    assert!(close(report.std_alpha, 0.8), "{}", report.std_alpha);
    assert!(report.items.iter().all(|s| s.item_total_r > 0.0));
    // reverse-scored correlations are all positive
    assert!(report.correlations.iter().all(|&r| r > 0.0));
}

#[test]
fn test_without_detection_the_negative_item_cancels_the_scale() {
    let (matrix, items) = negatively_keyed();
    let report = compute_alpha(&matrix, &items, false).unwrap();
    assert!(report.reversed_items().is_empty());
    assert!(report.std_alpha.abs() < TOL);
    assert!(report.item("x1").unwrap().item_total_r < 0.0);
}

#[test]
fn test_weakly_negative_item_is_still_flagged() {
    // x1 at -.2 against three mutually positive items
    let (matrix, items) = sample(
        &[
            &[1.0, -0.2, -0.2, -0.2],
            &[-0.2, 1.0, 0.5, 0.5],
            &[-0.2, 0.5, 1.0, 0.5],
            &[-0.2, 0.5, 0.5, 1.0],
        ],
        21,
    );
    let report = compute_alpha(&matrix, &items, true).unwrap();
    assert_eq!(report.reversed_items(), vec!["x1"]);
    // after reversal: r = .2 with x2..x4, .5 among them
    assert!(close(report.std_alpha, 4.0 / 3.0 * (1.0 - 4.0 / 8.2)), "{}", report.std_alpha);
}

#[test]
fn test_negative_item_in_a_three_item_set_is_flagged() {
    let (matrix, items) = sample(
        &[&[1.0, -0.3, -0.3], &[-0.3, 1.0, 0.5], &[-0.3, 0.5, 1.0]],
        22,
    );
    let report = compute_alpha(&matrix, &items, true).unwrap();
    assert_eq!(report.reversed_items(), vec!["x1"]);
    assert!(report.items.iter().all(|s| s.corrected_item_total_r > 0.0));
}

#[test]
fn test_reverse_scoring_uses_the_configured_scale() {
    let matrix = ItemMatrix::from_columns([
        ("x1", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]),
        ("x2", vec![1.0, 3.0, 2.0, 4.0, 6.0, 5.0, 7.0]),
        ("x3", vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]),
        ("x4", vec![2.0, 1.0, 3.0, 4.0, 5.0, 7.0, 6.0]),
    ])
    .unwrap();
    let options = AlphaOptions { reverse_detect: true, scale_max: 7.0 };
    let report = compute_alpha_with(&matrix, &["x1", "x2", "x3", "x4"], &options).unwrap();
    assert_eq!(report.reversed_items(), vec!["x3"]);
    // 8 − x over a 1..7 sequence keeps the mean at 4
    assert!(close(report.item("x3").unwrap().mean, 4.0));
}

// ============================================================================
// 4. Errors and serialization
// ============================================================================

#[test]
fn test_fewer_than_two_items_is_rejected() {
    let (matrix, _) = negatively_keyed();
    assert!(matches!(
        compute_alpha(&matrix, &["x1"], false),
        Err(Error::InsufficientItems { required: 2, got: 1 })
    ));
}

#[test]
fn test_unknown_item_is_not_found() {
    let (matrix, _) = negatively_keyed();
    assert!(matches!(
        compute_alpha(&matrix, &["x1", "x9"], false),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_zero_variance_item_is_named() {
    let matrix = ItemMatrix::from_columns([
        ("x1", vec![1.0, 2.0, 3.0, 4.0]),
        ("x2", vec![2.0, 2.0, 2.0, 2.0]),
        ("x3", vec![4.0, 3.0, 3.0, 1.0]),
    ])
    .unwrap();
    match compute_alpha(&matrix, &["x1", "x2", "x3"], false) {
        Err(Error::DegenerateVariance { item }) => assert_eq!(item, "x2"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_report_survives_json() {
    let (matrix, items) = negatively_keyed();
    let report = compute_alpha(&matrix, &items, true).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    let back: ReliabilityReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.reversed_items(), report.reversed_items());
    assert_eq!(back.items.len(), 4);
    assert!(close(back.std_alpha, report.std_alpha));
}
