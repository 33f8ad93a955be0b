//! End-to-end tests for binning and reverse-coding.

use likert_rs::discretize::{append_reversed, discretize_values};
use likert_rs::{discretize, reverse_code, Closure, DiscretizationRule, Error, ItemMatrix};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// ============================================================================
// 1. Canonical five-point rule
// ============================================================================

#[test]
fn test_likert5_labels_interior_points() {
    let rule = DiscretizationRule::likert5();
    let labels = discretize_values(&[-2.0, -1.0, 0.0, 1.0, 2.0], &rule, "x").unwrap();
    assert_eq!(labels, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
}

#[test]
fn test_right_closed_breaks_go_to_the_lower_bin() {
    let rule = DiscretizationRule::likert5();
    let labels = discretize_values(&[-1.5, -0.5, 0.5, 1.5], &rule, "x").unwrap();
    assert_eq!(labels, vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_left_closed_breaks_go_to_the_upper_bin() {
    let rule = DiscretizationRule::likert5().with_closure(Closure::Left);
    let labels =
        discretize_values(&[-2.0, -1.5, -1.0, 0.0, 0.5, 1.0, 1.5, 2.0], &rule, "x").unwrap();
    assert_eq!(labels, vec![1.0, 2.0, 2.0, 3.0, 4.0, 4.0, 5.0, 5.0]);
}

#[test]
fn test_extremes_fall_in_the_end_bins() {
    let rule = DiscretizationRule::likert5();
    let labels = discretize_values(&[-1e300, 1e300], &rule, "x").unwrap();
    assert_eq!(labels, vec![1.0, 5.0]);
}

#[test]
fn test_missing_value_is_invalid_input() {
    let rule = DiscretizationRule::likert5();
    let err = discretize_values(&[0.0, f64::NAN], &rule, "x2").unwrap_err();
    match err {
        Error::InvalidInput { column, row, .. } => {
            assert_eq!(column, "x2");
            assert_eq!(row, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_bad_break_lists_are_rejected() {
    assert!(DiscretizationRule::new(Vec::<f64>::new()).is_err());
    assert!(DiscretizationRule::new([0.0, 0.0]).is_err());
    assert!(DiscretizationRule::new([1.0, -1.0]).is_err());
    assert!(DiscretizationRule::new([0.0, f64::INFINITY]).is_err());
}

#[test]
fn test_rule_from_json_is_validated() {
    let err = serde_json::from_str::<DiscretizationRule>(r#"{"breaks":[1.5,-1.5]}"#);
    assert!(err.is_err());
    let rule: DiscretizationRule =
        serde_json::from_str(r#"{"breaks":[-1.5,-0.5,0.5,1.5],"closure":"Left"}"#).unwrap();
    assert_eq!(rule.label(-1.5), Some(2));
}

// ============================================================================
// 2. Whole-matrix discretization
// ============================================================================

#[test]
fn test_discretize_every_column() {
    let matrix = ItemMatrix::from_columns([
        ("x1", vec![-1.7, 0.2]),
        ("x2", vec![0.6, 1.49]),
    ])
    .unwrap();
    let out = discretize(&matrix, &DiscretizationRule::likert5()).unwrap();
    assert_eq!(out.column("x1").unwrap(), &[1.0, 3.0]);
    assert_eq!(out.column("x2").unwrap(), &[4.0, 4.0]);
    // source untouched
    assert_eq!(matrix.column("x1").unwrap(), &[-1.7, 0.2]);
}

#[test]
fn test_reversed_column_is_appended_next_to_the_original() {
    let mut matrix = ItemMatrix::from_columns([("x4", vec![1.0, 2.0, 5.0])]).unwrap();
    let name = append_reversed(&mut matrix, "x4", 5.0).unwrap();
    assert_eq!(name, "x4_r");
    assert_eq!(matrix.column("x4_r").unwrap(), &[5.0, 4.0, 1.0]);
    assert_eq!(matrix.column("x4").unwrap(), &[1.0, 2.0, 5.0]);
    assert!(append_reversed(&mut matrix, "x4", 5.0).is_err());
}

// ============================================================================
// 3. Properties
// ============================================================================

fn breaks_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::btree_set(-300i32..300, 1..8)
        .prop_map(|set| set.into_iter().map(|b| f64::from(b) / 100.0).collect())
}

proptest! {
    #[test]
    fn test_labels_are_deterministic_and_in_range(
        breaks in breaks_strategy(),
        values in prop::collection::vec(-5.0f64..5.0, 1..50),
        left in any::<bool>(),
    ) {
        let closure = if left { Closure::Left } else { Closure::Right };
        let rule = DiscretizationRule::new(breaks.clone()).unwrap().with_closure(closure);
        let first = discretize_values(&values, &rule, "x").unwrap();
        let second = discretize_values(&values, &rule, "x").unwrap();
        prop_assert_eq!(&first, &second);
        for label in first {
            prop_assert!(label >= 1.0 && label <= (breaks.len() + 1) as f64);
        }
    }

    #[test]
    fn test_labels_are_monotone(a in -5.0f64..5.0, b in -5.0f64..5.0) {
        let rule = DiscretizationRule::likert5();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(rule.label(lo).unwrap() <= rule.label(hi).unwrap());
    }

    #[test]
    fn test_reverse_code_twice_is_identity(
        values in prop::collection::vec(1u8..=7, 0..40),
        scale_max in 2u8..=7,
    ) {
        let values: Vec<f64> = values.into_iter().map(f64::from).collect();
        let scale_max = f64::from(scale_max);
        prop_assert_eq!(reverse_code(&reverse_code(&values, scale_max), scale_max), values);
    }
}
