//! Integration tests exercising the container end to end with mixed
//! manifold types, the way an estimation pipeline consumes it.

use apex_values::error::ValuesError;
use apex_values::manifold::{Manifold, SE3, SO2, SO3};
use apex_values::values::{Value, Values};
use approx::assert_relative_eq;
use nalgebra::{DVector, Point3, UnitQuaternion, Vector2, Vector3};
use std::f64::consts::FRAC_PI_2;

/// The canonical mixed-type scenario: two rotations around a raw vector.
fn rotation_vector_rotation() -> Values {
    let mut values = Values::new();
    values.insert(1, SO2::from_angle(0.0)).unwrap();
    values.insert(2, Vector2::new(1.0, 2.0)).unwrap();
    values.insert(3, SO2::from_angle(FRAC_PI_2)).unwrap();
    values
}

#[test]
fn filter_selects_rotations_in_order() {
    let values = rotation_vector_rotation();
    let rotations = values.filter::<SO2, _>(|_| true);
    assert_eq!(rotations.keys(), vec![1, 3]);
    assert_eq!(rotations.size(), 2);
}

#[test]
fn typed_access_respects_stored_types() {
    let values = rotation_vector_rotation();

    // Key 2 holds a vector, not a rotation
    assert!(matches!(
        values.at::<SO2>(2),
        Err(ValuesError::IncorrectType { key: 2, .. })
    ));

    // The length-2 vector comes back as the matching fixed type
    let v: Vector2<f64> = values.at(2).unwrap();
    assert_eq!(v, Vector2::new(1.0, 2.0));

    // Requesting length 3 reports both shapes
    assert_eq!(
        values.at::<Vector3<f64>>(2).unwrap_err(),
        ValuesError::ShapeMismatch {
            expected_rows: 3,
            expected_cols: 1,
            actual_rows: 2,
            actual_cols: 1,
        }
    );
}

#[test]
fn view_to_container_copy_preserves_values_and_independence() {
    let values = rotation_vector_rotation();
    let mut copy = Values::from_filtered(&values.filter::<SO2, _>(|_| true)).unwrap();

    assert_eq!(copy.keys(), vec![1, 3]);
    let rot: SO2 = copy.at(3).unwrap();
    assert_relative_eq!(rot.angle(), FRAC_PI_2, epsilon = 1e-12);

    // Mutating the copy never affects the source
    copy.update(3, SO2::from_angle(-1.0)).unwrap();
    let source_rot: SO2 = values.at(3).unwrap();
    assert_relative_eq!(source_rot.angle(), FRAC_PI_2, epsilon = 1e-12);
}

#[test]
fn bootstrap_consume_update_cycle() {
    // Initialization populates the container
    let mut values = Values::new();
    values
        .insert(
            0,
            SE3::from_translation_rotation(
                Vector3::new(0.0, 0.0, 0.0),
                UnitQuaternion::identity(),
            ),
        )
        .unwrap();
    values
        .insert(
            1,
            SE3::from_translation_rotation(
                Vector3::new(1.0, 0.0, 0.0),
                UnitQuaternion::from_euler_angles(0.0, 0.0, 0.1),
            ),
        )
        .unwrap();
    values.insert(10, Point3::new(0.5, 1.0, 2.0)).unwrap();

    // An optimizer-shaped step: flat tangent over every degree of freedom
    let dim = values.dim();
    assert_eq!(dim, 6 + 6 + 3);
    let delta = DVector::from_element(dim, 1e-3);
    let stepped = values.retract(&delta).unwrap();

    // The step is recovered exactly by local coordinates
    let recovered = values.local_coordinates(&stepped).unwrap();
    for i in 0..dim {
        assert_relative_eq!(recovered[i], 1e-3, epsilon = 1e-9);
    }

    // Consumers write results back via update, one variable at a time
    for key in stepped.keys() {
        if let Some(pose) = stepped.exists::<SE3>(key).ok().flatten() {
            values.update(key, pose).unwrap();
        }
    }
    let moved: SE3 = values.at(1).unwrap();
    let reference: SE3 = stepped.at(1).unwrap();
    assert!(moved.is_close(&reference, 1e-12));
}

#[test]
fn erased_view_traverses_everything_in_key_order() {
    let values = rotation_vector_rotation();
    let all = values.filter::<dyn Value, _>(|_| true);
    assert_eq!(all.size(), 3);

    let dims: Vec<usize> = all.iter().map(|(_, v)| v.dim()).collect();
    assert_eq!(dims, vec![1, 2, 1]);
}

#[test]
fn exists_distinguishes_absence_from_miscast() {
    let values = rotation_vector_rotation();
    assert_eq!(values.exists::<SO2>(99).unwrap(), None);
    assert!(values.exists::<SO3>(1).is_err());
}

#[test]
fn deep_copy_semantics_across_clone() {
    let original = rotation_vector_rotation();
    let mut copy = original.clone();
    copy.erase(1).unwrap();
    copy.update(3, SO2::from_angle(0.0)).unwrap();

    assert_eq!(original.len(), 3);
    let rot: SO2 = original.at(3).unwrap();
    assert_relative_eq!(rot.angle(), FRAC_PI_2, epsilon = 1e-12);
}

#[test]
fn equals_compares_entry_wise() {
    let a = rotation_vector_rotation();
    let mut b = rotation_vector_rotation();
    assert!(a.equals(&b, 1e-12));

    b.update(1, SO2::from_angle(1e-7)).unwrap();
    assert!(a.equals(&b, 1e-5));
    assert!(!a.equals(&b, 1e-9));

    b.update(1, Vector2::new(0.0, 0.0)).unwrap();
    assert!(!a.equals(&b, 1e9));
}
