//! Storage representation mapping and the numeric array promotion rule
//!
//! [`Storable`] connects the type a caller hands to the container with the
//! type actually kept in storage. For manifold types the mapping is the
//! identity. Fixed-size nalgebra vectors and matrices are silently widened
//! to `DVector<f64>` / `DMatrix<f64>` before storage, so the container never
//! holds a fixed-shape numeric array; retrieving with the fixed type back
//! performs an exact match against the dynamic counterpart followed by a
//! shape check.

use crate::error::{ValuesError, ValuesResult};
use crate::manifold::Manifold;
use crate::values::value::Value;
use crate::values::Key;
use nalgebra::{DMatrix, DVector, SMatrix, SVector};

/// Types that can be inserted into and retrieved from a `Values` container.
///
/// `Stored` is the concrete type held behind the type-erased capability set.
/// `from_value` performs the runtime-checked reinterpretation of a stored
/// entry back into `Self`, including the shape check for fixed-size numeric
/// arrays.
pub trait Storable: Sized + 'static {
    /// The concrete type kept in storage for this caller-facing type.
    type Stored: Manifold;

    /// Convert into the stored representation (applies the promotion rule).
    fn into_stored(self) -> Self::Stored;

    /// Reinterpret a stored entry as `Self`, or fail with a typed error.
    fn from_value(key: Key, value: &dyn Value) -> ValuesResult<Self>;
}

/// Implement [`Storable`] as the identity mapping for a [`Manifold`] type.
///
/// Use this for custom variable types:
///
/// ```ignore
/// apex_values::impl_storable!(MyManifoldType);
/// ```
#[macro_export]
macro_rules! impl_storable {
    ($($t:ty),* $(,)?) => {$(
        impl $crate::values::Storable for $t {
            type Stored = $t;

            fn into_stored(self) -> Self {
                self
            }

            fn from_value(
                key: $crate::values::Key,
                value: &dyn $crate::values::Value,
            ) -> $crate::error::ValuesResult<Self> {
                value
                    .as_any()
                    .downcast_ref::<$t>()
                    .cloned()
                    .ok_or_else(|| $crate::error::ValuesError::IncorrectType {
                        key,
                        stored: value.type_name(),
                        requested: std::any::type_name::<$t>(),
                    })
            }
        }
    )*};
}

impl_storable!(
    f64,
    nalgebra::Point2<f64>,
    nalgebra::Point3<f64>,
    nalgebra::DVector<f64>,
    nalgebra::DMatrix<f64>,
    crate::manifold::SO2,
    crate::manifold::SO3,
    crate::manifold::SE2,
    crate::manifold::SE3,
);

// Fixed-size vectors are widened to DVector at storage time. Retrieval
// matches the dynamic type exactly, then checks the stored length against N.
impl<const N: usize> Storable for SVector<f64, N> {
    type Stored = DVector<f64>;

    fn into_stored(self) -> DVector<f64> {
        DVector::from_column_slice(self.as_slice())
    }

    fn from_value(key: Key, value: &dyn Value) -> ValuesResult<Self> {
        let stored = value
            .as_any()
            .downcast_ref::<DVector<f64>>()
            .ok_or_else(|| ValuesError::IncorrectType {
                key,
                stored: value.type_name(),
                requested: std::any::type_name::<DVector<f64>>(),
            })?;
        if stored.len() != N {
            return Err(ValuesError::ShapeMismatch {
                expected_rows: N,
                expected_cols: 1,
                actual_rows: stored.len(),
                actual_cols: 1,
            });
        }
        Ok(SVector::from_column_slice(stored.as_slice()))
    }
}

// Fixed-shape matrices are widened to DMatrix at storage time. SVector is an
// alias for a single-column SMatrix, so these impls are generated per
// concrete column count starting at 2 to stay disjoint from the vector impl
// above. Shapes up to 6x6 cover every fixed matrix alias nalgebra names.
macro_rules! impl_storable_fixed_matrix {
    ($(($r:literal, $c:literal)),* $(,)?) => {$(
        impl Storable for SMatrix<f64, $r, $c> {
            type Stored = DMatrix<f64>;

            fn into_stored(self) -> DMatrix<f64> {
                DMatrix::from_column_slice($r, $c, self.as_slice())
            }

            fn from_value(key: Key, value: &dyn Value) -> ValuesResult<Self> {
                let stored = value
                    .as_any()
                    .downcast_ref::<DMatrix<f64>>()
                    .ok_or_else(|| ValuesError::IncorrectType {
                        key,
                        stored: value.type_name(),
                        requested: std::any::type_name::<DMatrix<f64>>(),
                    })?;
                if stored.nrows() != $r || stored.ncols() != $c {
                    return Err(ValuesError::ShapeMismatch {
                        expected_rows: $r,
                        expected_cols: $c,
                        actual_rows: stored.nrows(),
                        actual_cols: stored.ncols(),
                    });
                }
                Ok(SMatrix::from_column_slice(stored.as_slice()))
            }
        }
    )*};
}

impl_storable_fixed_matrix!(
    (1, 2), (1, 3), (1, 4), (1, 5), (1, 6),
    (2, 2), (2, 3), (2, 4), (2, 5), (2, 6),
    (3, 2), (3, 3), (3, 4), (3, 5), (3, 6),
    (4, 2), (4, 3), (4, 4), (4, 5), (4, 6),
    (5, 2), (5, 3), (5, 4), (5, 5), (5, 6),
    (6, 2), (6, 3), (6, 4), (6, 5), (6, 6),
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::value::GenericValue;
    use nalgebra::{Matrix2x3, Vector3};

    #[test]
    fn test_fixed_vector_promotes_to_dynamic() {
        let stored = Vector3::new(1.0, 2.0, 3.0).into_stored();
        assert_eq!(stored, DVector::from_vec(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_fixed_vector_demotes_with_shape_check() {
        let holder = GenericValue::new(Vector3::new(1.0, 2.0, 3.0).into_stored());
        let back = Vector3::<f64>::from_value(0, &holder).unwrap();
        assert_eq!(back, Vector3::new(1.0, 2.0, 3.0));

        let err = SVector::<f64, 4>::from_value(0, &holder).unwrap_err();
        assert_eq!(
            err,
            ValuesError::ShapeMismatch {
                expected_rows: 4,
                expected_cols: 1,
                actual_rows: 3,
                actual_cols: 1,
            }
        );
    }

    #[test]
    fn test_fixed_matrix_promotes_and_demotes() {
        let m = Matrix2x3::from_row_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let holder = GenericValue::new(m.into_stored());
        let back = Matrix2x3::<f64>::from_value(0, &holder).unwrap();
        assert_eq!(back, m);

        let err = SMatrix::<f64, 3, 2>::from_value(0, &holder).unwrap_err();
        assert_eq!(
            err,
            ValuesError::ShapeMismatch {
                expected_rows: 3,
                expected_cols: 2,
                actual_rows: 2,
                actual_cols: 3,
            }
        );
    }

    #[test]
    fn test_fixed_matrix_round_trip_at_largest_named_size() {
        let m = SMatrix::<f64, 6, 6>::identity();
        let holder = GenericValue::new(m.into_stored());
        let back = SMatrix::<f64, 6, 6>::from_value(0, &holder).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_fixed_vector_against_non_vector_storage_is_incorrect_type() {
        let holder = GenericValue::new(1.5_f64);
        let err = Vector3::<f64>::from_value(9, &holder).unwrap_err();
        match err {
            ValuesError::IncorrectType { key, .. } => assert_eq!(key, 9),
            other => panic!("expected IncorrectType, got {other:?}"),
        }
    }
}
