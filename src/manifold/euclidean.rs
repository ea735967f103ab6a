//! Euclidean space manifolds
//!
//! Scalars, points, dynamic vectors and dynamic matrices are flat manifolds:
//! retraction is addition and local coordinates are subtraction. Matrices are
//! flattened column-major, so a DMatrix with shape m x n has dimension m * n.
//!
//! Fixed-size nalgebra vectors and matrices deliberately do *not* implement
//! [`Manifold`]: the container widens them to their dynamic counterparts at
//! insertion time (see `values::storable`), so only the dynamic types ever
//! appear in storage.

use crate::manifold::Manifold;
use nalgebra::{DMatrix, DVector, Point2, Point3};

impl Manifold for f64 {
    fn dim(&self) -> usize {
        1
    }

    fn retract(&self, delta: &DVector<f64>) -> Self {
        assert_eq!(delta.len(), 1, "scalar expects 1-dimensional delta");
        self + delta[0]
    }

    fn local_coordinates(&self, other: &Self) -> DVector<f64> {
        DVector::from_element(1, other - self)
    }

    fn is_close(&self, other: &Self, tol: f64) -> bool {
        (other - self).abs() <= tol
    }
}

impl Manifold for Point2<f64> {
    fn dim(&self) -> usize {
        2
    }

    fn retract(&self, delta: &DVector<f64>) -> Self {
        assert_eq!(delta.len(), 2, "Point2 expects 2-dimensional delta");
        Point2::new(self.x + delta[0], self.y + delta[1])
    }

    fn local_coordinates(&self, other: &Self) -> DVector<f64> {
        DVector::from_vec(vec![other.x - self.x, other.y - self.y])
    }
}

impl Manifold for Point3<f64> {
    fn dim(&self) -> usize {
        3
    }

    fn retract(&self, delta: &DVector<f64>) -> Self {
        assert_eq!(delta.len(), 3, "Point3 expects 3-dimensional delta");
        Point3::new(self.x + delta[0], self.y + delta[1], self.z + delta[2])
    }

    fn local_coordinates(&self, other: &Self) -> DVector<f64> {
        DVector::from_vec(vec![other.x - self.x, other.y - self.y, other.z - self.z])
    }
}

impl Manifold for DVector<f64> {
    fn dim(&self) -> usize {
        self.len()
    }

    fn retract(&self, delta: &DVector<f64>) -> Self {
        assert_eq!(
            delta.len(),
            self.len(),
            "vector delta dimension must match vector dimension"
        );
        self + delta
    }

    fn local_coordinates(&self, other: &Self) -> DVector<f64> {
        assert_eq!(
            other.len(),
            self.len(),
            "local coordinates require vectors of equal dimension"
        );
        other - self
    }

    fn is_close(&self, other: &Self, tol: f64) -> bool {
        self.len() == other.len() && (other - self).norm() <= tol
    }
}

impl Manifold for DMatrix<f64> {
    fn dim(&self) -> usize {
        self.nrows() * self.ncols()
    }

    fn retract(&self, delta: &DVector<f64>) -> Self {
        assert_eq!(
            delta.len(),
            self.dim(),
            "matrix delta dimension must match matrix element count"
        );
        self + DMatrix::from_column_slice(self.nrows(), self.ncols(), delta.as_slice())
    }

    fn local_coordinates(&self, other: &Self) -> DVector<f64> {
        assert_eq!(
            (other.nrows(), other.ncols()),
            (self.nrows(), self.ncols()),
            "local coordinates require matrices of equal shape"
        );
        DVector::from_column_slice((other - self).as_slice())
    }

    fn is_close(&self, other: &Self, tol: f64) -> bool {
        self.shape() == other.shape() && (other - self).norm() <= tol
    }

    // Equal element counts are not enough here: a 2x3 and a 3x2 matrix share
    // a dimension of 6 but live on different charts.
    fn compatible_with(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }
}
