//! SE(2) - Special Euclidean Group in 2D
//!
//! This module implements the Special Euclidean group SE(2), which represents
//! rigid body transformations in 2D space (rotation + translation).
//!
//! SE(2) elements are represented using nalgebra's Isometry2 internally.
//! SE(2) tangent elements are [x, y, theta] = 3 components, where x,y is the
//! translational component and theta is the rotational component.

use crate::manifold::Manifold;
use nalgebra::{DVector, Isometry2, Translation2, UnitComplex, Vector2};
use std::fmt;

/// SE(2) group element representing rigid body transformations in 2D.
#[derive(Clone, Debug, PartialEq)]
pub struct SE2 {
    /// Internal representation as a 2D isometry
    isometry: Isometry2<f64>,
}

impl fmt::Display for SE2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.translation();
        write!(
            f,
            "SE2(translation: [{:.4}, {:.4}], angle: {:.4})",
            t.x,
            t.y,
            self.angle()
        )
    }
}

/// Closed-form coefficients of the SE(2) V(theta) matrix:
/// a = sin(theta)/theta, b = (1 - cos(theta))/theta.
fn v_coefficients(theta: f64) -> (f64, f64) {
    if theta.abs() < 1e-10 {
        (1.0 - theta * theta / 6.0, 0.5 * theta)
    } else {
        ((theta.sin()) / theta, (1.0 - theta.cos()) / theta)
    }
}

impl SE2 {
    /// Degrees of freedom - dimension of the tangent space
    pub const DOF: usize = 3;

    /// Create a new SE(2) element from an isometry.
    pub fn from_isometry(isometry: Isometry2<f64>) -> Self {
        SE2 { isometry }
    }

    /// Create SE(2) from translation components and a rotation angle.
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        SE2::from_isometry(Isometry2::new(Vector2::new(x, y), angle))
    }

    /// Get the identity element of the group.
    pub fn identity() -> Self {
        SE2::from_isometry(Isometry2::identity())
    }

    /// Get the translation component.
    pub fn translation(&self) -> Vector2<f64> {
        self.isometry.translation.vector
    }

    /// Get the rotation angle in radians.
    pub fn angle(&self) -> f64 {
        self.isometry.rotation.angle()
    }

    /// Get the underlying isometry.
    pub fn isometry(&self) -> Isometry2<f64> {
        self.isometry
    }

    /// Compute the inverse transformation.
    pub fn inverse(&self) -> Self {
        SE2::from_isometry(self.isometry.inverse())
    }

    /// Compose two transformations.
    pub fn compose(&self, other: &Self) -> Self {
        SE2::from_isometry(self.isometry * other.isometry)
    }

    /// Exponential map from a tangent vector [x, y, theta].
    fn exp(xi: &DVector<f64>) -> Self {
        let (x, y, theta) = (xi[0], xi[1], xi[2]);
        let (a, b) = v_coefficients(theta);
        // t = V(theta) * rho
        let translation = Vector2::new(a * x - b * y, b * x + a * y);
        SE2::from_isometry(Isometry2::from_parts(
            Translation2::from(translation),
            UnitComplex::new(theta),
        ))
    }

    /// Logarithmic map to a tangent vector [x, y, theta].
    fn log(&self) -> DVector<f64> {
        let theta = self.angle();
        let t = self.translation();
        let (a, b) = v_coefficients(theta);
        // rho = V(theta)^{-1} * t, with V^{-1} = [a b; -b a] / (a^2 + b^2)
        let denom = a * a + b * b;
        DVector::from_vec(vec![
            (a * t.x + b * t.y) / denom,
            (-b * t.x + a * t.y) / denom,
            theta,
        ])
    }
}

impl Manifold for SE2 {
    fn dim(&self) -> usize {
        Self::DOF
    }

    fn retract(&self, delta: &DVector<f64>) -> Self {
        assert_eq!(delta.len(), Self::DOF, "SE(2) expects 3-dimensional delta");
        self.compose(&SE2::exp(delta))
    }

    fn local_coordinates(&self, other: &Self) -> DVector<f64> {
        self.inverse().compose(other).log()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_se2_identity_retract() {
        let pose = SE2::new(1.0, -2.0, 0.4);
        let unchanged = pose.retract(&DVector::zeros(3));
        assert!(unchanged.is_close(&pose, 1e-12));
    }

    #[test]
    fn test_se2_retract_local_round_trip() {
        let pose = SE2::new(1.0, 2.0, FRAC_PI_4);
        let delta = DVector::from_vec(vec![0.3, -0.1, 0.2]);
        let moved = pose.retract(&delta);
        let recovered = pose.local_coordinates(&moved);
        for i in 0..3 {
            assert_relative_eq!(recovered[i], delta[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_se2_exp_log_small_angle() {
        let delta = DVector::from_vec(vec![0.5, 0.25, 1e-12]);
        let pose = SE2::identity().retract(&delta);
        assert_relative_eq!(pose.translation().x, 0.5, epsilon = 1e-9);
        assert_relative_eq!(pose.translation().y, 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_se2_compose_inverse() {
        let pose = SE2::new(3.0, -1.0, 0.7);
        let e = pose.compose(&pose.inverse());
        assert!(e.is_close(&SE2::identity(), 1e-12));
    }
}
