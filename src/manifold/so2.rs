//! SO(2) - Special Orthogonal Group in 2D
//!
//! This module implements the Special Orthogonal group SO(2), which represents
//! rotations in 2D space.
//!
//! SO(2) elements are represented using nalgebra's UnitComplex internally.
//! SO(2) tangent elements are a single angle in radians.

use crate::manifold::Manifold;
use nalgebra::{DVector, UnitComplex};
use std::fmt;

/// SO(2) group element representing rotations in 2D.
#[derive(Clone, Debug, PartialEq)]
pub struct SO2 {
    /// Internal representation as a unit complex number
    rotation: UnitComplex<f64>,
}

impl fmt::Display for SO2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SO2(angle: {:.4})", self.angle())
    }
}

impl SO2 {
    /// Degrees of freedom - dimension of the tangent space
    pub const DOF: usize = 1;

    /// Create a new SO(2) element from a unit complex number.
    pub fn new(rotation: UnitComplex<f64>) -> Self {
        SO2 { rotation }
    }

    /// Create SO(2) from a rotation angle in radians.
    pub fn from_angle(angle: f64) -> Self {
        SO2::new(UnitComplex::new(angle))
    }

    /// Get the identity element of the group.
    pub fn identity() -> Self {
        SO2::new(UnitComplex::identity())
    }

    /// Get the rotation angle in radians, in (-pi, pi].
    pub fn angle(&self) -> f64 {
        self.rotation.angle()
    }

    /// Get the unit complex representation.
    pub fn unit_complex(&self) -> UnitComplex<f64> {
        self.rotation
    }

    /// Compute the inverse rotation.
    pub fn inverse(&self) -> Self {
        SO2::new(self.rotation.inverse())
    }

    /// Compose two rotations.
    pub fn compose(&self, other: &Self) -> Self {
        SO2::new(self.rotation * other.rotation)
    }
}

impl Manifold for SO2 {
    fn dim(&self) -> usize {
        Self::DOF
    }

    fn retract(&self, delta: &DVector<f64>) -> Self {
        assert_eq!(delta.len(), Self::DOF, "SO(2) expects 1-dimensional delta");
        SO2::new(self.rotation * UnitComplex::new(delta[0]))
    }

    fn local_coordinates(&self, other: &Self) -> DVector<f64> {
        DVector::from_element(1, (self.rotation.inverse() * other.rotation).angle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_so2_identity_retract() {
        let r = SO2::from_angle(0.3);
        let unchanged = r.retract(&DVector::zeros(1));
        assert_relative_eq!(unchanged.angle(), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_so2_retract_local_round_trip() {
        let r = SO2::from_angle(0.5);
        let delta = DVector::from_element(1, 0.7);
        let moved = r.retract(&delta);
        let recovered = r.local_coordinates(&moved);
        assert_relative_eq!(recovered[0], 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_so2_compose_inverse() {
        let a = SO2::from_angle(FRAC_PI_2);
        let b = a.compose(&a.inverse());
        assert!(b.is_close(&SO2::identity(), 1e-12));
    }

    #[test]
    fn test_so2_angle_wraps() {
        let r = SO2::from_angle(3.0 * FRAC_PI_2);
        assert_relative_eq!(r.angle(), -FRAC_PI_2, epsilon = 1e-12);
    }
}
