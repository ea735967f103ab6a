//! SO(3) - Special Orthogonal Group in 3D
//!
//! This module implements the Special Orthogonal group SO(3), which represents
//! rotations in 3D space.
//!
//! SO(3) elements are represented using nalgebra's UnitQuaternion internally.
//! SO(3) tangent elements are axis-angle vectors in R³, where the direction
//! gives the axis of rotation and the magnitude gives the angle.

use crate::manifold::Manifold;
use nalgebra::{DVector, Matrix3, UnitQuaternion, Vector3};
use std::fmt;

/// SO(3) group element representing rotations in 3D.
///
/// Internally represented using nalgebra's UnitQuaternion<f64>.
#[derive(Clone, Debug, PartialEq)]
pub struct SO3 {
    /// Internal representation as a unit quaternion
    quaternion: UnitQuaternion<f64>,
}

impl fmt::Display for SO3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let q = self.quaternion.quaternion();
        write!(
            f,
            "SO3(quaternion: [w: {:.4}, x: {:.4}, y: {:.4}, z: {:.4}])",
            q.w, q.i, q.j, q.k
        )
    }
}

impl SO3 {
    /// Degrees of freedom - dimension of the tangent space
    pub const DOF: usize = 3;

    /// Create a new SO(3) element from a unit quaternion.
    pub fn new(quaternion: UnitQuaternion<f64>) -> Self {
        SO3 { quaternion }
    }

    /// Create SO(3) from Euler angles (roll, pitch, yaw).
    pub fn from_euler_angles(roll: f64, pitch: f64, yaw: f64) -> Self {
        SO3::new(UnitQuaternion::from_euler_angles(roll, pitch, yaw))
    }

    /// Create SO(3) from a scaled axis (axis-angle vector).
    pub fn from_scaled_axis(axis_angle: Vector3<f64>) -> Self {
        SO3::new(UnitQuaternion::from_scaled_axis(axis_angle))
    }

    /// Get the identity element of the group.
    pub fn identity() -> Self {
        SO3::new(UnitQuaternion::identity())
    }

    /// Get the quaternion representation.
    pub fn quaternion(&self) -> UnitQuaternion<f64> {
        self.quaternion
    }

    /// Get the rotation as a 3x3 matrix.
    pub fn matrix(&self) -> Matrix3<f64> {
        self.quaternion.to_rotation_matrix().into_inner()
    }

    /// Compute the inverse rotation.
    pub fn inverse(&self) -> Self {
        SO3::new(self.quaternion.inverse())
    }

    /// Compose two rotations.
    pub fn compose(&self, other: &Self) -> Self {
        SO3::new(self.quaternion * other.quaternion)
    }

    /// Rotate a 3D vector.
    pub fn act(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.quaternion * vector
    }
}

impl Manifold for SO3 {
    fn dim(&self) -> usize {
        Self::DOF
    }

    fn retract(&self, delta: &DVector<f64>) -> Self {
        assert_eq!(delta.len(), Self::DOF, "SO(3) expects 3-dimensional delta");
        let omega = Vector3::new(delta[0], delta[1], delta[2]);
        SO3::new(self.quaternion * UnitQuaternion::from_scaled_axis(omega))
    }

    fn local_coordinates(&self, other: &Self) -> DVector<f64> {
        let omega = (self.quaternion.inverse() * other.quaternion).scaled_axis();
        DVector::from_column_slice(omega.as_slice())
    }
}
