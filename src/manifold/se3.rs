//! SE(3) - Special Euclidean Group in 3D
//!
//! This module implements the Special Euclidean group SE(3), which represents
//! rigid body transformations in 3D space (rotation + translation).
//!
//! SE(3) elements are represented using nalgebra's Isometry3 internally.
//! SE(3) tangent elements are [rho, theta] = 6 components, where rho is the
//! translational component and theta the rotational (axis-angle) component.

use crate::manifold::Manifold;
use nalgebra::{DVector, Isometry3, Matrix3, Translation3, UnitQuaternion, Vector3};
use std::fmt;

/// SE(3) group element representing rigid body transformations in 3D.
#[derive(Clone, Debug, PartialEq)]
pub struct SE3 {
    /// Internal representation as a 3D isometry
    isometry: Isometry3<f64>,
}

impl fmt::Display for SE3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.translation();
        let q = self.rotation().quaternion().clone();
        write!(
            f,
            "SE3(translation: [{:.4}, {:.4}, {:.4}], quaternion: [w: {:.4}, x: {:.4}, y: {:.4}, z: {:.4}])",
            t.x, t.y, t.z, q.w, q.i, q.j, q.k
        )
    }
}

/// Skew-symmetric matrix [v]x such that [v]x * w = v × w.
fn skew(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}

/// Left Jacobian of SO(3):
/// J_l(theta) = I + (1 - cos t)/t^2 [t]x + (t - sin t)/t^3 [t]x^2
fn so3_left_jacobian(omega: &Vector3<f64>) -> Matrix3<f64> {
    let angle2 = omega.norm_squared();
    let w = skew(omega);
    if angle2 <= f64::EPSILON {
        Matrix3::identity() + 0.5 * w
    } else {
        let angle = angle2.sqrt();
        Matrix3::identity()
            + (1.0 - angle.cos()) / angle2 * w
            + (angle - angle.sin()) / (angle2 * angle) * w * w
    }
}

/// Inverse of the left Jacobian of SO(3):
/// J_l^{-1}(theta) = I - 1/2 [t]x + (1/t^2 - (1 + cos t)/(2 t sin t)) [t]x^2
fn so3_left_jacobian_inv(omega: &Vector3<f64>) -> Matrix3<f64> {
    let angle2 = omega.norm_squared();
    let w = skew(omega);
    if angle2 <= f64::EPSILON {
        Matrix3::identity() - 0.5 * w
    } else {
        let angle = angle2.sqrt();
        Matrix3::identity() - 0.5 * w
            + (1.0 / angle2 - (1.0 + angle.cos()) / (2.0 * angle * angle.sin())) * w * w
    }
}

impl SE3 {
    /// Degrees of freedom - dimension of the tangent space
    pub const DOF: usize = 6;

    /// Create a new SE(3) element from an isometry.
    pub fn from_isometry(isometry: Isometry3<f64>) -> Self {
        SE3 { isometry }
    }

    /// Create SE(3) from translation and rotation components.
    pub fn from_translation_rotation(
        translation: Vector3<f64>,
        rotation: UnitQuaternion<f64>,
    ) -> Self {
        SE3::from_isometry(Isometry3::from_parts(translation.into(), rotation))
    }

    /// Get the identity element of the group.
    pub fn identity() -> Self {
        SE3::from_isometry(Isometry3::identity())
    }

    /// Get the translation component.
    pub fn translation(&self) -> Vector3<f64> {
        self.isometry.translation.vector
    }

    /// Get the rotation component.
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        self.isometry.rotation
    }

    /// Get the underlying isometry.
    pub fn isometry(&self) -> Isometry3<f64> {
        self.isometry
    }

    /// Compute the inverse transformation.
    pub fn inverse(&self) -> Self {
        SE3::from_isometry(self.isometry.inverse())
    }

    /// Compose two transformations.
    pub fn compose(&self, other: &Self) -> Self {
        SE3::from_isometry(self.isometry * other.isometry)
    }

    /// Transform a 3D point.
    pub fn act(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.isometry * point
    }

    /// Exponential map from a tangent vector [rho, theta].
    fn exp(xi: &DVector<f64>) -> Self {
        let rho = Vector3::new(xi[0], xi[1], xi[2]);
        let omega = Vector3::new(xi[3], xi[4], xi[5]);
        let translation = so3_left_jacobian(&omega) * rho;
        SE3::from_isometry(Isometry3::from_parts(
            Translation3::from(translation),
            UnitQuaternion::from_scaled_axis(omega),
        ))
    }

    /// Logarithmic map to a tangent vector [rho, theta].
    fn log(&self) -> DVector<f64> {
        let omega = self.isometry.rotation.scaled_axis();
        let rho = so3_left_jacobian_inv(&omega) * self.isometry.translation.vector;
        DVector::from_vec(vec![rho.x, rho.y, rho.z, omega.x, omega.y, omega.z])
    }
}

impl Manifold for SE3 {
    fn dim(&self) -> usize {
        Self::DOF
    }

    fn retract(&self, delta: &DVector<f64>) -> Self {
        assert_eq!(delta.len(), Self::DOF, "SE(3) expects 6-dimensional delta");
        self.compose(&SE3::exp(delta))
    }

    fn local_coordinates(&self, other: &Self) -> DVector<f64> {
        self.inverse().compose(other).log()
    }
}
