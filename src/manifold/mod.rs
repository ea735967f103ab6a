//! Manifold representations for optimization on non-Euclidean spaces.
//!
//! This module provides the manifold types commonly used in computer vision
//! and robotics estimation problems:
//! - **SO(2)**: Rotations in 2D
//! - **SO(3)**: Rotations in 3D
//! - **SE(2)**: Rigid transformations in 2D
//! - **SE(3)**: Rigid transformations in 3D
//! - Euclidean spaces: scalars, points, dynamic vectors and matrices
//!
//! Every type implements the [`Manifold`] trait, the type-specific contract
//! required for storage in a [`crate::values::Values`] container: an
//! intrinsic dimension, a retraction that moves along the manifold by a
//! local coordinate vector, the inverse local-coordinates operation, and
//! approximate equality with a tolerance.
//!
//! The Lie group implementations follow the conventions of the
//! [manif](https://github.com/artivis/manif) C++ library: tangent vectors
//! for SE(2) are ordered `[x, y, theta]` and for SE(3) `[rho, theta]`
//! (translational part first).

use nalgebra::DVector;
use std::fmt;

pub mod euclidean;
pub mod se2;
pub mod se3;
pub mod so2;
pub mod so3;

pub use se2::SE2;
pub use se3::SE3;
pub use so2::SO2;
pub use so3::SO3;

/// Type-specific manifold contract.
///
/// This is the weaker, concrete-type contract that storable payloads satisfy
/// directly. The container adapts it into its uniform, type-erased
/// capability set; user code implementing a new variable type only needs to
/// provide these four operations (plus `Clone`, `Debug` and `Display`).
///
/// # Contract
///
/// For any element `x` and any tangent vector `delta` of length `x.dim()`:
/// - `x.retract(delta)` is a same-type element "nearby" `x`
/// - `x.local_coordinates(&x.retract(delta))` recovers `delta` (up to
///   numerical precision, within the injectivity radius)
/// - `x.retract(&zeros)` equals `x`
pub trait Manifold: Clone + fmt::Debug + fmt::Display + 'static {
    /// Intrinsic degrees of freedom (tangent space dimension).
    fn dim(&self) -> usize;

    /// Move along the manifold by a local coordinate vector of length `dim()`.
    ///
    /// # Panics
    /// Panics if `delta.len() != self.dim()`.
    fn retract(&self, delta: &DVector<f64>) -> Self;

    /// Local coordinate vector from `self` to `other`, of length `dim()`.
    ///
    /// # Panics
    /// May panic if `!self.compatible_with(other)`.
    fn local_coordinates(&self, other: &Self) -> DVector<f64>;

    /// Whether `other` lies on the same chart as `self`, so that
    /// [`Manifold::local_coordinates`] is defined between them. Fixed-dimension
    /// types are always compatible; dynamically sized types override this to
    /// require a matching shape.
    fn compatible_with(&self, other: &Self) -> bool {
        self.dim() == other.dim()
    }

    /// Approximate equality under the manifold's local metric.
    fn is_close(&self, other: &Self, tol: f64) -> bool {
        self.local_coordinates(other).norm() <= tol
    }
}
