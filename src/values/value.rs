//! Type-erased manifold value capability set and its typed holder
//!
//! [`Value`] is the uniform contract the container stores behind: every entry
//! can report its dimension, retract along the manifold, compute local
//! coordinates, compare with a tolerance, print itself, and deep-clone.
//! [`GenericValue`] adapts any concrete [`Manifold`] type into that contract
//! by delegation, recording the payload's runtime type identity so the
//! container can verify typed retrievals.

use crate::manifold::Manifold;
use nalgebra::DVector;
use std::any::Any;
use std::fmt;

/// Uniform, object-safe capability set for stored manifold values.
///
/// Consumers normally never implement this directly; concrete payload types
/// implement [`Manifold`] and are adapted through [`GenericValue`].
pub trait Value: fmt::Debug + fmt::Display {
    /// Intrinsic degrees of freedom of the stored value.
    fn dim(&self) -> usize;

    /// Retract along the manifold by a local coordinate vector of length `dim()`.
    fn retract_boxed(&self, delta: &DVector<f64>) -> Box<dyn Value>;

    /// Local coordinate vector from this value to `other`.
    ///
    /// Returns `None` when `other` holds a different concrete type or an
    /// incompatible dynamic shape; the container maps that to a typed error
    /// carrying the offending key.
    fn local_coordinates_boxed(&self, other: &dyn Value) -> Option<DVector<f64>>;

    /// Approximate equality. A concrete type mismatch is never equal.
    fn equals(&self, other: &dyn Value, tol: f64) -> bool;

    /// Deep copy. Stored values are exclusively owned and never aliased, so
    /// every container boundary crossing goes through this.
    fn clone_boxed(&self) -> Box<dyn Value>;

    /// Name of the concrete payload type, for error reporting.
    fn type_name(&self) -> &'static str;

    /// The payload as `Any`, for runtime-checked downcast.
    fn as_any(&self) -> &dyn Any;

    /// The payload as mutable `Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl Clone for Box<dyn Value> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// Typed holder adapting a concrete [`Manifold`] payload to the [`Value`]
/// capability set.
#[derive(Debug, Clone)]
pub struct GenericValue<T: Manifold> {
    value: T,
}

impl<T: Manifold> GenericValue<T> {
    /// Wrap a payload, taking ownership.
    pub fn new(value: T) -> Self {
        GenericValue { value }
    }

    /// Borrow the wrapped payload.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Unwrap into the payload.
    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: Manifold> fmt::Display for GenericValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl<T: Manifold> Value for GenericValue<T> {
    fn dim(&self) -> usize {
        self.value.dim()
    }

    fn retract_boxed(&self, delta: &DVector<f64>) -> Box<dyn Value> {
        Box::new(GenericValue::new(self.value.retract(delta)))
    }

    fn local_coordinates_boxed(&self, other: &dyn Value) -> Option<DVector<f64>> {
        let o = other.as_any().downcast_ref::<T>()?;
        if !self.value.compatible_with(o) {
            return None;
        }
        Some(self.value.local_coordinates(o))
    }

    fn equals(&self, other: &dyn Value, tol: f64) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|o| self.value.is_close(o, tol))
    }

    fn clone_boxed(&self) -> Box<dyn Value> {
        Box::new(self.clone())
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        &self.value
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        &mut self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifold::SO2;

    #[test]
    fn test_generic_value_delegates_dim() {
        let holder = GenericValue::new(SO2::from_angle(0.2));
        assert_eq!(Value::dim(&holder), 1);
    }

    #[test]
    fn test_generic_value_retract_preserves_type() {
        let holder = GenericValue::new(SO2::from_angle(0.0));
        let moved = holder.retract_boxed(&DVector::from_element(1, 0.5));
        let payload = moved.as_any().downcast_ref::<SO2>().unwrap();
        assert!((payload.angle() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_equals_rejects_type_mismatch() {
        let a = GenericValue::new(SO2::from_angle(0.0));
        let b = GenericValue::new(1.0_f64);
        assert!(!a.equals(&b, 1e9));
    }

    #[test]
    fn test_local_coordinates_none_on_type_mismatch() {
        let a = GenericValue::new(SO2::from_angle(0.0));
        let b = GenericValue::new(1.0_f64);
        assert!(a.local_coordinates_boxed(&b).is_none());
    }

    #[test]
    fn test_local_coordinates_none_on_shape_mismatch() {
        let a = GenericValue::new(DVector::from_vec(vec![1.0, 2.0]));
        let b = GenericValue::new(DVector::from_vec(vec![1.0, 2.0, 3.0]));
        assert!(a.local_coordinates_boxed(&b).is_none());
    }

    #[test]
    fn test_clone_boxed_is_deep() {
        let holder = GenericValue::new(SO2::from_angle(0.3));
        let copy = holder.clone_boxed();
        assert!(copy.equals(&holder, 1e-12));
        assert_eq!(copy.type_name(), holder.type_name());
    }
}
