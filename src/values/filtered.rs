//! Lazy, type- and predicate-filtered views over a `Values` container
//!
//! A view combines the container's ordered traversal with a skip filter
//! (the caller's key predicate AND a concrete-type match) and a cast stage
//! that re-exposes each surviving entry as a typed key/value pair. Nothing
//! is materialized: `size()` walks the filtered sequence and counts, and a
//! fresh iterator walks the live source each time it is requested.
//!
//! The cast target is expressed through [`FilterCast`]. Every [`Manifold`]
//! type is a target (entries of other types are skipped); `dyn Value` is the
//! no-type-filter target, keeping only the key predicate:
//!
//! ```
//! use apex_values::manifold::SO2;
//! use apex_values::values::{Value, Values};
//!
//! let mut values = Values::new();
//! values.insert(1, SO2::from_angle(0.0)).unwrap();
//! values.insert(2, 3.0_f64).unwrap();
//!
//! let rotations = values.filter::<SO2, _>(|_| true);
//! assert_eq!(rotations.size(), 1);
//!
//! let everything = values.filter::<dyn Value, _>(|_| true);
//! assert_eq!(everything.size(), 2);
//! ```

use crate::error::ValuesResult;
use crate::manifold::Manifold;
use crate::values::value::{GenericValue, Value};
use crate::values::{Key, Values};
use std::marker::PhantomData;

/// Cast target of a filtered view.
///
/// `cast` returns `None` for entries of other concrete types, which makes it
/// double as the type-match half of the view's skip filter; the cast itself
/// is therefore always safe. `to_boxed_value` re-wraps an entry for deep
/// copies into another container.
pub trait FilterCast: 'static {
    /// View a stored entry as `Self`, or `None` if the types differ.
    fn cast<'v>(value: &'v (dyn Value + 'static)) -> Option<&'v Self>;

    /// Mutable counterpart of [`FilterCast::cast`].
    fn cast_mut<'v>(value: &'v mut (dyn Value + 'static)) -> Option<&'v mut Self>;

    /// Deep-copy into a fresh type-erased holder.
    fn to_boxed_value(&self) -> Box<dyn Value>;
}

impl<T: Manifold> FilterCast for T {
    fn cast<'v>(value: &'v (dyn Value + 'static)) -> Option<&'v Self> {
        value.as_any().downcast_ref::<T>()
    }

    fn cast_mut<'v>(value: &'v mut (dyn Value + 'static)) -> Option<&'v mut Self> {
        value.as_any_mut().downcast_mut::<T>()
    }

    fn to_boxed_value(&self) -> Box<dyn Value> {
        Box::new(GenericValue::new(self.clone()))
    }
}

/// The generic base target: no type filtering, only the key predicate.
impl FilterCast for dyn Value {
    fn cast<'v>(value: &'v (dyn Value + 'static)) -> Option<&'v Self> {
        Some(value)
    }

    fn cast_mut<'v>(value: &'v mut (dyn Value + 'static)) -> Option<&'v mut Self> {
        Some(value)
    }

    fn to_boxed_value(&self) -> Box<dyn Value> {
        self.clone_boxed()
    }
}

/// Mutable filtered view over a live container.
///
/// Offers both a mutable traversal ([`Filtered::iter_mut`]) and a read-only
/// traversal ([`Filtered::iter`]) sharing the same predicate and source.
pub struct Filtered<'a, T: FilterCast + ?Sized> {
    values: &'a mut Values,
    filter: Box<dyn Fn(Key) -> bool>,
    _target: PhantomData<&'a T>,
}

impl<'a, T: FilterCast + ?Sized> Filtered<'a, T> {
    pub(crate) fn new(values: &'a mut Values, filter: Box<dyn Fn(Key) -> bool>) -> Self {
        Filtered {
            values,
            filter,
            _target: PhantomData,
        }
    }

    /// Read-only traversal of the matching entries, in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (Key, &T)> + '_ {
        let filter = &self.filter;
        self.values
            .iter()
            .filter(move |(key, _)| filter(*key))
            .filter_map(move |(key, value)| T::cast(value).map(|cast| (key, cast)))
    }

    /// Mutable traversal of the matching entries, in ascending key order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Key, &mut T)> + '_ {
        let filter = &self.filter;
        self.values
            .iter_mut()
            .filter(move |(key, _)| filter(*key))
            .filter_map(move |(key, value)| T::cast_mut(value).map(|cast| (key, cast)))
    }

    /// Number of matching entries. Traverses the whole filtered sequence;
    /// the count is not cached.
    pub fn size(&self) -> usize {
        self.iter().count()
    }
}

/// Read-only filtered view over a container.
pub struct ConstFiltered<'a, T: FilterCast + ?Sized> {
    values: &'a Values,
    filter: Box<dyn Fn(Key) -> bool>,
    _target: PhantomData<&'a T>,
}

impl<'a, T: FilterCast + ?Sized> ConstFiltered<'a, T> {
    pub(crate) fn new(values: &'a Values, filter: Box<dyn Fn(Key) -> bool>) -> Self {
        ConstFiltered {
            values,
            filter,
            _target: PhantomData,
        }
    }

    /// Traversal of the matching entries, in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (Key, &T)> + '_ {
        let filter = &self.filter;
        self.values
            .iter()
            .filter(move |(key, _)| filter(*key))
            .filter_map(move |(key, value)| T::cast(value).map(|cast| (key, cast)))
    }

    /// Number of matching entries. Traverses the whole filtered sequence;
    /// the count is not cached.
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    /// Keys of all matching entries, in the view's (ascending) order.
    pub fn keys(&self) -> Vec<Key> {
        self.iter().map(|(key, _)| key).collect()
    }
}

impl<'a, T: FilterCast + ?Sized> From<Filtered<'a, T>> for ConstFiltered<'a, T> {
    fn from(filtered: Filtered<'a, T>) -> Self {
        ConstFiltered {
            values: filtered.values,
            filter: filtered.filter,
            _target: PhantomData,
        }
    }
}

impl Values {
    /// Read-only view of the entries whose key satisfies `filter` and whose
    /// stored type is `T`. Use `dyn Value` as `T` to keep every type:
    /// `values.filter::<dyn Value, _>(pred)`.
    pub fn filter<'a, T, F>(&'a self, filter: F) -> ConstFiltered<'a, T>
    where
        T: FilterCast + ?Sized,
        F: Fn(Key) -> bool + 'static,
    {
        ConstFiltered::new(self, Box::new(filter))
    }

    /// Mutable view with the same selection semantics as [`Values::filter`].
    pub fn filter_mut<'a, T, F>(&'a mut self, filter: F) -> Filtered<'a, T>
    where
        T: FilterCast + ?Sized,
        F: Fn(Key) -> bool + 'static,
    {
        Filtered::new(self, Box::new(filter))
    }

    /// Build a new container from a read-only view, deep-cloning every
    /// matching entry under its original key.
    ///
    /// # Errors
    /// [`crate::error::ValuesError::DuplicateKey`] only if the view itself
    /// yields duplicate keys, which cannot happen for views over a single
    /// container.
    pub fn from_filtered<T: FilterCast + ?Sized>(
        view: &ConstFiltered<'_, T>,
    ) -> ValuesResult<Values> {
        let mut values = Values::new();
        for (key, value) in view.iter() {
            values.insert_boxed(key, value.to_boxed_value())?;
        }
        Ok(values)
    }

    /// Build a new container from a mutable view; the source is only read.
    pub fn from_filtered_mut<T: FilterCast + ?Sized>(
        view: &Filtered<'_, T>,
    ) -> ValuesResult<Values> {
        let mut values = Values::new();
        for (key, value) in view.iter() {
            values.insert_boxed(key, value.to_boxed_value())?;
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifold::{Manifold, SO2, SO3};
    use approx::assert_relative_eq;
    use nalgebra::{DVector, Vector2};
    use std::f64::consts::FRAC_PI_2;

    fn mixed_values() -> Values {
        let mut values = Values::new();
        values.insert(1, SO2::from_angle(0.0)).unwrap();
        values.insert(2, Vector2::new(1.0, 2.0)).unwrap();
        values.insert(3, SO2::from_angle(FRAC_PI_2)).unwrap();
        values.insert(4, SO3::identity()).unwrap();
        values
    }

    #[test]
    fn test_filter_selects_type_in_key_order() {
        let values = mixed_values();
        let view = values.filter::<SO2, _>(|_| true);
        assert_eq!(view.keys(), vec![1, 3]);
        assert_eq!(view.size(), 2);
    }

    #[test]
    fn test_filter_combines_key_predicate_and_type() {
        let values = mixed_values();
        let view = values.filter::<SO2, _>(|key| key > 1);
        assert_eq!(view.keys(), vec![3]);
    }

    #[test]
    fn test_filter_erased_keeps_all_types() {
        let values = mixed_values();
        let view = values.filter::<dyn Value, _>(|_| true);
        assert_eq!(view.size(), 4);
        let view = values.filter::<dyn Value, _>(|key| key % 2 == 0);
        assert_eq!(view.keys(), vec![2, 4]);
    }

    #[test]
    fn test_filter_mut_erased_traverses_all_types() {
        let mut values = mixed_values();
        let mut view = values.filter_mut::<dyn Value, _>(|key| key < 4);
        let dims: Vec<usize> = view.iter_mut().map(|(_, v)| v.dim()).collect();
        assert_eq!(dims, vec![1, 2, 1]);
        assert_eq!(view.iter().count(), 3);
    }

    #[test]
    fn test_filter_view_is_lazy_and_restartable() {
        let values = mixed_values();
        let view = values.filter::<SO2, _>(|_| true);
        // Two independent traversals of the same view
        assert_eq!(view.iter().count(), 2);
        assert_eq!(view.iter().count(), 2);
    }

    #[test]
    fn test_from_filtered_copies_matching_subset() {
        let values = mixed_values();
        let view = values.filter::<SO2, _>(|_| true);
        let copied = Values::from_filtered(&view).unwrap();

        assert_eq!(copied.keys(), vec![1, 3]);
        let rot: SO2 = copied.at(3).unwrap();
        assert_relative_eq!(rot.angle(), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_from_filtered_copy_is_independent() {
        let values = mixed_values();
        let mut copied = Values::from_filtered(&values.filter::<SO2, _>(|_| true)).unwrap();
        copied.update(1, SO2::from_angle(1.0)).unwrap();

        // Source container unaffected
        let original: SO2 = values.at(1).unwrap();
        assert_relative_eq!(original.angle(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_filter_mut_allows_in_place_mutation() {
        let mut values = mixed_values();
        {
            let mut view = values.filter_mut::<SO2, _>(|_| true);
            for (_, rotation) in view.iter_mut() {
                *rotation = rotation.retract(&DVector::from_element(1, 0.1));
            }
        }
        let moved: SO2 = values.at(1).unwrap();
        assert_relative_eq!(moved.angle(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_filtered_to_const_filtered_conversion() {
        let mut values = mixed_values();
        let view: ConstFiltered<'_, SO2> = values.filter_mut::<SO2, _>(|_| true).into();
        assert_eq!(view.keys(), vec![1, 3]);
    }

    #[test]
    fn test_from_filtered_mut() {
        let mut values = mixed_values();
        let view = values.filter_mut::<SO2, _>(|key| key == 1);
        let copied = Values::from_filtered_mut(&view).unwrap();
        assert_eq!(copied.keys(), vec![1]);
    }

    #[test]
    fn test_empty_filter_result() {
        let values = mixed_values();
        let view = values.filter::<SO2, _>(|_| false);
        assert_eq!(view.size(), 0);
        assert!(Values::from_filtered(&view).unwrap().is_empty());
    }
}
