//! Heterogeneous, type-safe container for manifold-valued variables
//!
//! [`Values`] maps totally ordered keys to values of arbitrary concrete
//! manifold types, stored behind the type-erased [`Value`] capability set.
//! Typed access is runtime checked: retrieving a key as the wrong type is a
//! reported error, never undefined behavior and never a silent default.
//!
//! The container exclusively owns every entry. Copying a container, or
//! building one from a filtered view, deep-clones each entry; two containers
//! never alias a payload.
//!
//! Iteration order is ascending key order everywhere (entries, views,
//! aggregate manifold operations). Consumers rely on this determinism when
//! building linear-system orderings.

use crate::error::{ValuesError, ValuesResult};
use std::any::Any;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use nalgebra::DVector;

pub mod filtered;
pub mod storable;
pub mod value;

pub use filtered::{ConstFiltered, FilterCast, Filtered};
pub use storable::Storable;
pub use value::{GenericValue, Value};

/// Identifier naming one variable. Unique within a container.
pub type Key = u64;

/// Key-ordered collection of heterogeneously typed manifold values.
#[derive(Clone, Default)]
pub struct Values {
    values: BTreeMap<Key, Box<dyn Value>>,
}

impl Values {
    /// Create an empty container.
    pub fn new() -> Self {
        Values {
            values: BTreeMap::new(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the container has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether `key` is present, regardless of its stored type.
    pub fn contains(&self, key: Key) -> bool {
        self.values.contains_key(&key)
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> Vec<Key> {
        self.values.keys().copied().collect()
    }

    /// Iterate all entries in ascending key order as type-erased values.
    pub fn iter(&self) -> impl Iterator<Item = (Key, &(dyn Value + 'static))> + '_ {
        self.values.iter().map(|(k, v)| (*k, v.as_ref()))
    }

    /// Iterate all entries mutably in ascending key order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Key, &mut (dyn Value + 'static))> + '_ {
        self.values.iter_mut().map(|(k, v)| (*k, v.as_mut()))
    }

    /// Insert `value` under `key`.
    ///
    /// Fixed-size nalgebra vectors and matrices are widened to their
    /// dynamic-size counterparts before storage (see [`Storable`]).
    ///
    /// # Errors
    /// [`ValuesError::DuplicateKey`] if `key` is already present; the
    /// container is left unchanged.
    pub fn insert<T: Storable>(&mut self, key: Key, value: T) -> ValuesResult<()> {
        match self.values.entry(key) {
            Entry::Occupied(_) => Err(ValuesError::DuplicateKey(key)),
            Entry::Vacant(slot) => {
                slot.insert(Box::new(GenericValue::new(value.into_stored())));
                Ok(())
            }
        }
    }

    /// Replace the entry under `key` wholesale, applying the same promotion
    /// rule as [`Values::insert`]. The old holder is dropped, not mutated.
    ///
    /// # Errors
    /// [`ValuesError::KeyDoesNotExist`] if `key` is absent.
    pub fn update<T: Storable>(&mut self, key: Key, value: T) -> ValuesResult<()> {
        match self.values.get_mut(&key) {
            Some(slot) => {
                *slot = Box::new(GenericValue::new(value.into_stored()));
                Ok(())
            }
            None => Err(ValuesError::KeyDoesNotExist {
                operation: "update",
                key,
            }),
        }
    }

    /// Remove the entry under `key`.
    ///
    /// # Errors
    /// [`ValuesError::KeyDoesNotExist`] if `key` is absent.
    pub fn erase(&mut self, key: Key) -> ValuesResult<()> {
        self.values
            .remove(&key)
            .map(|_| ())
            .ok_or(ValuesError::KeyDoesNotExist {
                operation: "erase",
                key,
            })
    }

    /// Retrieve the value under `key` as type `T`, by value.
    ///
    /// Requesting a fixed-size numeric array type matches the stored
    /// dynamic-size counterpart and shape-checks it; any other request
    /// requires an exact runtime type match.
    ///
    /// # Errors
    /// [`ValuesError::KeyDoesNotExist`] if `key` is absent,
    /// [`ValuesError::IncorrectType`] on a type mismatch,
    /// [`ValuesError::ShapeMismatch`] on a fixed-size shape mismatch.
    pub fn at<T: Storable>(&self, key: Key) -> ValuesResult<T> {
        let value = self
            .values
            .get(&key)
            .ok_or(ValuesError::KeyDoesNotExist {
                operation: "at",
                key,
            })?;
        T::from_value(key, value.as_ref())
    }

    /// Like [`Values::at`], but a missing key yields `Ok(None)` instead of an
    /// error. A key that is present with the wrong type still fails: absence
    /// and presence-with-wrong-type are deliberately not conflated.
    pub fn exists<T: Storable>(&self, key: Key) -> ValuesResult<Option<T>> {
        match self.values.get(&key) {
            Some(value) => T::from_value(key, value.as_ref()).map(Some),
            None => Ok(None),
        }
    }

    /// Total degrees of freedom: the sum of every entry's dimension.
    pub fn dim(&self) -> usize {
        self.values.values().map(|v| v.dim()).sum()
    }

    /// Retract every entry by its slice of a flat tangent vector.
    ///
    /// `delta` is consumed in ascending key order, each entry taking `dim()`
    /// components. Returns a new container; `self` is unchanged.
    ///
    /// # Errors
    /// [`ValuesError::DimensionMismatch`] if `delta.len() != self.dim()`.
    pub fn retract(&self, delta: &DVector<f64>) -> ValuesResult<Values> {
        let total = self.dim();
        if delta.len() != total {
            return Err(ValuesError::DimensionMismatch {
                expected: total,
                actual: delta.len(),
            });
        }
        let mut retracted = BTreeMap::new();
        let mut offset = 0;
        for (key, value) in &self.values {
            let dim = value.dim();
            let local = delta.rows(offset, dim).into_owned();
            retracted.insert(*key, value.retract_boxed(&local));
            offset += dim;
        }
        Ok(Values { values: retracted })
    }

    /// Flat local-coordinate vector from `self` to `other`, ascending key
    /// order, one `dim()`-sized slice per entry.
    ///
    /// # Errors
    /// [`ValuesError::KeyDoesNotExist`] if the key sets differ,
    /// [`ValuesError::IncorrectType`] if a shared key stores different
    /// concrete types in the two containers,
    /// [`ValuesError::DimensionMismatch`] if a shared key stores
    /// dynamically sized values of different shape.
    pub fn local_coordinates(&self, other: &Values) -> ValuesResult<DVector<f64>> {
        if let Some(extra) = other.values.keys().find(|k| !self.contains(**k)) {
            return Err(ValuesError::KeyDoesNotExist {
                operation: "local_coordinates",
                key: *extra,
            });
        }
        let mut result = DVector::zeros(self.dim());
        let mut offset = 0;
        for (key, value) in &self.values {
            let other_value =
                other
                    .values
                    .get(key)
                    .ok_or(ValuesError::KeyDoesNotExist {
                        operation: "local_coordinates",
                        key: *key,
                    })?;
            if value.as_any().type_id() != other_value.as_any().type_id() {
                return Err(ValuesError::IncorrectType {
                    key: *key,
                    stored: other_value.type_name(),
                    requested: value.type_name(),
                });
            }
            // Same concrete type; None now only means incompatible shape.
            let local = value
                .local_coordinates_boxed(other_value.as_ref())
                .ok_or(ValuesError::DimensionMismatch {
                    expected: value.dim(),
                    actual: other_value.dim(),
                })?;
            let dim = value.dim();
            result.rows_mut(offset, dim).copy_from(&local);
            offset += dim;
        }
        Ok(result)
    }

    /// Entry-wise approximate equality: same keys, same concrete types,
    /// values equal within `tol`.
    pub fn equals(&self, other: &Values, tol: f64) -> bool {
        self.len() == other.len()
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && va.equals(vb.as_ref(), tol))
    }

    /// Insert an already-erased holder, used when copying entries across
    /// container boundaries.
    pub(crate) fn insert_boxed(&mut self, key: Key, value: Box<dyn Value>) -> ValuesResult<()> {
        match self.values.entry(key) {
            Entry::Occupied(_) => Err(ValuesError::DuplicateKey(key)),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }
}

impl fmt::Display for Values {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Values with {} entries:", self.len())?;
        for (key, value) in self.iter() {
            writeln!(f, "  {} ({}): {}", key, value.type_name(), value)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Values {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.values.iter().map(|(k, v)| (k, v.type_name())))
            .finish()
    }
}
