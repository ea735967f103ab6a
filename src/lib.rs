//! apex-values: a heterogeneous, type-safe container for manifold-valued
//! optimization variables.
//!
//! A nonlinear estimation engine keeps the current assignment of every
//! optimization variable in one place. Variables live on different manifolds
//! (rotations, rigid-body poses, landmarks, raw vectors, parameter matrices),
//! so the container must store arbitrarily many different concrete types
//! behind a single ordered key space while still handing each value back
//! *as its original type* with a runtime-checked guarantee.
//!
//! The main entry point is [`values::Values`]:
//!
//! ```
//! use apex_values::manifold::{Manifold, SO3};
//! use apex_values::values::Values;
//! use nalgebra::Vector3;
//!
//! let mut values = Values::new();
//! values.insert(0, SO3::identity()).unwrap();
//! values.insert(1, Vector3::new(1.0, 2.0, 3.0)).unwrap();
//!
//! let rot: SO3 = values.at(0).unwrap();
//! assert_eq!(rot.dim(), 3);
//! let v: Vector3<f64> = values.at(1).unwrap();
//! assert_eq!(v, Vector3::new(1.0, 2.0, 3.0));
//! ```
//!
//! Fixed-size nalgebra vectors and matrices are widened to their dynamic
//! counterparts at storage time and shape-checked on the way back out, so
//! consumers can mix `Vector3<f64>` and `DVector<f64>` freely. Typed,
//! predicate-filtered projections over the container are provided by
//! [`values::Filtered`] and [`values::ConstFiltered`].

pub mod error;
pub mod logger;
pub mod manifold;
pub mod values;

pub use error::{ValuesError, ValuesResult};
pub use logger::{init_logger, init_logger_with_level};
