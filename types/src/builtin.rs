//! Concrete type façades.
//!
//! Each façade wraps a [`TypeHandle`](crate::TypeHandle) of one key kind and
//! exposes its fields through named accessors. All façades share the same
//! context and table; the kind tag in every key keeps them apart.

pub mod dense_tensor;
pub mod scalar;
pub mod vector;

pub use dense_tensor::{DenseTensorType, NO_LOD};
pub use scalar::ScalarType;
pub use vector::VectorType;
