//! Hash-consed type storage for a tensor IR.
//!
//! Types are described by structural [`StorageKey`]s and interned into a
//! [`TypeContext`], which keeps exactly one [`TypeStorage`] per distinct key.
//! Callers hold cheap [`TypeHandle`]s (or typed façades such as
//! [`DenseTensorType`]) whose equality and hashing are pointer identity.
//!
//! # Example
//!
//! ```
//! use carve_types::{DataLayout, DenseTensorType, ElementKind, TypeContext, NO_LOD};
//!
//! let ctx = TypeContext::new();
//! let a = DenseTensorType::get(&ctx, ElementKind::Float32, &[2, 3], DataLayout::RowMajor, NO_LOD, 0)?;
//! let b = DenseTensorType::get(&ctx, ElementKind::Float32, &[3, 2], DataLayout::RowMajor, NO_LOD, 0)?;
//! assert_ne!(a, b);
//! assert_eq!(a.dtype(), b.dtype());
//! # Ok::<(), carve_types::TypeError>(())
//! ```
//!
//! Handles borrow their context, so a handle can never outlive it:
//!
//! ```compile_fail
//! use carve_types::{ElementKind, ScalarType, TypeContext};
//!
//! let ctx = TypeContext::new();
//! let ty = ScalarType::get(&ctx, ElementKind::Bool).unwrap();
//! drop(ctx);
//! let _ = ty.kind();
//! ```

// Intermediate Representation - keys, storages and handles
pub mod ir;

pub mod builtin;
pub mod context;
pub mod error;
pub mod options;

pub use builtin::{DenseTensorType, NO_LOD, ScalarType, VectorType};
pub use context::{ContextId, ContextStats, TypeContext};
pub use error::{Resource, Result, TypeError};
pub use ir::{
    DYNAMIC, DataLayout, DenseTensorKey, ElementKind, StorageKey, TypeFacade, TypeFlags,
    TypeHandle, TypeKindTag, TypeStorage,
};
pub use options::ContextOptions;
