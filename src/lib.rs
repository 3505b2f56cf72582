//! Carve - hash-consed type storage for tensor IRs
//!
//! # Overview
//!
//! Carve gives every structurally distinct IR type exactly one canonical
//! storage per [`TypeContext`], so the rest of a compiler can compare and
//! hash types by identity. See [`carve_types`] for the full API.
//!
//! # Quick Start
//!
//! ```
//! use carve::{DataLayout, DenseTensorType, ElementKind, TypeContext, NO_LOD, DYNAMIC};
//!
//! // One context per compilation session
//! let ctx = TypeContext::new();
//!
//! let input = DenseTensorType::get(&ctx, ElementKind::Float32, &[DYNAMIC, 128], DataLayout::RowMajor, NO_LOD, 0)?;
//! let same = DenseTensorType::get(&ctx, ElementKind::Float32, &[DYNAMIC, 128], DataLayout::RowMajor, NO_LOD, 0)?;
//! assert_eq!(input, same);
//! # Ok::<(), carve::TypeError>(())
//! ```

pub use carve_types::*;
