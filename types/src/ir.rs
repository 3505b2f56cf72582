//! Intermediate Representation (IR) of interned types.
//!
//! ## Structure
//!
//! - **Kinds**: `ElementKind`, `DataLayout` - plain enumerations used inside keys
//! - **Keys**: `StorageKey` - the structural content identifying a type
//! - **Storage**: `TypeStorage` - the canonical arena copy of a key
//! - **Handles**: `TypeHandle` - identity-compared references to storages
//! - **Façades**: the `TypeFacade` trait implemented by the builtin types

pub mod handle;
pub mod key;
pub mod kind;
pub mod storage;

pub use handle::{TypeFacade, TypeHandle};
pub use key::{DenseTensorKey, StorageKey, TypeKindTag};
pub use kind::{DYNAMIC, DataLayout, ElementKind};
pub use storage::{TypeFlags, TypeStorage};
