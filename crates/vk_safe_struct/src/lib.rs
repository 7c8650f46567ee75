//! # Vulkan Safe Structs
//!
//! Owning, deep-copying counterparts of `ash::vk` structures.
//!
//! Vulkan structures are non-owning: they point at caller memory for arrays,
//! strings, nested structures and an open-ended `pNext` chain of extension
//! structures. A layer that needs to keep a call argument around (validation,
//! capture, deferred replay) has to copy everything reachable from it. This
//! crate does that with one generic engine driven by per-type field
//! descriptors.
//!
//! ## Features
//!
//! - **Descriptor Table**: every supported structure is described once as a
//!   [`Shape`] (size, structure type, owned pointer fields)
//! - **Chain Cloning**: heterogeneous `pNext` chains are cloned node by node
//!   through a [`ShapeRegistry`] keyed by `VkStructureType`
//! - **Transient Views**: [`SafeStruct::view`] materialises a fresh raw
//!   structure whose pointers refer to the owned copies
//! - **Configurable Policies**: unknown structure types and malformed arrays
//!   are handled according to [`CopyConfig`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ash::vk;
//! use vk_safe_struct::prelude::*;
//!
//! fn keep(create_info: &vk::InstanceCreateInfo) -> SafeResult<SafeInstanceCreateInfo> {
//!     // The caller guarantees that create_info is a valid Vulkan argument.
//!     let copy = unsafe { SafeInstanceCreateInfo::from_raw(create_info)? };
//!     let view = copy.view();
//!     assert_eq!(view.enabled_extension_count, create_info.enabled_extension_count);
//!     drop(view);
//!     Ok(copy)
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod engine;
pub mod error;
pub mod ffi;
pub mod foundation;
pub mod shape;
pub mod unions;
pub mod variants;

#[cfg(test)]
mod tests;

pub use config::{Config, ConfigError, CopyConfig, CustomStructure, MalformedArrayPolicy, UnknownStructurePolicy};
pub use engine::{
    chain::{free_pnext_chain, safe_pnext_copy, SafeChain},
    record::{Payload, SafeRecord},
    view::{ChainView, RawView},
    CloneContext,
};
pub use error::{SafeResult, SafeStructError};
pub use shape::{registry::ShapeRegistry, Count, ElemLayout, Field, FieldKind, Platform, Shape};
pub use variants::SafeStruct;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, CopyConfig, MalformedArrayPolicy, UnknownStructurePolicy},
        engine::{
            chain::{free_pnext_chain, safe_pnext_copy, SafeChain},
            record::SafeRecord,
            view::{ChainView, RawView},
            CloneContext,
        },
        error::{SafeResult, SafeStructError},
        shape::registry::ShapeRegistry,
        variants::*,
    };
}
