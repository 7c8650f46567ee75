//! Error types for deep-copy operations

use ash::vk;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while copying a raw Vulkan structure
#[derive(Error, Debug)]
pub enum SafeStructError {
    /// An array pointer is null while its count says there are elements
    #[error("{shape}::{field}: null pointer with element count {count}")]
    NullArray {
        /// Structure name
        shape: &'static str,
        /// Pointer field name
        field: &'static str,
        /// Count read from the sibling field
        count: usize,
    },

    /// A byte-sized payload is not a whole number of elements
    #[error("{shape}::{field}: byte size {size} is not a multiple of {elem_size}")]
    UnevenByteSize {
        /// Structure name
        shape: &'static str,
        /// Pointer field name
        field: &'static str,
        /// Byte size read from the sibling field
        size: usize,
        /// Element size of the payload
        elem_size: usize,
    },

    /// A `pNext` chain contains a structure type with no registered shape
    #[error("Unknown structure type in pNext chain: {0:?}")]
    UnknownStructureType(vk::StructureType),

    /// A raw structure carries a different `s_type` than its shape expects
    #[error("Structure type mismatch for {shape}: expected {expected:?}, found {found:?}")]
    StructureTypeMismatch {
        /// Structure name
        shape: &'static str,
        /// Structure type of the shape
        expected: vk::StructureType,
        /// Structure type found in the raw record
        found: vk::StructureType,
    },

    /// A `pNext` chain is longer than the configured limit (usually a cycle)
    #[error("pNext chain exceeds {limit} structures")]
    ChainTooLong {
        /// Configured maximum chain length
        limit: usize,
    },

    /// A shape descriptor does not describe the Rust type it is used with
    #[error("Layout mismatch for {shape}: descriptor has {expected} bytes, type has {found}")]
    LayoutMismatch {
        /// Structure name
        shape: &'static str,
        /// Size recorded in the descriptor
        expected: usize,
        /// Size of the Rust type
        found: usize,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for deep-copy operations
pub type SafeResult<T> = Result<T, SafeStructError>;
