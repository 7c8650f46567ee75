//! Raw memory helpers shared by the copy engine

pub mod duplicate;
pub mod raw_image;

pub use duplicate::{duplicate_array, duplicate_block, duplicate_string, duplicate_string_array, MalformedArray};
pub use raw_image::{RawImage, Span};
