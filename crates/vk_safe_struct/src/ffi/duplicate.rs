//! String and array duplicators
//!
//! Every duplicator takes a caller-owned pointer and returns newly owned
//! storage. Ownership of the result transfers to the caller.
//!
//! Empty-array policy: a zero count never reads the pointer and yields
//! `None`, whatever the pointer holds. A null pointer with a non-zero count is
//! a caller bug and is reported as [`MalformedArray`] unless the policy says
//! to treat it as empty.

use std::ffi::{c_char, c_void, CStr, CString};

use crate::config::MalformedArrayPolicy;
use crate::error::SafeStructError;
use crate::ffi::raw_image::{RawImage, Span};

/// A null array pointer paired with a non-zero count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MalformedArray {
    /// Element count that came with the null pointer
    pub count: usize,
}

impl MalformedArray {
    /// Attach the structure and field the array belongs to
    pub const fn at(self, shape: &'static str, field: &'static str) -> SafeStructError {
        SafeStructError::NullArray {
            shape,
            field,
            count: self.count,
        }
    }
}

/// Decide whether an array described by `(ptr, count)` has to be copied
pub(crate) fn should_copy(
    is_null: bool,
    count: usize,
    policy: MalformedArrayPolicy,
) -> Result<bool, MalformedArray> {
    match (count, is_null, policy) {
        (0, _, _) => Ok(false),
        (_, false, _) => Ok(true),
        (_, true, MalformedArrayPolicy::Reject) => Err(MalformedArray { count }),
        (_, true, MalformedArrayPolicy::TreatAsEmpty) => {
            log::warn!("Null array pointer with count {} treated as empty", count);
            Ok(false)
        }
    }
}

/// Duplicate a null-terminated string
///
/// # Safety
/// `src` must be null or point to a valid null-terminated string.
pub unsafe fn duplicate_string(src: *const c_char) -> Option<CString> {
    if src.is_null() {
        return None;
    }
    // SAFETY: non-null and null-terminated per the caller contract.
    Some(unsafe { CStr::from_ptr(src) }.to_owned())
}

/// Duplicate a counted array of plain values
///
/// # Safety
/// When `count > 0` and `src` is non-null, `src` must be valid for reads of
/// `count` elements.
pub unsafe fn duplicate_array<T: Copy>(
    src: *const T,
    count: usize,
    policy: MalformedArrayPolicy,
) -> Result<Option<Box<[T]>>, MalformedArray> {
    if !should_copy(src.is_null(), count, policy)? {
        return Ok(None);
    }
    // SAFETY: non-null and readable for `count` elements per the caller contract.
    let elements = unsafe { std::slice::from_raw_parts(src, count) };
    Ok(Some(elements.into()))
}

/// Duplicate a counted array of string pointers, preserving null entries
///
/// # Safety
/// When `count > 0` and `src` is non-null, `src` must be valid for reads of
/// `count` pointers, each null or pointing to a null-terminated string.
pub unsafe fn duplicate_string_array(
    src: *const *const c_char,
    count: usize,
    policy: MalformedArrayPolicy,
) -> Result<Option<Vec<Option<CString>>>, MalformedArray> {
    // SAFETY: forwarded caller contract.
    let Some(pointers) = (unsafe { duplicate_array(src, count, policy)? }) else {
        return Ok(None);
    };
    let strings = pointers
        .iter()
        // SAFETY: each entry is null or a valid string per the caller contract.
        .map(|&name| unsafe { duplicate_string(name) })
        .collect();
    Ok(Some(strings))
}

/// Duplicate `count` elements of `elem_size` bytes into an aligned image
///
/// An empty `members` list copies the elements whole. Otherwise only the
/// listed bytes of each element are copied and the padding stays zero.
///
/// # Safety
/// When `count > 0` and `src` is non-null, `src` must be valid for reads of
/// `count * elem_size` bytes.
pub unsafe fn duplicate_block(
    src: *const c_void,
    count: usize,
    elem_size: usize,
    members: &[Span],
    policy: MalformedArrayPolicy,
) -> Result<Option<RawImage>, MalformedArray> {
    if !should_copy(src.is_null(), count, policy)? {
        return Ok(None);
    }
    if members.is_empty() {
        // SAFETY: forwarded caller contract.
        return Ok(Some(unsafe { RawImage::copy_from(src, count * elem_size) }));
    }

    let mut block = RawImage::zeroed(count * elem_size);
    for index in 0..count {
        let base = index * elem_size;
        // SAFETY: element `index` lies inside the readable source range.
        let element = unsafe { src.cast::<u8>().add(base) }.cast::<c_void>();
        for &span in members {
            // SAFETY: `span` lies inside the element.
            unsafe { block.copy_span(base, element, span) };
        }
    }
    Ok(Some(block))
}
