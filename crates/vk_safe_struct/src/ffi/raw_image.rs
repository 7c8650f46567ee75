//! Aligned byte images of raw Vulkan structures
//!
//! A `RawImage` holds the bytes of one raw structure, or of a contiguous run
//! of structures or POD elements. The backing store is a `u64` slice, so any
//! member of a Vulkan structure is correctly aligned inside it.
//!
//! Images of structures are filled member by member from a list of [`Span`]s.
//! Padding is never read from the source and stays zero, so byte equality of
//! two images is equality of their members.

use std::ffi::c_void;
use std::fmt;
use std::mem::size_of;
use std::ptr;

const WORD: usize = size_of::<u64>();

/// Byte range of one member inside a structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Offset of the first byte
    pub offset: usize,
    /// Number of bytes
    pub len: usize,
}

/// Heap-allocated, 8-byte aligned byte buffer
#[derive(Clone, PartialEq, Eq)]
pub struct RawImage {
    words: Box<[u64]>,
    len: usize,
}

impl RawImage {
    /// Largest element alignment a `RawImage` can satisfy
    pub const MAX_ALIGN: usize = WORD;

    /// Create a zero-filled image of `len` bytes
    pub fn zeroed(len: usize) -> Self {
        Self {
            words: vec![0u64; len.div_ceil(WORD)].into_boxed_slice(),
            len,
        }
    }

    /// Copy `len` bytes starting at `src`
    ///
    /// # Safety
    /// `src` must be valid for reads of `len` bytes.
    pub unsafe fn copy_from(src: *const c_void, len: usize) -> Self {
        let mut image = Self::zeroed(len);
        if len > 0 {
            // SAFETY: the caller guarantees `src` is readable for `len` bytes and
            // the destination was just allocated with at least `len` bytes.
            unsafe { ptr::copy_nonoverlapping(src.cast::<u8>(), image.as_mut_ptr(), len) };
        }
        image
    }

    /// Copy the member at `span` of the structure at `src` to `base + span.offset`
    ///
    /// # Safety
    /// `src` must be valid for reads of `span.offset + span.len` bytes, and
    /// the bytes of the member must be initialised.
    pub unsafe fn copy_span(&mut self, base: usize, src: *const c_void, span: Span) {
        let at = base + span.offset;
        assert!(at + span.len <= self.len, "span copy out of bounds");
        // SAFETY: the destination range was bounds checked above, the source
        // range is readable per the caller contract.
        unsafe {
            ptr::copy_nonoverlapping(src.cast::<u8>().add(span.offset), self.as_mut_ptr().add(at), span.len);
        }
    }

    /// Copy a byte slice into a new image
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut image = Self::zeroed(bytes.len());
        image.bytes_mut().copy_from_slice(bytes);
        image
    }

    /// Number of meaningful bytes
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the image holds no bytes
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Address of the first byte
    ///
    /// The address stays valid while the image is alive, even if the
    /// `RawImage` value itself is moved.
    pub fn as_ptr(&self) -> *const c_void {
        self.words.as_ptr().cast()
    }

    fn as_mut_ptr(&mut self) -> *mut u8 {
        self.words.as_mut_ptr().cast()
    }

    /// The meaningful bytes
    pub fn bytes(&self) -> &[u8] {
        // SAFETY: `words` holds at least `len` initialised bytes.
        unsafe { std::slice::from_raw_parts(self.as_ptr().cast::<u8>(), self.len) }
    }

    /// The meaningful bytes, mutably
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        let len = self.len;
        // SAFETY: `words` holds at least `len` initialised bytes.
        unsafe { std::slice::from_raw_parts_mut(self.as_mut_ptr(), len) }
    }

    fn field<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.bytes()[offset..offset + N]);
        buf
    }

    /// Read a `u32` member
    pub fn read_u32(&self, offset: usize) -> u32 {
        u32::from_ne_bytes(self.field(offset))
    }

    /// Read an `i32` member (Vulkan enums)
    pub fn read_i32(&self, offset: usize) -> i32 {
        i32::from_ne_bytes(self.field(offset))
    }

    /// Read a `u64` member
    pub fn read_u64(&self, offset: usize) -> u64 {
        u64::from_ne_bytes(self.field(offset))
    }

    /// Read a `size_t` member
    pub fn read_usize(&self, offset: usize) -> usize {
        usize::from_ne_bytes(self.field(offset))
    }

    /// Read a pointer member
    pub fn read_ptr(&self, offset: usize) -> *const c_void {
        assert!(offset + size_of::<*const c_void>() <= self.len, "pointer read out of bounds");
        // SAFETY: bounds checked above; any bit pattern is a valid raw pointer.
        unsafe { ptr::read_unaligned(self.as_ptr().cast::<u8>().add(offset).cast::<*const c_void>()) }
    }

    /// Overwrite a pointer member
    pub fn write_ptr(&mut self, offset: usize, value: *const c_void) {
        assert!(offset + size_of::<*const c_void>() <= self.len, "pointer write out of bounds");
        // SAFETY: bounds checked above.
        unsafe { ptr::write_unaligned(self.as_mut_ptr().add(offset).cast::<*const c_void>(), value) };
    }

    /// Overwrite `bytes.len()` bytes starting at `offset`
    pub fn write_bytes(&mut self, offset: usize, bytes: &[u8]) {
        self.bytes_mut()[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    /// Reinterpret the image as a value of `T`
    ///
    /// # Safety
    /// The image must hold a valid bit pattern for `T`.
    pub unsafe fn read_as<T: Copy>(&self) -> T {
        assert!(size_of::<T>() <= self.len, "image too small for target type");
        assert!(std::mem::align_of::<T>() <= Self::MAX_ALIGN);
        // SAFETY: alignment is guaranteed by the `u64` backing store, validity by the caller.
        unsafe { ptr::read(self.as_ptr().cast::<T>()) }
    }
}

impl fmt::Debug for RawImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawImage").field("len", &self.len).finish()
    }
}

// SAFETY: the image is plain bytes. Pointer-sized members are either scrubbed
// or opaque values that are never dereferenced through the image.
unsafe impl Send for RawImage {}
// SAFETY: see `Send`.
unsafe impl Sync for RawImage {}
