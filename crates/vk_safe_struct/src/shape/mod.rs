//! Shape descriptors
//!
//! A [`Shape`] describes one raw Vulkan structure type: its size, its
//! structure type (when it can sit in a `pNext` chain) and the list of pointer
//! fields whose targets have to be owned by a deep copy. Scalars, handles,
//! fixed-size arrays and opaque pointers are not listed as fields; they travel
//! by value inside the structure's byte image. The byte ranges of all members
//! are listed separately so that padding is never copied.

use std::ffi::c_void;
use std::fmt;
use std::mem::{align_of, offset_of, size_of};
use std::ops::Deref;
use std::sync::Arc;

use ash::vk;
use serde::{Deserialize, Serialize};

use crate::ffi::{RawImage, Span};

#[macro_use]
mod macros;

mod layout;
pub mod registry;
pub mod table;

/// Offset of `s_type` in every chainable structure
pub const STRUCTURE_TYPE_OFFSET: usize = offset_of!(vk::BaseInStructure, s_type);

/// Offset of `p_next` in every chainable structure
pub const NEXT_OFFSET: usize = offset_of!(vk::BaseInStructure, p_next);

/// Members of a structure carried as opaque bytes: the structure type, then
/// everything from `p_next` to the end of the structure
static OPAQUE_MEMBERS: &[Span] = &[
    Span {
        offset: STRUCTURE_TYPE_OFFSET,
        len: size_of::<vk::StructureType>(),
    },
    Span {
        offset: NEXT_OFFSET,
        len: usize::MAX,
    },
];

/// Size of the value behind a pointer; used to measure members
pub(crate) const fn pointee_size<T>(_: *const T) -> usize {
    size_of::<T>()
}

/// Decides from sibling fields whether a pointer field is meaningful
pub type Guard = fn(&RawImage) -> bool;

/// Picks the active member of a union from sibling fields
pub type UnionSelect = fn(&RawImage) -> Option<&'static Shape>;

/// Window-system or OS family a shape belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Core and cross-platform structures
    Any,
    /// Windows
    Win32,
    /// X11 through Xlib
    Xlib,
    /// X11 through XCB
    Xcb,
    /// Wayland
    Wayland,
    /// Android
    Android,
    /// Apple platforms through `CAMetalLayer`
    Metal,
}

impl Platform {
    /// Platforms the compile target can present on
    pub fn host() -> Vec<Self> {
        let mut platforms = vec![Self::Any];
        if cfg!(windows) {
            platforms.push(Self::Win32);
        }
        if cfg!(all(unix, not(any(target_os = "android", target_os = "macos", target_os = "ios")))) {
            platforms.extend([Self::Xlib, Self::Xcb, Self::Wayland]);
        }
        if cfg!(target_os = "android") {
            platforms.push(Self::Android);
        }
        if cfg!(any(target_os = "macos", target_os = "ios")) {
            platforms.push(Self::Metal);
        }
        platforms
    }

    /// Every platform, regardless of the compile target
    pub fn all() -> Vec<Self> {
        vec![
            Self::Any,
            Self::Win32,
            Self::Xlib,
            Self::Xcb,
            Self::Wayland,
            Self::Android,
            Self::Metal,
        ]
    }
}

/// Size and alignment of a POD payload element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElemLayout {
    /// Element size in bytes
    pub size: usize,
    /// Element alignment in bytes
    pub align: usize,
    /// Members of an element with padding; empty when elements are dense
    pub members: &'static [Span],
}

impl ElemLayout {
    /// Layout of `T`, copied whole
    pub const fn of<T>() -> Self {
        Self {
            size: size_of::<T>(),
            align: align_of::<T>(),
            members: &[],
        }
    }

    /// Layout of `T`, copied member by member
    pub const fn with_members<T>(members: &'static [Span]) -> Self {
        Self {
            members,
            ..Self::of::<T>()
        }
    }
}

/// Where the element count of an array field comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    /// A single optional pointee
    One,
    /// A `uint32_t` sibling at the given offset
    U32(usize),
    /// A `uint32_t` sibling, but a null pointer is legal whatever the count
    OptionalU32(usize),
    /// A `size_t` sibling holding the payload size in bytes
    Bytes(usize),
    /// A `VkSampleCountFlagBits` sibling; one mask word per 32 samples
    SampleMask(usize),
}

impl Count {
    /// Whether a null pointer is legal with a non-zero count
    pub const fn is_nullable(self) -> bool {
        matches!(self, Self::One | Self::OptionalU32(_) | Self::SampleMask(_))
    }

    /// Number of elements of `elem_size` bytes described by this count
    ///
    /// Returns the raw byte size as error when it is not a whole number of
    /// elements.
    pub fn resolve(self, image: &RawImage, elem_size: usize) -> Result<usize, usize> {
        match self {
            Self::One => Ok(1),
            Self::U32(offset) | Self::OptionalU32(offset) => Ok(image.read_u32(offset) as usize),
            Self::Bytes(offset) => {
                let size = image.read_usize(offset);
                if elem_size == 0 || size % elem_size != 0 {
                    Err(size)
                } else {
                    Ok(size / elem_size)
                }
            }
            Self::SampleMask(offset) => Ok((image.read_u32(offset) as usize).div_ceil(32)),
        }
    }
}

/// How one field of a structure is copied
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Null-terminated string
    String,
    /// Array of null-terminated strings
    Strings {
        /// Element count source
        count: Count,
    },
    /// Array of plain values
    Pod {
        /// Element layout
        elem: ElemLayout,
        /// Element count source
        count: Count,
    },
    /// Optional pointer to one nested structure
    Record {
        /// Shape of the pointee
        shape: &'static Shape,
    },
    /// Array of nested structures
    Records {
        /// Shape of each element
        shape: &'static Shape,
        /// Element count source
        count: Count,
    },
    /// Array of pointers to nested structures; null entries are kept
    RecordPointers {
        /// Shape of each pointee
        shape: &'static Shape,
        /// Element count source
        count: Count,
    },
    /// Structure embedded by value that owns pointers of its own
    Inline {
        /// Shape of the embedded structure
        shape: &'static Shape,
    },
    /// Union whose active member is named by sibling fields
    ///
    /// When `select` returns `None` the union is kept as opaque bytes. A host
    /// pointer copied that way is not owned by the copy.
    Union {
        /// Active member selector
        select: UnionSelect,
    },
}

impl FieldKind {
    /// Whether the field itself is a pointer
    pub const fn is_pointer(&self) -> bool {
        !matches!(self, Self::Inline { .. } | Self::Union { .. })
    }

    /// Element count source of array fields
    pub const fn count(&self) -> Option<Count> {
        match *self {
            Self::Strings { count }
            | Self::Pod { count, .. }
            | Self::Records { count, .. }
            | Self::RecordPointers { count, .. } => Some(count),
            _ => None,
        }
    }
}

/// One owned field of a structure
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Member name as spelled in `ash::vk`
    pub name: &'static str,
    /// Byte offset of the member
    pub offset: usize,
    /// Copy rule
    pub kind: FieldKind,
    /// Optional presence guard
    pub when: Option<Guard>,
}

/// Descriptor of one raw structure type
pub struct Shape {
    /// Vulkan name of the structure
    pub name: &'static str,
    /// Structure type for chainable structures
    pub structure_type: Option<vk::StructureType>,
    /// `size_of` the raw structure
    pub size: usize,
    /// `align_of` the raw structure
    pub align: usize,
    /// Platform family
    pub platform: Platform,
    /// Owned fields, in declaration order
    pub fields: &'static [Field],
    /// Byte ranges of all members, in declaration order
    pub members: &'static [Span],
}

impl Shape {
    /// Shape of a structure that is carried through chains as opaque bytes
    ///
    /// Only the padding after `s_type` is known; the rest of the structure is
    /// taken as member bytes.
    pub fn opaque(structure_type: vk::StructureType, size: usize) -> Self {
        Self {
            name: "VkOpaqueStructure",
            structure_type: Some(structure_type),
            size,
            align: RawImage::MAX_ALIGN,
            platform: Platform::Any,
            fields: &[],
            members: OPAQUE_MEMBERS,
        }
    }

    /// Whether the structure starts with `s_type`/`p_next`
    pub const fn is_chained(&self) -> bool {
        self.structure_type.is_some()
    }

    /// Whether the descriptor matches the layout of `T`
    pub const fn describes<T>(&self) -> bool {
        self.size == size_of::<T>() && self.align == align_of::<T>()
    }

    /// Index and descriptor of the field called `name`
    pub fn field(&self, name: &str) -> Option<(usize, &'static Field)> {
        self.fields.iter().enumerate().find(|(_, field)| field.name == name)
    }

    /// Member ranges clipped to the structure
    pub fn spans(&self) -> impl Iterator<Item = Span> + '_ {
        self.members
            .iter()
            .filter(|span| span.offset < self.size)
            .map(|span| Span {
                offset: span.offset,
                len: span.len.min(self.size - span.offset),
            })
    }

    /// Copy the members of the structure at `src` into a fresh image
    ///
    /// Padding stays zero. Embedded structures are captured through their own
    /// shape, and a union through its active member when one is selected.
    ///
    /// # Safety
    /// `src` must point to a valid structure of this shape.
    pub unsafe fn capture(&self, src: *const c_void) -> RawImage {
        let mut image = RawImage::zeroed(self.size);
        let embedded = |offset: usize| {
            self.fields
                .iter()
                .any(|field| field.offset == offset && !field.kind.is_pointer())
        };
        for span in self.spans().filter(|span| !embedded(span.offset)) {
            // SAFETY: `span` is a member of the caller's structure.
            unsafe { image.copy_span(0, src, span) };
        }

        for field in self.fields {
            let member = match field.kind {
                FieldKind::Inline { shape } => Some(shape),
                FieldKind::Union { select } => select(&image),
                _ => continue,
            };
            match member {
                Some(member) => {
                    // SAFETY: the embedded structure lies inside the caller's structure.
                    let bytes = unsafe { member.capture(src.cast::<u8>().add(field.offset).cast()) };
                    image.write_bytes(field.offset, bytes.bytes());
                }
                None => {
                    if let Some(span) = self.spans().find(|span| span.offset == field.offset) {
                        // SAFETY: an unselected union is taken whole.
                        unsafe { image.copy_span(0, src, span) };
                    }
                }
            }
        }
        image
    }

    /// Image of a default instance: zeroed, with `s_type` filled in
    pub fn default_image(&self) -> RawImage {
        let mut image = RawImage::zeroed(self.size);
        if let Some(structure_type) = self.structure_type {
            image.write_bytes(STRUCTURE_TYPE_OFFSET, &structure_type.as_raw().to_ne_bytes());
        }
        image
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("name", &self.name)
            .field("structure_type", &self.structure_type)
            .field("size", &self.size)
            .field("fields", &self.fields.len())
            .finish()
    }
}

/// Shared handle to a static or runtime-registered shape
#[derive(Debug, Clone)]
pub enum ShapeRef {
    /// Shape from the static table
    Static(&'static Shape),
    /// Shape registered at runtime
    Custom(Arc<Shape>),
}

impl Deref for ShapeRef {
    type Target = Shape;

    fn deref(&self) -> &Shape {
        match self {
            Self::Static(shape) => shape,
            Self::Custom(shape) => shape,
        }
    }
}

impl From<&'static Shape> for ShapeRef {
    fn from(shape: &'static Shape) -> Self {
        Self::Static(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_offsets_match_ash() {
        assert_eq!(STRUCTURE_TYPE_OFFSET, 0);
        assert_eq!(NEXT_OFFSET, offset_of!(vk::InstanceCreateInfo, p_next));
        assert_eq!(NEXT_OFFSET, offset_of!(vk::BufferCreateInfo, p_next));
    }

    #[test]
    fn test_default_image_sets_structure_type() {
        let image = table::INSTANCE_CREATE_INFO.default_image();
        assert_eq!(image.len(), size_of::<vk::InstanceCreateInfo>());
        assert_eq!(
            image.read_i32(STRUCTURE_TYPE_OFFSET),
            vk::StructureType::INSTANCE_CREATE_INFO.as_raw()
        );
        assert!(image.read_ptr(NEXT_OFFSET).is_null());
    }

    #[test]
    fn test_opaque_members_skip_header_padding() {
        let shape = Shape::opaque(vk::StructureType::from_raw(1_000_999_000), 32);
        let spans: Vec<_> = shape.spans().map(|span| (span.offset, span.len)).collect();
        assert_eq!(spans, vec![(0, 4), (NEXT_OFFSET, 32 - NEXT_OFFSET)]);
    }

    #[test]
    fn test_capture_leaves_padding_zero() {
        let mut source = [0xAAu8; 24];
        source[..4].copy_from_slice(&vk::StructureType::FENCE_CREATE_INFO.as_raw().to_ne_bytes());
        source[8..16].fill(0);
        source[16..20].copy_from_slice(&vk::FenceCreateFlags::SIGNALED.as_raw().to_ne_bytes());

        let image = unsafe { table::FENCE_CREATE_INFO.capture(source.as_ptr().cast()) };
        assert_eq!(&image.bytes()[..4], &source[..4]);
        assert_eq!(&image.bytes()[4..8], &[0; 4]);
        assert_eq!(&image.bytes()[16..20], &source[16..20]);
        assert_eq!(&image.bytes()[20..], &[0; 4]);
    }

    #[test]
    fn test_count_resolution() {
        let mut image = RawImage::zeroed(16);
        image.write_bytes(0, &3u32.to_ne_bytes());
        image.write_bytes(4, &vk::SampleCountFlags::TYPE_64.as_raw().to_ne_bytes());
        image.write_bytes(8, &12usize.to_ne_bytes());

        assert_eq!(Count::U32(0).resolve(&image, 4), Ok(3));
        assert_eq!(Count::SampleMask(4).resolve(&image, 4), Ok(2));
        assert_eq!(Count::Bytes(8).resolve(&image, 4), Ok(3));
        assert_eq!(Count::Bytes(8).resolve(&image, 8), Err(12));
        assert_eq!(Count::One.resolve(&image, 64), Ok(1));
    }

    #[test]
    fn test_field_kind_count() {
        let (_, field) = table::SUBMIT_INFO.field("p_command_buffers").unwrap();
        assert_eq!(
            field.kind.count(),
            Some(Count::U32(offset_of!(vk::SubmitInfo, command_buffer_count)))
        );
        let (_, field) = table::APPLICATION_INFO.field("p_application_name").unwrap();
        assert_eq!(field.kind.count(), None);
    }

    #[test]
    fn test_nullable_counts() {
        assert!(Count::One.is_nullable());
        assert!(Count::OptionalU32(0).is_nullable());
        assert!(!Count::U32(0).is_nullable());
        assert!(!Count::Bytes(0).is_nullable());
    }

    #[test]
    fn test_host_platforms_include_any() {
        let host = Platform::host();
        assert_eq!(host[0], Platform::Any);
        assert!(host.iter().all(|platform| Platform::all().contains(platform)));
    }

    #[test]
    fn test_field_lookup() {
        let (index, field) = table::INSTANCE_CREATE_INFO.field("pp_enabled_extension_names").unwrap();
        assert_eq!(index, 2);
        assert_eq!(field.offset, offset_of!(vk::InstanceCreateInfo, pp_enabled_extension_names));
        assert!(table::INSTANCE_CREATE_INFO.field("enabled_extension_count").is_none());
    }
}
