//! Type-erased safe variant
//!
//! A [`SafeRecord`] holds the byte image of one structure with every owned
//! pointer scrubbed to null, one [`Payload`] per owned field of its shape and
//! the owned copy of its `pNext` chain.

use std::ffi::{c_char, c_void, CStr, CString};
use std::fmt;
use std::mem::size_of;
use std::ptr;

use ash::vk;

use crate::engine::chain::SafeChain;
use crate::engine::CloneContext;
use crate::error::{SafeResult, SafeStructError};
use crate::ffi::duplicate::should_copy;
use crate::ffi::{duplicate_array, duplicate_block, duplicate_string, duplicate_string_array, MalformedArray, RawImage};
use crate::shape::{Count, Field, FieldKind, Shape, ShapeRef, NEXT_OFFSET, STRUCTURE_TYPE_OFFSET};

/// Owned target of one pointer field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Payload {
    /// Null pointer, zero count or guarded-off field
    #[default]
    Empty,
    /// Plain elements
    Pod {
        /// Number of elements
        count: usize,
        /// Element bytes
        data: RawImage,
    },
    /// One string
    String(CString),
    /// String array; `None` entries were null pointers
    Strings(Vec<Option<CString>>),
    /// One nested structure
    Record(Box<SafeRecord>),
    /// Contiguous array of nested structures
    Records(Vec<SafeRecord>),
    /// Array of pointers to nested structures; `None` entries were null
    RecordPointers(Vec<Option<Box<SafeRecord>>>),
    /// Embedded structure or active union member
    Inline(Box<SafeRecord>),
}

/// Owning deep copy of one raw structure
pub struct SafeRecord {
    shape: ShapeRef,
    image: RawImage,
    payloads: Vec<Payload>,
    next: SafeChain,
}

impl SafeRecord {
    /// Default instance: owns nothing, `s_type` filled in
    pub fn new(shape: impl Into<ShapeRef>) -> Self {
        let shape = shape.into();
        Self {
            image: shape.default_image(),
            payloads: vec![Payload::Empty; shape.fields.len()],
            next: SafeChain::new(),
            shape,
        }
    }

    /// Deep-copy the structure at `raw`, including its `pNext` chain
    ///
    /// A null `raw` yields the default instance. Only the members of the
    /// structure are read; its padding is left zero in the copy.
    ///
    /// # Safety
    /// `raw` must be null or point to a valid structure of `shape`, and every
    /// pointer reachable from it must be valid for the reads its count implies.
    /// A union member without a selector is read whole and must be fully
    /// initialised.
    pub unsafe fn from_raw(shape: impl Into<ShapeRef>, raw: *const c_void, ctx: CloneContext<'_>) -> SafeResult<Self> {
        let shape = shape.into();
        if raw.is_null() {
            return Ok(Self::new(shape));
        }

        // SAFETY: `raw` points to a valid structure of `shape` per the caller contract.
        let image = unsafe { shape.capture(raw) };
        if let Some(expected) = shape.structure_type {
            let found = vk::StructureType::from_raw(image.read_i32(STRUCTURE_TYPE_OFFSET));
            if found != expected {
                return Err(SafeStructError::StructureTypeMismatch {
                    shape: shape.name,
                    expected,
                    found,
                });
            }
        }

        // SAFETY: forwarded caller contract.
        unsafe { Self::from_image(shape, image, ctx, true) }
    }

    /// Copy one chain node without following its `p_next`
    pub(crate) unsafe fn copy_node(shape: ShapeRef, raw: *const c_void, ctx: CloneContext<'_>) -> SafeResult<Self> {
        // SAFETY: the chain engine only passes non-null nodes of `shape`.
        let image = unsafe { shape.capture(raw) };
        unsafe { Self::from_image(shape, image, ctx, false) }
    }

    unsafe fn copy_nested(shape: &'static Shape, raw: *const c_void, ctx: CloneContext<'_>) -> SafeResult<Self> {
        // SAFETY: nested pointers are valid per the contract of the outer copy.
        let image = unsafe { shape.capture(raw) };
        unsafe { Self::from_image(shape.into(), image, ctx, true) }
    }

    /// Take ownership of everything `image` points to
    ///
    /// `image` holds the caller's bytes with live pointers; they are scrubbed
    /// as their targets are copied.
    unsafe fn from_image(
        shape: ShapeRef,
        mut image: RawImage,
        ctx: CloneContext<'_>,
        follow_next: bool,
    ) -> SafeResult<Self> {
        let mut payloads = Vec::with_capacity(shape.fields.len());
        for field in shape.fields {
            // SAFETY: forwarded caller contract.
            payloads.push(unsafe { copy_field(shape.name, field, &mut image, ctx)? });
        }

        let mut next = SafeChain::new();
        if shape.is_chained() {
            let head = image.read_ptr(NEXT_OFFSET);
            image.write_ptr(NEXT_OFFSET, ptr::null());
            if follow_next {
                // SAFETY: forwarded caller contract.
                next = unsafe { SafeChain::from_raw(head, ctx)? };
            }
        }

        log::trace!("Copied {} ({} owned fields)", shape.name, payloads.len());
        Ok(Self {
            shape,
            image,
            payloads,
            next,
        })
    }

    /// Replace the contents with a deep copy of `raw`
    ///
    /// On error `self` is left untouched.
    ///
    /// # Safety
    /// Same contract as [`SafeRecord::from_raw`].
    pub unsafe fn initialize(&mut self, raw: *const c_void, ctx: CloneContext<'_>) -> SafeResult<()> {
        // SAFETY: forwarded caller contract.
        let fresh = unsafe { Self::from_raw(self.shape.clone(), raw, ctx)? };
        *self = fresh;
        Ok(())
    }

    /// Replace the contents with a deep copy of `source`
    pub fn initialize_from(&mut self, source: &Self) {
        self.clone_from(source);
    }

    /// Copy without the `pNext` chain
    pub(crate) fn clone_detached(&self) -> Self {
        Self {
            shape: self.shape.clone(),
            image: self.image.clone(),
            payloads: self.payloads.clone(),
            next: SafeChain::new(),
        }
    }

    /// Equality ignoring the `pNext` chain
    pub(crate) fn eq_detached(&self, other: &Self) -> bool {
        self.shape.name == other.shape.name
            && self.shape.structure_type == other.shape.structure_type
            && self.image == other.image
            && self.payloads == other.payloads
    }

    /// Shape of the copied structure
    pub const fn shape(&self) -> &ShapeRef {
        &self.shape
    }

    /// Structure type, for chainable structures
    pub fn structure_type(&self) -> Option<vk::StructureType> {
        self.shape.structure_type
    }

    /// Byte image with owned pointers scrubbed to null
    pub const fn image(&self) -> &RawImage {
        &self.image
    }

    /// Owned `pNext` chain
    pub const fn next(&self) -> &SafeChain {
        &self.next
    }

    /// Owned `pNext` chain, mutably
    pub fn next_mut(&mut self) -> &mut SafeChain {
        &mut self.next
    }

    /// Owned fields paired with their payloads
    pub fn payloads(&self) -> impl Iterator<Item = (&'static Field, &Payload)> {
        self.shape.fields.iter().zip(&self.payloads)
    }

    /// Payload of the field called `name`
    pub fn payload(&self, name: &str) -> Option<&Payload> {
        let (index, _) = self.shape.field(name)?;
        self.payloads.get(index)
    }

    /// Owned string of a string field
    pub fn string(&self, name: &str) -> Option<&CStr> {
        match self.payload(name)? {
            Payload::String(string) => Some(string),
            _ => None,
        }
    }

    /// Owned strings of a string-array field
    pub fn strings(&self, name: &str) -> &[Option<CString>] {
        match self.payload(name) {
            Some(Payload::Strings(strings)) => strings,
            _ => &[],
        }
    }

    /// Nested structure of a record, inline or union field
    pub fn record(&self, name: &str) -> Option<&Self> {
        match self.payload(name)? {
            Payload::Record(record) | Payload::Inline(record) => Some(record),
            _ => None,
        }
    }

    /// Nested structures of a record-array field
    pub fn records(&self, name: &str) -> &[Self] {
        match self.payload(name) {
            Some(Payload::Records(records)) => records,
            _ => &[],
        }
    }

    /// Nested structures of a pointer-array field
    pub fn record_pointers(&self, name: &str) -> &[Option<Box<Self>>] {
        match self.payload(name) {
            Some(Payload::RecordPointers(records)) => records,
            _ => &[],
        }
    }

    /// Element bytes of a plain-data field
    pub fn pod_bytes(&self, name: &str) -> Option<&[u8]> {
        match self.payload(name)? {
            Payload::Pod { data, .. } => Some(data.bytes()),
            _ => None,
        }
    }
}

fn resolve_count(
    shape: &'static str,
    field: &'static Field,
    count: Count,
    image: &RawImage,
    elem_size: usize,
) -> SafeResult<usize> {
    count.resolve(image, elem_size).map_err(|size| SafeStructError::UnevenByteSize {
        shape,
        field: field.name,
        size,
        elem_size,
    })
}

/// Copy the target of one field and scrub the pointer in `image`
unsafe fn copy_field(
    shape: &'static str,
    field: &'static Field,
    image: &mut RawImage,
    ctx: CloneContext<'_>,
) -> SafeResult<Payload> {
    let src = if field.kind.is_pointer() {
        let src = image.read_ptr(field.offset);
        image.write_ptr(field.offset, ptr::null());
        src
    } else {
        ptr::null()
    };

    if let Some(guard) = field.when {
        if !guard(image) {
            return Ok(Payload::Empty);
        }
    }

    if src.is_null() && field.kind.count().is_some_and(Count::is_nullable) {
        return Ok(Payload::Empty);
    }

    let policy = ctx.config().malformed_arrays;
    let malformed = |err: MalformedArray| err.at(shape, field.name);

    // SAFETY (whole match): every pointer read below comes from the caller's
    // structure and is valid for the count stored next to it.
    match field.kind {
        FieldKind::String => Ok(unsafe { duplicate_string(src.cast()) }.map_or(Payload::Empty, Payload::String)),

        FieldKind::Strings { count } => {
            let count = resolve_count(shape, field, count, image, size_of::<*const c_char>())?;
            let strings = unsafe { duplicate_string_array(src.cast(), count, policy) }.map_err(malformed)?;
            Ok(strings.map_or(Payload::Empty, Payload::Strings))
        }

        FieldKind::Pod { elem, count } => {
            let count = resolve_count(shape, field, count, image, elem.size)?;
            let data = unsafe { duplicate_block(src, count, elem.size, elem.members, policy) }.map_err(malformed)?;
            Ok(data.map_or(Payload::Empty, |data| Payload::Pod { count, data }))
        }

        FieldKind::Record { shape: inner } => {
            if src.is_null() {
                return Ok(Payload::Empty);
            }
            let record = unsafe { SafeRecord::copy_nested(inner, src, ctx)? };
            Ok(Payload::Record(Box::new(record)))
        }

        FieldKind::Records { shape: inner, count } => {
            let count = resolve_count(shape, field, count, image, inner.size)?;
            if !should_copy(src.is_null(), count, policy).map_err(malformed)? {
                return Ok(Payload::Empty);
            }
            let mut records = Vec::with_capacity(count);
            for index in 0..count {
                let element = unsafe { src.cast::<u8>().add(index * inner.size) };
                records.push(unsafe { SafeRecord::copy_nested(inner, element.cast(), ctx)? });
            }
            Ok(Payload::Records(records))
        }

        FieldKind::RecordPointers { shape: inner, count } => {
            let count = resolve_count(shape, field, count, image, size_of::<*const c_void>())?;
            let Some(pointers) =
                unsafe { duplicate_array(src.cast::<*const c_void>(), count, policy) }.map_err(malformed)?
            else {
                return Ok(Payload::Empty);
            };
            let mut records = Vec::with_capacity(pointers.len());
            for &pointer in &*pointers {
                records.push(if pointer.is_null() {
                    None
                } else {
                    Some(Box::new(unsafe { SafeRecord::copy_nested(inner, pointer, ctx)? }))
                });
            }
            Ok(Payload::RecordPointers(records))
        }

        FieldKind::Inline { shape: inner } => unsafe { copy_inline(inner, field.offset, image, ctx) },

        FieldKind::Union { select } => match select(image) {
            Some(member) => unsafe { copy_inline(member, field.offset, image, ctx) },
            None => Ok(Payload::Empty),
        },
    }
}

/// Copy an embedded structure and write its scrubbed bytes back
unsafe fn copy_inline(
    inner: &'static Shape,
    offset: usize,
    image: &mut RawImage,
    ctx: CloneContext<'_>,
) -> SafeResult<Payload> {
    let bytes = RawImage::from_bytes(&image.bytes()[offset..offset + inner.size]);
    // SAFETY: the embedded bytes come from the caller's structure.
    let record = unsafe { SafeRecord::from_image(inner.into(), bytes, ctx, true)? };
    image.write_bytes(offset, record.image.bytes());
    Ok(Payload::Inline(Box::new(record)))
}

impl Clone for SafeRecord {
    fn clone(&self) -> Self {
        let mut copy = self.clone_detached();
        copy.next = self.next.clone();
        copy
    }
}

impl PartialEq for SafeRecord {
    fn eq(&self, other: &Self) -> bool {
        self.eq_detached(other) && self.next == other.next
    }
}

impl Eq for SafeRecord {}

impl fmt::Debug for SafeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeRecord")
            .field("shape", &self.shape.name)
            .field("payloads", &self.payloads)
            .field("next", &self.next)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CopyConfig, MalformedArrayPolicy};
    use crate::shape::registry::ShapeRegistry;
    use crate::shape::table;

    #[test]
    fn test_default_record_owns_nothing() {
        let record = SafeRecord::new(&table::DEVICE_CREATE_INFO);
        assert!(record.payloads().all(|(_, payload)| *payload == Payload::Empty));
        assert!(record.next().is_empty());
        assert_eq!(record.structure_type(), Some(vk::StructureType::DEVICE_CREATE_INFO));
    }

    #[test]
    fn test_null_source_gives_default() {
        let record =
            unsafe { SafeRecord::from_raw(&table::BUFFER_CREATE_INFO, ptr::null(), CloneContext::global()) }.unwrap();
        assert_eq!(record, SafeRecord::new(&table::BUFFER_CREATE_INFO));
    }

    #[test]
    fn test_nested_record_arrays() {
        let graphics = [1.0f32, 0.5];
        let compute = [0.25f32];
        let queues = [
            vk::DeviceQueueCreateInfo {
                queue_family_index: 0,
                queue_count: 2,
                p_queue_priorities: graphics.as_ptr(),
                ..Default::default()
            },
            vk::DeviceQueueCreateInfo {
                queue_family_index: 1,
                queue_count: 1,
                p_queue_priorities: compute.as_ptr(),
                ..Default::default()
            },
        ];
        let features = vk::PhysicalDeviceFeatures {
            sampler_anisotropy: vk::TRUE,
            ..Default::default()
        };
        let info = vk::DeviceCreateInfo {
            queue_create_info_count: 2,
            p_queue_create_infos: queues.as_ptr(),
            p_enabled_features: &features,
            ..Default::default()
        };

        let record = unsafe {
            SafeRecord::from_raw(&table::DEVICE_CREATE_INFO, ptr::addr_of!(info).cast(), CloneContext::global())
        }
        .unwrap();

        let copied = record.records("p_queue_create_infos");
        assert_eq!(copied.len(), 2);
        assert_eq!(copied[0].pod_bytes("p_queue_priorities").unwrap().len(), 8);
        assert_eq!(
            copied[1].pod_bytes("p_queue_priorities").unwrap(),
            &0.25f32.to_ne_bytes()
        );
        assert_eq!(
            record.pod_bytes("p_enabled_features").unwrap().len(),
            size_of::<vk::PhysicalDeviceFeatures>()
        );

        // Owned pointers never survive in the image
        assert!(record.image().read_ptr(std::mem::offset_of!(vk::DeviceCreateInfo, p_queue_create_infos)).is_null());
        assert!(record.image().read_ptr(std::mem::offset_of!(vk::DeviceCreateInfo, p_enabled_features)).is_null());
    }

    #[test]
    fn test_structure_type_mismatch() {
        let info = vk::BufferCreateInfo {
            s_type: vk::StructureType::IMAGE_CREATE_INFO,
            ..Default::default()
        };
        let result = unsafe {
            SafeRecord::from_raw(&table::BUFFER_CREATE_INFO, ptr::addr_of!(info).cast(), CloneContext::global())
        };
        assert!(matches!(
            result,
            Err(SafeStructError::StructureTypeMismatch {
                found: vk::StructureType::IMAGE_CREATE_INFO,
                ..
            })
        ));
    }

    #[test]
    fn test_guarded_field_is_not_read() {
        // EXCLUSIVE sharing: the queue family pointer is ignored whatever it holds
        let dangling = ptr::NonNull::<u32>::dangling().as_ptr();
        let info = vk::BufferCreateInfo {
            sharing_mode: vk::SharingMode::EXCLUSIVE,
            queue_family_index_count: 3,
            p_queue_family_indices: dangling,
            ..Default::default()
        };
        let record = unsafe {
            SafeRecord::from_raw(&table::BUFFER_CREATE_INFO, ptr::addr_of!(info).cast(), CloneContext::global())
        }
        .unwrap();
        assert_eq!(record.payload("p_queue_family_indices"), Some(&Payload::Empty));

        let families = [0u32, 2];
        let info = vk::BufferCreateInfo {
            sharing_mode: vk::SharingMode::CONCURRENT,
            queue_family_index_count: 2,
            p_queue_family_indices: families.as_ptr(),
            ..Default::default()
        };
        let record = unsafe {
            SafeRecord::from_raw(&table::BUFFER_CREATE_INFO, ptr::addr_of!(info).cast(), CloneContext::global())
        }
        .unwrap();
        assert!(matches!(record.payload("p_queue_family_indices"), Some(Payload::Pod { count: 2, .. })));
    }

    #[test]
    fn test_uneven_code_size() {
        let code = [0u32; 2];
        let info = vk::ShaderModuleCreateInfo {
            code_size: 6,
            p_code: code.as_ptr(),
            ..Default::default()
        };
        let result = unsafe {
            SafeRecord::from_raw(&table::SHADER_MODULE_CREATE_INFO, ptr::addr_of!(info).cast(), CloneContext::global())
        };
        assert!(matches!(
            result,
            Err(SafeStructError::UnevenByteSize { size: 6, elem_size: 4, .. })
        ));
    }

    #[test]
    fn test_malformed_array_policies() {
        let info = vk::SubmitInfo {
            command_buffer_count: 2,
            ..Default::default()
        };
        let raw = ptr::addr_of!(info).cast();

        let result = unsafe { SafeRecord::from_raw(&table::SUBMIT_INFO, raw, CloneContext::global()) };
        assert!(matches!(
            result,
            Err(SafeStructError::NullArray {
                field: "p_command_buffers",
                count: 2,
                ..
            })
        ));

        let registry = ShapeRegistry::global();
        let lenient = CopyConfig {
            malformed_arrays: MalformedArrayPolicy::TreatAsEmpty,
            ..CopyConfig::default()
        };
        let record =
            unsafe { SafeRecord::from_raw(&table::SUBMIT_INFO, raw, CloneContext::with_config(registry, &lenient)) }
                .unwrap();
        assert_eq!(record.payload("p_command_buffers"), Some(&Payload::Empty));
    }

    #[test]
    fn test_nullable_array_with_count() {
        // Dynamic viewport state: counts are set, arrays are not
        let info = vk::PipelineViewportStateCreateInfo {
            viewport_count: 1,
            scissor_count: 1,
            ..Default::default()
        };
        let record = unsafe {
            SafeRecord::from_raw(
                &table::PIPELINE_VIEWPORT_STATE_CREATE_INFO,
                ptr::addr_of!(info).cast(),
                CloneContext::global(),
            )
        }
        .unwrap();
        assert_eq!(record.payload("p_viewports"), Some(&Payload::Empty));
        assert_eq!(record.payload("p_scissors"), Some(&Payload::Empty));
    }

    #[test]
    fn test_initialize_keeps_contents_on_error() {
        let name = c"kept";
        let label = vk::DebugUtilsLabelEXT {
            p_label_name: name.as_ptr(),
            ..Default::default()
        };
        let mut record = unsafe {
            SafeRecord::from_raw(&table::DEBUG_UTILS_LABEL_EXT, ptr::addr_of!(label).cast(), CloneContext::global())
        }
        .unwrap();

        let wrong = vk::BufferCreateInfo::default();
        let result = unsafe { record.initialize(ptr::addr_of!(wrong).cast(), CloneContext::global()) };
        assert!(result.is_err());
        assert_eq!(record.string("p_label_name"), Some(name));

        unsafe { record.initialize(ptr::null(), CloneContext::global()) }.unwrap();
        assert_eq!(record.string("p_label_name"), None);
    }

    #[test]
    fn test_copy_is_independent_of_source() {
        let mut name = *b"frame graph\0";
        let label = vk::DebugUtilsLabelEXT {
            p_label_name: name.as_ptr().cast(),
            color: [1.0, 0.0, 0.0, 1.0],
            ..Default::default()
        };
        let record = unsafe {
            SafeRecord::from_raw(&table::DEBUG_UTILS_LABEL_EXT, ptr::addr_of!(label).cast(), CloneContext::global())
        }
        .unwrap();

        name[0] = b'X';
        assert_eq!(record.string("p_label_name").unwrap().to_bytes(), b"frame graph");
        assert_ne!(record.string("p_label_name").unwrap().as_ptr(), name.as_ptr().cast());
    }
}
