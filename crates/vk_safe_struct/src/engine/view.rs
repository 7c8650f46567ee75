//! Transient raw views
//!
//! A view is a freshly assembled raw structure whose pointers refer either to
//! payloads owned by the safe copy or to scratch memory (pointer tables,
//! nested structure images) owned by the view's [`ViewArena`]. The view
//! borrows the copy it was made from, so neither can go away while the raw
//! pointers are in use.

use std::ffi::c_void;
use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of;
use std::ops::Deref;
use std::ptr;

use crate::engine::chain::SafeChain;
use crate::engine::record::{Payload, SafeRecord};
use crate::error::{SafeResult, SafeStructError};
use crate::ffi::RawImage;
use crate::shape::NEXT_OFFSET;

/// Scratch allocations backing one view
#[derive(Default)]
pub struct ViewArena {
    images: Vec<RawImage>,
    tables: Vec<Box<[*const c_void]>>,
}

impl ViewArena {
    /// Empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `image` alive for the view and return its address
    pub fn keep_image(&mut self, image: RawImage) -> *const c_void {
        let address = image.as_ptr();
        self.images.push(image);
        address
    }

    /// Keep a pointer table alive for the view and return its address
    pub fn keep_table(&mut self, table: Box<[*const c_void]>) -> *const c_void {
        let address = table.as_ptr().cast();
        self.tables.push(table);
        address
    }

    /// Number of scratch allocations held
    pub fn allocation_count(&self) -> usize {
        self.images.len() + self.tables.len()
    }
}

impl fmt::Debug for ViewArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewArena")
            .field("images", &self.images.len())
            .field("tables", &self.tables.len())
            .finish()
    }
}

impl SafeRecord {
    /// Raw image of this node with owned pointers filled in, `p_next` left null
    pub(crate) fn materialize_node(&self, arena: &mut ViewArena) -> RawImage {
        let mut image = self.image().clone();

        for (field, payload) in self.payloads() {
            match payload {
                Payload::Empty => {}
                Payload::Pod { data, .. } => image.write_ptr(field.offset, data.as_ptr()),
                Payload::String(string) => image.write_ptr(field.offset, string.as_ptr().cast()),
                Payload::Strings(strings) => {
                    let table = strings
                        .iter()
                        .map(|string| string.as_ref().map_or(ptr::null(), |string| string.as_ptr().cast()))
                        .collect();
                    image.write_ptr(field.offset, arena.keep_table(table));
                }
                Payload::Record(record) => {
                    let nested = record.materialize(arena);
                    image.write_ptr(field.offset, arena.keep_image(nested));
                }
                Payload::Records(records) => {
                    let stride = records.first().map_or(0, |record| record.shape().size);
                    let mut block = RawImage::zeroed(stride * records.len());
                    for (index, record) in records.iter().enumerate() {
                        block.write_bytes(index * stride, record.materialize(arena).bytes());
                    }
                    image.write_ptr(field.offset, arena.keep_image(block));
                }
                Payload::RecordPointers(entries) => {
                    let table = entries
                        .iter()
                        .map(|entry| match entry {
                            Some(record) => {
                                let nested = record.materialize(arena);
                                arena.keep_image(nested)
                            }
                            None => ptr::null(),
                        })
                        .collect();
                    image.write_ptr(field.offset, arena.keep_table(table));
                }
                Payload::Inline(record) => {
                    image.write_bytes(field.offset, record.materialize(arena).bytes());
                }
            }
        }

        image
    }

    /// Raw image of this record including its `pNext` chain
    pub(crate) fn materialize(&self, arena: &mut ViewArena) -> RawImage {
        let mut image = self.materialize_node(arena);
        if self.shape().is_chained() {
            image.write_ptr(NEXT_OFFSET, self.next().materialize(arena));
        }
        image
    }

    /// Type-erased view: a pointer to the materialised structure
    pub fn raw_view(&self) -> ChainView<'_> {
        let mut arena = ViewArena::new();
        let image = self.materialize(&mut arena);
        let head = arena.keep_image(image);
        ChainView {
            head,
            arena,
            _source: PhantomData,
        }
    }

    /// Typed view; fails when the shape does not describe `T`
    pub fn view_as<T: Copy>(&self) -> SafeResult<RawView<'_, T>> {
        if !self.shape().describes::<T>() {
            return Err(SafeStructError::LayoutMismatch {
                shape: self.shape().name,
                expected: self.shape().size,
                found: size_of::<T>(),
            });
        }
        Ok(self.view_unchecked())
    }

    /// Typed view for callers that already know the shape describes `T`
    pub(crate) fn view_unchecked<T: Copy>(&self) -> RawView<'_, T> {
        debug_assert!(self.shape().describes::<T>(), "{} viewed as a foreign type", self.shape().name);
        let mut arena = ViewArena::new();
        let image = self.materialize(&mut arena);
        // SAFETY: the image is a byte copy of a `T` whose pointers were replaced
        // by addresses of live owned memory; every member of an ash structure
        // accepts any bit pattern.
        let raw = Box::new(unsafe { image.read_as::<T>() });
        RawView {
            raw,
            arena,
            _source: PhantomData,
        }
    }
}

impl SafeChain {
    /// Link materialised nodes back to front; returns the head address
    pub(crate) fn materialize(&self, arena: &mut ViewArena) -> *const c_void {
        let nodes: Vec<&SafeRecord> = self.iter().collect();
        let mut next = ptr::null();
        for node in nodes.into_iter().rev() {
            let mut image = node.materialize_node(arena);
            image.write_ptr(NEXT_OFFSET, next);
            next = arena.keep_image(image);
        }
        next
    }

    /// Raw chain view; the head is null for an empty chain
    pub fn view(&self) -> ChainView<'_> {
        let mut arena = ViewArena::new();
        let head = self.materialize(&mut arena);
        ChainView {
            head,
            arena,
            _source: PhantomData,
        }
    }
}

/// Materialised raw structure of type `T`
pub struct RawView<'a, T> {
    raw: Box<T>,
    arena: ViewArena,
    _source: PhantomData<&'a SafeRecord>,
}

impl<T> RawView<'_, T> {
    /// Pointer to hand to the Vulkan API
    pub fn as_ptr(&self) -> *const T {
        ptr::addr_of!(*self.raw)
    }

    /// Scratch allocations backing the view
    pub const fn arena(&self) -> &ViewArena {
        &self.arena
    }
}

impl<T> Deref for RawView<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.raw
    }
}

impl<T: fmt::Debug> fmt::Debug for RawView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawView")
            .field("raw", &self.raw)
            .field("arena", &self.arena)
            .finish()
    }
}

/// Materialised raw structure or chain, type erased
pub struct ChainView<'a> {
    head: *const c_void,
    arena: ViewArena,
    _source: PhantomData<&'a SafeChain>,
}

impl ChainView<'_> {
    /// Address of the first structure, null for an empty chain
    pub const fn as_ptr(&self) -> *const c_void {
        self.head
    }

    /// Whether the view is empty
    pub fn is_null(&self) -> bool {
        self.head.is_null()
    }

    /// Scratch allocations backing the view
    pub const fn arena(&self) -> &ViewArena {
        &self.arena
    }
}

impl fmt::Debug for ChainView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainView")
            .field("head", &self.head)
            .field("arena", &self.arena)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CloneContext;
    use crate::shape::table;
    use ash::vk;
    use std::ffi::CStr;

    #[test]
    fn test_default_view_has_null_pointers() {
        let record = SafeRecord::new(&table::INSTANCE_CREATE_INFO);
        let view = record.view_as::<vk::InstanceCreateInfo>().unwrap();

        assert_eq!(view.s_type, vk::StructureType::INSTANCE_CREATE_INFO);
        assert!(view.p_next.is_null());
        assert!(view.p_application_info.is_null());
        assert!(view.pp_enabled_extension_names.is_null());
        assert_eq!(view.arena().allocation_count(), 0);
    }

    #[test]
    fn test_layout_mismatch() {
        let record = SafeRecord::new(&table::FENCE_CREATE_INFO);
        let result = record.view_as::<vk::InstanceCreateInfo>();
        assert!(matches!(result, Err(SafeStructError::LayoutMismatch { .. })));
    }

    #[test]
    fn test_subpass_records_are_contiguous() {
        let colors = [
            vk::AttachmentReference {
                attachment: 0,
                layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            },
            vk::AttachmentReference {
                attachment: 1,
                layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            },
        ];
        let depth = vk::AttachmentReference {
            attachment: 2,
            layout: vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
        };
        let subpasses = [
            vk::SubpassDescription {
                color_attachment_count: 2,
                p_color_attachments: colors.as_ptr(),
                p_depth_stencil_attachment: &depth,
                ..Default::default()
            },
            vk::SubpassDescription {
                color_attachment_count: 1,
                p_color_attachments: colors[1..].as_ptr(),
                ..Default::default()
            },
        ];
        let info = vk::RenderPassCreateInfo {
            subpass_count: 2,
            p_subpasses: subpasses.as_ptr(),
            ..Default::default()
        };

        let record = unsafe {
            SafeRecord::from_raw(&table::RENDER_PASS_CREATE_INFO, ptr::addr_of!(info).cast(), CloneContext::global())
        }
        .unwrap();
        let view = record.view_as::<vk::RenderPassCreateInfo>().unwrap();

        assert_eq!(view.subpass_count, 2);
        assert_ne!(view.p_subpasses, subpasses.as_ptr());
        let copied = unsafe { std::slice::from_raw_parts(view.p_subpasses, 2) };
        assert_eq!(copied[0].color_attachment_count, 2);
        assert_eq!(copied[1].color_attachment_count, 1);

        let first_colors = unsafe { std::slice::from_raw_parts(copied[0].p_color_attachments, 2) };
        assert_eq!(first_colors[1].attachment, 1);
        assert_eq!(unsafe { (*copied[0].p_depth_stencil_attachment).attachment }, 2);
        assert!(copied[1].p_depth_stencil_attachment.is_null());
        assert_eq!(unsafe { (*copied[1].p_color_attachments).attachment }, 1);
    }

    #[test]
    fn test_chain_view_links_in_order() {
        let chain = SafeChain::from_nodes([
            SafeRecord::new(&table::PHYSICAL_DEVICE_VULKAN_1_1_FEATURES),
            SafeRecord::new(&table::PHYSICAL_DEVICE_VULKAN_1_2_FEATURES),
        ]);
        let view = chain.view();
        assert_eq!(view.arena().allocation_count(), 2);

        let first = unsafe { &*view.as_ptr().cast::<vk::BaseInStructure>() };
        assert_eq!(first.s_type, vk::StructureType::PHYSICAL_DEVICE_VULKAN_1_1_FEATURES);
        let second = unsafe { &*first.p_next };
        assert_eq!(second.s_type, vk::StructureType::PHYSICAL_DEVICE_VULKAN_1_2_FEATURES);
        assert!(second.p_next.is_null());

        assert!(SafeChain::new().view().is_null());
    }

    #[test]
    fn test_strings_table() {
        let layer = c"VK_LAYER_KHRONOS_validation";
        let layers = [layer.as_ptr()];
        let info = vk::InstanceCreateInfo {
            enabled_layer_count: 1,
            pp_enabled_layer_names: layers.as_ptr(),
            ..Default::default()
        };
        let record = unsafe {
            SafeRecord::from_raw(&table::INSTANCE_CREATE_INFO, ptr::addr_of!(info).cast(), CloneContext::global())
        }
        .unwrap();

        let view = record.view_as::<vk::InstanceCreateInfo>().unwrap();
        let name = unsafe { CStr::from_ptr(*view.pp_enabled_layer_names) };
        assert_eq!(name, layer);
        assert_ne!(view.pp_enabled_layer_names, layers.as_ptr());
        assert_eq!(view.arena().allocation_count(), 1);
    }
}
