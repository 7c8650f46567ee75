//! `pNext` chain dispatch
//!
//! Cloning walks the raw chain front to back, looks every node's `s_type` up
//! in the registry and copies the node through its shape. Releasing walks the
//! owned chain in the same order and detaches each successor before the node
//! itself is dropped. Both walks are loops, so chain length never turns into
//! stack depth.

use std::ffi::c_void;
use std::fmt;

use ash::vk;

use crate::config::UnknownStructurePolicy;
use crate::engine::record::SafeRecord;
use crate::engine::CloneContext;
use crate::error::{SafeResult, SafeStructError};

/// Owned `pNext` chain
#[derive(Default)]
pub struct SafeChain {
    head: Option<Box<SafeRecord>>,
}

impl SafeChain {
    /// Empty chain
    pub const fn new() -> Self {
        Self { head: None }
    }

    /// Clone the raw chain starting at `head`
    ///
    /// # Safety
    /// `head` must be null or the first node of a valid `pNext` chain whose
    /// nodes, and everything they point to, are valid for reads.
    pub unsafe fn from_raw(head: *const c_void, ctx: CloneContext<'_>) -> SafeResult<Self> {
        let limit = ctx.config().chain_limit();
        let mut chain = Self::new();
        let mut tail = &mut chain.head;
        let mut cursor = head;
        let mut visited = 0;

        while !cursor.is_null() {
            if visited == limit {
                return Err(SafeStructError::ChainTooLong { limit });
            }
            visited += 1;

            // SAFETY: every chain node starts with the sType/pNext header.
            let header = unsafe { &*cursor.cast::<vk::BaseInStructure>() };
            let next = header.p_next.cast::<c_void>();

            match ctx.registry().lookup(header.s_type) {
                Some(shape) => {
                    // SAFETY: the node is a structure of `shape` per the caller contract.
                    let node = unsafe { SafeRecord::copy_node(shape.clone(), cursor, ctx)? };
                    tail = &mut tail.insert(Box::new(node)).next_mut().head;
                }
                None => match ctx.config().unknown_structures {
                    UnknownStructurePolicy::Skip => {
                        log::warn!("Skipping unknown structure type {:?} in pNext chain", header.s_type);
                    }
                    UnknownStructurePolicy::Fail => {
                        return Err(SafeStructError::UnknownStructureType(header.s_type));
                    }
                },
            }

            cursor = next;
        }

        log::trace!("Cloned pNext chain: {} of {} nodes kept", chain.len(), visited);
        Ok(chain)
    }

    /// Chain holding `nodes` in order
    ///
    /// A node's own chain is kept and the following nodes are appended after it.
    pub fn from_nodes(nodes: impl IntoIterator<Item = SafeRecord>) -> Self {
        let mut chain = Self::new();
        let mut tail = &mut chain.head;
        for node in nodes {
            *tail = Some(Box::new(node));
            while let Some(current) = tail {
                tail = &mut current.next_mut().head;
            }
        }
        chain
    }

    /// First node
    pub fn head(&self) -> Option<&SafeRecord> {
        self.head.as_deref()
    }

    /// Nodes in chain order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            cursor: self.head.as_deref(),
        }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether the chain has no nodes
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Structure types in chain order
    pub fn structure_types(&self) -> Vec<vk::StructureType> {
        self.iter().filter_map(SafeRecord::structure_type).collect()
    }

    /// First node of the given structure type
    pub fn find(&self, structure_type: vk::StructureType) -> Option<&SafeRecord> {
        self.iter().find(|node| node.structure_type() == Some(structure_type))
    }

    /// Append `node` (and any chain it already carries) at the end
    pub fn push_back(&mut self, node: SafeRecord) {
        let mut tail = &mut self.head;
        while let Some(current) = tail {
            tail = &mut current.next_mut().head;
        }
        *tail = Some(Box::new(node));
    }

    /// Unlink and return the first node of the given structure type
    ///
    /// The removed node comes back without its successors.
    pub fn remove(&mut self, structure_type: vk::StructureType) -> Option<SafeRecord> {
        let mut link = &mut self.head;
        while link
            .as_ref()
            .is_some_and(|node| node.structure_type() != Some(structure_type))
        {
            link = &mut link.as_mut()?.next_mut().head;
        }
        let mut removed = link.take()?;
        *link = removed.next_mut().head.take();
        Some(*removed)
    }

    /// Drop every node in order and return how many were released
    pub fn release(&mut self) -> usize {
        let mut released = 0;
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next_mut().head.take();
            log::trace!("Releasing {}", node.shape().name);
            drop(node);
            released += 1;
        }
        released
    }
}

/// Clone the raw `pNext` chain starting at `head`
///
/// # Safety
/// Same contract as [`SafeChain::from_raw`].
pub unsafe fn safe_pnext_copy(head: *const c_void, ctx: CloneContext<'_>) -> SafeResult<SafeChain> {
    // SAFETY: forwarded caller contract.
    unsafe { SafeChain::from_raw(head, ctx) }
}

/// Release an owned chain, leaving it empty; returns the number of nodes freed
pub fn free_pnext_chain(chain: &mut SafeChain) -> usize {
    chain.release()
}

impl Drop for SafeChain {
    fn drop(&mut self) {
        self.release();
    }
}

impl Clone for SafeChain {
    fn clone(&self) -> Self {
        let mut chain = Self::new();
        let mut tail = &mut chain.head;
        for node in self {
            tail = &mut tail.insert(Box::new(node.clone_detached())).next_mut().head;
        }
        chain
    }
}

impl PartialEq for SafeChain {
    fn eq(&self, other: &Self) -> bool {
        let mut left = self.iter();
        let mut right = other.iter();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a.eq_detached(b) => {}
                _ => return false,
            }
        }
    }
}

impl Eq for SafeChain {}

impl fmt::Debug for SafeChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|node| node.shape().name))
            .finish()
    }
}

/// Iterator over the nodes of a [`SafeChain`]
pub struct Iter<'a> {
    cursor: Option<&'a SafeRecord>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a SafeRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cursor?;
        self.cursor = node.next().head();
        Some(node)
    }
}

impl<'a> IntoIterator for &'a SafeChain {
    type Item = &'a SafeRecord;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;
    use crate::config::CopyConfig;
    use crate::shape::registry::ShapeRegistry;

    fn header(structure_type: vk::StructureType) -> vk::BaseOutStructure {
        vk::BaseOutStructure {
            s_type: structure_type,
            p_next: ptr::null_mut(),
        }
    }

    #[test]
    fn test_null_head_gives_empty_chain() {
        let chain = unsafe { safe_pnext_copy(ptr::null(), CloneContext::global()) }.unwrap();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
    }

    #[test]
    fn test_order_and_length_preserved() {
        let mut vulkan12 = vk::PhysicalDeviceVulkan12Features {
            timeline_semaphore: vk::TRUE,
            ..Default::default()
        };
        let mut vulkan11 = vk::PhysicalDeviceVulkan11Features::default();
        let mut vulkan13 = vk::PhysicalDeviceVulkan13Features {
            dynamic_rendering: vk::TRUE,
            ..Default::default()
        };
        vulkan12.p_next = ptr::addr_of_mut!(vulkan11).cast();
        vulkan11.p_next = ptr::addr_of_mut!(vulkan13).cast();

        let mut chain =
            unsafe { safe_pnext_copy(ptr::addr_of!(vulkan12).cast(), CloneContext::global()) }.unwrap();

        assert_eq!(
            chain.structure_types(),
            vec![
                vk::StructureType::PHYSICAL_DEVICE_VULKAN_1_2_FEATURES,
                vk::StructureType::PHYSICAL_DEVICE_VULKAN_1_1_FEATURES,
                vk::StructureType::PHYSICAL_DEVICE_VULKAN_1_3_FEATURES,
            ]
        );
        assert_eq!(free_pnext_chain(&mut chain), 3);
        assert!(chain.is_empty());
        assert_eq!(free_pnext_chain(&mut chain), 0);
    }

    #[test]
    fn test_unknown_structure_skipped() {
        let mut flags = vk::MemoryAllocateFlagsInfo::default();
        let mut unknown = header(vk::StructureType::from_raw(1_000_999_123));
        unknown.p_next = ptr::addr_of_mut!(flags).cast();
        let semaphore = vk::SemaphoreTypeCreateInfo {
            p_next: ptr::addr_of!(unknown).cast(),
            ..Default::default()
        };

        let chain = unsafe { safe_pnext_copy(ptr::addr_of!(semaphore).cast(), CloneContext::global()) }.unwrap();
        assert_eq!(
            chain.structure_types(),
            vec![
                vk::StructureType::SEMAPHORE_TYPE_CREATE_INFO,
                vk::StructureType::MEMORY_ALLOCATE_FLAGS_INFO,
            ]
        );
    }

    #[test]
    fn test_unknown_structure_fails() {
        let unknown = header(vk::StructureType::from_raw(1_000_999_123));
        let fence = vk::FenceCreateInfo {
            p_next: ptr::addr_of!(unknown).cast(),
            ..Default::default()
        };

        let registry = ShapeRegistry::global();
        let strict = CopyConfig {
            unknown_structures: UnknownStructurePolicy::Fail,
            ..CopyConfig::default()
        };
        let result =
            unsafe { safe_pnext_copy(ptr::addr_of!(fence).cast(), CloneContext::with_config(registry, &strict)) };
        assert!(matches!(result, Err(SafeStructError::UnknownStructureType(ty)) if ty.as_raw() == 1_000_999_123));
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut a = vk::FenceCreateInfo::default();
        let mut b = vk::SemaphoreCreateInfo::default();
        a.p_next = ptr::addr_of!(b).cast();
        b.p_next = ptr::addr_of!(a).cast();

        let result = unsafe { safe_pnext_copy(ptr::addr_of!(a).cast(), CloneContext::global()) };
        assert!(matches!(result, Err(SafeStructError::ChainTooLong { limit: 256 })));
    }

    #[test]
    fn test_push_find_remove() {
        let mut chain = SafeChain::from_nodes([
            SafeRecord::new(&crate::shape::table::FENCE_CREATE_INFO),
            SafeRecord::new(&crate::shape::table::SEMAPHORE_TYPE_CREATE_INFO),
        ]);
        chain.push_back(SafeRecord::new(&crate::shape::table::MEMORY_ALLOCATE_FLAGS_INFO));
        assert_eq!(chain.len(), 3);
        assert!(chain.find(vk::StructureType::SEMAPHORE_TYPE_CREATE_INFO).is_some());

        let removed = chain.remove(vk::StructureType::SEMAPHORE_TYPE_CREATE_INFO).unwrap();
        assert!(removed.next().is_empty());
        assert_eq!(
            chain.structure_types(),
            vec![vk::StructureType::FENCE_CREATE_INFO, vk::StructureType::MEMORY_ALLOCATE_FLAGS_INFO]
        );
        assert!(chain.remove(vk::StructureType::SUBMIT_INFO).is_none());
    }

    #[test]
    fn test_long_chain_drop_does_not_recurse() {
        let chain = SafeChain::from_nodes(
            (0..100_000).map(|_| SafeRecord::new(&crate::shape::table::FENCE_CREATE_INFO)),
        );
        let copy = chain.clone();
        assert_eq!(copy, chain);
        drop(chain);
        drop(copy);
    }
}
