//! Typed safe variants
//!
//! Each `Safe*` type is a thin wrapper around a [`SafeRecord`] of one fixed
//! shape. All behaviour comes from [`SafeStruct`]; the wrappers only pin the
//! raw type so that [`SafeStruct::view`] can hand back a typed structure.

use std::fmt;
use std::ptr;

use ash::vk;

use crate::engine::chain::SafeChain;
use crate::engine::record::SafeRecord;
use crate::engine::view::RawView;
use crate::engine::CloneContext;
use crate::error::{SafeResult, SafeStructError};
use crate::shape::{table, Shape};

/// Owning deep copy of one raw Vulkan structure type
pub trait SafeStruct: Clone + Default + Sized {
    /// The `ash::vk` structure this variant copies
    type Raw: Copy;

    /// Descriptor of `Self::Raw`
    fn shape() -> &'static Shape;

    /// Underlying type-erased copy
    fn as_record(&self) -> &SafeRecord;

    /// Underlying type-erased copy, mutably
    ///
    /// Prefer [`SafeStruct::extensions_mut`] and the `initialize` family.
    ///
    /// # Safety
    /// The record must keep the shape returned by [`SafeStruct::shape`]: it
    /// must not be replaced by, or initialised from, a record of another
    /// shape. [`SafeStruct::view`] relies on it.
    unsafe fn as_record_mut(&mut self) -> &mut SafeRecord;

    /// Give up the typed wrapper
    fn into_record(self) -> SafeRecord;

    /// Wrap a record without checking its shape
    ///
    /// Use [`SafeStruct::from_record`] or `TryFrom` unless the shape is known.
    ///
    /// # Safety
    /// `record` must have the shape returned by [`SafeStruct::shape`].
    unsafe fn from_record_unchecked(record: SafeRecord) -> Self;

    /// Wrap a record, checking that it has this variant's shape
    fn from_record(record: SafeRecord) -> SafeResult<Self> {
        let shape = Self::shape();
        if ptr::eq(&**record.shape(), shape) {
            // SAFETY: the shape was just compared.
            return Ok(unsafe { Self::from_record_unchecked(record) });
        }
        Err(match (shape.structure_type, record.structure_type()) {
            (Some(expected), Some(found)) => SafeStructError::StructureTypeMismatch {
                shape: shape.name,
                expected,
                found,
            },
            _ => SafeStructError::LayoutMismatch {
                shape: shape.name,
                expected: shape.size,
                found: record.shape().size,
            },
        })
    }

    /// Deep-copy `raw` using the process-wide registry
    ///
    /// # Safety
    /// `raw` must be null or point to a valid `Self::Raw` whose pointers,
    /// `pNext` chain included, are valid for the reads their counts imply.
    unsafe fn from_raw(raw: *const Self::Raw) -> SafeResult<Self> {
        // SAFETY: forwarded caller contract.
        unsafe { Self::from_raw_in(raw, CloneContext::global()) }
    }

    /// Deep-copy `raw` with an explicit registry and policies
    ///
    /// # Safety
    /// Same contract as [`SafeStruct::from_raw`].
    unsafe fn from_raw_in(raw: *const Self::Raw, ctx: CloneContext<'_>) -> SafeResult<Self> {
        // SAFETY: forwarded caller contract.
        let record = unsafe { SafeRecord::from_raw(Self::shape(), raw.cast(), ctx)? };
        // SAFETY: the record was copied with this variant's shape.
        Ok(unsafe { Self::from_record_unchecked(record) })
    }

    /// Release the current contents and deep-copy `raw`
    ///
    /// # Safety
    /// Same contract as [`SafeStruct::from_raw`].
    unsafe fn initialize(&mut self, raw: *const Self::Raw) -> SafeResult<()> {
        // SAFETY: forwarded caller contract.
        unsafe { self.initialize_in(raw, CloneContext::global()) }
    }

    /// Release the current contents and deep-copy `raw` with an explicit context
    ///
    /// # Safety
    /// Same contract as [`SafeStruct::from_raw`].
    unsafe fn initialize_in(&mut self, raw: *const Self::Raw, ctx: CloneContext<'_>) -> SafeResult<()> {
        // SAFETY: forwarded caller contract; `initialize` keeps the record's shape.
        unsafe { self.as_record_mut().initialize(raw.cast(), ctx) }
    }

    /// Release the current contents and deep-copy `source`
    fn initialize_from(&mut self, source: &Self) {
        self.clone_from(source);
    }

    /// Materialise a raw structure for the Vulkan API
    fn view(&self) -> RawView<'_, Self::Raw> {
        self.as_record().view_unchecked()
    }

    /// Owned `pNext` chain
    fn extensions(&self) -> &SafeChain {
        self.as_record().next()
    }

    /// Owned `pNext` chain, mutably
    fn extensions_mut(&mut self) -> &mut SafeChain {
        // SAFETY: only the chain is handed out; the shape stays.
        unsafe { self.as_record_mut() }.next_mut()
    }
}

macro_rules! safe_structs {
    ($( $name:ident => $raw:ident, $shape:ident; )*) => {
        $(
            #[doc = concat!("Owning deep copy of `vk::", stringify!($raw), "`")]
            #[derive(Clone, PartialEq, Eq)]
            pub struct $name(SafeRecord);

            impl SafeStruct for $name {
                type Raw = vk::$raw;

                fn shape() -> &'static Shape {
                    &table::$shape
                }

                fn as_record(&self) -> &SafeRecord {
                    &self.0
                }

                unsafe fn as_record_mut(&mut self) -> &mut SafeRecord {
                    &mut self.0
                }

                fn into_record(self) -> SafeRecord {
                    self.0
                }

                unsafe fn from_record_unchecked(record: SafeRecord) -> Self {
                    Self(record)
                }
            }

            impl Default for $name {
                fn default() -> Self {
                    Self(SafeRecord::new(&table::$shape))
                }
            }

            impl fmt::Debug for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_tuple(stringify!($name)).field(&self.0).finish()
                }
            }

            impl From<$name> for SafeRecord {
                fn from(variant: $name) -> Self {
                    variant.0
                }
            }

            impl TryFrom<SafeRecord> for $name {
                type Error = SafeStructError;

                fn try_from(record: SafeRecord) -> SafeResult<Self> {
                    Self::from_record(record)
                }
            }
        )*

        /// Name and layout check of every typed variant
        #[cfg(test)]
        pub(crate) fn layouts() -> Vec<(&'static str, &'static Shape, bool)> {
            vec![$(
                (
                    stringify!($name),
                    <$name as SafeStruct>::shape(),
                    <$name as SafeStruct>::shape().describes::<vk::$raw>(),
                )
            ),*]
        }
    };
}

safe_structs! {
    SafeApplicationInfo => ApplicationInfo, APPLICATION_INFO;
    SafeInstanceCreateInfo => InstanceCreateInfo, INSTANCE_CREATE_INFO;
    SafeDeviceQueueCreateInfo => DeviceQueueCreateInfo, DEVICE_QUEUE_CREATE_INFO;
    SafeDeviceCreateInfo => DeviceCreateInfo, DEVICE_CREATE_INFO;
    SafeDeviceGroupDeviceCreateInfo => DeviceGroupDeviceCreateInfo, DEVICE_GROUP_DEVICE_CREATE_INFO;
    SafePhysicalDeviceFeatures2 => PhysicalDeviceFeatures2, PHYSICAL_DEVICE_FEATURES_2;
    SafePhysicalDeviceVulkan11Features => PhysicalDeviceVulkan11Features, PHYSICAL_DEVICE_VULKAN_1_1_FEATURES;
    SafePhysicalDeviceVulkan12Features => PhysicalDeviceVulkan12Features, PHYSICAL_DEVICE_VULKAN_1_2_FEATURES;
    SafePhysicalDeviceVulkan13Features => PhysicalDeviceVulkan13Features, PHYSICAL_DEVICE_VULKAN_1_3_FEATURES;
    SafeValidationFeaturesEXT => ValidationFeaturesEXT, VALIDATION_FEATURES_EXT;
    SafeDebugUtilsMessengerCreateInfoEXT => DebugUtilsMessengerCreateInfoEXT, DEBUG_UTILS_MESSENGER_CREATE_INFO_EXT;
    SafeDebugUtilsLabelEXT => DebugUtilsLabelEXT, DEBUG_UTILS_LABEL_EXT;
    SafeDebugUtilsObjectNameInfoEXT => DebugUtilsObjectNameInfoEXT, DEBUG_UTILS_OBJECT_NAME_INFO_EXT;
    SafeBufferCreateInfo => BufferCreateInfo, BUFFER_CREATE_INFO;
    SafeImageCreateInfo => ImageCreateInfo, IMAGE_CREATE_INFO;
    SafeImageFormatListCreateInfo => ImageFormatListCreateInfo, IMAGE_FORMAT_LIST_CREATE_INFO;
    SafeMemoryAllocateInfo => MemoryAllocateInfo, MEMORY_ALLOCATE_INFO;
    SafeMemoryDedicatedAllocateInfo => MemoryDedicatedAllocateInfo, MEMORY_DEDICATED_ALLOCATE_INFO;
    SafeMemoryAllocateFlagsInfo => MemoryAllocateFlagsInfo, MEMORY_ALLOCATE_FLAGS_INFO;
    SafeSamplerCreateInfo => SamplerCreateInfo, SAMPLER_CREATE_INFO;
    SafeSemaphoreCreateInfo => SemaphoreCreateInfo, SEMAPHORE_CREATE_INFO;
    SafeSemaphoreTypeCreateInfo => SemaphoreTypeCreateInfo, SEMAPHORE_TYPE_CREATE_INFO;
    SafeFenceCreateInfo => FenceCreateInfo, FENCE_CREATE_INFO;
    SafePipelineCacheCreateInfo => PipelineCacheCreateInfo, PIPELINE_CACHE_CREATE_INFO;
    SafeShaderModuleCreateInfo => ShaderModuleCreateInfo, SHADER_MODULE_CREATE_INFO;
    SafeSpecializationInfo => SpecializationInfo, SPECIALIZATION_INFO;
    SafePipelineShaderStageCreateInfo => PipelineShaderStageCreateInfo, PIPELINE_SHADER_STAGE_CREATE_INFO;
    SafePipelineShaderStageRequiredSubgroupSizeCreateInfo => PipelineShaderStageRequiredSubgroupSizeCreateInfo, PIPELINE_SHADER_STAGE_REQUIRED_SUBGROUP_SIZE_CREATE_INFO;
    SafePipelineVertexInputStateCreateInfo => PipelineVertexInputStateCreateInfo, PIPELINE_VERTEX_INPUT_STATE_CREATE_INFO;
    SafePipelineInputAssemblyStateCreateInfo => PipelineInputAssemblyStateCreateInfo, PIPELINE_INPUT_ASSEMBLY_STATE_CREATE_INFO;
    SafePipelineTessellationStateCreateInfo => PipelineTessellationStateCreateInfo, PIPELINE_TESSELLATION_STATE_CREATE_INFO;
    SafePipelineViewportStateCreateInfo => PipelineViewportStateCreateInfo, PIPELINE_VIEWPORT_STATE_CREATE_INFO;
    SafePipelineRasterizationStateCreateInfo => PipelineRasterizationStateCreateInfo, PIPELINE_RASTERIZATION_STATE_CREATE_INFO;
    SafePipelineMultisampleStateCreateInfo => PipelineMultisampleStateCreateInfo, PIPELINE_MULTISAMPLE_STATE_CREATE_INFO;
    SafePipelineDepthStencilStateCreateInfo => PipelineDepthStencilStateCreateInfo, PIPELINE_DEPTH_STENCIL_STATE_CREATE_INFO;
    SafePipelineColorBlendStateCreateInfo => PipelineColorBlendStateCreateInfo, PIPELINE_COLOR_BLEND_STATE_CREATE_INFO;
    SafePipelineDynamicStateCreateInfo => PipelineDynamicStateCreateInfo, PIPELINE_DYNAMIC_STATE_CREATE_INFO;
    SafePipelineRenderingCreateInfo => PipelineRenderingCreateInfo, PIPELINE_RENDERING_CREATE_INFO;
    SafeGraphicsPipelineCreateInfo => GraphicsPipelineCreateInfo, GRAPHICS_PIPELINE_CREATE_INFO;
    SafeComputePipelineCreateInfo => ComputePipelineCreateInfo, COMPUTE_PIPELINE_CREATE_INFO;
    SafePipelineLayoutCreateInfo => PipelineLayoutCreateInfo, PIPELINE_LAYOUT_CREATE_INFO;
    SafeDescriptorSetLayoutBinding => DescriptorSetLayoutBinding, DESCRIPTOR_SET_LAYOUT_BINDING;
    SafeDescriptorSetLayoutCreateInfo => DescriptorSetLayoutCreateInfo, DESCRIPTOR_SET_LAYOUT_CREATE_INFO;
    SafeDescriptorSetLayoutBindingFlagsCreateInfo => DescriptorSetLayoutBindingFlagsCreateInfo, DESCRIPTOR_SET_LAYOUT_BINDING_FLAGS_CREATE_INFO;
    SafeWriteDescriptorSet => WriteDescriptorSet, WRITE_DESCRIPTOR_SET;
    SafeDescriptorPoolCreateInfo => DescriptorPoolCreateInfo, DESCRIPTOR_POOL_CREATE_INFO;
    SafeSubpassDescription => SubpassDescription, SUBPASS_DESCRIPTION;
    SafeRenderPassCreateInfo => RenderPassCreateInfo, RENDER_PASS_CREATE_INFO;
    SafeRenderPassBeginInfo => RenderPassBeginInfo, RENDER_PASS_BEGIN_INFO;
    SafeRenderingAttachmentInfo => RenderingAttachmentInfo, RENDERING_ATTACHMENT_INFO;
    SafeRenderingInfo => RenderingInfo, RENDERING_INFO;
    SafeSubmitInfo => SubmitInfo, SUBMIT_INFO;
    SafeTimelineSemaphoreSubmitInfo => TimelineSemaphoreSubmitInfo, TIMELINE_SEMAPHORE_SUBMIT_INFO;
    SafePresentInfoKHR => PresentInfoKHR, PRESENT_INFO_KHR;
    SafeSwapchainCreateInfoKHR => SwapchainCreateInfoKHR, SWAPCHAIN_CREATE_INFO_KHR;
    SafeAccelerationStructureGeometryTrianglesDataKHR => AccelerationStructureGeometryTrianglesDataKHR, ACCELERATION_STRUCTURE_GEOMETRY_TRIANGLES_DATA_KHR;
    SafeAccelerationStructureGeometryAabbsDataKHR => AccelerationStructureGeometryAabbsDataKHR, ACCELERATION_STRUCTURE_GEOMETRY_AABBS_DATA_KHR;
    SafeAccelerationStructureGeometryInstancesDataKHR => AccelerationStructureGeometryInstancesDataKHR, ACCELERATION_STRUCTURE_GEOMETRY_INSTANCES_DATA_KHR;
    SafeAccelerationStructureGeometryKHR => AccelerationStructureGeometryKHR, ACCELERATION_STRUCTURE_GEOMETRY_KHR;
    SafeAccelerationStructureBuildGeometryInfoKHR => AccelerationStructureBuildGeometryInfoKHR, ACCELERATION_STRUCTURE_BUILD_GEOMETRY_INFO_KHR;
    SafeWin32SurfaceCreateInfoKHR => Win32SurfaceCreateInfoKHR, WIN32_SURFACE_CREATE_INFO_KHR;
    SafeXlibSurfaceCreateInfoKHR => XlibSurfaceCreateInfoKHR, XLIB_SURFACE_CREATE_INFO_KHR;
    SafeXcbSurfaceCreateInfoKHR => XcbSurfaceCreateInfoKHR, XCB_SURFACE_CREATE_INFO_KHR;
    SafeWaylandSurfaceCreateInfoKHR => WaylandSurfaceCreateInfoKHR, WAYLAND_SURFACE_CREATE_INFO_KHR;
    SafeAndroidSurfaceCreateInfoKHR => AndroidSurfaceCreateInfoKHR, ANDROID_SURFACE_CREATE_INFO_KHR;
    SafeMetalSurfaceCreateInfoEXT => MetalSurfaceCreateInfoEXT, METAL_SURFACE_CREATE_INFO_EXT;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_matches_its_raw_layout() {
        for (name, _, matches) in layouts() {
            assert!(matches, "{} does not match its raw layout", name);
        }
    }

    #[test]
    fn test_every_shape_has_a_variant() {
        let layouts = layouts();
        assert_eq!(layouts.len(), table::ALL.len());
        for shape in table::ALL {
            assert!(
                layouts.iter().any(|(_, variant, _)| ptr::eq(*variant, *shape)),
                "{} has no typed variant",
                shape.name
            );
        }
    }

    #[test]
    fn test_default_matches_ash_default_header() {
        let variant = SafeSubmitInfo::default();
        let view = variant.view();
        let ash_default = vk::SubmitInfo::default();
        assert_eq!(view.s_type, ash_default.s_type);
        assert!(view.p_next.is_null());
        assert_eq!(view.wait_semaphore_count, 0);
        assert!(view.p_wait_semaphores.is_null());
    }

    #[test]
    fn test_from_record_checks_shape() {
        let record = SafeFenceCreateInfo::default().into_record();
        let fence = SafeFenceCreateInfo::from_record(record.clone()).unwrap();
        assert_eq!(fence.as_record(), &record);

        let result = SafeSemaphoreCreateInfo::try_from(record);
        assert!(matches!(
            result,
            Err(SafeStructError::StructureTypeMismatch {
                expected: vk::StructureType::SEMAPHORE_CREATE_INFO,
                found: vk::StructureType::FENCE_CREATE_INFO,
                ..
            })
        ));

        let headerless = SafeSpecializationInfo::default().into_record();
        assert!(matches!(
            SafeFenceCreateInfo::from_record(headerless),
            Err(SafeStructError::LayoutMismatch { .. })
        ));
    }

    #[test]
    fn test_wrong_shape_never_reaches_view() {
        let fence = SafeFenceCreateInfo::default().into_record();
        assert!(matches!(
            SafeInstanceCreateInfo::from_record(fence.clone()),
            Err(SafeStructError::StructureTypeMismatch {
                expected: vk::StructureType::INSTANCE_CREATE_INFO,
                found: vk::StructureType::FENCE_CREATE_INFO,
                ..
            })
        ));
        let converted: SafeResult<SafeInstanceCreateInfo> = fence.try_into();
        assert!(converted.is_err());

        let mut instance = SafeInstanceCreateInfo::default();
        instance
            .extensions_mut()
            .push_back(SafeRecord::new(&table::VALIDATION_FEATURES_EXT));
        let view = instance.view();
        assert_eq!(view.s_type, vk::StructureType::INSTANCE_CREATE_INFO);
        assert!(!view.p_next.is_null());
    }

    #[test]
    fn test_initialize_from_replaces_contents() {
        let stages = [vk::PipelineStageFlags::TRANSFER];
        let semaphores = [vk::Semaphore::null()];
        let raw = vk::SubmitInfo {
            wait_semaphore_count: 1,
            p_wait_semaphores: semaphores.as_ptr(),
            p_wait_dst_stage_mask: stages.as_ptr(),
            ..Default::default()
        };
        let source = unsafe { SafeSubmitInfo::from_raw(&raw) }.unwrap();

        let mut target = SafeSubmitInfo::default();
        target.initialize_from(&source);
        assert_eq!(target, source);
        assert_eq!(target.view().wait_semaphore_count, 1);
        assert_ne!(target.view().p_wait_semaphores, source.view().p_wait_semaphores);
    }
}
