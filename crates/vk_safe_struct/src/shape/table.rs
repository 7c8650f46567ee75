//! Per-type descriptor table
//!
//! One entry per supported `ash::vk` structure. Members that are not listed
//! are copied by value with the rest of the structure.

use std::mem::offset_of;

use ash::vk;

use crate::ffi::RawImage;
use crate::shape::Shape;

fn concurrent_buffer(image: &RawImage) -> bool {
    image.read_i32(offset_of!(vk::BufferCreateInfo, sharing_mode)) == vk::SharingMode::CONCURRENT.as_raw()
}

fn concurrent_image(image: &RawImage) -> bool {
    image.read_i32(offset_of!(vk::ImageCreateInfo, sharing_mode)) == vk::SharingMode::CONCURRENT.as_raw()
}

fn concurrent_swapchain(image: &RawImage) -> bool {
    image.read_i32(offset_of!(vk::SwapchainCreateInfoKHR, image_sharing_mode))
        == vk::SharingMode::CONCURRENT.as_raw()
}

fn binding_uses_samplers(image: &RawImage) -> bool {
    let ty = vk::DescriptorType::from_raw(image.read_i32(offset_of!(vk::DescriptorSetLayoutBinding, descriptor_type)));
    matches!(ty, vk::DescriptorType::SAMPLER | vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
}

fn write_descriptor_type(image: &RawImage) -> vk::DescriptorType {
    vk::DescriptorType::from_raw(image.read_i32(offset_of!(vk::WriteDescriptorSet, descriptor_type)))
}

fn writes_images(image: &RawImage) -> bool {
    matches!(
        write_descriptor_type(image),
        vk::DescriptorType::SAMPLER
            | vk::DescriptorType::COMBINED_IMAGE_SAMPLER
            | vk::DescriptorType::SAMPLED_IMAGE
            | vk::DescriptorType::STORAGE_IMAGE
            | vk::DescriptorType::INPUT_ATTACHMENT
    )
}

fn writes_buffers(image: &RawImage) -> bool {
    matches!(
        write_descriptor_type(image),
        vk::DescriptorType::UNIFORM_BUFFER
            | vk::DescriptorType::STORAGE_BUFFER
            | vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC
            | vk::DescriptorType::STORAGE_BUFFER_DYNAMIC
    )
}

fn writes_texel_buffers(image: &RawImage) -> bool {
    matches!(
        write_descriptor_type(image),
        vk::DescriptorType::UNIFORM_TEXEL_BUFFER | vk::DescriptorType::STORAGE_TEXEL_BUFFER
    )
}

fn geometry_data(image: &RawImage) -> Option<&'static Shape> {
    let ty = vk::GeometryTypeKHR::from_raw(
        image.read_i32(offset_of!(vk::AccelerationStructureGeometryKHR, geometry_type)),
    );
    match ty {
        vk::GeometryTypeKHR::TRIANGLES => Some(&ACCELERATION_STRUCTURE_GEOMETRY_TRIANGLES_DATA_KHR),
        vk::GeometryTypeKHR::AABBS => Some(&ACCELERATION_STRUCTURE_GEOMETRY_AABBS_DATA_KHR),
        vk::GeometryTypeKHR::INSTANCES => Some(&ACCELERATION_STRUCTURE_GEOMETRY_INSTANCES_DATA_KHR),
        _ => None,
    }
}

shapes! {
    // Instance and device creation

    /// `VkApplicationInfo`
    APPLICATION_INFO: ApplicationInfo = APPLICATION_INFO {
        p_application_name: string(),
        p_engine_name: string(),
    }

    /// `VkInstanceCreateInfo`
    INSTANCE_CREATE_INFO: InstanceCreateInfo = INSTANCE_CREATE_INFO {
        p_application_info: record(APPLICATION_INFO),
        pp_enabled_layer_names: strings(enabled_layer_count),
        pp_enabled_extension_names: strings(enabled_extension_count),
    }

    /// `VkDeviceQueueCreateInfo`
    DEVICE_QUEUE_CREATE_INFO: DeviceQueueCreateInfo = DEVICE_QUEUE_CREATE_INFO {
        p_queue_priorities: pod(f32, queue_count),
    }

    /// `VkDeviceCreateInfo`
    DEVICE_CREATE_INFO: DeviceCreateInfo = DEVICE_CREATE_INFO {
        p_queue_create_infos: records(DEVICE_QUEUE_CREATE_INFO, queue_create_info_count),
        pp_enabled_layer_names: strings(enabled_layer_count),
        pp_enabled_extension_names: strings(enabled_extension_count),
        p_enabled_features: pod_one(vk::PhysicalDeviceFeatures),
    }

    /// `VkDeviceGroupDeviceCreateInfo`
    DEVICE_GROUP_DEVICE_CREATE_INFO: DeviceGroupDeviceCreateInfo = DEVICE_GROUP_DEVICE_CREATE_INFO {
        p_physical_devices: pod(vk::PhysicalDevice, physical_device_count),
    }

    /// `VkPhysicalDeviceFeatures2`
    PHYSICAL_DEVICE_FEATURES_2: PhysicalDeviceFeatures2 = PHYSICAL_DEVICE_FEATURES_2 {}

    /// `VkPhysicalDeviceVulkan11Features`
    PHYSICAL_DEVICE_VULKAN_1_1_FEATURES: PhysicalDeviceVulkan11Features = PHYSICAL_DEVICE_VULKAN_1_1_FEATURES {}

    /// `VkPhysicalDeviceVulkan12Features`
    PHYSICAL_DEVICE_VULKAN_1_2_FEATURES: PhysicalDeviceVulkan12Features = PHYSICAL_DEVICE_VULKAN_1_2_FEATURES {}

    /// `VkPhysicalDeviceVulkan13Features`
    PHYSICAL_DEVICE_VULKAN_1_3_FEATURES: PhysicalDeviceVulkan13Features = PHYSICAL_DEVICE_VULKAN_1_3_FEATURES {}

    /// `VkValidationFeaturesEXT`
    VALIDATION_FEATURES_EXT: ValidationFeaturesEXT = VALIDATION_FEATURES_EXT {
        p_enabled_validation_features: pod(vk::ValidationFeatureEnableEXT, enabled_validation_feature_count),
        p_disabled_validation_features: pod(vk::ValidationFeatureDisableEXT, disabled_validation_feature_count),
    }

    /// `VkDebugUtilsMessengerCreateInfoEXT`; `p_user_data` is an opaque value
    DEBUG_UTILS_MESSENGER_CREATE_INFO_EXT: DebugUtilsMessengerCreateInfoEXT = DEBUG_UTILS_MESSENGER_CREATE_INFO_EXT {}

    /// `VkDebugUtilsLabelEXT`
    DEBUG_UTILS_LABEL_EXT: DebugUtilsLabelEXT = DEBUG_UTILS_LABEL_EXT {
        p_label_name: string(),
    }

    /// `VkDebugUtilsObjectNameInfoEXT`
    DEBUG_UTILS_OBJECT_NAME_INFO_EXT: DebugUtilsObjectNameInfoEXT = DEBUG_UTILS_OBJECT_NAME_INFO_EXT {
        p_object_name: string(),
    }

    // Resources

    /// `VkBufferCreateInfo`
    BUFFER_CREATE_INFO: BufferCreateInfo = BUFFER_CREATE_INFO {
        p_queue_family_indices: pod(u32, queue_family_index_count) if concurrent_buffer,
    }

    /// `VkImageCreateInfo`
    IMAGE_CREATE_INFO: ImageCreateInfo = IMAGE_CREATE_INFO {
        p_queue_family_indices: pod(u32, queue_family_index_count) if concurrent_image,
    }

    /// `VkImageFormatListCreateInfo`
    IMAGE_FORMAT_LIST_CREATE_INFO: ImageFormatListCreateInfo = IMAGE_FORMAT_LIST_CREATE_INFO {
        p_view_formats: pod(vk::Format, view_format_count),
    }

    /// `VkMemoryAllocateInfo`
    MEMORY_ALLOCATE_INFO: MemoryAllocateInfo = MEMORY_ALLOCATE_INFO {}

    /// `VkMemoryDedicatedAllocateInfo`
    MEMORY_DEDICATED_ALLOCATE_INFO: MemoryDedicatedAllocateInfo = MEMORY_DEDICATED_ALLOCATE_INFO {}

    /// `VkMemoryAllocateFlagsInfo`
    MEMORY_ALLOCATE_FLAGS_INFO: MemoryAllocateFlagsInfo = MEMORY_ALLOCATE_FLAGS_INFO {}

    /// `VkSamplerCreateInfo`
    SAMPLER_CREATE_INFO: SamplerCreateInfo = SAMPLER_CREATE_INFO {}

    /// `VkSemaphoreCreateInfo`
    SEMAPHORE_CREATE_INFO: SemaphoreCreateInfo = SEMAPHORE_CREATE_INFO {}

    /// `VkSemaphoreTypeCreateInfo`
    SEMAPHORE_TYPE_CREATE_INFO: SemaphoreTypeCreateInfo = SEMAPHORE_TYPE_CREATE_INFO {}

    /// `VkFenceCreateInfo`
    FENCE_CREATE_INFO: FenceCreateInfo = FENCE_CREATE_INFO {}

    /// `VkPipelineCacheCreateInfo`
    PIPELINE_CACHE_CREATE_INFO: PipelineCacheCreateInfo = PIPELINE_CACHE_CREATE_INFO {
        p_initial_data: pod_bytes(u8, initial_data_size),
    }

    // Pipelines

    /// `VkShaderModuleCreateInfo`
    SHADER_MODULE_CREATE_INFO: ShaderModuleCreateInfo = SHADER_MODULE_CREATE_INFO {
        p_code: pod_bytes(u32, code_size),
    }

    /// `VkSpecializationInfo`
    SPECIALIZATION_INFO: SpecializationInfo {
        p_map_entries: pod(vk::SpecializationMapEntry, map_entry_count),
        p_data: pod_bytes(u8, data_size),
    }

    /// `VkPipelineShaderStageCreateInfo`
    PIPELINE_SHADER_STAGE_CREATE_INFO: PipelineShaderStageCreateInfo = PIPELINE_SHADER_STAGE_CREATE_INFO {
        p_name: string(),
        p_specialization_info: record(SPECIALIZATION_INFO),
    }

    /// `VkPipelineShaderStageRequiredSubgroupSizeCreateInfo`
    PIPELINE_SHADER_STAGE_REQUIRED_SUBGROUP_SIZE_CREATE_INFO: PipelineShaderStageRequiredSubgroupSizeCreateInfo = PIPELINE_SHADER_STAGE_REQUIRED_SUBGROUP_SIZE_CREATE_INFO {}

    /// `VkPipelineVertexInputStateCreateInfo`
    PIPELINE_VERTEX_INPUT_STATE_CREATE_INFO: PipelineVertexInputStateCreateInfo = PIPELINE_VERTEX_INPUT_STATE_CREATE_INFO {
        p_vertex_binding_descriptions: pod(vk::VertexInputBindingDescription, vertex_binding_description_count),
        p_vertex_attribute_descriptions: pod(vk::VertexInputAttributeDescription, vertex_attribute_description_count),
    }

    /// `VkPipelineInputAssemblyStateCreateInfo`
    PIPELINE_INPUT_ASSEMBLY_STATE_CREATE_INFO: PipelineInputAssemblyStateCreateInfo = PIPELINE_INPUT_ASSEMBLY_STATE_CREATE_INFO {}

    /// `VkPipelineTessellationStateCreateInfo`
    PIPELINE_TESSELLATION_STATE_CREATE_INFO: PipelineTessellationStateCreateInfo = PIPELINE_TESSELLATION_STATE_CREATE_INFO {}

    /// `VkPipelineViewportStateCreateInfo`; both arrays may be dynamic state
    PIPELINE_VIEWPORT_STATE_CREATE_INFO: PipelineViewportStateCreateInfo = PIPELINE_VIEWPORT_STATE_CREATE_INFO {
        p_viewports: pod_opt(vk::Viewport, viewport_count),
        p_scissors: pod_opt(vk::Rect2D, scissor_count),
    }

    /// `VkPipelineRasterizationStateCreateInfo`
    PIPELINE_RASTERIZATION_STATE_CREATE_INFO: PipelineRasterizationStateCreateInfo = PIPELINE_RASTERIZATION_STATE_CREATE_INFO {}

    /// `VkPipelineMultisampleStateCreateInfo`
    PIPELINE_MULTISAMPLE_STATE_CREATE_INFO: PipelineMultisampleStateCreateInfo = PIPELINE_MULTISAMPLE_STATE_CREATE_INFO {
        p_sample_mask: sample_mask(rasterization_samples),
    }

    /// `VkPipelineDepthStencilStateCreateInfo`
    PIPELINE_DEPTH_STENCIL_STATE_CREATE_INFO: PipelineDepthStencilStateCreateInfo = PIPELINE_DEPTH_STENCIL_STATE_CREATE_INFO {}

    /// `VkPipelineColorBlendStateCreateInfo`
    PIPELINE_COLOR_BLEND_STATE_CREATE_INFO: PipelineColorBlendStateCreateInfo = PIPELINE_COLOR_BLEND_STATE_CREATE_INFO {
        p_attachments: pod(vk::PipelineColorBlendAttachmentState, attachment_count),
    }

    /// `VkPipelineDynamicStateCreateInfo`
    PIPELINE_DYNAMIC_STATE_CREATE_INFO: PipelineDynamicStateCreateInfo = PIPELINE_DYNAMIC_STATE_CREATE_INFO {
        p_dynamic_states: pod(vk::DynamicState, dynamic_state_count),
    }

    /// `VkPipelineRenderingCreateInfo`
    PIPELINE_RENDERING_CREATE_INFO: PipelineRenderingCreateInfo = PIPELINE_RENDERING_CREATE_INFO {
        p_color_attachment_formats: pod(vk::Format, color_attachment_count),
    }

    /// `VkGraphicsPipelineCreateInfo`
    GRAPHICS_PIPELINE_CREATE_INFO: GraphicsPipelineCreateInfo = GRAPHICS_PIPELINE_CREATE_INFO {
        p_stages: records(PIPELINE_SHADER_STAGE_CREATE_INFO, stage_count),
        p_vertex_input_state: record(PIPELINE_VERTEX_INPUT_STATE_CREATE_INFO),
        p_input_assembly_state: record(PIPELINE_INPUT_ASSEMBLY_STATE_CREATE_INFO),
        p_tessellation_state: record(PIPELINE_TESSELLATION_STATE_CREATE_INFO),
        p_viewport_state: record(PIPELINE_VIEWPORT_STATE_CREATE_INFO),
        p_rasterization_state: record(PIPELINE_RASTERIZATION_STATE_CREATE_INFO),
        p_multisample_state: record(PIPELINE_MULTISAMPLE_STATE_CREATE_INFO),
        p_depth_stencil_state: record(PIPELINE_DEPTH_STENCIL_STATE_CREATE_INFO),
        p_color_blend_state: record(PIPELINE_COLOR_BLEND_STATE_CREATE_INFO),
        p_dynamic_state: record(PIPELINE_DYNAMIC_STATE_CREATE_INFO),
    }

    /// `VkComputePipelineCreateInfo`
    COMPUTE_PIPELINE_CREATE_INFO: ComputePipelineCreateInfo = COMPUTE_PIPELINE_CREATE_INFO {
        stage: inline(PIPELINE_SHADER_STAGE_CREATE_INFO),
    }

    /// `VkPipelineLayoutCreateInfo`
    PIPELINE_LAYOUT_CREATE_INFO: PipelineLayoutCreateInfo = PIPELINE_LAYOUT_CREATE_INFO {
        p_set_layouts: pod(vk::DescriptorSetLayout, set_layout_count),
        p_push_constant_ranges: pod(vk::PushConstantRange, push_constant_range_count),
    }

    // Descriptors

    /// `VkDescriptorSetLayoutBinding`
    DESCRIPTOR_SET_LAYOUT_BINDING: DescriptorSetLayoutBinding {
        p_immutable_samplers: pod_opt(vk::Sampler, descriptor_count) if binding_uses_samplers,
    }

    /// `VkDescriptorSetLayoutCreateInfo`
    DESCRIPTOR_SET_LAYOUT_CREATE_INFO: DescriptorSetLayoutCreateInfo = DESCRIPTOR_SET_LAYOUT_CREATE_INFO {
        p_bindings: records(DESCRIPTOR_SET_LAYOUT_BINDING, binding_count),
    }

    /// `VkDescriptorSetLayoutBindingFlagsCreateInfo`
    DESCRIPTOR_SET_LAYOUT_BINDING_FLAGS_CREATE_INFO: DescriptorSetLayoutBindingFlagsCreateInfo = DESCRIPTOR_SET_LAYOUT_BINDING_FLAGS_CREATE_INFO {
        p_binding_flags: pod(vk::DescriptorBindingFlags, binding_count),
    }

    /// `VkWriteDescriptorSet`
    WRITE_DESCRIPTOR_SET: WriteDescriptorSet = WRITE_DESCRIPTOR_SET {
        p_image_info: pod_members(vk::DescriptorImageInfo, DESCRIPTOR_IMAGE_INFO, descriptor_count) if writes_images,
        p_buffer_info: pod(vk::DescriptorBufferInfo, descriptor_count) if writes_buffers,
        p_texel_buffer_view: pod(vk::BufferView, descriptor_count) if writes_texel_buffers,
    }

    /// `VkDescriptorPoolCreateInfo`
    DESCRIPTOR_POOL_CREATE_INFO: DescriptorPoolCreateInfo = DESCRIPTOR_POOL_CREATE_INFO {
        p_pool_sizes: pod(vk::DescriptorPoolSize, pool_size_count),
    }

    // Render passes

    /// `VkSubpassDescription`
    SUBPASS_DESCRIPTION: SubpassDescription {
        p_input_attachments: pod(vk::AttachmentReference, input_attachment_count),
        p_color_attachments: pod(vk::AttachmentReference, color_attachment_count),
        p_resolve_attachments: pod_opt(vk::AttachmentReference, color_attachment_count),
        p_depth_stencil_attachment: pod_one(vk::AttachmentReference),
        p_preserve_attachments: pod(u32, preserve_attachment_count),
    }

    /// `VkRenderPassCreateInfo`
    RENDER_PASS_CREATE_INFO: RenderPassCreateInfo = RENDER_PASS_CREATE_INFO {
        p_attachments: pod(vk::AttachmentDescription, attachment_count),
        p_subpasses: records(SUBPASS_DESCRIPTION, subpass_count),
        p_dependencies: pod(vk::SubpassDependency, dependency_count),
    }

    /// `VkRenderPassBeginInfo`; clear values are unions copied as bytes
    RENDER_PASS_BEGIN_INFO: RenderPassBeginInfo = RENDER_PASS_BEGIN_INFO {
        p_clear_values: pod(vk::ClearValue, clear_value_count),
    }

    /// `VkRenderingAttachmentInfo`
    RENDERING_ATTACHMENT_INFO: RenderingAttachmentInfo = RENDERING_ATTACHMENT_INFO {}

    /// `VkRenderingInfo`
    RENDERING_INFO: RenderingInfo = RENDERING_INFO {
        p_color_attachments: records(RENDERING_ATTACHMENT_INFO, color_attachment_count),
        p_depth_attachment: record(RENDERING_ATTACHMENT_INFO),
        p_stencil_attachment: record(RENDERING_ATTACHMENT_INFO),
    }

    // Submission and presentation

    /// `VkSubmitInfo`
    SUBMIT_INFO: SubmitInfo = SUBMIT_INFO {
        p_wait_semaphores: pod(vk::Semaphore, wait_semaphore_count),
        p_wait_dst_stage_mask: pod(vk::PipelineStageFlags, wait_semaphore_count),
        p_command_buffers: pod(vk::CommandBuffer, command_buffer_count),
        p_signal_semaphores: pod(vk::Semaphore, signal_semaphore_count),
    }

    /// `VkTimelineSemaphoreSubmitInfo`
    TIMELINE_SEMAPHORE_SUBMIT_INFO: TimelineSemaphoreSubmitInfo = TIMELINE_SEMAPHORE_SUBMIT_INFO {
        p_wait_semaphore_values: pod(u64, wait_semaphore_value_count),
        p_signal_semaphore_values: pod(u64, signal_semaphore_value_count),
    }

    /// `VkPresentInfoKHR`
    PRESENT_INFO_KHR: PresentInfoKHR = PRESENT_INFO_KHR {
        p_wait_semaphores: pod(vk::Semaphore, wait_semaphore_count),
        p_swapchains: pod(vk::SwapchainKHR, swapchain_count),
        p_image_indices: pod(u32, swapchain_count),
        p_results: pod_opt(vk::Result, swapchain_count),
    }

    /// `VkSwapchainCreateInfoKHR`
    SWAPCHAIN_CREATE_INFO_KHR: SwapchainCreateInfoKHR = SWAPCHAIN_CREATE_INFO_KHR {
        p_queue_family_indices: pod(u32, queue_family_index_count) if concurrent_swapchain,
    }

    // Ray tracing geometry; device-or-host addresses stay opaque

    /// `VkAccelerationStructureGeometryTrianglesDataKHR`
    ACCELERATION_STRUCTURE_GEOMETRY_TRIANGLES_DATA_KHR: AccelerationStructureGeometryTrianglesDataKHR = ACCELERATION_STRUCTURE_GEOMETRY_TRIANGLES_DATA_KHR {}

    /// `VkAccelerationStructureGeometryAabbsDataKHR`
    ACCELERATION_STRUCTURE_GEOMETRY_AABBS_DATA_KHR: AccelerationStructureGeometryAabbsDataKHR = ACCELERATION_STRUCTURE_GEOMETRY_AABBS_DATA_KHR {}

    /// `VkAccelerationStructureGeometryInstancesDataKHR`
    ACCELERATION_STRUCTURE_GEOMETRY_INSTANCES_DATA_KHR: AccelerationStructureGeometryInstancesDataKHR = ACCELERATION_STRUCTURE_GEOMETRY_INSTANCES_DATA_KHR {}

    /// `VkAccelerationStructureGeometryKHR`
    ACCELERATION_STRUCTURE_GEOMETRY_KHR: AccelerationStructureGeometryKHR = ACCELERATION_STRUCTURE_GEOMETRY_KHR {
        geometry: union(geometry_data),
    }

    /// `VkAccelerationStructureBuildGeometryInfoKHR`; one of the two geometry
    /// arrays is null
    ACCELERATION_STRUCTURE_BUILD_GEOMETRY_INFO_KHR: AccelerationStructureBuildGeometryInfoKHR = ACCELERATION_STRUCTURE_BUILD_GEOMETRY_INFO_KHR {
        p_geometries: records_opt(ACCELERATION_STRUCTURE_GEOMETRY_KHR, geometry_count),
        pp_geometries: record_pointers_opt(ACCELERATION_STRUCTURE_GEOMETRY_KHR, geometry_count),
    }

    // Window-system surfaces; native handles are copied by value

    /// `VkWin32SurfaceCreateInfoKHR`
    WIN32_SURFACE_CREATE_INFO_KHR @ Win32: Win32SurfaceCreateInfoKHR = WIN32_SURFACE_CREATE_INFO_KHR {}

    /// `VkXlibSurfaceCreateInfoKHR`
    XLIB_SURFACE_CREATE_INFO_KHR @ Xlib: XlibSurfaceCreateInfoKHR = XLIB_SURFACE_CREATE_INFO_KHR {}

    /// `VkXcbSurfaceCreateInfoKHR`
    XCB_SURFACE_CREATE_INFO_KHR @ Xcb: XcbSurfaceCreateInfoKHR = XCB_SURFACE_CREATE_INFO_KHR {}

    /// `VkWaylandSurfaceCreateInfoKHR`
    WAYLAND_SURFACE_CREATE_INFO_KHR @ Wayland: WaylandSurfaceCreateInfoKHR = WAYLAND_SURFACE_CREATE_INFO_KHR {}

    /// `VkAndroidSurfaceCreateInfoKHR`
    ANDROID_SURFACE_CREATE_INFO_KHR @ Android: AndroidSurfaceCreateInfoKHR = ANDROID_SURFACE_CREATE_INFO_KHR {}

    /// `VkMetalSurfaceCreateInfoEXT`
    METAL_SURFACE_CREATE_INFO_EXT @ Metal: MetalSurfaceCreateInfoEXT = METAL_SURFACE_CREATE_INFO_EXT {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_structure_types_are_unique() {
        let mut seen = HashSet::new();
        for shape in ALL {
            if let Some(structure_type) = shape.structure_type {
                assert!(seen.insert(structure_type), "{} registered twice", shape.name);
            }
        }
    }

    #[test]
    fn test_fields_fit_inside_their_structure() {
        for shape in ALL {
            for field in shape.fields {
                assert!(field.offset < shape.size, "{}::{}", shape.name, field.name);
                if field.kind.is_pointer() {
                    assert!(
                        field.offset + std::mem::size_of::<*const u8>() <= shape.size,
                        "{}::{}",
                        shape.name,
                        field.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_members_are_ordered_and_cover_fields() {
        for shape in ALL {
            let mut end = 0;
            for span in shape.members {
                assert!(span.offset >= end, "{} members overlap", shape.name);
                end = span.offset + span.len;
            }
            assert!(end <= shape.size, "{}", shape.name);
            for field in shape.fields {
                assert!(
                    shape.members.iter().any(|span| span.offset == field.offset),
                    "{}::{} has no member",
                    shape.name,
                    field.name
                );
            }
        }
    }

    #[test]
    fn test_fence_members_skip_padding() {
        let spans: Vec<_> = FENCE_CREATE_INFO.spans().map(|span| (span.offset, span.len)).collect();
        assert_eq!(spans, vec![(0, 4), (8, 8), (16, 4)]);
        assert_eq!(FENCE_CREATE_INFO.size, 24);
    }

    #[test]
    fn test_payload_elements_fit_image_alignment() {
        for shape in ALL {
            assert!(shape.align <= RawImage::MAX_ALIGN, "{}", shape.name);
            for field in shape.fields {
                if let crate::shape::FieldKind::Pod { elem, .. } = field.kind {
                    assert!(elem.align <= RawImage::MAX_ALIGN, "{}::{}", shape.name, field.name);
                }
            }
        }
    }

    #[test]
    fn test_headerless_shapes() {
        assert!(!SPECIALIZATION_INFO.is_chained());
        assert!(!SUBPASS_DESCRIPTION.is_chained());
        assert!(!DESCRIPTOR_SET_LAYOUT_BINDING.is_chained());
        assert!(INSTANCE_CREATE_INFO.is_chained());
    }

    #[test]
    fn test_shape_names() {
        assert_eq!(INSTANCE_CREATE_INFO.name, "VkInstanceCreateInfo");
        assert_eq!(SPECIALIZATION_INFO.name, "VkSpecializationInfo");
        assert!(INSTANCE_CREATE_INFO.describes::<vk::InstanceCreateInfo>());
    }

    #[test]
    fn test_geometry_union_selection() {
        let mut image = ACCELERATION_STRUCTURE_GEOMETRY_KHR.default_image();
        let offset = offset_of!(vk::AccelerationStructureGeometryKHR, geometry_type);

        image.write_bytes(offset, &vk::GeometryTypeKHR::AABBS.as_raw().to_ne_bytes());
        assert_eq!(geometry_data(&image).unwrap().name, "VkAccelerationStructureGeometryAabbsDataKHR");

        image.write_bytes(offset, &0x7fff_i32.to_ne_bytes());
        assert!(geometry_data(&image).is_none());
    }

    #[test]
    fn test_platform_tags() {
        use crate::shape::Platform;
        assert_eq!(WIN32_SURFACE_CREATE_INFO_KHR.platform, Platform::Win32);
        assert_eq!(METAL_SURFACE_CREATE_INFO_EXT.platform, Platform::Metal);
        assert_eq!(BUFFER_CREATE_INFO.platform, Platform::Any);
    }
}
