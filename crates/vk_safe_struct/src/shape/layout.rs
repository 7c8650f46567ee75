//! Member lists of the table's structures
//!
//! Every member of each raw structure is named, so that a copy reads the
//! members and never the padding between them.

use crate::ffi::Span;

pub(crate) const APPLICATION_INFO: &[Span] = members!(ApplicationInfo {
    s_type, p_next, p_application_name, application_version, p_engine_name, engine_version,
    api_version,
});

pub(crate) const INSTANCE_CREATE_INFO: &[Span] = members!(InstanceCreateInfo {
    s_type, p_next, flags, p_application_info, enabled_layer_count, pp_enabled_layer_names,
    enabled_extension_count, pp_enabled_extension_names,
});

pub(crate) const DEVICE_QUEUE_CREATE_INFO: &[Span] = members!(DeviceQueueCreateInfo {
    s_type, p_next, flags, queue_family_index, queue_count, p_queue_priorities,
});

pub(crate) const DEVICE_CREATE_INFO: &[Span] = members!(DeviceCreateInfo {
    s_type, p_next, flags, queue_create_info_count, p_queue_create_infos, enabled_layer_count,
    pp_enabled_layer_names, enabled_extension_count, pp_enabled_extension_names, p_enabled_features,
});

pub(crate) const DEVICE_GROUP_DEVICE_CREATE_INFO: &[Span] = members!(DeviceGroupDeviceCreateInfo {
    s_type, p_next, physical_device_count, p_physical_devices,
});

pub(crate) const PHYSICAL_DEVICE_FEATURES_2: &[Span] = members!(PhysicalDeviceFeatures2 {
    s_type, p_next, features,
});

pub(crate) const PHYSICAL_DEVICE_VULKAN_1_1_FEATURES: &[Span] = members!(PhysicalDeviceVulkan11Features {
    s_type, p_next, storage_buffer16_bit_access, uniform_and_storage_buffer16_bit_access,
    storage_push_constant16, storage_input_output16, multiview, multiview_geometry_shader,
    multiview_tessellation_shader, variable_pointers_storage_buffer, variable_pointers,
    protected_memory, sampler_ycbcr_conversion, shader_draw_parameters,
});

pub(crate) const PHYSICAL_DEVICE_VULKAN_1_2_FEATURES: &[Span] = members!(PhysicalDeviceVulkan12Features {
    s_type, p_next, sampler_mirror_clamp_to_edge, draw_indirect_count, storage_buffer8_bit_access,
    uniform_and_storage_buffer8_bit_access, storage_push_constant8, shader_buffer_int64_atomics,
    shader_shared_int64_atomics, shader_float16, shader_int8, descriptor_indexing,
    shader_input_attachment_array_dynamic_indexing,
    shader_uniform_texel_buffer_array_dynamic_indexing,
    shader_storage_texel_buffer_array_dynamic_indexing,
    shader_uniform_buffer_array_non_uniform_indexing,
    shader_sampled_image_array_non_uniform_indexing,
    shader_storage_buffer_array_non_uniform_indexing,
    shader_storage_image_array_non_uniform_indexing,
    shader_input_attachment_array_non_uniform_indexing,
    shader_uniform_texel_buffer_array_non_uniform_indexing,
    shader_storage_texel_buffer_array_non_uniform_indexing,
    descriptor_binding_uniform_buffer_update_after_bind,
    descriptor_binding_sampled_image_update_after_bind,
    descriptor_binding_storage_image_update_after_bind,
    descriptor_binding_storage_buffer_update_after_bind,
    descriptor_binding_uniform_texel_buffer_update_after_bind,
    descriptor_binding_storage_texel_buffer_update_after_bind,
    descriptor_binding_update_unused_while_pending, descriptor_binding_partially_bound,
    descriptor_binding_variable_descriptor_count, runtime_descriptor_array, sampler_filter_minmax,
    scalar_block_layout, imageless_framebuffer, uniform_buffer_standard_layout,
    shader_subgroup_extended_types, separate_depth_stencil_layouts, host_query_reset,
    timeline_semaphore, buffer_device_address, buffer_device_address_capture_replay,
    buffer_device_address_multi_device, vulkan_memory_model, vulkan_memory_model_device_scope,
    vulkan_memory_model_availability_visibility_chains, shader_output_viewport_index,
    shader_output_layer, subgroup_broadcast_dynamic_id,
});

pub(crate) const PHYSICAL_DEVICE_VULKAN_1_3_FEATURES: &[Span] = members!(PhysicalDeviceVulkan13Features {
    s_type, p_next, robust_image_access, inline_uniform_block,
    descriptor_binding_inline_uniform_block_update_after_bind, pipeline_creation_cache_control,
    private_data, shader_demote_to_helper_invocation, shader_terminate_invocation,
    subgroup_size_control, compute_full_subgroups, synchronization2, texture_compression_astc_hdr,
    shader_zero_initialize_workgroup_memory, dynamic_rendering, shader_integer_dot_product,
    maintenance4,
});

pub(crate) const VALIDATION_FEATURES_EXT: &[Span] = members!(ValidationFeaturesEXT {
    s_type, p_next, enabled_validation_feature_count, p_enabled_validation_features,
    disabled_validation_feature_count, p_disabled_validation_features,
});

pub(crate) const DEBUG_UTILS_MESSENGER_CREATE_INFO_EXT: &[Span] = members!(DebugUtilsMessengerCreateInfoEXT {
    s_type, p_next, flags, message_severity, message_type, pfn_user_callback, p_user_data,
});

pub(crate) const DEBUG_UTILS_LABEL_EXT: &[Span] = members!(DebugUtilsLabelEXT {
    s_type, p_next, p_label_name, color,
});

pub(crate) const DEBUG_UTILS_OBJECT_NAME_INFO_EXT: &[Span] = members!(DebugUtilsObjectNameInfoEXT {
    s_type, p_next, object_type, object_handle, p_object_name,
});

pub(crate) const BUFFER_CREATE_INFO: &[Span] = members!(BufferCreateInfo {
    s_type, p_next, flags, size, usage, sharing_mode, queue_family_index_count,
    p_queue_family_indices,
});

pub(crate) const IMAGE_CREATE_INFO: &[Span] = members!(ImageCreateInfo {
    s_type, p_next, flags, image_type, format, extent, mip_levels, array_layers, samples, tiling,
    usage, sharing_mode, queue_family_index_count, p_queue_family_indices, initial_layout,
});

pub(crate) const IMAGE_FORMAT_LIST_CREATE_INFO: &[Span] = members!(ImageFormatListCreateInfo {
    s_type, p_next, view_format_count, p_view_formats,
});

pub(crate) const MEMORY_ALLOCATE_INFO: &[Span] = members!(MemoryAllocateInfo {
    s_type, p_next, allocation_size, memory_type_index,
});

pub(crate) const MEMORY_DEDICATED_ALLOCATE_INFO: &[Span] = members!(MemoryDedicatedAllocateInfo {
    s_type, p_next, image, buffer,
});

pub(crate) const MEMORY_ALLOCATE_FLAGS_INFO: &[Span] = members!(MemoryAllocateFlagsInfo {
    s_type, p_next, flags, device_mask,
});

pub(crate) const SAMPLER_CREATE_INFO: &[Span] = members!(SamplerCreateInfo {
    s_type, p_next, flags, mag_filter, min_filter, mipmap_mode, address_mode_u, address_mode_v,
    address_mode_w, mip_lod_bias, anisotropy_enable, max_anisotropy, compare_enable, compare_op,
    min_lod, max_lod, border_color, unnormalized_coordinates,
});

pub(crate) const SEMAPHORE_CREATE_INFO: &[Span] = members!(SemaphoreCreateInfo {
    s_type, p_next, flags,
});

pub(crate) const SEMAPHORE_TYPE_CREATE_INFO: &[Span] = members!(SemaphoreTypeCreateInfo {
    s_type, p_next, semaphore_type, initial_value,
});

pub(crate) const FENCE_CREATE_INFO: &[Span] = members!(FenceCreateInfo {
    s_type, p_next, flags,
});

pub(crate) const PIPELINE_CACHE_CREATE_INFO: &[Span] = members!(PipelineCacheCreateInfo {
    s_type, p_next, flags, initial_data_size, p_initial_data,
});

pub(crate) const SHADER_MODULE_CREATE_INFO: &[Span] = members!(ShaderModuleCreateInfo {
    s_type, p_next, flags, code_size, p_code,
});

pub(crate) const SPECIALIZATION_INFO: &[Span] = members!(SpecializationInfo {
    map_entry_count, p_map_entries, data_size, p_data,
});

pub(crate) const PIPELINE_SHADER_STAGE_CREATE_INFO: &[Span] = members!(PipelineShaderStageCreateInfo {
    s_type, p_next, flags, stage, module, p_name, p_specialization_info,
});

pub(crate) const PIPELINE_SHADER_STAGE_REQUIRED_SUBGROUP_SIZE_CREATE_INFO: &[Span] = members!(PipelineShaderStageRequiredSubgroupSizeCreateInfo {
    s_type, p_next, required_subgroup_size,
});

pub(crate) const PIPELINE_VERTEX_INPUT_STATE_CREATE_INFO: &[Span] = members!(PipelineVertexInputStateCreateInfo {
    s_type, p_next, flags, vertex_binding_description_count, p_vertex_binding_descriptions,
    vertex_attribute_description_count, p_vertex_attribute_descriptions,
});

pub(crate) const PIPELINE_INPUT_ASSEMBLY_STATE_CREATE_INFO: &[Span] = members!(PipelineInputAssemblyStateCreateInfo {
    s_type, p_next, flags, topology, primitive_restart_enable,
});

pub(crate) const PIPELINE_TESSELLATION_STATE_CREATE_INFO: &[Span] = members!(PipelineTessellationStateCreateInfo {
    s_type, p_next, flags, patch_control_points,
});

pub(crate) const PIPELINE_VIEWPORT_STATE_CREATE_INFO: &[Span] = members!(PipelineViewportStateCreateInfo {
    s_type, p_next, flags, viewport_count, p_viewports, scissor_count, p_scissors,
});

pub(crate) const PIPELINE_RASTERIZATION_STATE_CREATE_INFO: &[Span] = members!(PipelineRasterizationStateCreateInfo {
    s_type, p_next, flags, depth_clamp_enable, rasterizer_discard_enable, polygon_mode, cull_mode,
    front_face, depth_bias_enable, depth_bias_constant_factor, depth_bias_clamp,
    depth_bias_slope_factor, line_width,
});

pub(crate) const PIPELINE_MULTISAMPLE_STATE_CREATE_INFO: &[Span] = members!(PipelineMultisampleStateCreateInfo {
    s_type, p_next, flags, rasterization_samples, sample_shading_enable, min_sample_shading,
    p_sample_mask, alpha_to_coverage_enable, alpha_to_one_enable,
});

pub(crate) const PIPELINE_DEPTH_STENCIL_STATE_CREATE_INFO: &[Span] = members!(PipelineDepthStencilStateCreateInfo {
    s_type, p_next, flags, depth_test_enable, depth_write_enable, depth_compare_op,
    depth_bounds_test_enable, stencil_test_enable, front, back, min_depth_bounds, max_depth_bounds,
});

pub(crate) const PIPELINE_COLOR_BLEND_STATE_CREATE_INFO: &[Span] = members!(PipelineColorBlendStateCreateInfo {
    s_type, p_next, flags, logic_op_enable, logic_op, attachment_count, p_attachments,
    blend_constants,
});

pub(crate) const PIPELINE_DYNAMIC_STATE_CREATE_INFO: &[Span] = members!(PipelineDynamicStateCreateInfo {
    s_type, p_next, flags, dynamic_state_count, p_dynamic_states,
});

pub(crate) const PIPELINE_RENDERING_CREATE_INFO: &[Span] = members!(PipelineRenderingCreateInfo {
    s_type, p_next, view_mask, color_attachment_count, p_color_attachment_formats,
    depth_attachment_format, stencil_attachment_format,
});

pub(crate) const GRAPHICS_PIPELINE_CREATE_INFO: &[Span] = members!(GraphicsPipelineCreateInfo {
    s_type, p_next, flags, stage_count, p_stages, p_vertex_input_state, p_input_assembly_state,
    p_tessellation_state, p_viewport_state, p_rasterization_state, p_multisample_state,
    p_depth_stencil_state, p_color_blend_state, p_dynamic_state, layout, render_pass, subpass,
    base_pipeline_handle, base_pipeline_index,
});

pub(crate) const COMPUTE_PIPELINE_CREATE_INFO: &[Span] = members!(ComputePipelineCreateInfo {
    s_type, p_next, flags, stage, layout, base_pipeline_handle, base_pipeline_index,
});

pub(crate) const PIPELINE_LAYOUT_CREATE_INFO: &[Span] = members!(PipelineLayoutCreateInfo {
    s_type, p_next, flags, set_layout_count, p_set_layouts, push_constant_range_count,
    p_push_constant_ranges,
});

pub(crate) const DESCRIPTOR_SET_LAYOUT_BINDING: &[Span] = members!(DescriptorSetLayoutBinding {
    binding, descriptor_type, descriptor_count, stage_flags, p_immutable_samplers,
});

pub(crate) const DESCRIPTOR_SET_LAYOUT_CREATE_INFO: &[Span] = members!(DescriptorSetLayoutCreateInfo {
    s_type, p_next, flags, binding_count, p_bindings,
});

pub(crate) const DESCRIPTOR_SET_LAYOUT_BINDING_FLAGS_CREATE_INFO: &[Span] = members!(DescriptorSetLayoutBindingFlagsCreateInfo {
    s_type, p_next, binding_count, p_binding_flags,
});

pub(crate) const WRITE_DESCRIPTOR_SET: &[Span] = members!(WriteDescriptorSet {
    s_type, p_next, dst_set, dst_binding, dst_array_element, descriptor_count, descriptor_type,
    p_image_info, p_buffer_info, p_texel_buffer_view,
});

pub(crate) const DESCRIPTOR_POOL_CREATE_INFO: &[Span] = members!(DescriptorPoolCreateInfo {
    s_type, p_next, flags, max_sets, pool_size_count, p_pool_sizes,
});

pub(crate) const SUBPASS_DESCRIPTION: &[Span] = members!(SubpassDescription {
    flags, pipeline_bind_point, input_attachment_count, p_input_attachments, color_attachment_count,
    p_color_attachments, p_resolve_attachments, p_depth_stencil_attachment,
    preserve_attachment_count, p_preserve_attachments,
});

pub(crate) const RENDER_PASS_CREATE_INFO: &[Span] = members!(RenderPassCreateInfo {
    s_type, p_next, flags, attachment_count, p_attachments, subpass_count, p_subpasses,
    dependency_count, p_dependencies,
});

pub(crate) const RENDER_PASS_BEGIN_INFO: &[Span] = members!(RenderPassBeginInfo {
    s_type, p_next, render_pass, framebuffer, render_area, clear_value_count, p_clear_values,
});

pub(crate) const RENDERING_ATTACHMENT_INFO: &[Span] = members!(RenderingAttachmentInfo {
    s_type, p_next, image_view, image_layout, resolve_mode, resolve_image_view,
    resolve_image_layout, load_op, store_op, clear_value,
});

pub(crate) const RENDERING_INFO: &[Span] = members!(RenderingInfo {
    s_type, p_next, flags, render_area, layer_count, view_mask, color_attachment_count,
    p_color_attachments, p_depth_attachment, p_stencil_attachment,
});

pub(crate) const SUBMIT_INFO: &[Span] = members!(SubmitInfo {
    s_type, p_next, wait_semaphore_count, p_wait_semaphores, p_wait_dst_stage_mask,
    command_buffer_count, p_command_buffers, signal_semaphore_count, p_signal_semaphores,
});

pub(crate) const TIMELINE_SEMAPHORE_SUBMIT_INFO: &[Span] = members!(TimelineSemaphoreSubmitInfo {
    s_type, p_next, wait_semaphore_value_count, p_wait_semaphore_values,
    signal_semaphore_value_count, p_signal_semaphore_values,
});

pub(crate) const PRESENT_INFO_KHR: &[Span] = members!(PresentInfoKHR {
    s_type, p_next, wait_semaphore_count, p_wait_semaphores, swapchain_count, p_swapchains,
    p_image_indices, p_results,
});

pub(crate) const SWAPCHAIN_CREATE_INFO_KHR: &[Span] = members!(SwapchainCreateInfoKHR {
    s_type, p_next, flags, surface, min_image_count, image_format, image_color_space, image_extent,
    image_array_layers, image_usage, image_sharing_mode, queue_family_index_count,
    p_queue_family_indices, pre_transform, composite_alpha, present_mode, clipped, old_swapchain,
});

pub(crate) const ACCELERATION_STRUCTURE_GEOMETRY_TRIANGLES_DATA_KHR: &[Span] = members!(AccelerationStructureGeometryTrianglesDataKHR {
    s_type, p_next, vertex_format, vertex_data, vertex_stride, max_vertex, index_type, index_data,
    transform_data,
});

pub(crate) const ACCELERATION_STRUCTURE_GEOMETRY_AABBS_DATA_KHR: &[Span] = members!(AccelerationStructureGeometryAabbsDataKHR {
    s_type, p_next, data, stride,
});

pub(crate) const ACCELERATION_STRUCTURE_GEOMETRY_INSTANCES_DATA_KHR: &[Span] = members!(AccelerationStructureGeometryInstancesDataKHR {
    s_type, p_next, array_of_pointers, data,
});

pub(crate) const ACCELERATION_STRUCTURE_GEOMETRY_KHR: &[Span] = members!(AccelerationStructureGeometryKHR {
    s_type, p_next, geometry_type, geometry, flags,
});

pub(crate) const ACCELERATION_STRUCTURE_BUILD_GEOMETRY_INFO_KHR: &[Span] = members!(AccelerationStructureBuildGeometryInfoKHR {
    s_type, p_next, ty, flags, mode, src_acceleration_structure, dst_acceleration_structure,
    geometry_count, p_geometries, pp_geometries, scratch_data,
});

pub(crate) const WIN32_SURFACE_CREATE_INFO_KHR: &[Span] = members!(Win32SurfaceCreateInfoKHR {
    s_type, p_next, flags, hinstance, hwnd,
});

pub(crate) const XLIB_SURFACE_CREATE_INFO_KHR: &[Span] = members!(XlibSurfaceCreateInfoKHR {
    s_type, p_next, flags, dpy, window,
});

pub(crate) const XCB_SURFACE_CREATE_INFO_KHR: &[Span] = members!(XcbSurfaceCreateInfoKHR {
    s_type, p_next, flags, connection, window,
});

pub(crate) const WAYLAND_SURFACE_CREATE_INFO_KHR: &[Span] = members!(WaylandSurfaceCreateInfoKHR {
    s_type, p_next, flags, display, surface,
});

pub(crate) const ANDROID_SURFACE_CREATE_INFO_KHR: &[Span] = members!(AndroidSurfaceCreateInfoKHR {
    s_type, p_next, flags, window,
});

pub(crate) const METAL_SURFACE_CREATE_INFO_EXT: &[Span] = members!(MetalSurfaceCreateInfoEXT {
    s_type, p_next, flags, p_layer,
});

// Payload elements with padding

pub(crate) const DESCRIPTOR_IMAGE_INFO: &[Span] = members!(DescriptorImageInfo {
    sampler, image_view, image_layout,
});
