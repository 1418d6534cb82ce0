//! The native device boundary. Every driver call vkrecord makes goes through the [`NativeDevice`] trait,
//! so the recording logic can run against a real `VkDevice` through [`AshDevice`], or against any other
//! implementation (for example a command log in tests).

use std::ffi::CString;

use anyhow::Result;
use ash::extensions::ext::DebugUtils;
use ash::vk;
use smallvec::SmallVec;

use crate::descriptor::descriptor_set::{DescriptorWrite, DescriptorWriteInfo};
use crate::Error;

/// Parameters for `vkCmdBeginRenderPass`. Subpass contents are always inline.
#[derive(Derivative, Copy, Clone)]
#[derivative(Debug)]
pub struct RenderPassBegin<'a> {
    pub render_pass: vk::RenderPass,
    pub framebuffer: vk::Framebuffer,
    pub render_area: vk::Rect2D,
    #[derivative(Debug = "ignore")]
    pub clear_values: &'a [vk::ClearValue],
}

/// Native driver calls used by the command buffer and the descriptor caches.
///
/// Implementors must forward each call to the driver unchanged. Handles passed in are always obtained
/// from the same implementation, or from the resource registry.
pub trait NativeDevice: Send + Sync {
    fn create_descriptor_pool(
        &self,
        flags: vk::DescriptorPoolCreateFlags,
        max_sets: u32,
        pool_sizes: &[vk::DescriptorPoolSize],
    ) -> Result<vk::DescriptorPool>;
    fn destroy_descriptor_pool(&self, pool: vk::DescriptorPool);
    fn reset_descriptor_pool(&self, pool: vk::DescriptorPool) -> Result<()>;
    fn allocate_descriptor_set(&self, pool: vk::DescriptorPool, layout: vk::DescriptorSetLayout) -> Result<vk::DescriptorSet>;
    fn update_descriptor_sets(&self, writes: &[DescriptorWrite]);

    fn begin_command_buffer(&self, cmd: vk::CommandBuffer, flags: vk::CommandBufferUsageFlags) -> Result<()>;
    fn end_command_buffer(&self, cmd: vk::CommandBuffer) -> Result<()>;

    fn cmd_begin_render_pass(&self, cmd: vk::CommandBuffer, begin: &RenderPassBegin);
    fn cmd_end_render_pass(&self, cmd: vk::CommandBuffer);
    fn cmd_bind_pipeline(&self, cmd: vk::CommandBuffer, bind_point: vk::PipelineBindPoint, pipeline: vk::Pipeline);
    fn cmd_bind_vertex_buffers(&self, cmd: vk::CommandBuffer, first_binding: u32, buffers: &[vk::Buffer], offsets: &[vk::DeviceSize]);
    fn cmd_bind_index_buffer(&self, cmd: vk::CommandBuffer, buffer: vk::Buffer, offset: vk::DeviceSize, index_type: vk::IndexType);
    fn cmd_bind_descriptor_sets(
        &self,
        cmd: vk::CommandBuffer,
        bind_point: vk::PipelineBindPoint,
        layout: vk::PipelineLayout,
        first_set: u32,
        sets: &[vk::DescriptorSet],
        dynamic_offsets: &[u32],
    );
    fn cmd_set_viewport(&self, cmd: vk::CommandBuffer, viewport: &vk::Viewport);
    fn cmd_set_scissor(&self, cmd: vk::CommandBuffer, scissor: &vk::Rect2D);
    fn cmd_draw(&self, cmd: vk::CommandBuffer, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32);
    fn cmd_draw_indexed(
        &self,
        cmd: vk::CommandBuffer,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    );
    fn cmd_dispatch(&self, cmd: vk::CommandBuffer, x: u32, y: u32, z: u32);
    fn cmd_draw_indirect(&self, cmd: vk::CommandBuffer, buffer: vk::Buffer, offset: vk::DeviceSize, draw_count: u32, stride: u32);
    fn cmd_draw_indexed_indirect(&self, cmd: vk::CommandBuffer, buffer: vk::Buffer, offset: vk::DeviceSize, draw_count: u32, stride: u32);
    fn cmd_dispatch_indirect(&self, cmd: vk::CommandBuffer, buffer: vk::Buffer, offset: vk::DeviceSize);
    fn cmd_pipeline_barrier(
        &self,
        cmd: vk::CommandBuffer,
        src_stage: vk::PipelineStageFlags,
        dst_stage: vk::PipelineStageFlags,
        buffer_barriers: &[vk::BufferMemoryBarrier],
        image_barriers: &[vk::ImageMemoryBarrier],
    );
    fn cmd_fill_buffer(&self, cmd: vk::CommandBuffer, buffer: vk::Buffer, offset: vk::DeviceSize, size: vk::DeviceSize, data: u32);

    /// Whether `VK_EXT_debug_utils` is available. Debug labels are only recorded if this returns true.
    fn debug_utils_present(&self) -> bool;
    /// Only called when the device reports debug utils support.
    fn cmd_begin_debug_label(&self, cmd: vk::CommandBuffer, name: &str) -> Result<()>;
    /// Only called when the device reports debug utils support.
    fn cmd_end_debug_label(&self, cmd: vk::CommandBuffer);
}

/// [`NativeDevice`] implementation over an `ash::Device`.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct AshDevice {
    #[derivative(Debug = "ignore")]
    handle: ash::Device,
    #[derivative(Debug = "ignore")]
    debug_utils: Option<DebugUtils>,
}

impl AshDevice {
    /// Wrap a logical device. Pass the debug utils loader if `VK_EXT_debug_utils` was enabled on the instance.
    pub fn new(handle: ash::Device, debug_utils: Option<DebugUtils>) -> Self {
        Self {
            handle,
            debug_utils,
        }
    }

    /// Get unsafe access to the underlying `ash::Device`.
    /// # Safety
    /// Destroying objects owned by vkrecord through this handle leads to undefined behaviour.
    pub unsafe fn handle(&self) -> &ash::Device {
        &self.handle
    }
}

enum WriteSlot {
    Image(usize),
    Buffer(usize),
}

impl NativeDevice for AshDevice {
    fn create_descriptor_pool(
        &self,
        flags: vk::DescriptorPoolCreateFlags,
        max_sets: u32,
        pool_sizes: &[vk::DescriptorPoolSize],
    ) -> Result<vk::DescriptorPool> {
        let info = vk::DescriptorPoolCreateInfo {
            flags,
            max_sets,
            pool_size_count: pool_sizes.len() as u32,
            p_pool_sizes: pool_sizes.as_ptr(),
            ..Default::default()
        };
        // SAFETY: pool_sizes outlives this call, and the device handle is valid.
        let handle = unsafe { self.handle.create_descriptor_pool(&info, None) }.map_err(Error::from)?;
        Ok(handle)
    }

    fn destroy_descriptor_pool(&self, pool: vk::DescriptorPool) {
        unsafe {
            self.handle.destroy_descriptor_pool(pool, None);
        }
    }

    fn reset_descriptor_pool(&self, pool: vk::DescriptorPool) -> Result<()> {
        unsafe { self.handle.reset_descriptor_pool(pool, vk::DescriptorPoolResetFlags::empty()) }.map_err(Error::from)?;
        Ok(())
    }

    fn allocate_descriptor_set(&self, pool: vk::DescriptorPool, layout: vk::DescriptorSetLayout) -> Result<vk::DescriptorSet> {
        let info = vk::DescriptorSetAllocateInfo {
            descriptor_pool: pool,
            descriptor_set_count: 1,
            p_set_layouts: &layout,
            ..Default::default()
        };
        let sets = unsafe { self.handle.allocate_descriptor_sets(&info) }.map_err(Error::from)?;
        sets.first()
            .copied()
            .ok_or_else(|| anyhow::Error::from(Error::VkError(vk::Result::ERROR_OUT_OF_POOL_MEMORY)))
    }

    fn update_descriptor_sets(&self, writes: &[DescriptorWrite]) {
        // Infos are collected first so the pointers stored in the writes stay valid.
        let mut image_info = SmallVec::<[vk::DescriptorImageInfo; 8]>::new();
        let mut buffer_info = SmallVec::<[vk::DescriptorBufferInfo; 8]>::new();
        let slots = writes
            .iter()
            .map(|write| match write.info {
                DescriptorWriteInfo::Image {
                    sampler,
                    view,
                    layout,
                } => {
                    image_info.push(vk::DescriptorImageInfo {
                        sampler,
                        image_view: view,
                        image_layout: layout,
                    });
                    WriteSlot::Image(image_info.len() - 1)
                }
                DescriptorWriteInfo::Buffer {
                    buffer,
                    offset,
                    range,
                } => {
                    buffer_info.push(vk::DescriptorBufferInfo {
                        buffer,
                        offset,
                        range,
                    });
                    WriteSlot::Buffer(buffer_info.len() - 1)
                }
            })
            .collect::<SmallVec<[WriteSlot; 8]>>();

        let vk_writes = writes
            .iter()
            .zip(slots.iter())
            .map(|(write, slot)| vk::WriteDescriptorSet {
                dst_set: write.set,
                dst_binding: write.binding,
                dst_array_element: 0,
                descriptor_count: 1,
                descriptor_type: write.ty,
                p_image_info: match slot {
                    WriteSlot::Image(index) => &image_info[*index],
                    WriteSlot::Buffer(_) => std::ptr::null(),
                },
                p_buffer_info: match slot {
                    WriteSlot::Buffer(index) => &buffer_info[*index],
                    WriteSlot::Image(_) => std::ptr::null(),
                },
                ..Default::default()
            })
            .collect::<SmallVec<[vk::WriteDescriptorSet; 8]>>();

        unsafe {
            self.handle.update_descriptor_sets(&vk_writes, &[]);
        }
    }

    fn begin_command_buffer(&self, cmd: vk::CommandBuffer, flags: vk::CommandBufferUsageFlags) -> Result<()> {
        let info = vk::CommandBufferBeginInfo {
            flags,
            ..Default::default()
        };
        unsafe { self.handle.begin_command_buffer(cmd, &info) }.map_err(Error::from)?;
        Ok(())
    }

    fn end_command_buffer(&self, cmd: vk::CommandBuffer) -> Result<()> {
        unsafe { self.handle.end_command_buffer(cmd) }.map_err(Error::from)?;
        Ok(())
    }

    fn cmd_begin_render_pass(&self, cmd: vk::CommandBuffer, begin: &RenderPassBegin) {
        let info = vk::RenderPassBeginInfo {
            render_pass: begin.render_pass,
            framebuffer: begin.framebuffer,
            render_area: begin.render_area,
            clear_value_count: begin.clear_values.len() as u32,
            p_clear_values: begin.clear_values.as_ptr(),
            ..Default::default()
        };
        unsafe {
            self.handle.cmd_begin_render_pass(cmd, &info, vk::SubpassContents::INLINE);
        }
    }

    fn cmd_end_render_pass(&self, cmd: vk::CommandBuffer) {
        unsafe {
            self.handle.cmd_end_render_pass(cmd);
        }
    }

    fn cmd_bind_pipeline(&self, cmd: vk::CommandBuffer, bind_point: vk::PipelineBindPoint, pipeline: vk::Pipeline) {
        unsafe {
            self.handle.cmd_bind_pipeline(cmd, bind_point, pipeline);
        }
    }

    fn cmd_bind_vertex_buffers(&self, cmd: vk::CommandBuffer, first_binding: u32, buffers: &[vk::Buffer], offsets: &[vk::DeviceSize]) {
        unsafe {
            self.handle.cmd_bind_vertex_buffers(cmd, first_binding, buffers, offsets);
        }
    }

    fn cmd_bind_index_buffer(&self, cmd: vk::CommandBuffer, buffer: vk::Buffer, offset: vk::DeviceSize, index_type: vk::IndexType) {
        unsafe {
            self.handle.cmd_bind_index_buffer(cmd, buffer, offset, index_type);
        }
    }

    fn cmd_bind_descriptor_sets(
        &self,
        cmd: vk::CommandBuffer,
        bind_point: vk::PipelineBindPoint,
        layout: vk::PipelineLayout,
        first_set: u32,
        sets: &[vk::DescriptorSet],
        dynamic_offsets: &[u32],
    ) {
        unsafe {
            self.handle
                .cmd_bind_descriptor_sets(cmd, bind_point, layout, first_set, sets, dynamic_offsets);
        }
    }

    fn cmd_set_viewport(&self, cmd: vk::CommandBuffer, viewport: &vk::Viewport) {
        unsafe {
            self.handle.cmd_set_viewport(cmd, 0, std::slice::from_ref(viewport));
        }
    }

    fn cmd_set_scissor(&self, cmd: vk::CommandBuffer, scissor: &vk::Rect2D) {
        unsafe {
            self.handle.cmd_set_scissor(cmd, 0, std::slice::from_ref(scissor));
        }
    }

    fn cmd_draw(&self, cmd: vk::CommandBuffer, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32) {
        unsafe {
            self.handle
                .cmd_draw(cmd, vertex_count, instance_count, first_vertex, first_instance);
        }
    }

    fn cmd_draw_indexed(
        &self,
        cmd: vk::CommandBuffer,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) {
        unsafe {
            self.handle
                .cmd_draw_indexed(cmd, index_count, instance_count, first_index, vertex_offset, first_instance);
        }
    }

    fn cmd_dispatch(&self, cmd: vk::CommandBuffer, x: u32, y: u32, z: u32) {
        unsafe {
            self.handle.cmd_dispatch(cmd, x, y, z);
        }
    }

    fn cmd_draw_indirect(&self, cmd: vk::CommandBuffer, buffer: vk::Buffer, offset: vk::DeviceSize, draw_count: u32, stride: u32) {
        unsafe {
            self.handle.cmd_draw_indirect(cmd, buffer, offset, draw_count, stride);
        }
    }

    fn cmd_draw_indexed_indirect(&self, cmd: vk::CommandBuffer, buffer: vk::Buffer, offset: vk::DeviceSize, draw_count: u32, stride: u32) {
        unsafe {
            self.handle
                .cmd_draw_indexed_indirect(cmd, buffer, offset, draw_count, stride);
        }
    }

    fn cmd_dispatch_indirect(&self, cmd: vk::CommandBuffer, buffer: vk::Buffer, offset: vk::DeviceSize) {
        unsafe {
            self.handle.cmd_dispatch_indirect(cmd, buffer, offset);
        }
    }

    fn cmd_pipeline_barrier(
        &self,
        cmd: vk::CommandBuffer,
        src_stage: vk::PipelineStageFlags,
        dst_stage: vk::PipelineStageFlags,
        buffer_barriers: &[vk::BufferMemoryBarrier],
        image_barriers: &[vk::ImageMemoryBarrier],
    ) {
        unsafe {
            self.handle.cmd_pipeline_barrier(
                cmd,
                src_stage,
                dst_stage,
                vk::DependencyFlags::empty(),
                &[],
                buffer_barriers,
                image_barriers,
            );
        }
    }

    fn cmd_fill_buffer(&self, cmd: vk::CommandBuffer, buffer: vk::Buffer, offset: vk::DeviceSize, size: vk::DeviceSize, data: u32) {
        unsafe {
            self.handle.cmd_fill_buffer(cmd, buffer, offset, size, data);
        }
    }

    fn debug_utils_present(&self) -> bool {
        self.debug_utils.is_some()
    }

    fn cmd_begin_debug_label(&self, cmd: vk::CommandBuffer, name: &str) -> Result<()> {
        if let Some(debug_utils) = &self.debug_utils {
            let name = CString::new(name).map_err(Error::from)?;
            let label = vk::DebugUtilsLabelEXT {
                p_label_name: name.as_ptr(),
                color: [1.0, 1.0, 1.0, 1.0],
                ..Default::default()
            };
            unsafe {
                debug_utils.cmd_begin_debug_utils_label(cmd, &label);
            }
        }
        Ok(())
    }

    fn cmd_end_debug_label(&self, cmd: vk::CommandBuffer) {
        if let Some(debug_utils) = &self.debug_utils {
            unsafe {
                debug_utils.cmd_end_debug_utils_label(cmd);
            }
        }
    }
}
