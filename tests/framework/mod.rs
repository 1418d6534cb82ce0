#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use ash::vk;
use ash::vk::Handle;

use vkrecord::{
    Buffer, BufferHandle, CommandBuffer, CommandBufferSettings, DescriptorBinding, DescriptorSetLayout,
    DescriptorSetLayoutHandle, DescriptorWrite, Device, DeviceSettingsBuilder, Error, GpuProfiler, NativeDevice, Pipeline,
    PipelineHandle, RenderPass, RenderPassBegin, RenderPassHandle, RenderPassType, Sampler, SamplerHandle, Texture,
    TextureHandle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedImageBarrier {
    pub image: vk::Image,
    pub old_layout: vk::ImageLayout,
    pub new_layout: vk::ImageLayout,
    pub src_access: vk::AccessFlags,
    pub dst_access: vk::AccessFlags,
    pub aspect: vk::ImageAspectFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedBufferBarrier {
    pub buffer: vk::Buffer,
    pub offset: vk::DeviceSize,
    pub size: vk::DeviceSize,
    pub src_access: vk::AccessFlags,
    pub dst_access: vk::AccessFlags,
}

/// Every native call the recording device received, in order.
#[derive(Debug, Clone)]
pub enum Command {
    CreateDescriptorPool {
        pool: vk::DescriptorPool,
        flags: vk::DescriptorPoolCreateFlags,
        max_sets: u32,
        pool_sizes: Vec<(vk::DescriptorType, u32)>,
    },
    DestroyDescriptorPool(vk::DescriptorPool),
    ResetDescriptorPool(vk::DescriptorPool),
    AllocateDescriptorSet {
        pool: vk::DescriptorPool,
        layout: vk::DescriptorSetLayout,
        set: vk::DescriptorSet,
    },
    UpdateDescriptorSets(Vec<DescriptorWrite>),
    BeginCommandBuffer(vk::CommandBufferUsageFlags),
    EndCommandBuffer,
    BeginRenderPass {
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        render_area: vk::Rect2D,
        clear_value_count: usize,
    },
    EndRenderPass,
    BindPipeline {
        bind_point: vk::PipelineBindPoint,
        pipeline: vk::Pipeline,
    },
    BindVertexBuffers {
        first_binding: u32,
        buffers: Vec<vk::Buffer>,
        offsets: Vec<vk::DeviceSize>,
    },
    BindIndexBuffer {
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        index_type: vk::IndexType,
    },
    BindDescriptorSets {
        bind_point: vk::PipelineBindPoint,
        layout: vk::PipelineLayout,
        first_set: u32,
        sets: Vec<vk::DescriptorSet>,
        dynamic_offsets: Vec<u32>,
    },
    /// x, y, width, height, min depth, max depth
    SetViewport([f32; 6]),
    SetScissor(vk::Rect2D),
    Draw {
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    },
    DrawIndexed {
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    },
    Dispatch(u32, u32, u32),
    DrawIndirect {
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        draw_count: u32,
        stride: u32,
    },
    DrawIndexedIndirect {
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        draw_count: u32,
        stride: u32,
    },
    DispatchIndirect {
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
    },
    PipelineBarrier {
        src_stage: vk::PipelineStageFlags,
        dst_stage: vk::PipelineStageFlags,
        buffers: Vec<RecordedBufferBarrier>,
        images: Vec<RecordedImageBarrier>,
    },
    FillBuffer {
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        size: vk::DeviceSize,
        data: u32,
    },
    BeginDebugLabel(String),
    EndDebugLabel,
}

/// A [`NativeDevice`] that hands out fake handles and logs every call instead of talking to a driver.
#[derive(Debug)]
pub struct RecordingDevice {
    commands: Mutex<Vec<Command>>,
    next_handle: AtomicU64,
    debug_utils: bool,
    fail_allocation: AtomicBool,
}

impl RecordingDevice {
    pub fn new(debug_utils: bool) -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            next_handle: AtomicU64::new(0x10000),
            debug_utils,
            fail_allocation: AtomicBool::new(false),
        }
    }

    fn push(&self, command: Command) {
        self.commands.lock().unwrap().push(command);
    }

    fn next_raw(&self) -> u64 {
        self.next_handle.fetch_add(1, Ordering::Relaxed)
    }

    /// A fresh non-null handle that was never handed out before.
    pub fn fake_handle<H: Handle>(&self) -> H {
        H::from_raw(self.next_raw())
    }

    /// All commands recorded so far.
    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }

    /// Forget all recorded commands.
    pub fn clear(&self) {
        self.commands.lock().unwrap().clear();
    }

    pub fn count(&self, predicate: impl Fn(&Command) -> bool) -> usize {
        self.commands.lock().unwrap().iter().filter(|command| predicate(command)).count()
    }

    /// Make every following descriptor set allocation fail with `ERROR_OUT_OF_POOL_MEMORY`.
    pub fn fail_allocations(&self, fail: bool) {
        self.fail_allocation.store(fail, Ordering::Relaxed);
    }
}

impl NativeDevice for RecordingDevice {
    fn create_descriptor_pool(
        &self,
        flags: vk::DescriptorPoolCreateFlags,
        max_sets: u32,
        pool_sizes: &[vk::DescriptorPoolSize],
    ) -> Result<vk::DescriptorPool> {
        let pool = vk::DescriptorPool::from_raw(self.next_raw());
        self.push(Command::CreateDescriptorPool {
            pool,
            flags,
            max_sets,
            pool_sizes: pool_sizes.iter().map(|size| (size.ty, size.descriptor_count)).collect(),
        });
        Ok(pool)
    }

    fn destroy_descriptor_pool(&self, pool: vk::DescriptorPool) {
        self.push(Command::DestroyDescriptorPool(pool));
    }

    fn reset_descriptor_pool(&self, pool: vk::DescriptorPool) -> Result<()> {
        self.push(Command::ResetDescriptorPool(pool));
        Ok(())
    }

    fn allocate_descriptor_set(&self, pool: vk::DescriptorPool, layout: vk::DescriptorSetLayout) -> Result<vk::DescriptorSet> {
        if self.fail_allocation.load(Ordering::Relaxed) {
            return Err(Error::VkError(vk::Result::ERROR_OUT_OF_POOL_MEMORY).into());
        }
        let set = vk::DescriptorSet::from_raw(self.next_raw());
        self.push(Command::AllocateDescriptorSet {
            pool,
            layout,
            set,
        });
        Ok(set)
    }

    fn update_descriptor_sets(&self, writes: &[DescriptorWrite]) {
        self.push(Command::UpdateDescriptorSets(writes.to_vec()));
    }

    fn begin_command_buffer(&self, _cmd: vk::CommandBuffer, flags: vk::CommandBufferUsageFlags) -> Result<()> {
        self.push(Command::BeginCommandBuffer(flags));
        Ok(())
    }

    fn end_command_buffer(&self, _cmd: vk::CommandBuffer) -> Result<()> {
        self.push(Command::EndCommandBuffer);
        Ok(())
    }

    fn cmd_begin_render_pass(&self, _cmd: vk::CommandBuffer, begin: &RenderPassBegin) {
        self.push(Command::BeginRenderPass {
            render_pass: begin.render_pass,
            framebuffer: begin.framebuffer,
            render_area: begin.render_area,
            clear_value_count: begin.clear_values.len(),
        });
    }

    fn cmd_end_render_pass(&self, _cmd: vk::CommandBuffer) {
        self.push(Command::EndRenderPass);
    }

    fn cmd_bind_pipeline(&self, _cmd: vk::CommandBuffer, bind_point: vk::PipelineBindPoint, pipeline: vk::Pipeline) {
        self.push(Command::BindPipeline {
            bind_point,
            pipeline,
        });
    }

    fn cmd_bind_vertex_buffers(&self, _cmd: vk::CommandBuffer, first_binding: u32, buffers: &[vk::Buffer], offsets: &[vk::DeviceSize]) {
        self.push(Command::BindVertexBuffers {
            first_binding,
            buffers: buffers.to_vec(),
            offsets: offsets.to_vec(),
        });
    }

    fn cmd_bind_index_buffer(&self, _cmd: vk::CommandBuffer, buffer: vk::Buffer, offset: vk::DeviceSize, index_type: vk::IndexType) {
        self.push(Command::BindIndexBuffer {
            buffer,
            offset,
            index_type,
        });
    }

    fn cmd_bind_descriptor_sets(
        &self,
        _cmd: vk::CommandBuffer,
        bind_point: vk::PipelineBindPoint,
        layout: vk::PipelineLayout,
        first_set: u32,
        sets: &[vk::DescriptorSet],
        dynamic_offsets: &[u32],
    ) {
        self.push(Command::BindDescriptorSets {
            bind_point,
            layout,
            first_set,
            sets: sets.to_vec(),
            dynamic_offsets: dynamic_offsets.to_vec(),
        });
    }

    fn cmd_set_viewport(&self, _cmd: vk::CommandBuffer, viewport: &vk::Viewport) {
        self.push(Command::SetViewport([
            viewport.x,
            viewport.y,
            viewport.width,
            viewport.height,
            viewport.min_depth,
            viewport.max_depth,
        ]));
    }

    fn cmd_set_scissor(&self, _cmd: vk::CommandBuffer, scissor: &vk::Rect2D) {
        self.push(Command::SetScissor(*scissor));
    }

    fn cmd_draw(&self, _cmd: vk::CommandBuffer, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32) {
        self.push(Command::Draw {
            vertex_count,
            instance_count,
            first_vertex,
            first_instance,
        });
    }

    fn cmd_draw_indexed(
        &self,
        _cmd: vk::CommandBuffer,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) {
        self.push(Command::DrawIndexed {
            index_count,
            instance_count,
            first_index,
            vertex_offset,
            first_instance,
        });
    }

    fn cmd_dispatch(&self, _cmd: vk::CommandBuffer, x: u32, y: u32, z: u32) {
        self.push(Command::Dispatch(x, y, z));
    }

    fn cmd_draw_indirect(&self, _cmd: vk::CommandBuffer, buffer: vk::Buffer, offset: vk::DeviceSize, draw_count: u32, stride: u32) {
        self.push(Command::DrawIndirect {
            buffer,
            offset,
            draw_count,
            stride,
        });
    }

    fn cmd_draw_indexed_indirect(&self, _cmd: vk::CommandBuffer, buffer: vk::Buffer, offset: vk::DeviceSize, draw_count: u32, stride: u32) {
        self.push(Command::DrawIndexedIndirect {
            buffer,
            offset,
            draw_count,
            stride,
        });
    }

    fn cmd_dispatch_indirect(&self, _cmd: vk::CommandBuffer, buffer: vk::Buffer, offset: vk::DeviceSize) {
        self.push(Command::DispatchIndirect {
            buffer,
            offset,
        });
    }

    fn cmd_pipeline_barrier(
        &self,
        _cmd: vk::CommandBuffer,
        src_stage: vk::PipelineStageFlags,
        dst_stage: vk::PipelineStageFlags,
        buffer_barriers: &[vk::BufferMemoryBarrier],
        image_barriers: &[vk::ImageMemoryBarrier],
    ) {
        self.push(Command::PipelineBarrier {
            src_stage,
            dst_stage,
            buffers: buffer_barriers
                .iter()
                .map(|barrier| RecordedBufferBarrier {
                    buffer: barrier.buffer,
                    offset: barrier.offset,
                    size: barrier.size,
                    src_access: barrier.src_access_mask,
                    dst_access: barrier.dst_access_mask,
                })
                .collect(),
            images: image_barriers
                .iter()
                .map(|barrier| RecordedImageBarrier {
                    image: barrier.image,
                    old_layout: barrier.old_layout,
                    new_layout: barrier.new_layout,
                    src_access: barrier.src_access_mask,
                    dst_access: barrier.dst_access_mask,
                    aspect: barrier.subresource_range.aspect_mask,
                })
                .collect(),
        });
    }

    fn cmd_fill_buffer(&self, _cmd: vk::CommandBuffer, buffer: vk::Buffer, offset: vk::DeviceSize, size: vk::DeviceSize, data: u32) {
        self.push(Command::FillBuffer {
            buffer,
            offset,
            size,
            data,
        });
    }

    fn debug_utils_present(&self) -> bool {
        self.debug_utils
    }

    fn cmd_begin_debug_label(&self, _cmd: vk::CommandBuffer, name: &str) -> Result<()> {
        self.push(Command::BeginDebugLabel(name.to_owned()));
        Ok(())
    }

    fn cmd_end_debug_label(&self, _cmd: vk::CommandBuffer) {
        self.push(Command::EndDebugLabel);
    }
}

/// Logs timestamp scopes as `push:<name>` and `pop`.
#[derive(Debug, Default)]
pub struct RecordingProfiler {
    pub events: Mutex<Vec<String>>,
}

impl GpuProfiler for RecordingProfiler {
    fn push_timestamp(&self, _cmd: vk::CommandBuffer, name: &str) {
        self.events.lock().unwrap().push(format!("push:{name}"));
    }

    fn pop_timestamp(&self, _cmd: vk::CommandBuffer) {
        self.events.lock().unwrap().push("pop".to_owned());
    }
}

pub struct Context {
    pub native: Arc<RecordingDevice>,
    pub device: Device,
}

/// Creates a device on top of a recording native device, without debug utils
pub fn make_context() -> Result<Context> {
    make_context_with_debug_utils(false)
}

pub fn make_context_with_debug_utils(debug_utils: bool) -> Result<Context> {
    let _ = pretty_env_logger::try_init();
    let native = Arc::new(RecordingDevice::new(debug_utils));
    let settings = DeviceSettingsBuilder::new().name("vkrecord test framework").build();
    let device = Device::new(native.clone(), settings)?;
    Ok(Context {
        native,
        device,
    })
}

pub fn command_buffer_handle() -> vk::CommandBuffer {
    vk::CommandBuffer::from_raw(0xC0FFEE)
}

/// Creates a graphics command buffer with default settings
pub fn make_command_buffer(context: &Context) -> Result<CommandBuffer> {
    make_command_buffer_with_settings(context, CommandBufferSettings::default())
}

pub fn make_command_buffer_with_settings(context: &Context, settings: CommandBufferSettings) -> Result<CommandBuffer> {
    CommandBuffer::new(context.device.clone(), command_buffer_handle(), settings)
}

pub fn add_render_pass(context: &Context, kind: RenderPassType, width: u32, height: u32) -> Result<RenderPassHandle> {
    let pass = match kind {
        RenderPassType::Compute => RenderPass::compute(),
        _ => RenderPass::new(context.native.fake_handle(), context.native.fake_handle(), kind, width, height),
    };
    context.device.resources()?.add_render_pass(pass)
}

pub fn add_graphics_pipeline(context: &Context) -> Result<PipelineHandle> {
    let pipeline = Pipeline::graphics(context.native.fake_handle(), context.native.fake_handle());
    context.device.resources()?.add_pipeline(pipeline)
}

pub fn add_compute_pipeline(context: &Context) -> Result<PipelineHandle> {
    let pipeline = Pipeline::compute(context.native.fake_handle(), context.native.fake_handle());
    context.device.resources()?.add_pipeline(pipeline)
}

pub fn add_buffer(context: &Context, size: vk::DeviceSize) -> Result<BufferHandle> {
    let buffer = Buffer::new(context.native.fake_handle(), size);
    context.device.resources()?.add_buffer(buffer)
}

pub fn add_buffer_view(context: &Context, parent: BufferHandle, global_offset: u32, size: vk::DeviceSize) -> Result<BufferHandle> {
    context
        .device
        .resources()?
        .add_buffer(Buffer::view(parent, global_offset, size))
}

pub fn add_texture(context: &Context, format: vk::Format) -> Result<TextureHandle> {
    let texture = Texture::new(context.native.fake_handle(), context.native.fake_handle(), format, 256, 256);
    context.device.resources()?.add_texture(texture)
}

pub fn add_sampler(context: &Context) -> Result<SamplerHandle> {
    let sampler = Sampler::new(context.native.fake_handle());
    context.device.resources()?.add_sampler(sampler)
}

pub fn add_layout(context: &Context, bindings: Vec<DescriptorBinding>) -> Result<DescriptorSetLayoutHandle> {
    let layout = DescriptorSetLayout::new(context.native.fake_handle(), bindings);
    context.device.resources()?.add_descriptor_set_layout(layout)
}

/// Error of type [`Error`] inside an `anyhow::Error`, if it is one.
pub fn vkrecord_error(err: &anyhow::Error) -> Option<&Error> {
    err.downcast_ref::<Error>()
}
