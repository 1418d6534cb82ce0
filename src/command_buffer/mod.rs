//! Most functions in this module are a relatively thin wrapper over Vulkan commands.
//!
//! A [`CommandBuffer`] caches the render pass and pipeline that are currently bound, so it can pair native
//! render pass begin and end calls exactly and bind descriptor sets with the right pipeline layout. It also owns
//! a private [`DescriptorSetCache`]: descriptor sets created through [`CommandBuffer::create_descriptor_set`] live
//! until the next [`CommandBuffer::reset`].
//!
//! # Render pass scope
//!
//! A command buffer is either idle, inside a graphics pass or inside a compute pass (see [`RenderPassScope`](state::RenderPassScope)).
//! Only [`CommandBuffer::bind_pass`] opens a native render pass. It is closed again by binding a different pass,
//! by a [`barrier`](CommandBuffer::barrier) or by [`finish`](CommandBuffer::finish). Compute passes never open
//! a native render pass.
//!
//! # Example
//! ```
//! # use vkrecord::*;
//! # use anyhow::Result;
//! fn record_fullscreen(cmd: &mut CommandBuffer, pass: RenderPassHandle, pipeline: PipelineHandle, set: DescriptorSetHandle) -> Result<()> {
//!     cmd.begin()?;
//!     cmd.clear(0.0, 0.0, 0.0, 1.0);
//!     cmd.bind_pass(pass)?;
//!     cmd.bind_pipeline(pipeline)?;
//!     cmd.set_viewport(None)?;
//!     cmd.set_scissor(None)?;
//!     cmd.bind_descriptor_set(&[set])?;
//!     cmd.draw(3, 1, 0, 0);
//!     cmd.finish()
//! }
//! ```

use anyhow::Result;
use ash::vk;

use crate::command_buffer::state::{BoundPipeline, BoundRenderPass, RenderPassScope};
use crate::{CommandBufferSettings, DescriptorPoolSize, DescriptorSetCache, Device, Error, QueueType};

pub mod compute;
pub mod descriptor;
pub mod graphics;
pub mod state;
pub mod sync;
pub mod transfer;

/// Records commands into a single native command buffer. See the [module level documentation](self) for an overview.
///
/// A command buffer is recorded by one thread at a time. Different command buffers may record concurrently, they only
/// share the device's resource registry and descriptor set cache, both of which are locked while in use.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct CommandBuffer {
    #[derivative(Debug = "ignore")]
    device: Device,
    handle: vk::CommandBuffer,
    settings: CommandBufferSettings,
    is_recording: bool,
    current_render_pass: Option<BoundRenderPass>,
    current_pipeline: Option<BoundPipeline>,
    #[derivative(Debug = "ignore")]
    clears: [vk::ClearValue; 2],
    /// `None` once the command buffer was terminated.
    descriptor_sets: Option<DescriptorSetCache>,
}

impl CommandBuffer {
    /// Prepare recording into `handle`. This creates the private descriptor pool and descriptor set table,
    /// then resets the command buffer.
    /// # Errors
    /// Fails if the descriptor pool can not be created. This is not recoverable.
    pub fn new(device: Device, handle: vk::CommandBuffer, settings: CommandBufferSettings) -> Result<Self> {
        let descriptor_sets = DescriptorSetCache::new(
            device.native(),
            DescriptorPoolSize::new(settings.descriptor_pool_elements),
            settings.descriptor_set_capacity,
        )?;

        #[cfg(feature = "log-objects")]
        trace!("Initialized command buffer {handle:p} for queue {:?}", settings.queue_type);

        let mut cmd = Self {
            device,
            handle,
            settings,
            is_recording: false,
            current_render_pass: None,
            current_pipeline: None,
            clears: [
                vk::ClearValue {
                    color: vk::ClearColorValue {
                        float32: [0.0, 0.0, 0.0, 1.0],
                    },
                },
                vk::ClearValue {
                    depth_stencil: vk::ClearDepthStencilValue {
                        depth: 1.0,
                        stencil: 0,
                    },
                },
            ],
            descriptor_sets: Some(descriptor_sets),
        };
        cmd.reset()?;
        Ok(cmd)
    }

    /// Stop recording, forget the bound pass and pipeline, and release every descriptor set created through this
    /// command buffer. Their handles become invalid. Resetting twice has the same effect as resetting once.
    ///
    /// The GPU must be done with the previous recording before this is called.
    pub fn reset(&mut self) -> Result<()> {
        self.is_recording = false;
        self.current_render_pass = None;
        self.current_pipeline = None;
        if let Some(descriptor_sets) = &mut self.descriptor_sets {
            descriptor_sets.reset(self.device.native())?;
        }
        Ok(())
    }

    /// Reset the command buffer and destroy its descriptor pool. Calling this more than once does nothing.
    /// After termination, operations that need descriptor sets fail with [`Error::CommandBufferTerminated`].
    pub fn terminate(&mut self) -> Result<()> {
        self.is_recording = false;
        self.reset()?;
        if let Some(mut descriptor_sets) = self.descriptor_sets.take() {
            descriptor_sets.destroy(self.device.native());
            #[cfg(feature = "log-objects")]
            trace!("Terminated command buffer {:p}", self.handle);
        }
        Ok(())
    }

    /// Begin native recording. The recording is submitted once.
    pub fn begin(&mut self) -> Result<()> {
        self.device
            .native()
            .begin_command_buffer(self.handle, vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT)?;
        self.is_recording = true;
        Ok(())
    }

    /// End the current graphics pass, if any, and end native recording.
    pub fn finish(&mut self) -> Result<()> {
        self.end_render_pass();
        self.device.native().end_command_buffer(self.handle)?;
        self.is_recording = false;
        Ok(())
    }

    /// Record a native render pass end if a graphics pass is open, and forget the bound pass.
    pub(crate) fn end_render_pass(&mut self) {
        if let Some(pass) = self.current_render_pass.take() {
            if !pass.is_compute() {
                self.device.native().cmd_end_render_pass(self.handle);
            }
        }
    }

    /// Open a named marker. The GPU profiler always receives a timestamp, a debug label is only recorded
    /// if debug utils are available.
    pub fn push_marker(&mut self, name: &str) -> Result<()> {
        if let Some(profiler) = self.device.profiler()? {
            profiler.push_timestamp(self.handle, name);
        }
        if self.device.debug_utils_present() {
            self.device.native().cmd_begin_debug_label(self.handle, name)?;
        }
        Ok(())
    }

    /// Close the marker opened last by [`CommandBuffer::push_marker`].
    pub fn pop_marker(&mut self) -> Result<()> {
        if let Some(profiler) = self.device.profiler()? {
            profiler.pop_timestamp(self.handle);
        }
        if self.device.debug_utils_present() {
            self.device.native().cmd_end_debug_label(self.handle);
        }
        Ok(())
    }

    /// Get unsafe access to the underlying command buffer
    /// # Safety
    /// Any vulkan calls that modify the command buffer state may lead to validation errors or put the
    /// system in an undefined state.
    pub unsafe fn handle(&self) -> vk::CommandBuffer {
        self.handle
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn settings(&self) -> &CommandBufferSettings {
        &self.settings
    }

    pub fn queue_type(&self) -> QueueType {
        self.settings.queue_type
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    pub fn current_render_pass(&self) -> Option<BoundRenderPass> {
        self.current_render_pass
    }

    pub fn current_pipeline(&self) -> Option<BoundPipeline> {
        self.current_pipeline
    }

    pub fn render_pass_scope(&self) -> RenderPassScope {
        match self.current_render_pass {
            None => RenderPassScope::Idle,
            Some(pass) if pass.is_compute() => RenderPassScope::Compute(pass.handle),
            Some(pass) => RenderPassScope::Graphics(pass.handle),
        }
    }

    /// Clear values used when a render pass begins. Index 0 is the color clear, index 1 depth and stencil.
    pub fn clear_values(&self) -> &[vk::ClearValue; 2] {
        &self.clears
    }

    /// The private descriptor set cache, or `None` after [`CommandBuffer::terminate`].
    pub fn descriptor_sets(&self) -> Option<&DescriptorSetCache> {
        self.descriptor_sets.as_ref()
    }

    pub(crate) fn descriptor_sets_mut(&mut self) -> Result<&mut DescriptorSetCache> {
        self.descriptor_sets
            .as_mut()
            .ok_or_else(|| Error::CommandBufferTerminated.into())
    }
}

impl Drop for CommandBuffer {
    fn drop(&mut self) {
        if let Err(err) = self.terminate() {
            error!("Failed to terminate command buffer: {err}");
        }
    }
}

static_assertions::assert_impl_all!(CommandBuffer: Send);
