//! Batched pipeline barriers.
//!
//! An [`ExecutionBarrier`] describes a transition between two [`PipelineStage`]s for up to
//! [`MAX_BARRIERS`] images and buffers. It is translated into a single `vkCmdPipelineBarrier` call by
//! [`CommandBuffer::barrier`](crate::CommandBuffer::barrier).
//!
//! # Example
//! ```
//! # use vkrecord::*;
//! # use anyhow::Result;
//! fn gbuffer_to_lighting(cmd: &mut CommandBuffer, albedo: TextureHandle, normals: TextureHandle, depth: TextureHandle) -> Result<()> {
//!     let barrier = ExecutionBarrier::new()
//!         .set(PipelineStage::RenderTarget, PipelineStage::FragmentShader)
//!         .add_image_barrier(ImageBarrier::new(albedo))
//!         .add_image_barrier(ImageBarrier::new(normals))
//!         .add_image_barrier(ImageBarrier::new(depth));
//!     cmd.barrier(&barrier)
//! }
//! ```

use anyhow::Result;
use ash::vk;
use smallvec::SmallVec;

use crate::descriptor::check_batch;
use crate::sync::state::{determine_pipeline_stage_flags, to_access_flags, to_image_layout, PipelineStage, ResourceState};
use crate::{BufferHandle, ResourceRegistry, TextureHandle};

/// Maximum number of image barriers and of memory barriers in one [`ExecutionBarrier`].
pub const MAX_BARRIERS: usize = 8;

/// Selects how access masks, layouts and stage masks of a barrier are derived.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BarrierMode {
    /// Masks come from the stage pair alone and every image gets the same target layout for its aspect.
    /// Used for simple pass to pass transitions.
    #[default]
    Legacy,
    /// Every resource is transitioned from its own state, and stage masks are derived from the union of all
    /// access masks in the batch.
    Explicit,
}

/// Transition of a single texture.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ImageBarrier {
    pub texture: TextureHandle,
    /// Current and next state. Only used in [`BarrierMode::Explicit`]. If not set, the states are derived
    /// from the stages of the barrier and the format of the texture.
    pub states: Option<(ResourceState, ResourceState)>,
}

impl ImageBarrier {
    pub fn new(texture: TextureHandle) -> Self {
        Self {
            texture,
            states: None,
        }
    }

    pub fn with_states(mut self, current: ResourceState, next: ResourceState) -> Self {
        self.states = Some((current, next));
        self
    }
}

/// Transition of a whole buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MemoryBarrier {
    pub buffer: BufferHandle,
    /// Current and next state. Only used in [`BarrierMode::Explicit`].
    pub states: Option<(ResourceState, ResourceState)>,
}

impl MemoryBarrier {
    pub fn new(buffer: BufferHandle) -> Self {
        Self {
            buffer,
            states: None,
        }
    }

    pub fn with_states(mut self, current: ResourceState, next: ResourceState) -> Self {
        self.states = Some((current, next));
        self
    }
}

/// A batch of image and buffer transitions between two pipeline stages.
///
/// The builder does not limit the number of barriers, [`CommandBuffer::barrier`](crate::CommandBuffer::barrier)
/// rejects batches larger than [`MAX_BARRIERS`] before recording anything.
#[derive(Debug, Default, Clone)]
pub struct ExecutionBarrier {
    pub source_pipeline_stage: PipelineStage,
    pub destination_pipeline_stage: PipelineStage,
    pub mode: BarrierMode,
    pub image_barriers: SmallVec<[ImageBarrier; MAX_BARRIERS]>,
    pub memory_barriers: SmallVec<[MemoryBarrier; MAX_BARRIERS]>,
}

impl ExecutionBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all barriers and go back to legacy mode.
    pub fn reset(mut self) -> Self {
        self.image_barriers.clear();
        self.memory_barriers.clear();
        self.mode = BarrierMode::Legacy;
        self
    }

    pub fn set(mut self, source: PipelineStage, destination: PipelineStage) -> Self {
        self.source_pipeline_stage = source;
        self.destination_pipeline_stage = destination;
        self
    }

    pub fn set_mode(mut self, mode: BarrierMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn add_image_barrier(mut self, barrier: ImageBarrier) -> Self {
        self.image_barriers.push(barrier);
        self
    }

    pub fn add_memory_barrier(mut self, barrier: MemoryBarrier) -> Self {
        self.memory_barriers.push(barrier);
        self
    }

    pub fn num_image_barriers(&self) -> usize {
        self.image_barriers.len()
    }

    pub fn num_memory_barriers(&self) -> usize {
        self.memory_barriers.len()
    }

    pub(crate) fn check_capacity(&self) -> Result<()> {
        check_batch("image barriers", self.image_barriers.len(), MAX_BARRIERS)?;
        check_batch("memory barriers", self.memory_barriers.len(), MAX_BARRIERS)?;
        Ok(())
    }

    /// Translate the barrier into native structures. The registry is only read, layouts to store in the
    /// textures afterwards are returned in [`NativeBarrier::new_layouts`].
    pub(crate) fn translate(&self, registry: &ResourceRegistry) -> Result<NativeBarrier> {
        self.check_capacity()?;
        match self.mode {
            BarrierMode::Legacy => self.translate_legacy(registry),
            BarrierMode::Explicit => self.translate_explicit(registry),
        }
    }

    fn translate_legacy(&self, registry: &ResourceRegistry) -> Result<NativeBarrier> {
        let shader_access = vk::AccessFlags::SHADER_READ | vk::AccessFlags::SHADER_WRITE;
        let depth_access = vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ | vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE;

        let mut new_layout = vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL;
        let mut new_depth_layout = vk::ImageLayout::DEPTH_STENCIL_READ_ONLY_OPTIMAL;
        let mut src_access = shader_access;
        let mut src_buffer_access = shader_access;
        let mut src_depth_access = depth_access;
        let mut dst_access = shader_access;
        let mut dst_buffer_access = shader_access;
        let mut dst_depth_access = depth_access;

        match self.destination_pipeline_stage {
            PipelineStage::ComputeShader => new_layout = vk::ImageLayout::GENERAL,
            PipelineStage::RenderTarget => {
                new_layout = vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL;
                new_depth_layout = vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL;
                dst_access = vk::AccessFlags::COLOR_ATTACHMENT_READ | vk::AccessFlags::COLOR_ATTACHMENT_WRITE;
                dst_depth_access = depth_access;
            }
            PipelineStage::DrawIndirect => dst_buffer_access = vk::AccessFlags::INDIRECT_COMMAND_READ,
            _ => {}
        }

        match self.source_pipeline_stage {
            PipelineStage::RenderTarget => {
                src_access = vk::AccessFlags::COLOR_ATTACHMENT_WRITE;
                src_depth_access = vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE;
            }
            PipelineStage::DrawIndirect => src_buffer_access = vk::AccessFlags::INDIRECT_COMMAND_READ,
            _ => {}
        }

        let mut native = NativeBarrier {
            src_stage: self.source_pipeline_stage.to_vk(),
            dst_stage: self.destination_pipeline_stage.to_vk(),
            ..Default::default()
        };

        let mut has_depth = false;
        for barrier in &self.image_barriers {
            let texture = registry.access_texture(barrier.texture)?;
            let is_depth = texture.is_depth_or_stencil();
            has_depth |= is_depth;

            let (layout, src, dst) = if is_depth {
                (new_depth_layout, src_depth_access, dst_depth_access)
            } else {
                (new_layout, src_access, dst_access)
            };
            let old_layout = native.layout_of(barrier.texture).unwrap_or(texture.layout);
            native.image_barriers.push(image_barrier(texture.image, texture.aspect(), old_layout, layout, src, dst));
            native.new_layouts.push((barrier.texture, layout));
        }

        if has_depth {
            let tests = vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS | vk::PipelineStageFlags::LATE_FRAGMENT_TESTS;
            native.src_stage |= tests;
            native.dst_stage |= tests;
        }

        for barrier in &self.memory_barriers {
            native
                .buffer_barriers
                .push(buffer_barrier(registry, barrier.buffer, src_buffer_access, dst_buffer_access)?);
        }

        Ok(native)
    }

    fn translate_explicit(&self, registry: &ResourceRegistry) -> Result<NativeBarrier> {
        let mut native = NativeBarrier::default();
        let mut src_access = vk::AccessFlags::empty();
        let mut dst_access = vk::AccessFlags::empty();

        let from_target = self.source_pipeline_stage == PipelineStage::RenderTarget;
        let to_target = self.destination_pipeline_stage == PipelineStage::RenderTarget;

        for barrier in &self.image_barriers {
            let texture = registry.access_texture(barrier.texture)?;
            let (current, next) = barrier.states.unwrap_or_else(|| {
                let pick = |target: bool| match (texture.is_depth_or_stencil(), target) {
                    (false, true) => ResourceState::RENDER_TARGET,
                    (false, false) => ResourceState::PIXEL_SHADER_RESOURCE,
                    (true, true) => ResourceState::DEPTH_WRITE,
                    (true, false) => ResourceState::DEPTH_READ,
                };
                (pick(from_target), pick(to_target))
            });

            let src = to_access_flags(current);
            let dst = to_access_flags(next);
            let layout = to_image_layout(next);
            // The tracked layout is authoritative for the old layout, whatever state the caller assumed.
            // Earlier entries of this batch count as already applied.
            let old_layout = native.layout_of(barrier.texture).unwrap_or(texture.layout);
            native.image_barriers.push(image_barrier(texture.image, texture.aspect(), old_layout, layout, src, dst));
            native.new_layouts.push((barrier.texture, layout));
            src_access |= src;
            dst_access |= dst;
        }

        for barrier in &self.memory_barriers {
            let (current, next) = barrier.states.unwrap_or((
                self.source_pipeline_stage.to_resource_state(),
                self.destination_pipeline_stage.to_resource_state(),
            ));
            let src = to_access_flags(current);
            let dst = to_access_flags(next);
            native.buffer_barriers.push(buffer_barrier(registry, barrier.buffer, src, dst)?);
            src_access |= src;
            dst_access |= dst;
        }

        native.src_stage = determine_pipeline_stage_flags(src_access, self.source_pipeline_stage.queue_type());
        native.dst_stage = determine_pipeline_stage_flags(dst_access, self.destination_pipeline_stage.queue_type());
        Ok(native)
    }
}

/// Native form of an [`ExecutionBarrier`], ready for one `vkCmdPipelineBarrier` call.
#[derive(Default)]
pub(crate) struct NativeBarrier {
    pub src_stage: vk::PipelineStageFlags,
    pub dst_stage: vk::PipelineStageFlags,
    pub image_barriers: SmallVec<[vk::ImageMemoryBarrier; MAX_BARRIERS]>,
    pub buffer_barriers: SmallVec<[vk::BufferMemoryBarrier; MAX_BARRIERS]>,
    pub new_layouts: SmallVec<[(TextureHandle, vk::ImageLayout); MAX_BARRIERS]>,
}

impl NativeBarrier {
    /// Layout the texture ends up in after the entries translated so far, if any of them touch it.
    fn layout_of(&self, texture: TextureHandle) -> Option<vk::ImageLayout> {
        self.new_layouts
            .iter()
            .rev()
            .find(|(handle, _)| *handle == texture)
            .map(|(_, layout)| *layout)
    }
}

fn image_barrier(
    image: vk::Image,
    aspect: vk::ImageAspectFlags,
    old_layout: vk::ImageLayout,
    new_layout: vk::ImageLayout,
    src_access_mask: vk::AccessFlags,
    dst_access_mask: vk::AccessFlags,
) -> vk::ImageMemoryBarrier {
    vk::ImageMemoryBarrier {
        s_type: vk::StructureType::IMAGE_MEMORY_BARRIER,
        p_next: std::ptr::null(),
        src_access_mask,
        dst_access_mask,
        old_layout,
        new_layout,
        src_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
        dst_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
        image,
        subresource_range: vk::ImageSubresourceRange {
            aspect_mask: aspect,
            base_mip_level: 0,
            level_count: 1,
            base_array_layer: 0,
            layer_count: 1,
        },
    }
}

fn buffer_barrier(
    registry: &ResourceRegistry,
    handle: BufferHandle,
    src_access_mask: vk::AccessFlags,
    dst_access_mask: vk::AccessFlags,
) -> Result<vk::BufferMemoryBarrier> {
    let size = registry.access_buffer(handle)?.size;
    let (buffer, offset) = registry.resolve_buffer_binding(handle, 0)?;
    Ok(vk::BufferMemoryBarrier {
        s_type: vk::StructureType::BUFFER_MEMORY_BARRIER,
        p_next: std::ptr::null(),
        src_access_mask,
        dst_access_mask,
        src_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
        dst_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
        buffer,
        offset,
        size,
    })
}
