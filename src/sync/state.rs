//! Abstract resource states and pipeline stages, and their translation into Vulkan access masks, image layouts
//! and pipeline stage flags. Everything in here is a pure function of its inputs.

use ash::vk;

use crate::QueueType;

bitflags::bitflags! {
    /// Abstract usage state of a resource. A resource can be in several read states at once.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct ResourceState: u32 {
        const VERTEX_AND_CONSTANT_BUFFER = 0x1;
        const INDEX_BUFFER = 0x2;
        const RENDER_TARGET = 0x4;
        const UNORDERED_ACCESS = 0x8;
        const DEPTH_WRITE = 0x10;
        const DEPTH_READ = 0x20;
        const NON_PIXEL_SHADER_RESOURCE = 0x40;
        const PIXEL_SHADER_RESOURCE = 0x80;
        const SHADER_RESOURCE = Self::NON_PIXEL_SHADER_RESOURCE.bits() | Self::PIXEL_SHADER_RESOURCE.bits();
        const STREAM_OUT = 0x100;
        const INDIRECT_ARGUMENT = 0x200;
        const COPY_DEST = 0x400;
        const COPY_SOURCE = 0x800;
        const PRESENT = 0x1000;
        const COMMON = 0x2000;
    }
}

impl ResourceState {
    /// No known state. Transitions out of this discard the previous contents of an image.
    pub const UNDEFINED: Self = Self::empty();
}

/// Coarse pipeline stage a barrier waits on or blocks.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    DrawIndirect,
    VertexInput,
    VertexShader,
    #[default]
    FragmentShader,
    RenderTarget,
    ComputeShader,
    Transfer,
}

impl PipelineStage {
    /// State a buffer is assumed to be in when it is used at this stage.
    pub fn to_resource_state(self) -> ResourceState {
        match self {
            PipelineStage::DrawIndirect => ResourceState::INDIRECT_ARGUMENT,
            PipelineStage::VertexInput => ResourceState::VERTEX_AND_CONSTANT_BUFFER,
            PipelineStage::VertexShader => ResourceState::NON_PIXEL_SHADER_RESOURCE,
            PipelineStage::FragmentShader => ResourceState::PIXEL_SHADER_RESOURCE,
            PipelineStage::RenderTarget => ResourceState::RENDER_TARGET,
            PipelineStage::ComputeShader => ResourceState::UNORDERED_ACCESS,
            PipelineStage::Transfer => ResourceState::COPY_DEST,
        }
    }

    pub fn to_vk(self) -> vk::PipelineStageFlags {
        match self {
            PipelineStage::DrawIndirect => vk::PipelineStageFlags::DRAW_INDIRECT,
            PipelineStage::VertexInput => vk::PipelineStageFlags::VERTEX_INPUT,
            PipelineStage::VertexShader => vk::PipelineStageFlags::VERTEX_SHADER,
            PipelineStage::FragmentShader => vk::PipelineStageFlags::FRAGMENT_SHADER,
            PipelineStage::RenderTarget => vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            PipelineStage::ComputeShader => vk::PipelineStageFlags::COMPUTE_SHADER,
            PipelineStage::Transfer => vk::PipelineStageFlags::TRANSFER,
        }
    }

    /// Queue type whose stage rules apply when deriving stage flags for this stage.
    pub fn queue_type(self) -> QueueType {
        match self {
            PipelineStage::ComputeShader => QueueType::Compute,
            _ => QueueType::Graphics,
        }
    }
}

/// Union of the access flags implied by every state in `state`.
pub fn to_access_flags(state: ResourceState) -> vk::AccessFlags {
    let mut flags = vk::AccessFlags::empty();
    if state.contains(ResourceState::COPY_SOURCE) {
        flags |= vk::AccessFlags::TRANSFER_READ;
    }
    if state.contains(ResourceState::COPY_DEST) {
        flags |= vk::AccessFlags::TRANSFER_WRITE;
    }
    if state.contains(ResourceState::VERTEX_AND_CONSTANT_BUFFER) {
        flags |= vk::AccessFlags::UNIFORM_READ | vk::AccessFlags::VERTEX_ATTRIBUTE_READ;
    }
    if state.contains(ResourceState::INDEX_BUFFER) {
        flags |= vk::AccessFlags::INDEX_READ;
    }
    if state.contains(ResourceState::UNORDERED_ACCESS) {
        flags |= vk::AccessFlags::SHADER_READ | vk::AccessFlags::SHADER_WRITE;
    }
    if state.contains(ResourceState::INDIRECT_ARGUMENT) {
        flags |= vk::AccessFlags::INDIRECT_COMMAND_READ;
    }
    if state.contains(ResourceState::RENDER_TARGET) {
        flags |= vk::AccessFlags::COLOR_ATTACHMENT_READ | vk::AccessFlags::COLOR_ATTACHMENT_WRITE;
    }
    if state.contains(ResourceState::DEPTH_WRITE) {
        flags |= vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE;
    }
    if state.contains(ResourceState::DEPTH_READ) {
        flags |= vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ;
    }
    if state.intersects(ResourceState::SHADER_RESOURCE) {
        flags |= vk::AccessFlags::SHADER_READ;
    }
    if state.contains(ResourceState::PRESENT) {
        flags |= vk::AccessFlags::MEMORY_READ;
    }
    flags
}

/// Image layout for a resource state. The first matching state wins, so pass a single state here.
pub fn to_image_layout(state: ResourceState) -> vk::ImageLayout {
    if state.contains(ResourceState::COPY_SOURCE) {
        vk::ImageLayout::TRANSFER_SRC_OPTIMAL
    } else if state.contains(ResourceState::COPY_DEST) {
        vk::ImageLayout::TRANSFER_DST_OPTIMAL
    } else if state.contains(ResourceState::RENDER_TARGET) {
        vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL
    } else if state.contains(ResourceState::DEPTH_WRITE) {
        vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL
    } else if state.contains(ResourceState::DEPTH_READ) {
        vk::ImageLayout::DEPTH_STENCIL_READ_ONLY_OPTIMAL
    } else if state.contains(ResourceState::UNORDERED_ACCESS) {
        vk::ImageLayout::GENERAL
    } else if state.intersects(ResourceState::SHADER_RESOURCE) {
        vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL
    } else if state.contains(ResourceState::PRESENT) {
        vk::ImageLayout::PRESENT_SRC_KHR
    } else if state.contains(ResourceState::COMMON) {
        vk::ImageLayout::GENERAL
    } else {
        vk::ImageLayout::UNDEFINED
    }
}

/// Minimal set of pipeline stages that perform the accesses in `access` on a queue of type `queue_type`.
///
/// Compute queues can not name graphics stages, so any graphics-only access falls back to `ALL_COMMANDS` there.
/// Transfer queues always use `ALL_COMMANDS`. If no stage matches, `TOP_OF_PIPE` is returned.
pub fn determine_pipeline_stage_flags(access: vk::AccessFlags, queue_type: QueueType) -> vk::PipelineStageFlags {
    let mut flags = vk::PipelineStageFlags::empty();

    match queue_type {
        QueueType::Graphics => {
            if access.intersects(vk::AccessFlags::INDEX_READ | vk::AccessFlags::VERTEX_ATTRIBUTE_READ) {
                flags |= vk::PipelineStageFlags::VERTEX_INPUT;
            }
            if access.intersects(vk::AccessFlags::UNIFORM_READ | vk::AccessFlags::SHADER_READ | vk::AccessFlags::SHADER_WRITE) {
                flags |= vk::PipelineStageFlags::VERTEX_SHADER
                    | vk::PipelineStageFlags::FRAGMENT_SHADER
                    | vk::PipelineStageFlags::COMPUTE_SHADER;
            }
            if access.intersects(vk::AccessFlags::INPUT_ATTACHMENT_READ) {
                flags |= vk::PipelineStageFlags::FRAGMENT_SHADER;
            }
            if access.intersects(vk::AccessFlags::COLOR_ATTACHMENT_READ | vk::AccessFlags::COLOR_ATTACHMENT_WRITE) {
                flags |= vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT;
            }
            if access.intersects(vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ | vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE) {
                flags |= vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS | vk::PipelineStageFlags::LATE_FRAGMENT_TESTS;
            }
        }
        QueueType::Compute => {
            let graphics_only = vk::AccessFlags::INDEX_READ
                | vk::AccessFlags::VERTEX_ATTRIBUTE_READ
                | vk::AccessFlags::INPUT_ATTACHMENT_READ
                | vk::AccessFlags::COLOR_ATTACHMENT_READ
                | vk::AccessFlags::COLOR_ATTACHMENT_WRITE
                | vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ
                | vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE;
            if access.intersects(graphics_only) {
                return vk::PipelineStageFlags::ALL_COMMANDS;
            }
            if access.intersects(vk::AccessFlags::UNIFORM_READ | vk::AccessFlags::SHADER_READ | vk::AccessFlags::SHADER_WRITE) {
                flags |= vk::PipelineStageFlags::COMPUTE_SHADER;
            }
        }
        QueueType::Transfer => return vk::PipelineStageFlags::ALL_COMMANDS,
    }

    if access.intersects(vk::AccessFlags::INDIRECT_COMMAND_READ) {
        flags |= vk::PipelineStageFlags::DRAW_INDIRECT;
    }
    if access.intersects(vk::AccessFlags::TRANSFER_READ | vk::AccessFlags::TRANSFER_WRITE) {
        flags |= vk::PipelineStageFlags::TRANSFER;
    }
    if access.intersects(vk::AccessFlags::HOST_READ | vk::AccessFlags::HOST_WRITE) {
        flags |= vk::PipelineStageFlags::HOST;
    }

    if flags.is_empty() {
        flags = vk::PipelineStageFlags::TOP_OF_PIPE;
    }
    flags
}

