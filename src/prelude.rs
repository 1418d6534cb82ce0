pub use ash::vk;

pub use crate::core::app_info::*;
pub use crate::core::device::Device;
pub use crate::core::error::Error;
pub use crate::core::native::{AshDevice, NativeDevice, RenderPassBegin};
pub use crate::core::queue::QueueType;
pub use crate::core::traits::GpuProfiler;

pub use crate::resource::buffer::{Buffer, ResourceUsageType};
pub use crate::resource::image::Texture;
pub use crate::resource::registry::ResourceRegistry;
pub use crate::resource::sampler::Sampler;
pub use crate::resource::{
    BufferHandle, DescriptorSetHandle, DescriptorSetLayoutHandle, PipelineHandle, RenderPassHandle, ResourceHandle, SamplerHandle,
    TextureHandle,
};

pub use crate::pipeline::{Pipeline, RenderPass, RenderPassType};

pub use crate::descriptor::builder::DescriptorSetCreation;
pub use crate::descriptor::cache::{DescriptorBindState, DescriptorSetCache, DescriptorSetSource};
pub use crate::descriptor::descriptor_set::{
    DescriptorBinding, DescriptorResource, DescriptorSet, DescriptorSetLayout, DescriptorWrite, DescriptorWriteInfo,
};
pub use crate::descriptor::DescriptorPoolSize;

pub use crate::sync::barrier::{BarrierMode, ExecutionBarrier, ImageBarrier, MemoryBarrier};
pub use crate::sync::state::{PipelineStage, ResourceState};

pub use crate::command_buffer::graphics::{Rect2DInt, Viewport};
pub use crate::command_buffer::state::{BoundPipeline, BoundRenderPass, RenderPassScope};
pub use crate::command_buffer::CommandBuffer;
