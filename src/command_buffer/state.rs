use ash::vk;

use crate::pipeline::{Pipeline, RenderPass, RenderPassType};
use crate::{PipelineHandle, RenderPassHandle};

/// Copy of the render pass state a command buffer needs while the pass is bound.
/// It is keyed by handle and does not keep the registry entry alive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BoundRenderPass {
    pub handle: RenderPassHandle,
    pub kind: RenderPassType,
    pub width: u32,
    pub height: u32,
}

impl BoundRenderPass {
    pub(crate) fn new(handle: RenderPassHandle, pass: &RenderPass) -> Self {
        Self {
            handle,
            kind: pass.kind,
            width: pass.width,
            height: pass.height,
        }
    }

    pub fn is_compute(&self) -> bool {
        self.kind == RenderPassType::Compute
    }
}

/// Copy of the pipeline state descriptor set binds use.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BoundPipeline {
    pub handle: PipelineHandle,
    pub layout: vk::PipelineLayout,
    pub bind_point: vk::PipelineBindPoint,
}

impl BoundPipeline {
    pub(crate) fn new(handle: PipelineHandle, pipeline: &Pipeline) -> Self {
        Self {
            handle,
            layout: pipeline.layout,
            bind_point: pipeline.bind_point,
        }
    }
}

/// Render pass scope of a command buffer.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RenderPassScope {
    #[default]
    Idle,
    /// A graphics pass is open and must be ended before barriers or the end of recording.
    Graphics(RenderPassHandle),
    /// A compute pass is bound. Compute passes have no native begin or end.
    Compute(RenderPassHandle),
}
