//! Pipeline and render pass metadata. Both objects are created outside of vkrecord and registered
//! in the [`ResourceRegistry`](crate::ResourceRegistry) so command buffers can bind them by handle.

use ash::vk;

/// Kind of render pass. Compute passes never open a native render pass scope, and swapchain passes
/// render into the framebuffer of the current swapchain image.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RenderPassType {
    #[default]
    Geometry,
    Swapchain,
    Compute,
}

/// A render pass together with the framebuffer it renders into.
#[derive(Debug, Clone)]
pub struct RenderPass {
    pub handle: vk::RenderPass,
    /// Ignored for [`RenderPassType::Swapchain`] passes.
    pub framebuffer: vk::Framebuffer,
    pub kind: RenderPassType,
    pub width: u32,
    pub height: u32,
    pub name: String,
}

impl RenderPass {
    pub fn new(handle: vk::RenderPass, framebuffer: vk::Framebuffer, kind: RenderPassType, width: u32, height: u32) -> Self {
        Self {
            handle,
            framebuffer,
            kind,
            width,
            height,
            name: String::new(),
        }
    }

    /// A compute pass has no native render pass object.
    pub fn compute() -> Self {
        Self::new(vk::RenderPass::null(), vk::Framebuffer::null(), RenderPassType::Compute, 0, 0)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_compute(&self) -> bool {
        self.kind == RenderPassType::Compute
    }
}

/// A graphics or compute pipeline with its layout.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub handle: vk::Pipeline,
    pub layout: vk::PipelineLayout,
    pub bind_point: vk::PipelineBindPoint,
    pub name: String,
}

impl Pipeline {
    pub fn graphics(handle: vk::Pipeline, layout: vk::PipelineLayout) -> Self {
        Self {
            handle,
            layout,
            bind_point: vk::PipelineBindPoint::GRAPHICS,
            name: String::new(),
        }
    }

    pub fn compute(handle: vk::Pipeline, layout: vk::PipelineLayout) -> Self {
        Self {
            handle,
            layout,
            bind_point: vk::PipelineBindPoint::COMPUTE,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
