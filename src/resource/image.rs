//! Texture metadata. The tracked layout is the only piece of resource state that barriers write back.

use ash::vk;

use crate::util::format;
use crate::SamplerHandle;

/// A texture known to the registry.
#[derive(Debug, Clone)]
pub struct Texture {
    pub image: vk::Image,
    pub view: vk::ImageView,
    pub format: vk::Format,
    /// Last known layout of the image. Updated by every barrier that touches this texture.
    pub layout: vk::ImageLayout,
    /// Sampler used for combined image samplers when a descriptor set does not name one.
    pub sampler: SamplerHandle,
    pub width: u32,
    pub height: u32,
    pub name: String,
}

impl Texture {
    pub fn new(image: vk::Image, view: vk::ImageView, format: vk::Format, width: u32, height: u32) -> Self {
        Self {
            image,
            view,
            format,
            layout: vk::ImageLayout::UNDEFINED,
            sampler: SamplerHandle::INVALID,
            width,
            height,
            name: String::new(),
        }
    }

    pub fn with_sampler(mut self, sampler: SamplerHandle) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn with_layout(mut self, layout: vk::ImageLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_depth_or_stencil(&self) -> bool {
        format::has_depth_or_stencil(self.format)
    }

    /// Aspect covering the whole texture.
    pub fn aspect(&self) -> vk::ImageAspectFlags {
        format::aspect_mask(self.format)
    }
}
