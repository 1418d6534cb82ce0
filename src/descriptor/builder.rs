//! Builder for descriptor set creation requests.

use crate::descriptor::descriptor_set::DescriptorResource;
use crate::{BufferHandle, DescriptorSetLayoutHandle, SamplerHandle, TextureHandle};

/// Describes a descriptor set to create: the layout it uses and the resources to bind.
/// The `binding` of every resource is the index of the layout binding it fills.
///
/// The number of resources is checked against the per-set limit when the set is created, not while building.
/// # Example
/// ```
/// # use vkrecord::*;
/// fn material_set(layout: DescriptorSetLayoutHandle, albedo: TextureHandle, constants: BufferHandle) -> DescriptorSetCreation {
///     DescriptorSetCreation::new()
///         .set_layout(layout)
///         .texture(albedo, 0)
///         .buffer(constants, 1)
///         .set_name("material")
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct DescriptorSetCreation {
    pub(crate) layout: DescriptorSetLayoutHandle,
    pub(crate) resources: Vec<DescriptorResource>,
    pub(crate) name: String,
}

impl DescriptorSetCreation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all resources, keeping the layout.
    pub fn reset(mut self) -> Self {
        self.resources.clear();
        self
    }

    pub fn set_layout(mut self, layout: DescriptorSetLayoutHandle) -> Self {
        self.layout = layout;
        self
    }

    /// Bind a texture. Sampled textures without an explicit sampler use their own or the device default sampler.
    pub fn texture(mut self, texture: TextureHandle, binding: u16) -> Self {
        self.resources.push(DescriptorResource {
            resource: texture.into(),
            sampler: SamplerHandle::INVALID,
            binding,
        });
        self
    }

    pub fn buffer(mut self, buffer: BufferHandle, binding: u16) -> Self {
        self.resources.push(DescriptorResource {
            resource: buffer.into(),
            sampler: SamplerHandle::INVALID,
            binding,
        });
        self
    }

    /// Bind a texture together with the sampler to use for it.
    pub fn texture_sampler(mut self, texture: TextureHandle, sampler: SamplerHandle, binding: u16) -> Self {
        self.resources.push(DescriptorResource {
            resource: texture.into(),
            sampler,
            binding,
        });
        self
    }

    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn layout(&self) -> DescriptorSetLayoutHandle {
        self.layout
    }

    pub fn num_resources(&self) -> usize {
        self.resources.len()
    }

    pub fn resources(&self) -> &[DescriptorResource] {
        &self.resources
    }
}
