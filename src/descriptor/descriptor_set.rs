use anyhow::Result;
use ash::vk;
use smallvec::SmallVec;

use crate::descriptor::{check_batch, MAX_DESCRIPTORS_PER_SET, MAX_DYNAMIC_OFFSETS};
use crate::resource::buffer::ResourceUsageType;
use crate::{BufferHandle, DescriptorSetLayoutHandle, Error, ResourceHandle, ResourceRegistry, SamplerHandle, TextureHandle};

/// One binding declared by a descriptor set layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DescriptorBinding {
    pub ty: vk::DescriptorType,
    /// Binding point in the shader.
    pub start: u16,
    pub count: u16,
    pub name: String,
}

impl DescriptorBinding {
    pub fn new(ty: vk::DescriptorType, start: u16) -> Self {
        Self {
            ty,
            start,
            count: 1,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// A descriptor set layout together with the bindings it was created from, in declaration order.
#[derive(Debug, Clone)]
pub struct DescriptorSetLayout {
    pub handle: vk::DescriptorSetLayout,
    pub bindings: Vec<DescriptorBinding>,
    pub name: String,
}

impl DescriptorSetLayout {
    pub fn new(handle: vk::DescriptorSetLayout, bindings: impl Into<Vec<DescriptorBinding>>) -> Self {
        Self {
            handle,
            bindings: bindings.into(),
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// A resource stored in a descriptor set. `binding` is the index of the layout binding it fills.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DescriptorResource {
    pub resource: ResourceHandle,
    pub sampler: SamplerHandle,
    pub binding: u16,
}

/// Contents of a single descriptor write.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DescriptorWriteInfo {
    Image {
        sampler: vk::Sampler,
        view: vk::ImageView,
        layout: vk::ImageLayout,
    },
    Buffer {
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        range: vk::DeviceSize,
    },
}

/// A single-descriptor write into a descriptor set, as handed to [`NativeDevice::update_descriptor_sets`](crate::NativeDevice::update_descriptor_sets).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DescriptorWrite {
    pub set: vk::DescriptorSet,
    pub binding: u32,
    pub ty: vk::DescriptorType,
    pub info: DescriptorWriteInfo,
}

/// A descriptor set allocated from a [`DescriptorSetCache`](crate::DescriptorSetCache).
/// The resource entries are kept so dynamic offsets can be resolved at bind time.
#[derive(Debug)]
pub struct DescriptorSet {
    pub(crate) handle: vk::DescriptorSet,
    pub(crate) layout: DescriptorSetLayoutHandle,
    pub(crate) resources: Box<[DescriptorResource]>,
    pub(crate) name: String,
}

impl DescriptorSet {
    /// Get the raw Vulkan handle of this descriptor set.
    pub fn handle(&self) -> vk::DescriptorSet {
        self.handle
    }

    pub fn layout(&self) -> DescriptorSetLayoutHandle {
        self.layout
    }

    pub fn resources(&self) -> &[DescriptorResource] {
        &self.resources
    }

    pub fn num_resources(&self) -> usize {
        self.resources.len()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Find the resource that fills the layout binding at `layout_index`.
    pub fn resource_for_binding(&self, layout_index: u16) -> Option<&DescriptorResource> {
        self.resources.iter().find(|resource| resource.binding == layout_index)
    }

    /// Append the dynamic offsets of this set to `offsets`: one per uniform buffer binding of `layout`,
    /// in the order the layout declares them.
    pub(crate) fn push_dynamic_offsets(
        &self,
        layout: &DescriptorSetLayout,
        registry: &ResourceRegistry,
        offsets: &mut SmallVec<[u32; MAX_DYNAMIC_OFFSETS]>,
    ) -> Result<()> {
        for (index, binding) in layout.bindings.iter().enumerate() {
            if binding.ty != vk::DescriptorType::UNIFORM_BUFFER {
                continue;
            }
            let resource = self
                .resource_for_binding(index as u16)
                .ok_or(Error::MissingBinding(index as u32))?;
            let buffer = registry.access_buffer(BufferHandle::new(resource.resource))?;
            check_batch("dynamic offsets", offsets.len() + 1, MAX_DYNAMIC_OFFSETS)?;
            offsets.push(buffer.global_offset);
        }
        Ok(())
    }
}

/// Translate the resources of a descriptor set into native writes.
///
/// Returns the writes together with the entries to cache in the set. Combined image samplers pick the explicit
/// sampler if one was given, then the texture's own sampler, then `default_sampler`; the entry stores the sampler
/// that was actually written.
pub(crate) fn fill_write_descriptor_sets(
    registry: &ResourceRegistry,
    layout: &DescriptorSetLayout,
    set: vk::DescriptorSet,
    default_sampler: SamplerHandle,
    resources: &[DescriptorResource],
) -> Result<(
    SmallVec<[DescriptorWrite; MAX_DESCRIPTORS_PER_SET]>,
    SmallVec<[DescriptorResource; MAX_DESCRIPTORS_PER_SET]>,
)> {
    check_batch("descriptor writes", resources.len(), MAX_DESCRIPTORS_PER_SET)?;

    let mut writes = SmallVec::new();
    let mut entries = SmallVec::new();
    for resource in resources {
        let binding = layout
            .bindings
            .get(resource.binding as usize)
            .ok_or(Error::MissingBinding(resource.binding as u32))?;
        let mut entry = *resource;

        let (ty, info) = match binding.ty {
            vk::DescriptorType::COMBINED_IMAGE_SAMPLER => {
                let texture = registry.access_texture(TextureHandle::new(resource.resource))?;
                let sampler = [resource.sampler, texture.sampler, default_sampler]
                    .into_iter()
                    .find(|sampler| sampler.is_valid())
                    .unwrap_or(SamplerHandle::INVALID);
                let vk_sampler = if sampler.is_valid() {
                    registry.access_sampler(sampler)?.handle
                } else {
                    warn!("Combined image sampler at binding {} has no sampler", binding.start);
                    vk::Sampler::null()
                };
                entry.sampler = sampler;
                let layout = if texture.is_depth_or_stencil() {
                    vk::ImageLayout::DEPTH_STENCIL_READ_ONLY_OPTIMAL
                } else {
                    vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL
                };
                (
                    vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
                    DescriptorWriteInfo::Image {
                        sampler: vk_sampler,
                        view: texture.view,
                        layout,
                    },
                )
            }
            vk::DescriptorType::STORAGE_IMAGE => {
                let texture = registry.access_texture(TextureHandle::new(resource.resource))?;
                (
                    vk::DescriptorType::STORAGE_IMAGE,
                    DescriptorWriteInfo::Image {
                        sampler: vk::Sampler::null(),
                        view: texture.view,
                        layout: vk::ImageLayout::GENERAL,
                    },
                )
            }
            vk::DescriptorType::UNIFORM_BUFFER => {
                let handle = BufferHandle::new(resource.resource);
                let buffer = registry.access_buffer(handle)?;
                let ty = if buffer.usage == ResourceUsageType::Dynamic {
                    vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC
                } else {
                    vk::DescriptorType::UNIFORM_BUFFER
                };
                // The view offset is supplied as a dynamic offset when binding.
                let (native, _) = registry.resolve_buffer_binding(handle, 0)?;
                (
                    ty,
                    DescriptorWriteInfo::Buffer {
                        buffer: native,
                        offset: 0,
                        range: buffer.size,
                    },
                )
            }
            vk::DescriptorType::STORAGE_BUFFER => {
                let handle = BufferHandle::new(resource.resource);
                let buffer = registry.access_buffer(handle)?;
                let (native, offset) = registry.resolve_buffer_binding(handle, 0)?;
                (
                    vk::DescriptorType::STORAGE_BUFFER,
                    DescriptorWriteInfo::Buffer {
                        buffer: native,
                        offset,
                        range: buffer.size,
                    },
                )
            }
            other => return Err(Error::UnsupportedDescriptorType(other).into()),
        };

        writes.push(DescriptorWrite {
            set,
            binding: binding.start as u32,
            ty,
            info,
        });
        entries.push(entry);
    }
    Ok((writes, entries))
}
