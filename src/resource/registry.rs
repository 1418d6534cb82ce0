//! The resource handle table. Every handle a command buffer receives is resolved through here.

use anyhow::Result;

use crate::descriptor::descriptor_set::DescriptorSetLayout;
use crate::pipeline::{Pipeline, RenderPass};
use crate::pool::ResourcePool;
use crate::resource::buffer::Buffer;
use crate::resource::image::Texture;
use crate::resource::sampler::Sampler;
use crate::{
    BufferHandle, DescriptorSetLayoutHandle, Error, PipelineHandle, RenderPassHandle, ResourceCapacity, SamplerHandle,
    TextureHandle,
};

/// Owns the metadata of every registered resource, one slot table per resource kind.
#[derive(Debug)]
pub struct ResourceRegistry {
    buffers: ResourcePool<Buffer>,
    textures: ResourcePool<Texture>,
    samplers: ResourcePool<Sampler>,
    pipelines: ResourcePool<Pipeline>,
    render_passes: ResourcePool<RenderPass>,
    descriptor_set_layouts: ResourcePool<DescriptorSetLayout>,
}

macro_rules! registry_accessors {
    ($field:ident, $ty:ty, $handle:ident, $kind:literal, $add:ident, $remove:ident, $access:ident, $access_mut:ident) => {
        #[doc = concat!("Register a ", $kind, ".")]
        /// # Errors
        /// Fails if the table for this resource kind is full.
        pub fn $add(&mut self, value: $ty) -> Result<$handle> {
            let index = self.$field.obtain(value).ok_or(Error::RegistryFull($kind))?;
            Ok($handle::new(index))
        }

        #[doc = concat!("Unregister a ", $kind, ", returning its metadata.")]
        pub fn $remove(&mut self, handle: $handle) -> Option<$ty> {
            self.$field.release(handle.index)
        }

        #[doc = concat!("Resolve a ", $kind, " handle.")]
        /// # Errors
        /// Fails with [`Error::InvalidHandle`] if nothing is registered under this handle.
        pub fn $access(&self, handle: $handle) -> Result<&$ty> {
            self.$field.get(handle.index).ok_or_else(|| {
                Error::InvalidHandle {
                    kind: $kind,
                    index: handle.index,
                }
                .into()
            })
        }

        #[doc = concat!("Resolve a ", $kind, " handle for modification.")]
        pub fn $access_mut(&mut self, handle: $handle) -> Result<&mut $ty> {
            self.$field.get_mut(handle.index).ok_or_else(|| {
                Error::InvalidHandle {
                    kind: $kind,
                    index: handle.index,
                }
                .into()
            })
        }
    };
}

impl ResourceRegistry {
    pub fn new(capacity: &ResourceCapacity) -> Self {
        Self {
            buffers: ResourcePool::new(capacity.buffers),
            textures: ResourcePool::new(capacity.textures),
            samplers: ResourcePool::new(capacity.samplers),
            pipelines: ResourcePool::new(capacity.pipelines),
            render_passes: ResourcePool::new(capacity.render_passes),
            descriptor_set_layouts: ResourcePool::new(capacity.descriptor_set_layouts),
        }
    }

    registry_accessors!(buffers, Buffer, BufferHandle, "buffer", add_buffer, remove_buffer, access_buffer, access_buffer_mut);
    registry_accessors!(textures, Texture, TextureHandle, "texture", add_texture, remove_texture, access_texture, access_texture_mut);
    registry_accessors!(samplers, Sampler, SamplerHandle, "sampler", add_sampler, remove_sampler, access_sampler, access_sampler_mut);
    registry_accessors!(pipelines, Pipeline, PipelineHandle, "pipeline", add_pipeline, remove_pipeline, access_pipeline, access_pipeline_mut);
    registry_accessors!(
        render_passes,
        RenderPass,
        RenderPassHandle,
        "render pass",
        add_render_pass,
        remove_render_pass,
        access_render_pass,
        access_render_pass_mut
    );
    registry_accessors!(
        descriptor_set_layouts,
        DescriptorSetLayout,
        DescriptorSetLayoutHandle,
        "descriptor set layout",
        add_descriptor_set_layout,
        remove_descriptor_set_layout,
        access_descriptor_set_layout,
        access_descriptor_set_layout_mut
    );

    /// Resolve the native buffer and offset to bind for `handle`. Views bind their parent's buffer at the
    /// view's global offset, standalone buffers bind at `offset`.
    pub fn resolve_buffer_binding(&self, handle: BufferHandle, offset: u64) -> Result<(ash::vk::Buffer, u64)> {
        let buffer = self.access_buffer(handle)?;
        if buffer.is_view() {
            let parent = self.access_buffer(buffer.parent_buffer)?;
            Ok((parent.handle, buffer.global_offset as u64))
        } else {
            Ok((buffer.handle, offset))
        }
    }

    /// Resolve the native buffer and offset of a byte range starting `offset` bytes into `handle`.
    /// Unlike [`resolve_buffer_binding`](Self::resolve_buffer_binding), the offset of a view is relative to the view.
    pub fn resolve_buffer_range(&self, handle: BufferHandle, offset: u64) -> Result<(ash::vk::Buffer, u64)> {
        let buffer = self.access_buffer(handle)?;
        if buffer.is_view() {
            let parent = self.access_buffer(buffer.parent_buffer)?;
            Ok((parent.handle, buffer.global_offset as u64 + offset))
        } else {
            Ok((buffer.handle, offset))
        }
    }
}
