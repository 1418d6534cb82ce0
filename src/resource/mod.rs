//! Exposes resource handles and the metadata vkrecord keeps for buffers, textures and samplers.
//!
//! Resources are created elsewhere. vkrecord only stores the native handles and the bits of state it needs
//! while recording, inside a [`ResourceRegistry`](registry::ResourceRegistry).

pub mod buffer;
pub mod image;
pub mod pool;
pub mod registry;
pub mod sampler;

use crate::pool::INVALID_INDEX;

macro_rules! resource_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            pub index: u32,
        }

        impl $name {
            /// Handle that never resolves to a resource.
            pub const INVALID: Self = Self { index: INVALID_INDEX };

            pub const fn new(index: u32) -> Self {
                Self { index }
            }

            pub const fn is_valid(&self) -> bool {
                self.index != INVALID_INDEX
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    };
}

resource_handle!(
    /// Handle to a [`Buffer`](buffer::Buffer) in the registry.
    BufferHandle
);
resource_handle!(
    /// Handle to a [`Texture`](image::Texture) in the registry.
    TextureHandle
);
resource_handle!(
    /// Handle to a [`Sampler`](sampler::Sampler) in the registry.
    SamplerHandle
);
resource_handle!(
    /// Handle to a [`Pipeline`](crate::pipeline::Pipeline) in the registry.
    PipelineHandle
);
resource_handle!(
    /// Handle to a [`RenderPass`](crate::pipeline::RenderPass) in the registry.
    RenderPassHandle
);
resource_handle!(
    /// Handle to a [`DescriptorSetLayout`](crate::descriptor::descriptor_set::DescriptorSetLayout) in the registry.
    DescriptorSetLayoutHandle
);
resource_handle!(
    /// Handle to a [`DescriptorSet`](crate::descriptor::descriptor_set::DescriptorSet) inside a descriptor set cache.
    /// Only valid until the cache that created it is reset.
    DescriptorSetHandle
);

/// Raw index of a buffer or texture, as stored inside descriptor sets.
pub type ResourceHandle = u32;

impl From<BufferHandle> for ResourceHandle {
    fn from(value: BufferHandle) -> Self {
        value.index
    }
}

impl From<TextureHandle> for ResourceHandle {
    fn from(value: TextureHandle) -> Self {
        value.index
    }
}

static_assertions::assert_impl_all!(BufferHandle: Send, Sync, Copy);
static_assertions::assert_impl_all!(DescriptorSetHandle: Send, Sync, Copy);
