//! Fixed-size descriptor pool. Sets allocated from it are never freed one by one, the whole pool is reset instead.

use std::fmt::{Display, Formatter};

use anyhow::Result;
use ash::vk;

use crate::NativeDevice;

/// Descriptor types every pool reserves room for.
const POOL_DESCRIPTOR_TYPES: [vk::DescriptorType; 11] = [
    vk::DescriptorType::SAMPLER,
    vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
    vk::DescriptorType::SAMPLED_IMAGE,
    vk::DescriptorType::STORAGE_IMAGE,
    vk::DescriptorType::UNIFORM_TEXEL_BUFFER,
    vk::DescriptorType::STORAGE_TEXEL_BUFFER,
    vk::DescriptorType::UNIFORM_BUFFER,
    vk::DescriptorType::STORAGE_BUFFER,
    vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC,
    vk::DescriptorType::STORAGE_BUFFER_DYNAMIC,
    vk::DescriptorType::INPUT_ATTACHMENT,
];

/// Defines how many descriptors a descriptor pool should be able to hold.
#[derive(Debug, Clone)]
pub struct DescriptorPoolSize(pub(crate) Vec<vk::DescriptorPoolSize>);

/// Memory pool for descriptor sets
#[derive(Debug)]
pub(crate) struct DescriptorPool {
    handle: vk::DescriptorPool,
    size: DescriptorPoolSize,
}

impl DescriptorPoolSize {
    /// Room for `elements` descriptors of every supported descriptor type.
    pub fn new(elements: u32) -> Self {
        Self(
            POOL_DESCRIPTOR_TYPES
                .iter()
                .map(|&ty| vk::DescriptorPoolSize {
                    ty,
                    descriptor_count: elements,
                })
                .collect(),
        )
    }

    /// Maximum number of sets: one per reserved descriptor.
    pub fn max_sets(&self) -> u32 {
        self.0.iter().map(|size| size.descriptor_count).sum()
    }

    pub fn sizes(&self) -> &[vk::DescriptorPoolSize] {
        &self.0
    }
}

impl DescriptorPool {
    /// Create a new descriptor pool. Failure is reported as [`Error::VkError`](crate::Error::VkError) and is not recoverable.
    pub(crate) fn new(native: &dyn NativeDevice, size: DescriptorPoolSize) -> Result<Self> {
        let handle = native.create_descriptor_pool(
            vk::DescriptorPoolCreateFlags::FREE_DESCRIPTOR_SET,
            size.max_sets(),
            size.sizes(),
        )?;
        #[cfg(feature = "log-objects")]
        trace!("Created new VkDescriptorPool {handle:p}");

        Ok(Self {
            handle,
            size,
        })
    }

    /// Invalidate every set allocated from this pool at once.
    pub(crate) fn reset(&self, native: &dyn NativeDevice) -> Result<()> {
        native.reset_descriptor_pool(self.handle)
    }

    pub(crate) fn destroy(&mut self, native: &dyn NativeDevice) {
        if self.handle == vk::DescriptorPool::null() {
            return;
        }
        #[cfg(feature = "log-objects")]
        trace!("Destroying VkDescriptorPool {:p}", self.handle);
        native.destroy_descriptor_pool(self.handle);
        self.handle = vk::DescriptorPool::null();
    }

    /// Get the raw Vulkan handle of this descriptor pool
    pub(crate) fn handle(&self) -> vk::DescriptorPool {
        self.handle
    }

    /// Get the size of the descriptor pool.
    pub fn size(&self) -> &DescriptorPoolSize {
        &self.size
    }
}

impl Display for DescriptorPoolSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut result = writeln!(f, "DescriptorPoolSize (");
        for size in &self.0 {
            result = result.and_then(|_| writeln!(f, "{:?} => {}", size.ty, size.descriptor_count))
        }
        result
    }
}
