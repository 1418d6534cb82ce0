use anyhow::Result;
use ash::vk;
use smallvec::SmallVec;

use crate::descriptor::descriptor_pool::{DescriptorPool, DescriptorPoolSize};
use crate::descriptor::descriptor_set::{fill_write_descriptor_sets, DescriptorSet};
use crate::descriptor::{check_batch, MAX_DESCRIPTORS_PER_SET, MAX_DESCRIPTOR_SET_LAYOUTS, MAX_DYNAMIC_OFFSETS};
use crate::pool::ResourcePool;
use crate::{DescriptorSetCreation, DescriptorSetHandle, Error, NativeDevice, ResourceRegistry, SamplerHandle};

/// Native sets and dynamic offsets for a single `vkCmdBindDescriptorSets` call.
#[derive(Debug, Default)]
pub struct DescriptorBindState {
    pub sets: SmallVec<[vk::DescriptorSet; MAX_DESCRIPTOR_SET_LAYOUTS]>,
    pub dynamic_offsets: SmallVec<[u32; MAX_DYNAMIC_OFFSETS]>,
}

/// Anything descriptor set handles can be looked up in. Both the device-wide cache and the private cache of a
/// command buffer implement this, so binding goes through one code path regardless of where a set lives.
pub trait DescriptorSetSource {
    /// Resolve a descriptor set handle.
    /// # Errors
    /// Fails with [`Error::InvalidHandle`] if the handle is not live in this source.
    fn descriptor_set(&self, handle: DescriptorSetHandle) -> Result<&DescriptorSet>;

    /// Look up every set in `handles` and gather their dynamic offsets, concatenated in list order.
    /// # Errors
    /// - Fails if more than the supported number of sets or dynamic offsets are requested.
    /// - Fails if a handle, layout or uniform buffer can not be resolved.
    fn bind_state(&self, registry: &ResourceRegistry, handles: &[DescriptorSetHandle]) -> Result<DescriptorBindState> {
        check_batch("descriptor sets", handles.len(), MAX_DESCRIPTOR_SET_LAYOUTS)?;
        let mut state = DescriptorBindState::default();
        for &handle in handles {
            let set = self.descriptor_set(handle)?;
            let layout = registry.access_descriptor_set_layout(set.layout)?;
            state.sets.push(set.handle);
            set.push_dynamic_offsets(layout, registry, &mut state.dynamic_offsets)?;
        }
        Ok(state)
    }
}

/// Allocates descriptor sets from a fixed-size pool and keeps them in a slot table until the next [`reset`](Self::reset).
/// Sets are never freed individually: resetting the pool releases all of them at once.
#[derive(Debug)]
pub struct DescriptorSetCache {
    pool: DescriptorPool,
    sets: ResourcePool<DescriptorSet>,
}

impl DescriptorSetCache {
    /// Create the descriptor pool and a table with room for `capacity` sets.
    /// # Errors
    /// Fails if the driver refuses to create the pool. This is not recoverable.
    pub(crate) fn new(native: &dyn NativeDevice, size: DescriptorPoolSize, capacity: u32) -> Result<Self> {
        Ok(Self {
            pool: DescriptorPool::new(native, size)?,
            sets: ResourcePool::new(capacity),
        })
    }

    /// Allocate and write a descriptor set.
    /// # Errors
    /// - [`Error::DescriptorSetTableFull`] if every slot is taken. Nothing is allocated in that case and the caller
    ///   may retry after a reset.
    /// - [`Error::BatchOverflow`] if the set has more resources than can be written at once.
    /// - Resolution errors for the layout or any resource. Nothing is allocated in that case either.
    /// - [`Error::VkError`] if the native allocation fails. Pool exhaustion is not recovered from.
    pub(crate) fn create_descriptor_set(
        &mut self,
        native: &dyn NativeDevice,
        registry: &ResourceRegistry,
        default_sampler: SamplerHandle,
        creation: &DescriptorSetCreation,
    ) -> Result<DescriptorSetHandle> {
        check_batch("descriptor set resources", creation.resources.len(), MAX_DESCRIPTORS_PER_SET)?;
        if self.sets.len() == self.sets.capacity() {
            warn!("Descriptor set table is full ({} sets), can not create `{}`", self.sets.capacity(), creation.name);
            return Err(Error::DescriptorSetTableFull.into());
        }

        let layout = registry.access_descriptor_set_layout(creation.layout)?;
        // Writes are validated before allocating, so a bad resource does not use up pool space.
        let (mut writes, entries) =
            fill_write_descriptor_sets(registry, layout, vk::DescriptorSet::null(), default_sampler, &creation.resources)?;
        let handle = native.allocate_descriptor_set(self.pool.handle(), layout.handle)?;
        for write in &mut writes {
            write.set = handle;
        }
        native.update_descriptor_sets(&writes);

        let index = self
            .sets
            .obtain(DescriptorSet {
                handle,
                layout: creation.layout,
                resources: entries.into_vec().into_boxed_slice(),
                name: creation.name.clone(),
            })
            .ok_or(Error::DescriptorSetTableFull)?;
        Ok(DescriptorSetHandle::new(index))
    }

    /// Reset the pool and release every live set. All handles obtained from this cache become invalid.
    /// Calling this on an empty cache only resets the pool again.
    pub(crate) fn reset(&mut self, native: &dyn NativeDevice) -> Result<()> {
        self.pool.reset(native)?;
        let released = self.sets.release_all();
        if !released.is_empty() {
            debug!("Released {} descriptor sets", released.len());
        }
        Ok(())
    }

    pub(crate) fn destroy(&mut self, native: &dyn NativeDevice) {
        self.sets.release_all();
        self.pool.destroy(native);
    }

    /// Number of live descriptor sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Maximum number of live descriptor sets.
    pub fn capacity(&self) -> usize {
        self.sets.capacity()
    }

    pub fn pool_size(&self) -> &DescriptorPoolSize {
        self.pool.size()
    }
}

impl DescriptorSetSource for DescriptorSetCache {
    fn descriptor_set(&self, handle: DescriptorSetHandle) -> Result<&DescriptorSet> {
        self.sets.get(handle.index).ok_or_else(|| {
            Error::InvalidHandle {
                kind: "descriptor set",
                index: handle.index,
            }
            .into()
        })
    }
}
