//! Descriptor set creation and binding.

use anyhow::Result;

use crate::command_buffer::state::BoundPipeline;
use crate::descriptor::cache::{DescriptorBindState, DescriptorSetSource};
use crate::{CommandBuffer, DescriptorSetCreation, DescriptorSetHandle, Error};

impl CommandBuffer {
    /// Create a descriptor set in the private cache of this command buffer. It is released by the next
    /// [`CommandBuffer::reset`], and is bound with [`CommandBuffer::bind_local_descriptor_set`].
    /// # Errors
    /// - Fails with [`Error::DescriptorSetTableFull`] if the private cache is full. Reset the command buffer and try again.
    /// - Fails with [`Error::CommandBufferTerminated`] after [`CommandBuffer::terminate`].
    /// - Fails if any handle in `creation` is invalid or the native allocation fails.
    pub fn create_descriptor_set(&mut self, creation: &DescriptorSetCreation) -> Result<DescriptorSetHandle> {
        let device = self.device.clone();
        let default_sampler = device.default_sampler()?;
        let descriptor_sets = self.descriptor_sets_mut()?;
        let resources = device.resources()?;
        descriptor_sets.create_descriptor_set(device.native(), &resources, default_sampler, creation)
    }

    /// Bind sets from the device-wide cache at set index 0, with the layout of the bound pipeline.
    /// Dynamic offsets of every uniform buffer binding are passed along, in the order the layouts declare them.
    /// # Errors
    /// - Fails with [`Error::NoPipelineBound`] if no pipeline is bound.
    /// - Fails if more than [`MAX_DESCRIPTOR_SET_LAYOUTS`](crate::descriptor::MAX_DESCRIPTOR_SET_LAYOUTS) sets are given.
    pub fn bind_descriptor_set(&mut self, handles: &[DescriptorSetHandle]) -> Result<()> {
        let pipeline = self.current_pipeline.ok_or(Error::NoPipelineBound)?;
        let state = {
            let descriptor_sets = self.device.descriptor_sets()?;
            let resources = self.device.resources()?;
            descriptor_sets.bind_state(&resources, handles)?
        };
        self.record_descriptor_bind(pipeline, &state)
    }

    /// Same as [`CommandBuffer::bind_descriptor_set`], for sets created with [`CommandBuffer::create_descriptor_set`].
    pub fn bind_local_descriptor_set(&mut self, handles: &[DescriptorSetHandle]) -> Result<()> {
        let pipeline = self.current_pipeline.ok_or(Error::NoPipelineBound)?;
        let state = {
            let descriptor_sets = self
                .descriptor_sets
                .as_ref()
                .ok_or(Error::CommandBufferTerminated)?;
            let resources = self.device.resources()?;
            descriptor_sets.bind_state(&resources, handles)?
        };
        self.record_descriptor_bind(pipeline, &state)
    }

    fn record_descriptor_bind(&self, pipeline: BoundPipeline, state: &DescriptorBindState) -> Result<()> {
        let native = self.device.native();
        if !state.sets.is_empty() {
            native.cmd_bind_descriptor_sets(
                self.handle,
                pipeline.bind_point,
                pipeline.layout,
                0,
                &state.sets,
                &state.dynamic_offsets,
            );
        }
        if let Some(bindless) = self.device.bindless_set()? {
            native.cmd_bind_descriptor_sets(self.handle, pipeline.bind_point, pipeline.layout, 1, &[bindless], &[]);
        }
        Ok(())
    }
}
