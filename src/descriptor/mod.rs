//! This module handles everything related to descriptor sets.
//!
//! Descriptor sets are allocated through a [`DescriptorSetCache`](cache::DescriptorSetCache). Every command buffer owns
//! a private cache whose sets live until the command buffer is reset, and the [`Device`](crate::Device) owns a
//! device-wide cache for sets that outlive a single recording.
//!
//! To allocate a descriptor set, describe it with a [`DescriptorSetCreation`](builder::DescriptorSetCreation):
//!
//! ```
//! # use vkrecord::*;
//! # use anyhow::Result;
//! fn bind_material(cmd: &mut CommandBuffer, layout: DescriptorSetLayoutHandle, albedo: TextureHandle, constants: BufferHandle) -> Result<()> {
//!     let set = cmd.create_descriptor_set(&DescriptorSetCreation::new()
//!         .set_layout(layout)
//!         .texture(albedo, 0)
//!         .buffer(constants, 1))?;
//!     cmd.bind_local_descriptor_set(&[set])
//! }
//! ```
//!
//! # Dynamic offsets
//!
//! Every `UNIFORM_BUFFER` binding of a layout consumes one dynamic offset. When binding, the offsets are read from the
//! bound buffers (their global offset inside the parent buffer) in the order the layout declares the bindings.

pub mod builder;
pub mod cache;
pub mod descriptor_set;

mod descriptor_pool;

pub use descriptor_pool::DescriptorPoolSize;

use crate::Error;

/// Maximum number of resources written into a single descriptor set.
pub const MAX_DESCRIPTORS_PER_SET: usize = 8;
/// Maximum number of descriptor sets bound by a single bind call.
pub const MAX_DESCRIPTOR_SET_LAYOUTS: usize = 8;
/// Maximum number of dynamic offsets passed to a single bind call.
pub const MAX_DYNAMIC_OFFSETS: usize = 8;

/// Fail with [`Error::BatchOverflow`] if `count` exceeds `max`.
pub(crate) fn check_batch(what: &'static str, count: usize, max: usize) -> Result<(), Error> {
    if count > max {
        return Err(Error::BatchOverflow {
            what,
            count,
            max,
        });
    }
    Ok(())
}
