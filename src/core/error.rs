//! Exposes the vkrecord error type

use std::ffi::NulError;
use std::sync::PoisonError;

use ash;
use thiserror::Error;

/// Error type that vkrecord can return.
#[derive(Error, Debug)]
pub enum Error {
    /// Could not convert rust string to C-String because it has null bytes
    #[error("Invalid C string")]
    InvalidString(NulError),
    /// Generic Vulkan error type. Driver failures are never retried.
    #[error("Vulkan error: `{0}`")]
    VkError(ash::vk::Result),
    /// Poisoned mutex
    #[error("Poisoned mutex")]
    PoisonError,
    /// A handle did not resolve to a live resource in the registry.
    #[error("Invalid {kind} handle `{index}`")]
    InvalidHandle {
        /// Kind of resource that was looked up.
        kind: &'static str,
        /// Raw handle index.
        index: u32,
    },
    /// The registry has no free slot left for this resource kind.
    #[error("Resource table for {0} is full")]
    RegistryFull(&'static str),
    /// The descriptor set table has no free slot left. Reset the owning cache and try again.
    #[error("Descriptor set table is full")]
    DescriptorSetTableFull,
    /// A fixed-size batch (barriers, descriptor writes, dynamic offsets) would overflow.
    #[error("Too many {what}: got {count}, at most {max} are supported")]
    BatchOverflow {
        /// What was being batched.
        what: &'static str,
        /// Requested number of entries.
        count: usize,
        /// Capacity of the batch.
        max: usize,
    },
    /// Descriptor sets can only be bound after a pipeline was bound.
    #[error("No pipeline bound. Call bind_pipeline() before binding descriptor sets.")]
    NoPipelineBound,
    /// A uniform buffer binding in the layout has no resource in the descriptor set.
    #[error("Descriptor set has no resource for layout binding `{0}`")]
    MissingBinding(u32),
    /// The descriptor type is not supported when writing descriptor sets.
    #[error("Descriptor type {0:?} is not supported in descriptor set creation")]
    UnsupportedDescriptorType(ash::vk::DescriptorType),
    /// A swapchain render pass was bound, but no swapchain framebuffer is available.
    #[error("No swapchain framebuffer available for image index `{0}`")]
    NoSwapchain(u32),
    /// The command buffer was terminated and can not record anymore.
    #[error("Command buffer was terminated")]
    CommandBufferTerminated,
}

impl From<NulError> for Error {
    fn from(value: NulError) -> Self {
        Error::InvalidString(value)
    }
}

impl From<ash::vk::Result> for Error {
    fn from(value: ash::vk::Result) -> Self {
        Error::VkError(value)
    }
}

impl<T> From<PoisonError<T>> for Error {
    fn from(_: PoisonError<T>) -> Self {
        Error::PoisonError
    }
}
