use ash::vk;

/// Abstraction over vulkan queue capabilities. Command buffers record for exactly one queue type,
/// which decides which pipeline stages may be named in their barriers.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash)]
pub enum QueueType {
    #[default]
    Graphics = vk::QueueFlags::GRAPHICS.as_raw() as isize,
    Compute = vk::QueueFlags::COMPUTE.as_raw() as isize,
    Transfer = vk::QueueFlags::TRANSFER.as_raw() as isize,
}
