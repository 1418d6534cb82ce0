//! Buffer metadata as seen by the command buffer.

use ash::vk;

use crate::BufferHandle;

/// How often the contents of a buffer change. Dynamic uniform buffers are written as
/// `UNIFORM_BUFFER_DYNAMIC` descriptors.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ResourceUsageType {
    #[default]
    Immutable,
    Dynamic,
    Stream,
}

/// A buffer known to the registry. A buffer is either backed by its own `VkBuffer`, or it is a view
/// into a parent buffer, in which case `parent_buffer` is valid and `global_offset` is the start of the
/// view inside the parent.
#[derive(Debug, Clone)]
pub struct Buffer {
    pub handle: vk::Buffer,
    pub size: vk::DeviceSize,
    pub usage: ResourceUsageType,
    pub global_offset: u32,
    pub parent_buffer: BufferHandle,
    pub name: String,
}

impl Buffer {
    /// Register a standalone buffer.
    pub fn new(handle: vk::Buffer, size: vk::DeviceSize) -> Self {
        Self {
            handle,
            size,
            usage: ResourceUsageType::Immutable,
            global_offset: 0,
            parent_buffer: BufferHandle::INVALID,
            name: String::new(),
        }
    }

    /// Register a sub-allocated view of `parent`, starting `global_offset` bytes into it.
    pub fn view(parent: BufferHandle, global_offset: u32, size: vk::DeviceSize) -> Self {
        Self {
            handle: vk::Buffer::null(),
            size,
            usage: ResourceUsageType::Dynamic,
            global_offset,
            parent_buffer: parent,
            name: String::new(),
        }
    }

    pub fn with_usage(mut self, usage: ResourceUsageType) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether this buffer is a view into a parent buffer.
    pub fn is_view(&self) -> bool {
        self.parent_buffer.is_valid()
    }
}
