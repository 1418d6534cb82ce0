//! Exposes all structs needed to store initialization parameters.

use crate::core::queue::QueueType;

/// Number of descriptors of each type reserved in a descriptor pool by default.
pub const DEFAULT_DESCRIPTOR_POOL_ELEMENTS: u32 = 128;
/// Default number of descriptor sets that can be alive in one descriptor set cache.
pub const DEFAULT_DESCRIPTOR_SET_CAPACITY: u32 = 256;

/// Size of every resource table in the [`ResourceRegistry`](crate::ResourceRegistry).
/// # Example
/// ```
/// # use vkrecord::*;
/// let capacity = ResourceCapacity {
///     textures: 2048,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ResourceCapacity {
    pub buffers: u32,
    pub textures: u32,
    pub samplers: u32,
    pub pipelines: u32,
    pub render_passes: u32,
    pub descriptor_set_layouts: u32,
}

impl Default for ResourceCapacity {
    fn default() -> Self {
        Self {
            buffers: 4096,
            textures: 512,
            samplers: 32,
            pipelines: 128,
            render_passes: 256,
            descriptor_set_layouts: 128,
        }
    }
}

/// Settings used to create a [`Device`](crate::Device).
#[derive(Debug, Clone)]
pub struct DeviceSettings {
    /// Name used in log output.
    pub name: String,
    /// Capacity of the resource registry.
    pub capacity: ResourceCapacity,
    /// Descriptors of each type reserved in the device-wide descriptor pool.
    pub descriptor_pool_elements: u32,
    /// Maximum number of live device-wide descriptor sets.
    pub descriptor_set_capacity: u32,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            capacity: ResourceCapacity::default(),
            descriptor_pool_elements: DEFAULT_DESCRIPTOR_POOL_ELEMENTS,
            descriptor_set_capacity: DEFAULT_DESCRIPTOR_SET_CAPACITY,
        }
    }
}

/// The device settings builder is a convenience struct to easily create [`DeviceSettings`].
///
/// For information about each of the fields, see [`DeviceSettings`]
/// # Example
/// ```
/// # use vkrecord::*;
/// let settings = DeviceSettingsBuilder::new()
///     .name("renderer")
///     .descriptor_pool_elements(256)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct DeviceSettingsBuilder {
    inner: DeviceSettings,
}

impl DeviceSettingsBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.inner.name = name.into();
        self
    }

    pub fn capacity(mut self, capacity: ResourceCapacity) -> Self {
        self.inner.capacity = capacity;
        self
    }

    pub fn descriptor_pool_elements(mut self, elements: u32) -> Self {
        self.inner.descriptor_pool_elements = elements;
        self
    }

    pub fn descriptor_set_capacity(mut self, capacity: u32) -> Self {
        self.inner.descriptor_set_capacity = capacity;
        self
    }

    /// Build the resulting device settings.
    pub fn build(self) -> DeviceSettings {
        self.inner
    }
}

/// Parameters for [`CommandBuffer::new`](crate::CommandBuffer::new).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CommandBufferSettings {
    /// Queue the command buffer will be submitted to.
    pub queue_type: QueueType,
    /// Size hint for the recording, in bytes.
    pub buffer_size: u32,
    /// Number of command buffers submitted together with this one.
    pub submit_size: u32,
    /// Whether the recording is reused over several submits.
    pub baked: bool,
    /// Descriptors of each type reserved in the private descriptor pool.
    pub descriptor_pool_elements: u32,
    /// Maximum number of live descriptor sets in the private cache.
    pub descriptor_set_capacity: u32,
}

impl Default for CommandBufferSettings {
    fn default() -> Self {
        Self {
            queue_type: QueueType::Graphics,
            buffer_size: 0,
            submit_size: 0,
            baked: false,
            descriptor_pool_elements: DEFAULT_DESCRIPTOR_POOL_ELEMENTS,
            descriptor_set_capacity: DEFAULT_DESCRIPTOR_SET_CAPACITY,
        }
    }
}

impl CommandBufferSettings {
    /// Settings with the given recording parameters and default descriptor limits.
    pub fn new(queue_type: QueueType, buffer_size: u32, submit_size: u32, baked: bool) -> Self {
        Self {
            queue_type,
            buffer_size,
            submit_size,
            baked,
            ..Default::default()
        }
    }
}
