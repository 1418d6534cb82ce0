//! Defines traits for core

use ash::vk;

/// GPU timestamp collaborator. Markers pushed on a [`CommandBuffer`](crate::CommandBuffer) are always forwarded here,
/// whether or not debug labels are available.
pub trait GpuProfiler: Send + Sync {
    /// Open a named timestamp scope in `cmd`.
    fn push_timestamp(&self, cmd: vk::CommandBuffer, name: &str);
    /// Close the innermost timestamp scope in `cmd`.
    fn pop_timestamp(&self, cmd: vk::CommandBuffer);
}
