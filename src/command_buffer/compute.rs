use anyhow::Result;

use crate::{BufferHandle, CommandBuffer};

impl CommandBuffer {
    pub fn dispatch(&mut self, x: u32, y: u32, z: u32) {
        self.device.native().cmd_dispatch(self.handle, x, y, z);
    }

    /// Dispatch with the group counts read from `buffer` at `offset`.
    pub fn dispatch_indirect(&mut self, buffer: BufferHandle, offset: u32) -> Result<()> {
        let (buffer, offset) = self.device.resources()?.resolve_buffer_range(buffer, offset as u64)?;
        self.device.native().cmd_dispatch_indirect(self.handle, buffer, offset);
        Ok(())
    }
}
