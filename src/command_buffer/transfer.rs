use anyhow::Result;

use crate::{BufferHandle, CommandBuffer};

impl CommandBuffer {
    /// Fill `size` bytes of `buffer` starting at `offset` with the 32-bit value `data`.
    /// A `size` of zero fills the whole buffer.
    pub fn fill_buffer(&mut self, buffer: BufferHandle, offset: u32, size: u32, data: u32) -> Result<()> {
        let (native, offset, size) = {
            let resources = self.device.resources()?;
            let whole = resources.access_buffer(buffer)?.size;
            let (native, offset) = resources.resolve_buffer_range(buffer, offset as u64)?;
            let size = if size == 0 { whole } else { size as u64 };
            (native, offset, size)
        };
        self.device
            .native()
            .cmd_fill_buffer(self.handle, native, offset, size, data);
        Ok(())
    }
}
