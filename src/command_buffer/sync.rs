use anyhow::Result;

use crate::{CommandBuffer, ExecutionBarrier};

impl CommandBuffer {
    /// Record a pipeline barrier for every image and buffer in `barrier`, as a single `vkCmdPipelineBarrier`.
    ///
    /// Barriers are not allowed inside a render pass, so an open graphics pass is ended first and the bound
    /// pass is forgotten. Afterwards the tracked layout of every texture in the batch is its new layout.
    /// # Errors
    /// - Fails with [`Error::BatchOverflow`](crate::Error::BatchOverflow) if the batch holds more than
    ///   [`MAX_BARRIERS`](crate::sync::barrier::MAX_BARRIERS) images or buffers.
    /// - Fails if any handle is invalid.
    ///
    /// Nothing is recorded and no state changes if this fails.
    pub fn barrier(&mut self, barrier: &ExecutionBarrier) -> Result<()> {
        let device = self.device.clone();
        let mut resources = device.resources()?;
        let native = barrier.translate(&resources)?;

        self.end_render_pass();
        device.native().cmd_pipeline_barrier(
            self.handle,
            native.src_stage,
            native.dst_stage,
            &native.buffer_barriers,
            &native.image_barriers,
        );

        for (texture, layout) in native.new_layouts {
            resources.access_texture_mut(texture)?.layout = layout;
        }
        Ok(())
    }
}
