//! Render pass, pipeline and draw commands.

use anyhow::Result;
use ash::vk;

use crate::command_buffer::state::{BoundPipeline, BoundRenderPass};
use crate::core::native::RenderPassBegin;
use crate::pipeline::RenderPassType;
use crate::{BufferHandle, CommandBuffer, PipelineHandle, RenderPassHandle};

/// Integer rectangle in framebuffer coordinates, with the origin in the top left corner.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rect2DInt {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Viewport in framebuffer coordinates, with the origin in the top left corner.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub rect: Rect2DInt,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            rect: Rect2DInt::default(),
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

impl Viewport {
    /// Convert to a Vulkan viewport. Y is flipped with a negative height so that the origin ends up in the
    /// top left corner.
    pub fn to_vk(&self) -> vk::Viewport {
        vk::Viewport {
            x: self.rect.x as f32,
            y: self.rect.height as f32 - self.rect.y as f32,
            width: self.rect.width as f32,
            height: -(self.rect.height as f32),
            min_depth: self.min_depth,
            max_depth: self.max_depth,
        }
    }
}

impl CommandBuffer {
    /// Bind a render pass. If a different pass is currently bound, its native render pass is ended first.
    /// Non-compute passes open a native render pass covering the full framebuffer, cleared with the current
    /// [clear values](CommandBuffer::clear_values). Swapchain passes render into the framebuffer of the current
    /// swapchain image. Binding the pass that is already bound records nothing.
    /// # Errors
    /// - Fails if the handle is invalid.
    /// - Fails with [`Error::NoSwapchain`](crate::Error::NoSwapchain) if a swapchain pass is bound while there is no swapchain.
    pub fn bind_pass(&mut self, handle: RenderPassHandle) -> Result<()> {
        let device = self.device.clone();
        let (bound, render_pass, framebuffer) = {
            let resources = device.resources()?;
            let pass = resources.access_render_pass(handle)?;
            (BoundRenderPass::new(handle, pass), pass.handle, pass.framebuffer)
        };
        self.is_recording = true;

        if self.current_render_pass.map(|pass| pass.handle) == Some(handle) {
            return Ok(());
        }

        let framebuffer = match bound.kind {
            RenderPassType::Swapchain => Some(device.swapchain_framebuffer()?),
            RenderPassType::Geometry => Some(framebuffer),
            RenderPassType::Compute => None,
        };

        self.end_render_pass();
        if let Some(framebuffer) = framebuffer {
            let begin = RenderPassBegin {
                render_pass,
                framebuffer,
                render_area: vk::Rect2D {
                    offset: vk::Offset2D {
                        x: 0,
                        y: 0,
                    },
                    extent: vk::Extent2D {
                        width: bound.width,
                        height: bound.height,
                    },
                },
                clear_values: &self.clears,
            };
            device.native().cmd_begin_render_pass(self.handle, &begin);
        }
        self.current_render_pass = Some(bound);
        Ok(())
    }

    /// Bind a pipeline at its bind point. Descriptor sets bound afterwards use its layout.
    pub fn bind_pipeline(&mut self, handle: PipelineHandle) -> Result<()> {
        let device = self.device.clone();
        let resources = device.resources()?;
        let pipeline = resources.access_pipeline(handle)?;
        device
            .native()
            .cmd_bind_pipeline(self.handle, pipeline.bind_point, pipeline.handle);
        self.current_pipeline = Some(BoundPipeline::new(handle, pipeline));
        Ok(())
    }

    /// Bind a vertex buffer. If the buffer is a view, its parent is bound at the view's global offset and `offset` is ignored.
    pub fn bind_vertex_buffer(&mut self, handle: BufferHandle, binding: u32, offset: u32) -> Result<()> {
        let (buffer, offset) = self.device.resources()?.resolve_buffer_binding(handle, offset as u64)?;
        self.device
            .native()
            .cmd_bind_vertex_buffers(self.handle, binding, &[buffer], &[offset]);
        Ok(())
    }

    /// Bind a 16-bit index buffer. If the buffer is a view, its parent is bound at the view's global offset and `offset` is ignored.
    pub fn bind_index_buffer(&mut self, handle: BufferHandle, offset: u32) -> Result<()> {
        let (buffer, offset) = self.device.resources()?.resolve_buffer_binding(handle, offset as u64)?;
        self.device
            .native()
            .cmd_bind_index_buffer(self.handle, buffer, offset, vk::IndexType::UINT16);
        Ok(())
    }

    /// Set the viewport. With `None`, the viewport covers the bound render pass, or the swapchain if no pass is
    /// bound, with a depth range of `[0, 1]`.
    pub fn set_viewport(&mut self, viewport: Option<&Viewport>) -> Result<()> {
        let viewport = match viewport {
            Some(viewport) => *viewport,
            None => {
                let extent = self.default_extent()?;
                Viewport {
                    rect: Rect2DInt {
                        x: 0,
                        y: 0,
                        width: extent.width,
                        height: extent.height,
                    },
                    ..Default::default()
                }
            }
        };
        self.device.native().cmd_set_viewport(self.handle, &viewport.to_vk());
        Ok(())
    }

    /// Set the scissor rectangle. With `None`, it covers the bound render pass, or the swapchain if no pass is bound.
    pub fn set_scissor(&mut self, rect: Option<&Rect2DInt>) -> Result<()> {
        let scissor = match rect {
            Some(rect) => vk::Rect2D {
                offset: vk::Offset2D {
                    x: rect.x,
                    y: rect.y,
                },
                extent: vk::Extent2D {
                    width: rect.width,
                    height: rect.height,
                },
            },
            None => vk::Rect2D {
                offset: vk::Offset2D::default(),
                extent: self.default_extent()?,
            },
        };
        self.device.native().cmd_set_scissor(self.handle, &scissor);
        Ok(())
    }

    fn default_extent(&self) -> Result<vk::Extent2D> {
        match self.current_render_pass {
            Some(pass) => Ok(vk::Extent2D {
                width: pass.width,
                height: pass.height,
            }),
            None => self.device.swapchain_extent(),
        }
    }

    /// Set the color clear value used by the next render pass begin.
    pub fn clear(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.clears[0] = vk::ClearValue {
            color: vk::ClearColorValue {
                float32: [red, green, blue, alpha],
            },
        };
    }

    /// Set the depth and stencil clear value used by the next render pass begin.
    pub fn clear_depth_stencil(&mut self, depth: f32, stencil: u8) {
        self.clears[1] = vk::ClearValue {
            depth_stencil: vk::ClearDepthStencilValue {
                depth,
                stencil: stencil as u32,
            },
        };
    }

    pub fn draw(&mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32) {
        self.device
            .native()
            .cmd_draw(self.handle, vertex_count, instance_count, first_vertex, first_instance);
    }

    pub fn draw_indexed(&mut self, index_count: u32, instance_count: u32, first_index: u32, vertex_offset: i32, first_instance: u32) {
        self.device
            .native()
            .cmd_draw_indexed(self.handle, index_count, instance_count, first_index, vertex_offset, first_instance);
    }

    /// Issue a single indirect draw whose arguments are read from `buffer` at `offset`.
    pub fn draw_indirect(&mut self, buffer: BufferHandle, offset: u32) -> Result<()> {
        let (buffer, offset) = self.device.resources()?.resolve_buffer_range(buffer, offset as u64)?;
        self.device.native().cmd_draw_indirect(
            self.handle,
            buffer,
            offset,
            1,
            std::mem::size_of::<vk::DrawIndirectCommand>() as u32,
        );
        Ok(())
    }

    /// Issue a single indexed indirect draw whose arguments are read from `buffer` at `offset`.
    pub fn draw_indexed_indirect(&mut self, buffer: BufferHandle, offset: u32) -> Result<()> {
        let (buffer, offset) = self.device.resources()?.resolve_buffer_range(buffer, offset as u64)?;
        self.device.native().cmd_draw_indexed_indirect(
            self.handle,
            buffer,
            offset,
            1,
            std::mem::size_of::<vk::DrawIndexedIndirectCommand>() as u32,
        );
        Ok(())
    }
}
