//! Command recording and descriptor binding layer for Vulkan renderers.
//!
//! vkrecord translates draw, dispatch and barrier requests into correctly ordered and synchronized Vulkan commands,
//! while caching enough state to avoid redundant driver calls. It does not create devices, swapchains or resources:
//! those are made elsewhere and registered in the [`ResourceRegistry`] owned by the [`Device`].
//!
//! To get started, import the prelude
//! ```
//! use vkrecord::prelude::*;
//! ```
//!
//! # Example
//!
//! Every driver call goes through a [`NativeDevice`]. For a real device, wrap your `ash::Device` in an [`AshDevice`].
//! ```
//! # use std::sync::Arc;
//! use vkrecord::prelude::*;
//! # use anyhow::Result;
//!
//! fn setup(native: Arc<dyn NativeDevice>, cmd_handle: vk::CommandBuffer) -> Result<CommandBuffer> {
//!     let device = Device::new(native, DeviceSettingsBuilder::new().name("renderer").build())?;
//!     let pass = device.resources()?.add_render_pass(RenderPass::compute())?;
//!     let mut cmd = CommandBuffer::new(device.clone(), cmd_handle, CommandBufferSettings::default())?;
//!     cmd.bind_pass(pass)?;
//!     Ok(cmd)
//! }
//! ```
//! For further example code, check out the following modules
//! - [`command_buffer`] for the recording state machine and the commands available.
//! - [`descriptor`] for descriptor set management.
//! - [`sync`] for pipeline barriers and resource state translation.
//! - [`resource`] for resource handles and the metadata kept for them.

#[macro_use]
extern crate derivative;
#[macro_use]
extern crate log;

pub mod prelude;
pub use crate::prelude::*;

pub mod command_buffer;
pub mod core;
pub mod descriptor;
pub mod pipeline;
pub mod resource;
pub mod sync;
pub mod util;

pub use crate::resource::pool;
