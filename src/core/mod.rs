//! The core module holds the device, its settings and the native device boundary every command is recorded through.

pub mod app_info;
pub mod device;
pub mod error;
pub mod native;
pub mod queue;
pub mod traits;
