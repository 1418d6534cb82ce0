//! Various utilities

pub mod format;
