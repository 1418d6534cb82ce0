//! The sync module translates abstract synchronization requests into Vulkan pipeline barriers.
//!
//! - The [`state`] module defines [`ResourceState`](state::ResourceState) and [`PipelineStage`](state::PipelineStage),
//! and the pure functions that map them to access masks, image layouts and pipeline stage flags.
//! - The [`barrier`] module provides the [`ExecutionBarrier`](barrier::ExecutionBarrier) builder, which batches
//! image and buffer transitions into a single native barrier.

pub mod barrier;
pub mod state;
