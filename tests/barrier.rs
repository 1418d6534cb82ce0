use anyhow::Result;
use ash::vk;

use framework::{Command, Context, RecordedBufferBarrier, RecordedImageBarrier};
use vkrecord::prelude::*;
use vkrecord::sync::state::{determine_pipeline_stage_flags, to_access_flags, to_image_layout};

mod framework;

struct RecordedBarrier {
    src_stage: vk::PipelineStageFlags,
    dst_stage: vk::PipelineStageFlags,
    buffers: Vec<RecordedBufferBarrier>,
    images: Vec<RecordedImageBarrier>,
}

fn barriers(context: &Context) -> Vec<RecordedBarrier> {
    context
        .native
        .commands()
        .into_iter()
        .filter_map(|command| match command {
            Command::PipelineBarrier {
                src_stage,
                dst_stage,
                buffers,
                images,
            } => Some(RecordedBarrier {
                src_stage,
                dst_stage,
                buffers,
                images,
            }),
            _ => None,
        })
        .collect()
}

fn layout_of(context: &Context, texture: TextureHandle) -> Result<vk::ImageLayout> {
    Ok(context.device.resources()?.access_texture(texture)?.layout)
}

#[test]
pub fn render_targets_to_fragment_shader() -> Result<()> {
    let context = framework::make_context().expect("Can initialize context.");
    let textures = (0..3)
        .map(|_| framework::add_texture(&context, vk::Format::R16G16B16A16_SFLOAT))
        .collect::<Result<Vec<_>>>()?;
    for texture in &textures {
        context.device.resources()?.access_texture_mut(*texture)?.layout = vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL;
    }
    let mut cmd = framework::make_command_buffer(&context)?;
    context.native.clear();

    let barrier = textures.iter().fold(
        ExecutionBarrier::new().set(PipelineStage::RenderTarget, PipelineStage::FragmentShader),
        |barrier, texture| barrier.add_image_barrier(ImageBarrier::new(*texture)),
    );
    cmd.barrier(&barrier)?;

    let recorded = barriers(&context);
    assert_eq!(recorded.len(), 1, "All transitions go into a single barrier call");
    let recorded = &recorded[0];
    assert_eq!(recorded.src_stage, vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT);
    assert_eq!(recorded.dst_stage, vk::PipelineStageFlags::FRAGMENT_SHADER);
    assert_eq!(recorded.images.len(), 3);
    assert!(recorded.buffers.is_empty());
    for image in &recorded.images {
        assert_eq!(image.old_layout, vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL);
        assert_eq!(image.new_layout, vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL);
        assert_eq!(image.src_access, vk::AccessFlags::COLOR_ATTACHMENT_WRITE);
        assert_eq!(image.dst_access, vk::AccessFlags::SHADER_READ | vk::AccessFlags::SHADER_WRITE);
        assert_eq!(image.aspect, vk::ImageAspectFlags::COLOR);
    }
    for texture in &textures {
        assert_eq!(layout_of(&context, *texture)?, vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL);
    }
    Ok(())
}

#[test]
pub fn depth_adds_fragment_test_stages() -> Result<()> {
    let context = framework::make_context().expect("Can initialize context.");
    let color = framework::add_texture(&context, vk::Format::B8G8R8A8_UNORM)?;
    let depth = framework::add_texture(&context, vk::Format::D24_UNORM_S8_UINT)?;
    let mut cmd = framework::make_command_buffer(&context)?;
    context.native.clear();

    cmd.barrier(
        &ExecutionBarrier::new()
            .set(PipelineStage::FragmentShader, PipelineStage::RenderTarget)
            .add_image_barrier(ImageBarrier::new(color))
            .add_image_barrier(ImageBarrier::new(depth)),
    )?;

    let recorded = &barriers(&context)[0];
    let tests = vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS | vk::PipelineStageFlags::LATE_FRAGMENT_TESTS;
    assert_eq!(recorded.src_stage, vk::PipelineStageFlags::FRAGMENT_SHADER | tests);
    assert_eq!(recorded.dst_stage, vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT | tests);

    let color_barrier = recorded.images[0];
    assert_eq!(color_barrier.old_layout, vk::ImageLayout::UNDEFINED);
    assert_eq!(color_barrier.new_layout, vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL);
    assert_eq!(
        color_barrier.dst_access,
        vk::AccessFlags::COLOR_ATTACHMENT_READ | vk::AccessFlags::COLOR_ATTACHMENT_WRITE
    );

    let depth_barrier = recorded.images[1];
    assert_eq!(depth_barrier.new_layout, vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL);
    assert_eq!(depth_barrier.aspect, vk::ImageAspectFlags::DEPTH | vk::ImageAspectFlags::STENCIL);
    assert_eq!(layout_of(&context, depth)?, vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL);
    Ok(())
}

#[test]
pub fn depth_only_format_has_no_stencil_aspect() -> Result<()> {
    let context = framework::make_context().expect("Can initialize context.");
    let depth = framework::add_texture(&context, vk::Format::D32_SFLOAT)?;
    let mut cmd = framework::make_command_buffer(&context)?;
    context.native.clear();

    cmd.barrier(
        &ExecutionBarrier::new()
            .set(PipelineStage::RenderTarget, PipelineStage::FragmentShader)
            .add_image_barrier(ImageBarrier::new(depth)),
    )?;
    let image = barriers(&context)[0].images[0];
    assert_eq!(image.aspect, vk::ImageAspectFlags::DEPTH);
    assert_eq!(image.new_layout, vk::ImageLayout::DEPTH_STENCIL_READ_ONLY_OPTIMAL);
    assert_eq!(image.src_access, vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE);
    Ok(())
}

#[test]
pub fn compute_destination_uses_general_layout() -> Result<()> {
    let context = framework::make_context().expect("Can initialize context.");
    let texture = framework::add_texture(&context, vk::Format::R32_UINT)?;
    let mut cmd = framework::make_command_buffer(&context)?;
    context.native.clear();

    cmd.barrier(
        &ExecutionBarrier::new()
            .set(PipelineStage::FragmentShader, PipelineStage::ComputeShader)
            .add_image_barrier(ImageBarrier::new(texture)),
    )?;
    let recorded = &barriers(&context)[0];
    assert_eq!(recorded.dst_stage, vk::PipelineStageFlags::COMPUTE_SHADER);
    assert_eq!(recorded.images[0].new_layout, vk::ImageLayout::GENERAL);
    assert_eq!(layout_of(&context, texture)?, vk::ImageLayout::GENERAL);
    Ok(())
}

#[test]
pub fn indirect_buffer_barrier() -> Result<()> {
    let context = framework::make_context().expect("Can initialize context.");
    let parent = framework::add_buffer(&context, 4096)?;
    let args = framework::add_buffer_view(&context, parent, 128, 64)?;
    let parent_handle = context.device.resources()?.access_buffer(parent)?.handle;
    let mut cmd = framework::make_command_buffer(&context)?;
    context.native.clear();

    cmd.barrier(
        &ExecutionBarrier::new()
            .set(PipelineStage::ComputeShader, PipelineStage::DrawIndirect)
            .add_memory_barrier(MemoryBarrier::new(args)),
    )?;
    let recorded = &barriers(&context)[0];
    assert!(recorded.images.is_empty());
    assert_eq!(
        recorded.buffers,
        vec![RecordedBufferBarrier {
            buffer: parent_handle,
            offset: 128,
            size: 64,
            src_access: vk::AccessFlags::SHADER_READ | vk::AccessFlags::SHADER_WRITE,
            dst_access: vk::AccessFlags::INDIRECT_COMMAND_READ,
        }]
    );
    assert_eq!(recorded.src_stage, vk::PipelineStageFlags::COMPUTE_SHADER);
    assert_eq!(recorded.dst_stage, vk::PipelineStageFlags::DRAW_INDIRECT);
    Ok(())
}

#[test]
pub fn barrier_ends_graphics_pass() -> Result<()> {
    let context = framework::make_context().expect("Can initialize context.");
    let pass = framework::add_render_pass(&context, RenderPassType::Geometry, 128, 128)?;
    let texture = framework::add_texture(&context, vk::Format::R8G8B8A8_UNORM)?;
    let mut cmd = framework::make_command_buffer(&context)?;
    cmd.bind_pass(pass)?;
    context.native.clear();

    cmd.barrier(
        &ExecutionBarrier::new()
            .set(PipelineStage::RenderTarget, PipelineStage::FragmentShader)
            .add_image_barrier(ImageBarrier::new(texture)),
    )?;
    let commands = context.native.commands();
    assert_eq!(commands.len(), 2);
    assert!(matches!(commands[0], Command::EndRenderPass), "Pass must end before the barrier");
    assert!(matches!(commands[1], Command::PipelineBarrier { .. }));
    assert_eq!(cmd.render_pass_scope(), RenderPassScope::Idle);

    // Binding the same pass again opens a new scope.
    context.native.clear();
    cmd.bind_pass(pass)?;
    assert!(matches!(context.native.commands()[0], Command::BeginRenderPass { .. }));
    Ok(())
}

#[test]
pub fn barrier_in_compute_pass_records_no_end() -> Result<()> {
    let context = framework::make_context().expect("Can initialize context.");
    let pass = framework::add_render_pass(&context, RenderPassType::Compute, 0, 0)?;
    let buffer = framework::add_buffer(&context, 256)?;
    let mut cmd = framework::make_command_buffer(&context)?;
    cmd.bind_pass(pass)?;
    context.native.clear();

    cmd.barrier(
        &ExecutionBarrier::new()
            .set(PipelineStage::ComputeShader, PipelineStage::ComputeShader)
            .add_memory_barrier(MemoryBarrier::new(buffer)),
    )?;
    let commands = context.native.commands();
    assert_eq!(commands.len(), 1);
    assert!(matches!(commands[0], Command::PipelineBarrier { .. }));
    Ok(())
}

#[test]
pub fn overflowing_barrier_records_nothing() -> Result<()> {
    let context = framework::make_context().expect("Can initialize context.");
    let pass = framework::add_render_pass(&context, RenderPassType::Geometry, 128, 128)?;
    let textures = (0..9)
        .map(|_| framework::add_texture(&context, vk::Format::R8G8B8A8_UNORM))
        .collect::<Result<Vec<_>>>()?;
    let mut cmd = framework::make_command_buffer(&context)?;
    cmd.bind_pass(pass)?;
    context.native.clear();

    let barrier = textures.iter().fold(
        ExecutionBarrier::new().set(PipelineStage::RenderTarget, PipelineStage::FragmentShader),
        |barrier, texture| barrier.add_image_barrier(ImageBarrier::new(*texture)),
    );
    assert_eq!(barrier.num_image_barriers(), 9);
    let err = cmd.barrier(&barrier).expect_err("Nine image barriers do not fit");
    assert!(matches!(
        framework::vkrecord_error(&err),
        Some(Error::BatchOverflow {
            count: 9,
            max: 8,
            ..
        })
    ));
    assert!(context.native.commands().is_empty(), "Nothing is recorded on overflow");
    assert_eq!(cmd.render_pass_scope(), RenderPassScope::Graphics(pass), "The pass stays open on failure");
    for texture in &textures {
        assert_eq!(layout_of(&context, *texture)?, vk::ImageLayout::UNDEFINED);
    }
    Ok(())
}

#[test]
pub fn invalid_texture_records_nothing() -> Result<()> {
    let context = framework::make_context().expect("Can initialize context.");
    let texture = framework::add_texture(&context, vk::Format::R8G8B8A8_UNORM)?;
    let mut cmd = framework::make_command_buffer(&context)?;
    context.native.clear();

    let err = cmd
        .barrier(
            &ExecutionBarrier::new()
                .add_image_barrier(ImageBarrier::new(texture))
                .add_image_barrier(ImageBarrier::new(TextureHandle::new(99))),
        )
        .expect_err("Unknown texture should fail");
    assert!(matches!(framework::vkrecord_error(&err), Some(Error::InvalidHandle { index: 99, .. })));
    assert!(context.native.commands().is_empty());
    assert_eq!(layout_of(&context, texture)?, vk::ImageLayout::UNDEFINED, "No layout changes on failure");
    Ok(())
}

#[test]
pub fn explicit_barrier_derives_stages_from_access() -> Result<()> {
    let context = framework::make_context().expect("Can initialize context.");
    let color = framework::add_texture(&context, vk::Format::R8G8B8A8_UNORM)?;
    let depth = framework::add_texture(&context, vk::Format::D32_SFLOAT)?;
    let mut cmd = framework::make_command_buffer(&context)?;
    context.native.clear();

    cmd.barrier(
        &ExecutionBarrier::new()
            .set_mode(BarrierMode::Explicit)
            .set(PipelineStage::RenderTarget, PipelineStage::FragmentShader)
            .add_image_barrier(ImageBarrier::new(color))
            .add_image_barrier(ImageBarrier::new(depth)),
    )?;
    let recorded = &barriers(&context)[0];

    let color_barrier = recorded.images[0];
    assert_eq!(color_barrier.new_layout, vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL);
    assert_eq!(
        color_barrier.src_access,
        vk::AccessFlags::COLOR_ATTACHMENT_READ | vk::AccessFlags::COLOR_ATTACHMENT_WRITE
    );
    assert_eq!(color_barrier.dst_access, vk::AccessFlags::SHADER_READ);

    let depth_barrier = recorded.images[1];
    assert_eq!(depth_barrier.new_layout, vk::ImageLayout::DEPTH_STENCIL_READ_ONLY_OPTIMAL);
    assert_eq!(depth_barrier.src_access, vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE);
    assert_eq!(depth_barrier.dst_access, vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ);

    let tests = vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS | vk::PipelineStageFlags::LATE_FRAGMENT_TESTS;
    assert_eq!(recorded.src_stage, vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT | tests);
    assert_eq!(
        recorded.dst_stage,
        vk::PipelineStageFlags::VERTEX_SHADER
            | vk::PipelineStageFlags::FRAGMENT_SHADER
            | vk::PipelineStageFlags::COMPUTE_SHADER
            | tests
    );
    Ok(())
}

#[test]
pub fn explicit_barrier_with_states() -> Result<()> {
    let context = framework::make_context().expect("Can initialize context.");
    let texture = framework::add_texture(&context, vk::Format::R8G8B8A8_UNORM)?;
    let buffer = framework::add_buffer(&context, 1024)?;
    let mut cmd = framework::make_command_buffer(&context)?;
    context.native.clear();

    cmd.barrier(
        &ExecutionBarrier::new()
            .set_mode(BarrierMode::Explicit)
            .set(PipelineStage::Transfer, PipelineStage::ComputeShader)
            .add_image_barrier(ImageBarrier::new(texture).with_states(ResourceState::COPY_DEST, ResourceState::UNORDERED_ACCESS))
            .add_memory_barrier(MemoryBarrier::new(buffer).with_states(ResourceState::COPY_DEST, ResourceState::UNORDERED_ACCESS)),
    )?;
    let recorded = &barriers(&context)[0];
    assert_eq!(recorded.images[0].old_layout, vk::ImageLayout::UNDEFINED, "Old layout is the tracked layout");
    assert_eq!(recorded.images[0].new_layout, vk::ImageLayout::GENERAL);
    assert_eq!(recorded.images[0].src_access, vk::AccessFlags::TRANSFER_WRITE);
    assert_eq!(recorded.buffers[0].dst_access, vk::AccessFlags::SHADER_READ | vk::AccessFlags::SHADER_WRITE);
    assert_eq!(recorded.src_stage, vk::PipelineStageFlags::TRANSFER);
    assert_eq!(recorded.dst_stage, vk::PipelineStageFlags::COMPUTE_SHADER, "Compute destination uses compute queue rules");
    assert_eq!(layout_of(&context, texture)?, vk::ImageLayout::GENERAL);
    Ok(())
}

#[test]
pub fn repeated_texture_chains_layouts_within_batch() -> Result<()> {
    let context = framework::make_context().expect("Can initialize context.");
    let texture = framework::add_texture(&context, vk::Format::R8G8B8A8_UNORM)?;
    context.device.resources()?.access_texture_mut(texture)?.layout = vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL;
    let mut cmd = framework::make_command_buffer(&context)?;
    context.native.clear();

    cmd.barrier(
        &ExecutionBarrier::new()
            .set_mode(BarrierMode::Explicit)
            .set(PipelineStage::RenderTarget, PipelineStage::ComputeShader)
            .add_image_barrier(
                ImageBarrier::new(texture).with_states(ResourceState::RENDER_TARGET, ResourceState::PIXEL_SHADER_RESOURCE),
            )
            .add_image_barrier(
                ImageBarrier::new(texture).with_states(ResourceState::PIXEL_SHADER_RESOURCE, ResourceState::UNORDERED_ACCESS),
            ),
    )?;
    let recorded = &barriers(&context)[0];
    assert_eq!(recorded.images.len(), 2);
    assert_eq!(recorded.images[0].old_layout, vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL);
    assert_eq!(recorded.images[0].new_layout, vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL);
    assert_eq!(
        recorded.images[1].old_layout,
        vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
        "Second entry starts from the layout the first one left behind"
    );
    assert_eq!(recorded.images[1].new_layout, vk::ImageLayout::GENERAL);
    assert_eq!(layout_of(&context, texture)?, vk::ImageLayout::GENERAL);

    context.native.clear();
    cmd.barrier(
        &ExecutionBarrier::new()
            .set(PipelineStage::ComputeShader, PipelineStage::FragmentShader)
            .add_image_barrier(ImageBarrier::new(texture))
            .add_image_barrier(ImageBarrier::new(texture)),
    )?;
    let recorded = &barriers(&context)[0];
    assert_eq!(recorded.images[0].old_layout, vk::ImageLayout::GENERAL);
    assert_eq!(recorded.images[1].old_layout, vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL);
    Ok(())
}

#[test]
pub fn explicit_barrier_to_compute_with_graphics_access() -> Result<()> {
    let context = framework::make_context().expect("Can initialize context.");
    let texture = framework::add_texture(&context, vk::Format::R8G8B8A8_UNORM)?;
    let mut cmd = framework::make_command_buffer(&context)?;
    context.native.clear();

    cmd.barrier(
        &ExecutionBarrier::new()
            .set_mode(BarrierMode::Explicit)
            .set(PipelineStage::ComputeShader, PipelineStage::ComputeShader)
            .add_image_barrier(
                ImageBarrier::new(texture).with_states(ResourceState::UNORDERED_ACCESS, ResourceState::RENDER_TARGET),
            ),
    )?;
    let recorded = &barriers(&context)[0];
    assert_eq!(recorded.src_stage, vk::PipelineStageFlags::COMPUTE_SHADER);
    assert_eq!(recorded.dst_stage, vk::PipelineStageFlags::ALL_COMMANDS);
    Ok(())
}

#[test]
pub fn access_flags_for_states() {
    assert_eq!(to_access_flags(ResourceState::UNDEFINED), vk::AccessFlags::empty());
    assert_eq!(to_access_flags(ResourceState::COPY_SOURCE), vk::AccessFlags::TRANSFER_READ);
    assert_eq!(to_access_flags(ResourceState::COPY_DEST), vk::AccessFlags::TRANSFER_WRITE);
    assert_eq!(
        to_access_flags(ResourceState::VERTEX_AND_CONSTANT_BUFFER),
        vk::AccessFlags::UNIFORM_READ | vk::AccessFlags::VERTEX_ATTRIBUTE_READ
    );
    assert_eq!(to_access_flags(ResourceState::INDEX_BUFFER), vk::AccessFlags::INDEX_READ);
    assert_eq!(to_access_flags(ResourceState::INDIRECT_ARGUMENT), vk::AccessFlags::INDIRECT_COMMAND_READ);
    assert_eq!(to_access_flags(ResourceState::PRESENT), vk::AccessFlags::MEMORY_READ);
    assert_eq!(to_access_flags(ResourceState::NON_PIXEL_SHADER_RESOURCE), vk::AccessFlags::SHADER_READ);
    assert_eq!(
        to_access_flags(ResourceState::COPY_SOURCE | ResourceState::INDEX_BUFFER),
        vk::AccessFlags::TRANSFER_READ | vk::AccessFlags::INDEX_READ,
        "Combined states give the union of their access flags"
    );
}

#[test]
pub fn image_layouts_for_states() {
    assert_eq!(to_image_layout(ResourceState::COPY_SOURCE), vk::ImageLayout::TRANSFER_SRC_OPTIMAL);
    assert_eq!(to_image_layout(ResourceState::COPY_DEST), vk::ImageLayout::TRANSFER_DST_OPTIMAL);
    assert_eq!(to_image_layout(ResourceState::RENDER_TARGET), vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL);
    assert_eq!(to_image_layout(ResourceState::DEPTH_WRITE), vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL);
    assert_eq!(to_image_layout(ResourceState::DEPTH_READ), vk::ImageLayout::DEPTH_STENCIL_READ_ONLY_OPTIMAL);
    assert_eq!(to_image_layout(ResourceState::UNORDERED_ACCESS), vk::ImageLayout::GENERAL);
    assert_eq!(to_image_layout(ResourceState::SHADER_RESOURCE), vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL);
    assert_eq!(to_image_layout(ResourceState::PIXEL_SHADER_RESOURCE), vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL);
    assert_eq!(to_image_layout(ResourceState::PRESENT), vk::ImageLayout::PRESENT_SRC_KHR);
    assert_eq!(to_image_layout(ResourceState::COMMON), vk::ImageLayout::GENERAL);
    assert_eq!(to_image_layout(ResourceState::UNDEFINED), vk::ImageLayout::UNDEFINED);
}

#[test]
pub fn pipeline_stages_for_access() {
    let shader = vk::PipelineStageFlags::VERTEX_SHADER | vk::PipelineStageFlags::FRAGMENT_SHADER | vk::PipelineStageFlags::COMPUTE_SHADER;
    assert_eq!(determine_pipeline_stage_flags(vk::AccessFlags::SHADER_READ, QueueType::Graphics), shader);
    assert_eq!(
        determine_pipeline_stage_flags(vk::AccessFlags::INDEX_READ, QueueType::Graphics),
        vk::PipelineStageFlags::VERTEX_INPUT
    );
    assert_eq!(
        determine_pipeline_stage_flags(vk::AccessFlags::SHADER_WRITE, QueueType::Compute),
        vk::PipelineStageFlags::COMPUTE_SHADER
    );
    assert_eq!(
        determine_pipeline_stage_flags(vk::AccessFlags::COLOR_ATTACHMENT_WRITE, QueueType::Compute),
        vk::PipelineStageFlags::ALL_COMMANDS,
        "Graphics access on a compute queue falls back to all commands"
    );
    assert_eq!(
        determine_pipeline_stage_flags(vk::AccessFlags::SHADER_READ, QueueType::Transfer),
        vk::PipelineStageFlags::ALL_COMMANDS
    );
    assert_eq!(
        determine_pipeline_stage_flags(vk::AccessFlags::INDIRECT_COMMAND_READ | vk::AccessFlags::TRANSFER_READ, QueueType::Graphics),
        vk::PipelineStageFlags::DRAW_INDIRECT | vk::PipelineStageFlags::TRANSFER
    );
    assert_eq!(
        determine_pipeline_stage_flags(vk::AccessFlags::HOST_WRITE, QueueType::Compute),
        vk::PipelineStageFlags::HOST
    );
    assert_eq!(
        determine_pipeline_stage_flags(vk::AccessFlags::empty(), QueueType::Graphics),
        vk::PipelineStageFlags::TOP_OF_PIPE,
        "No access means top of pipe"
    );
}

#[test]
pub fn stage_queue_types() {
    assert_eq!(PipelineStage::ComputeShader.queue_type(), QueueType::Compute);
    assert_eq!(PipelineStage::RenderTarget.queue_type(), QueueType::Graphics);
    assert_eq!(PipelineStage::Transfer.to_resource_state(), ResourceState::COPY_DEST);
    assert_eq!(PipelineStage::DrawIndirect.to_vk(), vk::PipelineStageFlags::DRAW_INDIRECT);
}
