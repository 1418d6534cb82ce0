//! Format queries needed to pick image aspects and layouts.

use ash::vk;

pub fn has_depth(format: vk::Format) -> bool {
    matches!(
        format,
        vk::Format::D16_UNORM
            | vk::Format::X8_D24_UNORM_PACK32
            | vk::Format::D32_SFLOAT
            | vk::Format::D16_UNORM_S8_UINT
            | vk::Format::D24_UNORM_S8_UINT
            | vk::Format::D32_SFLOAT_S8_UINT
    )
}

pub fn has_stencil(format: vk::Format) -> bool {
    matches!(
        format,
        vk::Format::S8_UINT | vk::Format::D16_UNORM_S8_UINT | vk::Format::D24_UNORM_S8_UINT | vk::Format::D32_SFLOAT_S8_UINT
    )
}

pub fn has_depth_or_stencil(format: vk::Format) -> bool {
    has_depth(format) || has_stencil(format)
}

/// Aspect flags covering every aspect present in the format.
pub fn aspect_mask(format: vk::Format) -> vk::ImageAspectFlags {
    let mut aspect = vk::ImageAspectFlags::empty();
    if has_depth(format) {
        aspect |= vk::ImageAspectFlags::DEPTH;
    }
    if has_stencil(format) {
        aspect |= vk::ImageAspectFlags::STENCIL;
    }
    if aspect.is_empty() {
        vk::ImageAspectFlags::COLOR
    } else {
        aspect
    }
}
