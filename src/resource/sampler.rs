use ash::vk;

/// A sampler known to the registry.
#[derive(Debug, Clone)]
pub struct Sampler {
    pub handle: vk::Sampler,
    pub name: String,
}

impl Sampler {
    pub fn new(handle: vk::Sampler) -> Self {
        Self {
            handle,
            name: String::new(),
        }
    }
}
