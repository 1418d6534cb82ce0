use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use ash::vk;

use crate::{
    DescriptorPoolSize, DescriptorSetCache, DescriptorSetCreation, DescriptorSetHandle, DeviceSettings, Error, GpuProfiler,
    NativeDevice, ResourceRegistry, SamplerHandle,
};

/// Framebuffers and extent of the current swapchain.
#[derive(Debug, Default, Clone)]
struct Swapchain {
    framebuffers: Vec<vk::Framebuffer>,
    image_index: u32,
    extent: vk::Extent2D,
}

#[derive(Derivative, Default)]
#[derivative(Debug)]
struct DeviceState {
    swapchain: Swapchain,
    default_sampler: SamplerHandle,
    bindless_set: Option<vk::DescriptorSet>,
    #[derivative(Debug = "ignore")]
    profiler: Option<Arc<dyn GpuProfiler>>,
}

#[derive(Derivative)]
#[derivative(Debug)]
struct DeviceInner {
    #[derivative(Debug = "ignore")]
    native: Arc<dyn NativeDevice>,
    settings: DeviceSettings,
    resources: Mutex<ResourceRegistry>,
    descriptor_sets: Mutex<DescriptorSetCache>,
    state: Mutex<DeviceState>,
}

/// The device owns everything command buffers share: the native device, the resource registry, the device-wide
/// descriptor set cache and the swapchain state. Internal state is wrapped in an `Arc<DeviceInner>`, so this is
/// safe to clone.
///
/// When both locks are needed, the descriptor set cache is always locked before the resource registry.
#[derive(Debug, Clone)]
pub struct Device {
    inner: Arc<DeviceInner>,
}

impl Device {
    /// Create a new device on top of a native device.
    /// # Errors
    /// Fails if the device-wide descriptor pool can not be created.
    pub fn new(native: Arc<dyn NativeDevice>, settings: DeviceSettings) -> Result<Self> {
        let descriptor_sets = DescriptorSetCache::new(
            native.as_ref(),
            DescriptorPoolSize::new(settings.descriptor_pool_elements),
            settings.descriptor_set_capacity,
        )?;
        info!(
            "Created device `{}` (debug utils: {}, descriptor set capacity: {})",
            settings.name,
            native.debug_utils_present(),
            settings.descriptor_set_capacity
        );

        let inner = DeviceInner {
            resources: Mutex::new(ResourceRegistry::new(&settings.capacity)),
            descriptor_sets: Mutex::new(descriptor_sets),
            state: Mutex::new(DeviceState::default()),
            native,
            settings,
        };
        Ok(Device {
            inner: Arc::new(inner),
        })
    }

    /// Get the native device all commands are recorded through.
    pub fn native(&self) -> &dyn NativeDevice {
        self.inner.native.as_ref()
    }

    pub fn settings(&self) -> &DeviceSettings {
        &self.inner.settings
    }

    /// Lock the resource registry.
    /// # Errors
    /// Fails if the lock was poisoned.
    pub fn resources(&self) -> Result<MutexGuard<ResourceRegistry>> {
        Ok(self.inner.resources.lock().map_err(Error::from)?)
    }

    /// Lock the device-wide descriptor set cache.
    /// # Errors
    /// Fails if the lock was poisoned.
    pub fn descriptor_sets(&self) -> Result<MutexGuard<DescriptorSetCache>> {
        Ok(self.inner.descriptor_sets.lock().map_err(Error::from)?)
    }

    fn state(&self) -> Result<MutexGuard<DeviceState>> {
        Ok(self.inner.state.lock().map_err(Error::from)?)
    }

    /// Create a descriptor set in the device-wide cache. It stays valid until [`Device::reset_descriptor_sets`] is called,
    /// and is bound with [`CommandBuffer::bind_descriptor_set`](crate::CommandBuffer::bind_descriptor_set).
    /// # Errors
    /// - Fails with [`Error::DescriptorSetTableFull`] if the cache is full. Reset it and try again.
    /// - Fails if any handle in `creation` is invalid or the native allocation fails.
    pub fn create_descriptor_set(&self, creation: &DescriptorSetCreation) -> Result<DescriptorSetHandle> {
        let default_sampler = self.default_sampler()?;
        let mut descriptor_sets = self.descriptor_sets()?;
        let resources = self.resources()?;
        descriptor_sets.create_descriptor_set(self.native(), &resources, default_sampler, creation)
    }

    /// Release every device-wide descriptor set. The caller must make sure none of them is still in use by the GPU.
    pub fn reset_descriptor_sets(&self) -> Result<()> {
        self.descriptor_sets()?.reset(self.native())
    }

    /// Replace the swapchain framebuffers, one per swapchain image. The image index is reset to zero.
    pub fn set_swapchain(&self, framebuffers: Vec<vk::Framebuffer>, width: u32, height: u32) -> Result<()> {
        let mut state = self.state()?;
        state.swapchain = Swapchain {
            framebuffers,
            image_index: 0,
            extent: vk::Extent2D {
                width,
                height,
            },
        };
        Ok(())
    }

    /// Set the index of the swapchain image that is rendered to this frame.
    pub fn set_swapchain_image_index(&self, index: u32) -> Result<()> {
        self.state()?.swapchain.image_index = index;
        Ok(())
    }

    pub fn swapchain_extent(&self) -> Result<vk::Extent2D> {
        Ok(self.state()?.swapchain.extent)
    }

    /// Framebuffer of the current swapchain image.
    /// # Errors
    /// Fails with [`Error::NoSwapchain`] if there is no framebuffer for the current image index.
    pub fn swapchain_framebuffer(&self) -> Result<vk::Framebuffer> {
        let state = self.state()?;
        let index = state.swapchain.image_index;
        state
            .swapchain
            .framebuffers
            .get(index as usize)
            .copied()
            .ok_or_else(|| Error::NoSwapchain(index).into())
    }

    /// Set the sampler used for sampled textures that have no sampler of their own.
    pub fn set_default_sampler(&self, sampler: SamplerHandle) -> Result<()> {
        self.state()?.default_sampler = sampler;
        Ok(())
    }

    pub fn default_sampler(&self) -> Result<SamplerHandle> {
        Ok(self.state()?.default_sampler)
    }

    /// Set the global bindless descriptor set. If set, it is bound at set index 1 every time descriptor sets are bound.
    pub fn set_bindless_set(&self, set: Option<vk::DescriptorSet>) -> Result<()> {
        self.state()?.bindless_set = set;
        Ok(())
    }

    pub fn bindless_set(&self) -> Result<Option<vk::DescriptorSet>> {
        Ok(self.state()?.bindless_set)
    }

    /// Whether debug labels are recorded for markers.
    pub fn debug_utils_present(&self) -> bool {
        self.inner.native.debug_utils_present()
    }

    /// Set the collaborator that receives GPU timestamps for markers.
    pub fn set_profiler(&self, profiler: Option<Arc<dyn GpuProfiler>>) -> Result<()> {
        self.state()?.profiler = profiler;
        Ok(())
    }

    pub fn profiler(&self) -> Result<Option<Arc<dyn GpuProfiler>>> {
        Ok(self.state()?.profiler.clone())
    }
}

impl Drop for DeviceInner {
    fn drop(&mut self) {
        let descriptor_sets = self.descriptor_sets.get_mut().unwrap_or_else(PoisonError::into_inner);
        descriptor_sets.destroy(self.native.as_ref());
    }
}

static_assertions::assert_impl_all!(Device: Send, Sync, Clone);
